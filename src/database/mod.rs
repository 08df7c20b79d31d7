pub mod cache;
pub mod sqlx;
