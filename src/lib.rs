// Module declarations
pub mod config;
pub mod database;
pub mod distance;
pub mod domain;
pub mod error;
pub mod fixtures;
pub mod geocode;
pub mod pricing;
pub mod quote;
pub mod route;
pub mod terrain;
