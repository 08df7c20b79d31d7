pub mod optimizer;

pub use optimizer::optimize;
