pub mod engine;

pub use engine::{price, PriceBreakdown, StopPricingInput};
