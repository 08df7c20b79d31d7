pub mod orchestrator;

pub use orchestrator::QuoteOrchestrator;
