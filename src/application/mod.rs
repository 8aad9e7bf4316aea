// Model training and loading
pub mod ml;

// Seven-day price path from a start date
pub mod prediction;

// System orchestrator
pub mod system;
