pub mod errors;
pub mod features;
pub mod ports;
pub mod recommendation;
pub mod types;
