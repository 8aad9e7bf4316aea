pub mod linear_model;
pub mod trainer;

pub use linear_model::LinearPriceModel;
pub use trainer::{ModelStatus, ModelTrainer};
