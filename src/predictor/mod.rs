pub mod encoders;
pub mod error;
pub mod estimator;
pub mod features;
pub mod format;
pub mod inference;
