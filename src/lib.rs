pub mod api;
pub mod app_state;
pub mod config;
pub mod layers;
pub mod predictor;

pub use app_state::AppState;
