use crate::config::ServerConfig;
use crate::predictor::inference::Predictor;

pub struct AppState {
    pub predictor: Predictor,
    pub config: ServerConfig,
}
