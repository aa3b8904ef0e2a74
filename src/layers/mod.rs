pub mod activation;
pub mod layer;
pub mod linear;
pub mod scaler;
