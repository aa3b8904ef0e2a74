use serde::Deserialize;

/// Nonlinearity applied between the hidden layers of an estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Identity,
    #[default]
    Relu,
    Tanh,
    Logistic,
}

impl Activation {
    pub fn apply(
        &self,
        input: &candle_core::Tensor,
    ) -> candle_core::Result<candle_core::Tensor> {
        match self {
            Activation::Identity => Ok(input.clone()),
            Activation::Relu => input.relu(),
            Activation::Tanh => input.tanh(),
            Activation::Logistic => (input.neg()?.exp()? + 1.0)?.recip(),
        }
    }
}
