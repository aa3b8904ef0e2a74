use candle_core::{D, DType, Device, Result as CandleResult, Tensor};
use candle_core::safetensors::MmapedSafetensors;
use candle_nn::var_builder::SimpleBackend;

use crate::layers::activation::Activation;
use crate::layers::layer::Layer;
use crate::layers::linear::LinearLayer;

pub trait Model {
    fn load(
        weights: &MmapedSafetensors,
        target: &str,
        activation: Activation,
        device: &Device,
    ) -> CandleResult<Self>
    where
        Self: Sized;
    fn forward(&self, input: &Tensor) -> CandleResult<Tensor>;
    /// Single-row prediction: the scalar output for regressors, the argmax
    /// class index for multi-output classifiers.
    fn predict(&self, input: &Tensor) -> CandleResult<f64>;
    fn in_features(&self) -> usize;
}

/// Stack of dense layers stored under `{target}.{i}.weight` / `{target}.{i}.bias`.
pub struct DenseEstimator {
    layers: Vec<LinearLayer>,
    activation: Activation,
}

impl DenseEstimator {
    pub fn new(layers: Vec<LinearLayer>, activation: Activation) -> CandleResult<Self> {
        if layers.is_empty() {
            candle_core::bail!("estimator has no layers");
        }
        for (idx, pair) in layers.windows(2).enumerate() {
            if pair[0].out_features() != pair[1].in_features() {
                candle_core::bail!(
                    "layer {} outputs {} features but layer {} expects {}",
                    idx,
                    pair[0].out_features(),
                    idx + 1,
                    pair[1].in_features()
                );
            }
        }
        Ok(Self { layers, activation })
    }

    pub fn out_features(&self) -> usize {
        self.layers[self.layers.len() - 1].out_features()
    }
}

impl Model for DenseEstimator {
    fn load(
        weights: &MmapedSafetensors,
        target: &str,
        activation: Activation,
        device: &Device,
    ) -> CandleResult<Self> {
        let mut layers = Vec::new();
        while weights.contains_tensor(&format!("{}.{}.weight", target, layers.len())) {
            let prefix = format!("{}.{}", target, layers.len());
            layers.push(LinearLayer::new(weights, &prefix, device)?);
        }
        Self::new(layers, activation)
    }

    fn forward(&self, input: &Tensor) -> CandleResult<Tensor> {
        let mut hidden = input.to_dtype(DType::F64)?;
        let last = self.layers.len() - 1;
        for (idx, layer) in self.layers.iter().enumerate() {
            hidden = layer.forward(&hidden)?;
            if idx != last {
                hidden = self.activation.apply(&hidden)?;
            }
        }
        Ok(hidden)
    }

    fn predict(&self, input: &Tensor) -> CandleResult<f64> {
        let output = self.forward(input)?.squeeze(0)?;
        if self.out_features() == 1 {
            output.squeeze(0)?.to_scalar::<f64>()
        } else {
            let class = output.argmax(D::Minus1)?.to_scalar::<u32>()?;
            Ok(class as f64)
        }
    }

    fn in_features(&self) -> usize {
        self.layers[0].in_features()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(weights: &[[f64; 2]], bias: &[f64]) -> CandleResult<LinearLayer> {
        let device = Device::Cpu;
        let flat: Vec<f64> = weights.iter().flatten().copied().collect();
        let w = Tensor::from_vec(flat, (weights.len(), 2), &device)?;
        let b = Tensor::new(bias, &device)?;
        LinearLayer::from_tensors(w, Some(b), &device)
    }

    #[test]
    fn regressor_returns_scalar() -> CandleResult<()> {
        let model = DenseEstimator::new(vec![linear(&[[2.0, 1.0]], &[10.0])?], Activation::Relu)?;
        let x = Tensor::new(&[[3.0f64, -4.0]], &Device::Cpu)?;
        assert_eq!(model.predict(&x)?, 12.0);
        Ok(())
    }

    #[test]
    fn classifier_returns_argmax_index() -> CandleResult<()> {
        let model = DenseEstimator::new(
            vec![linear(&[[1.0, 0.0], [0.0, 1.0]], &[0.0, 0.0])?],
            Activation::Relu,
        )?;
        let x = Tensor::new(&[[0.2f64, 0.9]], &Device::Cpu)?;
        assert_eq!(model.predict(&x)?, 1.0);
        Ok(())
    }

    #[test]
    fn activation_only_between_layers() -> CandleResult<()> {
        let hidden = linear(&[[1.0, 0.0], [0.0, 1.0]], &[0.0, 0.0])?;
        let device = Device::Cpu;
        let out = LinearLayer::from_tensors(
            Tensor::new(&[[1.0f64, 1.0]], &device)?,
            Some(Tensor::new(&[-5.0f64], &device)?),
            &device,
        )?;
        let model = DenseEstimator::new(vec![hidden, out], Activation::Relu)?;
        let x = Tensor::new(&[[-3.0f64, 2.0]], &device)?;
        // relu(-3) + relu(2) - 5, the final -3 is not clamped
        assert_eq!(model.predict(&x)?, -3.0);
        Ok(())
    }

    #[test]
    fn rejects_unchained_layers() -> CandleResult<()> {
        let first = linear(&[[1.0, 0.0]], &[0.0])?;
        let second = linear(&[[1.0, 0.0]], &[0.0])?;
        assert!(DenseEstimator::new(vec![first, second], Activation::Relu).is_err());
        assert!(DenseEstimator::new(vec![], Activation::Relu).is_err());
        Ok(())
    }
}
