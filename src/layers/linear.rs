use candle_core::{DType, Device, Tensor, Result as CandleResult};
use candle_core::safetensors::MmapedSafetensors;
use candle_nn::var_builder::SimpleBackend;
use crate::layers::layer::Layer;

/// Dense layer `y = x W^T + b` with `W` stored as `[out, in]`.
pub struct LinearLayer {
    weights: Tensor,
    bias: Option<Tensor>,
    device: Device,
}

impl LinearLayer {
    pub fn new(
        weights_map: &MmapedSafetensors,
        prefix: &str,
        device: &Device,
    ) -> CandleResult<Self> {
        let weights = weights_map.load(&format!("{}.weight", prefix), device)?
            .to_dtype(DType::F64)?;

        let bias = if weights_map.contains_tensor(&format!("{}.bias", prefix)) {
            Some(weights_map.load(&format!("{}.bias", prefix), device)?.to_dtype(DType::F64)?)
        } else {
            None
        };

        Self::from_tensors(weights, bias, device)
    }

    pub fn from_tensors(
        weights: Tensor,
        bias: Option<Tensor>,
        device: &Device,
    ) -> CandleResult<Self> {
        let (out_features, _) = weights.dims2()?;
        if let Some(bias) = &bias {
            let len = bias.dims1()?;
            if len != out_features {
                candle_core::bail!("bias has {len} entries but weight has {out_features} rows");
            }
        }
        Ok(Self {
            weights,
            bias,
            device: device.clone(),
        })
    }

    pub fn in_features(&self) -> usize {
        self.weights.dims()[1]
    }

    pub fn out_features(&self) -> usize {
        self.weights.dims()[0]
    }
}

impl Layer for LinearLayer {
    fn forward(&self, input: &Tensor) -> CandleResult<Tensor> {
        let input = input.to_device(&self.device)?;
        let mut output = input.broadcast_matmul(&self.weights.t()?)?;
        if let Some(bias) = &self.bias {
            output = output.broadcast_add(bias)?
        }
        Ok(output)
    }
}
