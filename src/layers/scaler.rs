use candle_core::{DType, Device, safetensors::MmapedSafetensors, Result as CandleResult, Tensor};

use crate::layers::layer::Layer;

/// Column-wise standardisation `(x - mean) / scale`.
pub struct StandardScalerLayer {
    mean: Tensor,
    scale: Tensor,
    device: Device,
}

impl StandardScalerLayer {
    pub fn new(weights_map: &MmapedSafetensors, device: &Device) -> CandleResult<Self> {
        let mean = weights_map.load("mean", device)?.to_dtype(DType::F64)?;
        let scale = weights_map.load("scale", device)?.to_dtype(DType::F64)?;
        Self::from_tensors(mean, scale, device)
    }

    pub fn from_tensors(mean: Tensor, scale: Tensor, device: &Device) -> CandleResult<Self> {
        let width = mean.dims1()?;
        if scale.dims1()? != width {
            candle_core::bail!(
                "preprocessor mean has {width} columns but scale has {}",
                scale.dims1()?
            );
        }
        Ok(Self {
            mean,
            scale,
            device: device.clone(),
        })
    }

    pub fn width(&self) -> usize {
        self.mean.dims()[0]
    }
}

impl Layer for StandardScalerLayer {
    fn forward(&self, input: &Tensor) -> CandleResult<Tensor> {
        let input = input.to_device(&self.device)?.to_dtype(DType::F64)?;
        let (_, columns) = input.dims2()?;
        if columns != self.width() {
            candle_core::bail!(
                "preprocessor expects {} features, got {columns}",
                self.width()
            );
        }
        input.broadcast_sub(&self.mean)?.broadcast_div(&self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaler() -> CandleResult<StandardScalerLayer> {
        let device = Device::Cpu;
        let mean = Tensor::new(&[10.0f64, 0.0, 4.0], &device)?;
        let scale = Tensor::new(&[2.0f64, 1.0, 0.5], &device)?;
        StandardScalerLayer::from_tensors(mean, scale, &device)
    }

    #[test]
    fn standardises_each_column() -> CandleResult<()> {
        let x = Tensor::new(&[[14.0f64, 3.0, 5.0]], &Device::Cpu)?;
        let y = scaler()?.forward(&x)?.to_vec2::<f64>()?;
        assert_eq!(y, vec![vec![2.0, 3.0, 2.0]]);
        Ok(())
    }

    #[test]
    fn rejects_wrong_width() -> CandleResult<()> {
        let x = Tensor::new(&[[1.0f64, 2.0]], &Device::Cpu)?;
        assert!(scaler()?.forward(&x).is_err());
        Ok(())
    }
}
