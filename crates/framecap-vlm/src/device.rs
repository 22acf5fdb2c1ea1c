use candle_core::{DType, Device};

/// Select the compute device and the matching weights precision.
///
/// NOTE: to run on Cuda, build with the `cuda` feature.
pub(crate) fn select_device(force_cpu: bool) -> (Device, DType) {
    if force_cpu {
        return (Device::Cpu, DType::F32);
    }

    #[cfg(feature = "cuda")]
    let (device, dtype) = match Device::cuda_if_available(0) {
        Ok(device) if device.is_cuda() => (device, DType::BF16),
        Ok(device) => {
            log::warn!("CUDA not available, defaulting to CPU");
            (device, DType::F32)
        }
        Err(e) => {
            log::warn!("CUDA not available, defaulting to CPU: {e}");
            (Device::Cpu, DType::F32)
        }
    };

    #[cfg(not(feature = "cuda"))]
    let (device, dtype) = (Device::Cpu, DType::F32);

    (device, dtype)
}

#[cfg(test)]
mod tests {
    use candle_core::DType;

    #[test]
    fn force_cpu() {
        let (device, dtype) = super::select_device(true);
        assert!(device.is_cpu());
        assert_eq!(dtype, DType::F32);
    }
}
