use candle_core::{Device, Result};

/// Pick the best available compute device: CUDA, then Metal, then CPU.
///
/// This is an optimization, never a correctness concern; every code path
/// works on the CPU fallback.
pub fn best_device() -> Result<Device> {
    if candle_core::utils::cuda_is_available() {
        Device::new_cuda(0)
    } else if candle_core::utils::metal_is_available() {
        Device::new_metal(0)
    } else {
        Ok(Device::Cpu)
    }
}

/// Human-readable name of the selected device for progress messages.
pub fn describe(device: &Device) -> &'static str {
    match device {
        Device::Cpu => "CPU",
        Device::Cuda(_) => "CUDA GPU",
        Device::Metal(_) => "Metal GPU",
    }
}
