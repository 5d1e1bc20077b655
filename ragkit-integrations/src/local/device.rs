//! Device selection for in-process models.
//!
//! Both local backends default to `cpu`. `auto` tries CUDA, then Metal on
//! macOS, and falls back to the CPU.

use candle_core::Device;
use tracing::{debug, info, warn};

use super::error::LocalError;

/// A resolved Candle device together with what kind it is.
#[derive(Debug, Clone)]
pub struct DeviceManager {
    device: Device,
    device_type: DeviceType,
}

/// Supported device types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceType {
    /// CPU device
    Cpu,
    /// CUDA GPU device with its index
    Cuda(usize),
    /// Metal GPU device (macOS)
    Metal,
}

impl DeviceManager {
    /// Resolve a device preference: `auto`, `cpu`, `cuda`, `cuda:N`, or `metal`.
    pub fn with_preference(preference: &str) -> Result<Self, LocalError> {
        let (device, device_type) = match preference.to_lowercase().as_str() {
            "auto" => Self::select_best_device(),
            "cpu" => (Device::Cpu, DeviceType::Cpu),
            "cuda" => Self::select_cuda_device(0)?,
            device_str if device_str.starts_with("cuda:") => {
                let gpu_index = device_str
                    .strip_prefix("cuda:")
                    .and_then(|s| s.parse::<usize>().ok())
                    .ok_or_else(|| LocalError::Configuration {
                        message: format!("Invalid CUDA device: {device_str}"),
                    })?;
                Self::select_cuda_device(gpu_index)?
            }
            "metal" => Self::select_metal_device()?,
            _ => {
                return Err(LocalError::Configuration {
                    message: format!("Unsupported device preference: {preference}"),
                });
            }
        };

        info!("Selected device: {:?}", device_type);

        Ok(Self {
            device,
            device_type,
        })
    }

    /// Get the Candle device.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Get the device type.
    pub fn device_type(&self) -> &DeviceType {
        &self.device_type
    }

    /// Human-readable device name.
    pub fn device_info(&self) -> String {
        match &self.device_type {
            DeviceType::Cpu => "CPU".to_string(),
            DeviceType::Cuda(index) => format!("CUDA GPU {index}"),
            DeviceType::Metal => "Metal GPU".to_string(),
        }
    }

    fn select_best_device() -> (Device, DeviceType) {
        debug!("Auto-selecting best available device");

        if let Ok(selected) = Self::select_cuda_device(0) {
            return selected;
        }

        if cfg!(target_os = "macos") {
            if let Ok(selected) = Self::select_metal_device() {
                return selected;
            }
        }

        debug!("Falling back to CPU device");
        (Device::Cpu, DeviceType::Cpu)
    }

    fn select_cuda_device(index: usize) -> Result<(Device, DeviceType), LocalError> {
        match Device::new_cuda(index) {
            Ok(device) => Ok((device, DeviceType::Cuda(index))),
            Err(e) => {
                warn!("Failed to initialize CUDA device {}: {}", index, e);
                Err(LocalError::Device {
                    message: format!("CUDA device {index} not available: {e}"),
                })
            }
        }
    }

    fn select_metal_device() -> Result<(Device, DeviceType), LocalError> {
        match Device::new_metal(0) {
            Ok(device) => Ok((device, DeviceType::Metal)),
            Err(e) => {
                warn!("Failed to initialize Metal device: {}", e);
                Err(LocalError::Device {
                    message: format!("Metal device not available: {e}"),
                })
            }
        }
    }
}
