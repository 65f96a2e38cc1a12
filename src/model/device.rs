//! Device configuration for local inference.

use crate::error::{Result, SentimentError};

/// Compute device for local inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    /// CPU execution (default).
    #[default]
    Cpu,

    /// CUDA GPU execution.
    #[cfg(feature = "cuda")]
    Cuda {
        /// GPU device ID (0-indexed).
        device_id: u32,
    },
}

impl Device {
    /// Create CPU device.
    pub fn cpu() -> Self {
        Self::Cpu
    }

    /// Create CUDA device with the given device ID.
    #[cfg(feature = "cuda")]
    pub fn cuda(device_id: u32) -> Self {
        Self::Cuda { device_id }
    }

    /// Parse a config value: `"cpu"`, `"cuda"` or `"cuda:<id>"`.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            #[cfg(feature = "cuda")]
            "cuda" => Ok(Self::Cuda { device_id: 0 }),
            #[cfg(feature = "cuda")]
            other if other.starts_with("cuda:") => other["cuda:".len()..]
                .parse()
                .map(|device_id| Self::Cuda { device_id })
                .map_err(|_| SentimentError::Configuration(format!("Invalid device: {value}"))),
            other if other.starts_with("cuda") => Err(SentimentError::Configuration(format!(
                "Device '{value}' requires the `cuda` feature"
            ))),
            _ => Err(SentimentError::Configuration(format!(
                "Invalid device: {value}"
            ))),
        }
    }

    /// Get the device name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            #[cfg(feature = "cuda")]
            Self::Cuda { .. } => "CUDA",
        }
    }
}
