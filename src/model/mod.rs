//! Model files, configuration and compute device for local inference.

pub mod config;
pub mod device;
pub mod source;

pub use config::ModelConfig;
pub use device::Device;
pub use source::{ModelFiles, ModelSource};
