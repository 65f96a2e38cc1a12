//! Classifier implementations.
//!
//! The only production classifier runs a local ONNX model; see [`onnx`].

pub mod onnx;

pub use onnx::{
    DEFAULT_MAX_LENGTH, DEFAULT_REPO_ID, LocalClassifier, LocalModelOptions, LocalSentimentModel,
    OnnxSentimentModel, default_cache_dir,
};
