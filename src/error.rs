//! Sentiment service error types

/// Sentiment service error types
#[derive(Debug, thiserror::Error)]
pub enum SentimentError {
    // Startup errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to load model: {0}")]
    ModelLoad(String),

    // Inference errors
    #[error("tokenization failed: {0}")]
    Tokenization(String),

    #[error("inference failed: {0}")]
    Inference(String),

    /// Model output did not have the expected shape.
    #[error("data error: {0}")]
    DataError(String),

    #[error("model returned no labels")]
    EmptyResult,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for sentiment service operations
pub type Result<T> = std::result::Result<T, SentimentError>;
