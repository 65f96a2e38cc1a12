//! Classifier trait
//!
//! The HTTP layer and [`SentimentPipeline`](crate::SentimentPipeline) only
//! see a `SentimentClassifier`. The production implementation is the local
//! ONNX model ([`LocalClassifier`](crate::providers::LocalClassifier)); tests
//! plug in mocks.
//!
//! # Example
//!
//! ```ignore
//! struct AlwaysPositive;
//!
//! #[async_trait]
//! impl SentimentClassifier for AlwaysPositive {
//!     fn name(&self) -> &str { "always-positive" }
//!     fn labels(&self) -> &[String] { &self.labels }
//!     async fn classify(&self, _text: &str) -> Result<Vec<LabelScore>> {
//!         Ok(vec![LabelScore::new("POSITIVE", 1.0)])
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::Result;
use crate::types::LabelScore;

/// A text classifier answering single-text queries.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classifier name for logging/metrics.
    fn name(&self) -> &str;

    /// The fixed label set this classifier can return.
    fn labels(&self) -> &[String];

    /// Classify one text.
    ///
    /// Returns every label with its confidence, highest first.
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>>;
}
