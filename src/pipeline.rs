//! The inference wrapper shared by all requests.
//!
//! A `SentimentPipeline` is built once at startup and never mutated. Each
//! call goes straight to the classifier: no batching, no caching of repeated
//! inputs, no timeout.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument};

use crate::error::{Result, SentimentError};
use crate::telemetry;
use crate::traits::SentimentClassifier;
use crate::types::{ClassificationResult, LabelScore};

/// Maps raw text to ranked label/confidence pairs.
#[derive(Clone)]
pub struct SentimentPipeline {
    classifier: Arc<dyn SentimentClassifier>,
}

impl SentimentPipeline {
    pub fn new(classifier: Arc<dyn SentimentClassifier>) -> Self {
        Self { classifier }
    }

    /// Name of the underlying classifier.
    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// The fixed label set of the underlying model.
    pub fn labels(&self) -> &[String] {
        self.classifier.labels()
    }

    /// Classify `text`, returning every label ranked by score.
    ///
    /// A classifier that answers with no labels at all is reported as
    /// [`SentimentError::EmptyResult`].
    #[instrument(skip(self, text), fields(classifier = self.classifier.name(), text_len = text.len()))]
    pub async fn classify(&self, text: &str) -> Result<Vec<LabelScore>> {
        let start = Instant::now();
        let result = self
            .classifier
            .classify(text)
            .await
            .and_then(|ranking| {
                if ranking.is_empty() {
                    Err(SentimentError::EmptyResult)
                } else {
                    Ok(ranking)
                }
            });
        self.record(start, &result);
        result
    }

    /// Classify `text` and keep only the top-ranked label.
    pub async fn analyze(&self, text: &str) -> Result<ClassificationResult> {
        let top = self
            .classify(text)
            .await?
            .into_iter()
            .next()
            .ok_or(SentimentError::EmptyResult)?;

        debug!(label = %top.label, score = top.score, "classified");
        metrics::counter!(telemetry::LABELS_TOTAL, "label" => top.label.clone()).increment(1);
        Ok(top)
    }

    fn record(&self, start: Instant, result: &Result<Vec<LabelScore>>) {
        let classifier = self.classifier.name().to_owned();
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "classifier" => classifier.clone(),
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::INFERENCE_DURATION_SECONDS,
            "classifier" => classifier,
        )
        .record(start.elapsed().as_secs_f64());
    }
}

impl std::fmt::Debug for SentimentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentPipeline")
            .field("classifier", &self.classifier.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedClassifier {
        labels: Vec<String>,
        ranking: Vec<LabelScore>,
    }

    #[async_trait]
    impl SentimentClassifier for FixedClassifier {
        fn name(&self) -> &str {
            "fixed"
        }

        fn labels(&self) -> &[String] {
            &self.labels
        }

        async fn classify(&self, _text: &str) -> Result<Vec<LabelScore>> {
            Ok(self.ranking.clone())
        }
    }

    fn pipeline(ranking: Vec<LabelScore>) -> SentimentPipeline {
        SentimentPipeline::new(Arc::new(FixedClassifier {
            labels: vec!["NEGATIVE".into(), "POSITIVE".into()],
            ranking,
        }))
    }

    #[tokio::test]
    async fn analyze_returns_top_entry() {
        let pipeline = pipeline(vec![
            LabelScore::new("POSITIVE", 0.97),
            LabelScore::new("NEGATIVE", 0.03),
        ]);
        let top = pipeline.analyze("I love this").await.unwrap();
        assert_eq!(top, LabelScore::new("POSITIVE", 0.97));
    }

    #[tokio::test]
    async fn analyze_empty_ranking_is_error() {
        let pipeline = pipeline(vec![]);
        let err = pipeline.analyze("anything").await.unwrap_err();
        assert!(matches!(err, SentimentError::EmptyResult));
    }

    #[tokio::test]
    async fn classify_empty_ranking_is_error() {
        let pipeline = pipeline(vec![]);
        let err = pipeline.classify("anything").await.unwrap_err();
        assert!(matches!(err, SentimentError::EmptyResult));
    }

    #[tokio::test]
    async fn classify_returns_full_ranking() {
        let pipeline = pipeline(vec![
            LabelScore::new("NEGATIVE", 0.6),
            LabelScore::new("POSITIVE", 0.4),
        ]);
        assert_eq!(pipeline.classify("meh").await.unwrap().len(), 2);
        assert_eq!(pipeline.labels().len(), 2);
        assert_eq!(pipeline.classifier_name(), "fixed");
    }
}
