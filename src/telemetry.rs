//! Telemetry metric name constants.
//!
//! The service emits through the `metrics` facade. Deployments install
//! their own recorder (e.g. prometheus); without a recorder installed,
//! all metric calls are no-ops.
//!
//! # Labels
//!
//! - `classifier` — classifier name (e.g. "onnx:distilbert-sst2")
//! - `status` — outcome: "ok" or "error"

/// Total analyze requests that reached the classifier.
///
/// Labels: `classifier`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "sentiment_requests_total";

/// Inference duration in seconds.
///
/// Labels: `classifier`.
pub const INFERENCE_DURATION_SECONDS: &str = "sentiment_inference_duration_seconds";

/// Predicted labels, counted per label.
///
/// Labels: `label`.
pub const LABELS_TOTAL: &str = "sentiment_labels_total";
