//! sentiment-service - HTTP sentiment analysis over a local ONNX model
//!
//! The crate exposes one pretrained text-classification model through two
//! endpoints: a health-check root (`GET /`) and a text-analysis endpoint
//! (`POST /analyze`). The model is loaded once at startup and shared by
//! every request.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use sentiment_service::providers::{LocalClassifier, LocalModelOptions, LocalSentimentModel};
//! use sentiment_service::server::{AppState, build_router};
//! use sentiment_service::SentimentPipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let classifier = LocalClassifier::load(
//!         &LocalSentimentModel::DistilbertSst2,
//!         &LocalModelOptions::default(),
//!     )?;
//!     let pipeline = SentimentPipeline::new(Arc::new(classifier));
//!
//!     let top = pipeline.analyze("I love this").await?;
//!     println!("{} ({:.3})", top.label, top.score);
//!
//!     let app = build_router(Arc::new(AppState::new(pipeline)));
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
#[cfg(feature = "local-inference")]
pub mod model;
pub mod pipeline;
#[cfg(feature = "local-inference")]
pub mod providers;
pub mod server;
pub mod telemetry;
pub mod traits;
pub mod types;
mod version;

// Re-export main types at crate root
pub use error::{Result, SentimentError};
pub use pipeline::SentimentPipeline;
pub use traits::SentimentClassifier;
pub use version::{GIT_BRANCH, GIT_SHA, PKG_VERSION, full_version, git_short_sha, version_string};

// Re-export model types when feature is enabled
#[cfg(feature = "local-inference")]
pub use model::{Device, ModelConfig, ModelFiles, ModelSource};
#[cfg(feature = "local-inference")]
pub use providers::{LocalClassifier, LocalSentimentModel};

pub use types::{ClassificationResult, Greeting, LabelMap, LabelScore, Review};
