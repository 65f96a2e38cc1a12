//! The parts of a HuggingFace `config.json` the classifier needs.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SentimentError};
use crate::types::LabelMap;

/// Architectures whose exported graphs take a `token_type_ids` input.
const TOKEN_TYPE_MODELS: &[&str] = &[
    "albert",
    "bert",
    "convbert",
    "deberta",
    "deberta-v2",
    "electra",
    "mobilebert",
];

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    model_type: Option<String>,
    #[serde(default)]
    id2label: Option<BTreeMap<String, String>>,
    #[serde(default)]
    num_labels: Option<usize>,
}

/// Classification-relevant model configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub model_type: Option<String>,
    pub labels: LabelMap,
}

impl ModelConfig {
    /// Parse a `config.json` document.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(content)?;
        Ok(Self {
            labels: LabelMap::from_id2label(raw.id2label, raw.num_labels)?,
            model_type: raw.model_type,
        })
    }

    /// Read and parse a `config.json` from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SentimentError::ModelLoad(format!("Failed to read model config {path:?}: {e}"))
        })?;
        Self::parse(&content)
    }

    /// Whether the exported graph expects `token_type_ids` alongside
    /// `input_ids` and `attention_mask`.
    pub fn uses_token_type_ids(&self) -> bool {
        self.model_type
            .as_deref()
            .is_some_and(|t| TOKEN_TYPE_MODELS.contains(&t))
    }
}
