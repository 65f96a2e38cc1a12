//! Classification output and label mapping

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimentError};

/// A single label with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    /// Softmax probability in `[0, 1]`.
    pub score: f32,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Body returned by `POST /analyze`: the top-ranked label.
pub type ClassificationResult = LabelScore;

/// Ordered mapping from model output index to label name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    labels: Vec<String>,
}

impl LabelMap {
    /// Build a label map from names in output order.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Generic `LABEL_0..LABEL_{n-1}` names, used when a model ships no `id2label`.
    pub fn generic(num_labels: usize) -> Self {
        Self::new((0..num_labels).map(|i| format!("LABEL_{i}")))
    }

    /// Build a label map from a HuggingFace `id2label` table.
    ///
    /// Keys are output indices as strings and must be contiguous from zero.
    /// An absent or empty table falls back to generic names sized by
    /// `num_labels` (default 2).
    pub fn from_id2label(
        id2label: Option<BTreeMap<String, String>>,
        num_labels: Option<usize>,
    ) -> Result<Self> {
        let Some(id2label) = id2label.filter(|m| !m.is_empty()) else {
            return Ok(Self::generic(num_labels.unwrap_or(2)));
        };

        let mut indexed = id2label
            .into_iter()
            .map(|(id, label)| {
                id.parse::<usize>().map(|i| (i, label)).map_err(|_| {
                    SentimentError::Configuration(format!("id2label key '{id}' is not an index"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        indexed.sort_by_key(|(i, _)| *i);

        for (expected, (actual, _)) in indexed.iter().enumerate() {
            if expected != *actual {
                return Err(SentimentError::Configuration(format!(
                    "id2label is not contiguous: missing index {expected}"
                )));
            }
        }

        Ok(Self::new(indexed.into_iter().map(|(_, label)| label)))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Pair probabilities with labels, highest score first.
    pub fn rank(&self, probs: &[f32]) -> Result<Vec<LabelScore>> {
        if probs.len() != self.labels.len() {
            return Err(SentimentError::DataError(format!(
                "Expected {} scores, got {}",
                self.labels.len(),
                probs.len()
            )));
        }

        let mut ranked: Vec<LabelScore> = self
            .labels
            .iter()
            .zip(probs)
            .map(|(label, &score)| LabelScore::new(label.clone(), score))
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(ranked)
    }
}
