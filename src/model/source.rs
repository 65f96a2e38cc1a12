//! Model source and download logic.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, SentimentError};

/// ONNX graph locations tried in order, relative to the repo or directory root.
const MODEL_CANDIDATES: &[&str] = &["onnx/model.onnx", "model.onnx"];
const TOKENIZER_FILE: &str = "tokenizer.json";
const CONFIG_FILE: &str = "config.json";

/// Source for a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Load from HuggingFace Hub repository.
    HuggingFace {
        /// Repository ID (e.g., "distilbert/distilbert-base-uncased-finetuned-sst-2-english").
        repo_id: String,
        /// Optional branch, tag or commit; defaults to `main`.
        revision: Option<String>,
    },

    /// Load from a local directory holding the exported model.
    Local {
        /// Directory with `model.onnx` (or `onnx/model.onnx`), `tokenizer.json`
        /// and `config.json`.
        path: PathBuf,
    },
}

/// Paths to everything needed to run a text-classification model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub model: PathBuf,
    pub tokenizer: PathBuf,
    pub config: PathBuf,
}

impl ModelSource {
    /// Create a HuggingFace source.
    pub fn huggingface(repo_id: impl Into<String>) -> Self {
        Self::HuggingFace {
            repo_id: repo_id.into(),
            revision: None,
        }
    }

    /// Create a HuggingFace source pinned to a revision.
    pub fn huggingface_revision(repo_id: impl Into<String>, revision: impl Into<String>) -> Self {
        Self::HuggingFace {
            repo_id: repo_id.into(),
            revision: Some(revision.into()),
        }
    }

    /// Create a local source.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local { path: path.into() }
    }

    /// Download or locate the model files.
    ///
    /// HuggingFace sources are downloaded into `cache_dir` if not cached.
    /// Local sources are checked for existence and returned as-is.
    pub fn resolve(&self, cache_dir: &Path) -> Result<ModelFiles> {
        match self {
            Self::HuggingFace { repo_id, revision } => {
                download(repo_id, revision.as_deref(), cache_dir)
            }
            Self::Local { path } => locate(path),
        }
    }
}

/// Download model, tokenizer and config from HuggingFace Hub.
fn download(repo_id: &str, revision: Option<&str>, cache_dir: &Path) -> Result<ModelFiles> {
    use hf_hub::api::sync::ApiBuilder;
    use hf_hub::{Repo, RepoType};

    let api = ApiBuilder::new()
        .with_cache_dir(cache_dir.to_path_buf())
        .build()
        .map_err(|e| SentimentError::ModelLoad(format!("Failed to initialize HF API: {e}")))?;

    let repo = api.repo(Repo::with_revision(
        repo_id.to_string(),
        RepoType::Model,
        revision.unwrap_or("main").to_string(),
    ));

    info!(repo_id, revision = revision.unwrap_or("main"), "fetching model files");

    let mut last_err = None;
    let mut model = None;
    for candidate in MODEL_CANDIDATES {
        match repo.get(candidate) {
            Ok(path) => {
                model = Some(path);
                break;
            }
            Err(e) => last_err = Some(e),
        }
    }
    let model = model.ok_or_else(|| {
        SentimentError::ModelLoad(format!(
            "No ONNX model found in {repo_id}: {}",
            last_err.map(|e| e.to_string()).unwrap_or_default()
        ))
    })?;

    let fetch = |file: &str| {
        repo.get(file).map_err(|e| {
            SentimentError::ModelLoad(format!("Failed to download {file} from {repo_id}: {e}"))
        })
    };

    Ok(ModelFiles {
        model,
        tokenizer: fetch(TOKENIZER_FILE)?,
        config: fetch(CONFIG_FILE)?,
    })
}

/// Find the model files inside a local directory.
fn locate(dir: &Path) -> Result<ModelFiles> {
    if !dir.is_dir() {
        return Err(SentimentError::ModelLoad(format!(
            "Local model path is not a directory: {}",
            dir.display()
        )));
    }

    let model = MODEL_CANDIDATES
        .iter()
        .map(|c| dir.join(c))
        .find(|p| p.is_file())
        .ok_or_else(|| {
            SentimentError::ModelLoad(format!("No ONNX model found in {}", dir.display()))
        })?;

    let require = |file: &str| {
        let path = dir.join(file);
        if path.is_file() {
            Ok(path)
        } else {
            Err(SentimentError::ModelLoad(format!(
                "Missing {file} in {}",
                dir.display()
            )))
        }
    };

    Ok(ModelFiles {
        model,
        tokenizer: require(TOKENIZER_FILE)?,
        config: require(CONFIG_FILE)?,
    })
}
