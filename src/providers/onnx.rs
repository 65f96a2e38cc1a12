//! Local sentiment classification via ONNX Runtime.
//!
//! Runs a sequence-classification model exported to ONNX (e.g. by
//! `optimum`) with a HuggingFace tokenizer. Labels come from the model's
//! `config.json`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::TensorRef;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::info;

use crate::error::{Result, SentimentError};
use crate::model::{Device, ModelConfig, ModelFiles, ModelSource};
use crate::traits::SentimentClassifier;
use crate::types::{LabelMap, LabelScore};

/// The model served when nothing else is configured.
pub const DEFAULT_REPO_ID: &str = "distilbert/distilbert-base-uncased-finetuned-sst-2-english";

/// Maximum sequence length (in tokens) fed to the model.
pub const DEFAULT_MAX_LENGTH: usize = 512;

/// Supported local sentiment models.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LocalSentimentModel {
    /// distilbert-base-uncased fine-tuned on SST-2 (NEGATIVE / POSITIVE).
    #[default]
    DistilbertSst2,
    /// Any ONNX-exported text-classification repo on the HuggingFace Hub.
    Hub {
        repo_id: String,
        revision: Option<String>,
    },
    /// Model from a local directory.
    Custom { dir: PathBuf },
}

impl LocalSentimentModel {
    /// Get the HuggingFace repo ID for this model.
    pub fn repo_id(&self) -> Option<&str> {
        match self {
            Self::DistilbertSst2 => Some(DEFAULT_REPO_ID),
            Self::Hub { repo_id, .. } => Some(repo_id.as_str()),
            Self::Custom { .. } => None,
        }
    }

    /// Get the model name for display.
    pub fn name(&self) -> &str {
        match self {
            Self::DistilbertSst2 => "distilbert-sst2",
            Self::Hub { repo_id, .. } => repo_id.rsplit('/').next().unwrap_or(repo_id.as_str()),
            Self::Custom { dir } => dir
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("custom"),
        }
    }

    /// Where the model files come from.
    pub fn source(&self) -> ModelSource {
        match self {
            Self::DistilbertSst2 => ModelSource::huggingface(DEFAULT_REPO_ID),
            Self::Hub { repo_id, revision } => ModelSource::HuggingFace {
                repo_id: repo_id.clone(),
                revision: revision.clone(),
            },
            Self::Custom { dir } => ModelSource::local(dir),
        }
    }
}

/// Options for loading a local model.
#[derive(Debug, Clone)]
pub struct LocalModelOptions {
    /// Device for inference.
    pub device: Device,
    /// Cache directory for downloaded models.
    pub cache_dir: PathBuf,
    /// Inputs longer than this many tokens are truncated.
    pub max_length: usize,
}

impl Default for LocalModelOptions {
    fn default() -> Self {
        Self {
            device: Device::default(),
            cache_dir: default_cache_dir(),
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

/// Get the cache directory for models.
pub fn default_cache_dir() -> PathBuf {
    std::env::var("SENTIMENT_CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("sentiment-service")
                .join("models")
        })
}

/// A loaded ONNX text-classification model.
pub struct OnnxSentimentModel {
    session: Session,
    tokenizer: Tokenizer,
    config: ModelConfig,
    name: String,
}

impl OnnxSentimentModel {
    /// Load the specified model.
    ///
    /// Downloads the model if not cached locally.
    pub fn new(model: &LocalSentimentModel, options: &LocalModelOptions) -> Result<Self> {
        let files = model.source().resolve(&options.cache_dir)?;
        Self::from_files(model.name(), &files, options)
    }

    /// Load a model from already-resolved files.
    pub fn from_files(name: &str, files: &ModelFiles, options: &LocalModelOptions) -> Result<Self> {
        let config = ModelConfig::from_file(&files.config)?;
        let tokenizer = load_tokenizer(&files.tokenizer, options.max_length)?;
        let session = build_session(&files.model, &options.device)?;

        info!(
            model = name,
            device = options.device.name(),
            labels = ?config.labels.labels(),
            "sentiment model loaded"
        );

        Ok(Self {
            session,
            tokenizer,
            config,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output labels in model order.
    pub fn labels(&self) -> &LabelMap {
        &self.config.labels
    }

    /// Classify a single text, returning all labels ranked by score.
    pub fn classify(&mut self, text: &str) -> Result<Vec<LabelScore>> {
        let encoded = encode(&self.tokenizer, text)?;

        let type_ids = encoded.type_ids_for(&self.config);
        let logits = self.run_inference(&encoded.input_ids, &encoded.attention_mask, type_ids)?;

        let row = logits.into_iter().next().ok_or(SentimentError::EmptyResult)?;
        self.config.labels.rank(&probabilities(&row))
    }

    /// Run the ONNX session and return logits as `batch x num_labels`.
    fn run_inference(
        &mut self,
        input_ids: &[i64],
        attention_mask: &[i64],
        token_type_ids: Option<&[i64]>,
    ) -> Result<Vec<Vec<f32>>> {
        let shape = [1_usize, input_ids.len()];

        let mut inputs = ort::inputs![
            "input_ids" => tensor_view("input_ids", shape, input_ids)?,
            "attention_mask" => tensor_view("attention_mask", shape, attention_mask)?,
        ];
        if let Some(type_ids) = token_type_ids {
            inputs.push((
                "token_type_ids".into(),
                tensor_view("token_type_ids", shape, type_ids)?.into(),
            ));
        }

        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| SentimentError::Inference(format!("ONNX inference failed: {e}")))?;

        let logits = outputs
            .get("logits")
            .ok_or_else(|| SentimentError::DataError("No logits output found".to_string()))?;

        let (tensor_shape, logits_data) = logits
            .try_extract_tensor::<f32>()
            .map_err(|e| SentimentError::DataError(format!("Failed to extract logits: {e}")))?;

        if tensor_shape.len() != 2 {
            return Err(SentimentError::DataError(format!(
                "Expected 2-D logits, got {} dimensions",
                tensor_shape.len()
            )));
        }
        let batch_size = tensor_shape[0] as usize;
        let num_labels = tensor_shape[1] as usize;

        Ok(logits_data
            .chunks(num_labels.max(1))
            .take(batch_size)
            .map(<[f32]>::to_vec)
            .collect())
    }
}

/// Model inputs for a single text, as the `i64` ids ONNX graphs expect.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EncodedText {
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
    token_type_ids: Vec<i64>,
}

impl EncodedText {
    /// Segment ids, for the architectures whose graphs take them.
    fn type_ids_for(&self, config: &ModelConfig) -> Option<&[i64]> {
        config
            .uses_token_type_ids()
            .then_some(self.token_type_ids.as_slice())
    }
}

/// Tokenize with special tokens; truncation follows the tokenizer's settings.
fn encode(tokenizer: &Tokenizer, text: &str) -> Result<EncodedText> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(|e| SentimentError::Tokenization(e.to_string()))?;

    let widen = |values: &[u32]| values.iter().map(|&v| i64::from(v)).collect::<Vec<_>>();
    Ok(EncodedText {
        input_ids: widen(encoding.get_ids()),
        attention_mask: widen(encoding.get_attention_mask()),
        token_type_ids: widen(encoding.get_type_ids()),
    })
}

fn tensor_view<'a>(name: &str, shape: [usize; 2], data: &'a [i64]) -> Result<TensorRef<'a, i64>> {
    TensorRef::from_array_view((shape, data))
        .map_err(|e| SentimentError::Inference(format!("Failed to create {name} tensor: {e}")))
}

/// Turn one row of logits into probabilities.
///
/// Single-logit heads are scored with a sigmoid, wider heads with softmax.
fn probabilities(logits: &[f32]) -> Vec<f32> {
    match logits {
        [single] => vec![sigmoid(*single)],
        _ => softmax(logits),
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Softmax function.
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|x| x / sum).collect()
}

/// Load a tokenizer and pin truncation, disabling any padding it ships with.
fn load_tokenizer(path: &Path, max_length: usize) -> Result<Tokenizer> {
    if max_length == 0 {
        return Err(SentimentError::Configuration(
            "max_length must be greater than zero".to_string(),
        ));
    }

    let mut tokenizer = Tokenizer::from_file(path).map_err(|e| {
        SentimentError::ModelLoad(format!("Failed to load tokenizer from {path:?}: {e}"))
    })?;

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            ..Default::default()
        }))
        .map_err(|e| SentimentError::ModelLoad(format!("Failed to configure truncation: {e}")))?;
    tokenizer.with_padding(None);

    Ok(tokenizer)
}

/// Build an ONNX session with the appropriate execution provider.
fn build_session(model_path: &Path, device: &Device) -> Result<Session> {
    let builder = Session::builder()
        .map_err(|e| SentimentError::ModelLoad(format!("Failed to create session builder: {e}")))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| SentimentError::ModelLoad(format!("Failed to set optimization level: {e}")))?;

    let builder = match device {
        Device::Cpu => builder,
        #[cfg(feature = "cuda")]
        Device::Cuda { device_id } => {
            use ort::execution_providers::CUDAExecutionProvider;
            builder
                .with_execution_providers([CUDAExecutionProvider::default()
                    .with_device_id(*device_id as i32)
                    .build()])
                .map_err(|e| SentimentError::ModelLoad(format!("Failed to configure CUDA: {e}")))?
        }
    };

    builder
        .commit_from_file(model_path)
        .map_err(|e| SentimentError::ModelLoad(format!("Failed to load ONNX model: {e}")))
}

/// [`SentimentClassifier`] backed by a local ONNX model.
///
/// The session needs exclusive access while running, so concurrent requests
/// take turns on the model. Inference runs on the blocking thread pool.
pub struct LocalClassifier {
    model: Arc<Mutex<OnnxSentimentModel>>,
    name: String,
    labels: Vec<String>,
}

impl LocalClassifier {
    pub fn new(model: OnnxSentimentModel) -> Self {
        Self {
            name: format!("onnx:{}", model.name()),
            labels: model.labels().labels().to_vec(),
            model: Arc::new(Mutex::new(model)),
        }
    }

    /// Resolve, download and load a model in one step.
    pub fn load(model: &LocalSentimentModel, options: &LocalModelOptions) -> Result<Self> {
        OnnxSentimentModel::new(model, options).map(Self::new)
    }
}

#[async_trait]
impl SentimentClassifier for LocalClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>> {
        let model = Arc::clone(&self.model);
        let text = text.to_owned();

        tokio::task::spawn_blocking(move || {
            let mut model = model.lock().map_err(|e| {
                SentimentError::Inference(format!("Failed to acquire model lock: {e}"))
            })?;
            model.classify(&text)
        })
        .await
        .map_err(|e| SentimentError::Inference(format!("Inference task failed: {e}")))?
    }
}
