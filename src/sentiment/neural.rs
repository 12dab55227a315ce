//! Neural sentiment classifier: DistilBERT fine-tuned on SST-2, run with candle

use crate::error::{RankerError, Result};
use crate::processing::text_processor::TextProcessor;
use crate::sentiment::{SentimentClassifier, SentimentOutput};
use anyhow::{anyhow, bail, Context};
use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::{linear, Linear, Module, VarBuilder};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use log::{debug, info};
use safetensors::{tensor::Dtype, SafeTensors};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tokenizers::Tokenizer;

/// Files a sentiment model directory must contain.
pub const MODEL_FILES: &[&str] = &["config.json", "tokenizer.json", "model.safetensors"];

/// Negative/positive probabilities for one chunk of text.
pub trait ChunkScorer: Send + Sync {
    fn probabilities(&self, chunk: &str) -> Result<[f32; 2]>;
}

/// The parts of a sequence-classification `config.json` the head needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    pub dim: usize,
    #[serde(default = "default_max_positions")]
    pub max_position_embeddings: usize,
    #[serde(default)]
    pub id2label: HashMap<String, String>,
}

fn default_max_positions() -> usize {
    512
}

impl ClassifierConfig {
    /// Index of the positive logit. Without labels the usual
    /// negative/positive order is assumed.
    pub fn positive_index(&self) -> anyhow::Result<usize> {
        if self.id2label.is_empty() {
            return Ok(1);
        }
        let index_of = |wanted: &str| {
            self.id2label
                .iter()
                .find(|(_, label)| label.eq_ignore_ascii_case(wanted))
                .and_then(|(id, _)| id.parse::<usize>().ok())
        };
        match (index_of("negative"), index_of("positive")) {
            (Some(neg), Some(pos)) if neg + pos == 1 => Ok(pos),
            _ => bail!("expected NEGATIVE/POSITIVE labels, found {:?}", self.id2label),
        }
    }
}

/// DistilBERT encoder plus its two-layer classification head.
pub struct DistilBertSentiment {
    model: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
    tokenizer: Tokenizer,
    device: Device,
    max_tokens: usize,
    positive: usize,
}

impl DistilBertSentiment {
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        for file in MODEL_FILES {
            let path = model_dir.join(file);
            if !path.exists() {
                bail!("{} not found", path.display());
            }
        }

        let config_json = std::fs::read_to_string(model_dir.join("config.json"))
            .context("failed to read config.json")?;
        let head: ClassifierConfig =
            serde_json::from_str(&config_json).context("invalid classifier config")?;
        let config: DistilBertConfig =
            serde_json::from_str(&config_json).context("invalid DistilBERT config")?;
        let positive = head.positive_index()?;

        let tokenizer = Tokenizer::from_file(model_dir.join("tokenizer.json"))
            .map_err(|e| anyhow!("failed to load tokenizer: {}", e))?;

        let device = Device::Cpu;
        let tensors = load_weights(&model_dir.join("model.safetensors"), &device)?;
        debug!("Loaded {} tensors", tensors.len());
        let vb = VarBuilder::from_tensors(tensors, DType::F32, &device);

        let model = DistilBertModel::load(vb.pp("distilbert"), &config)
            .context("failed to build the DistilBERT encoder")?;
        let pre_classifier = linear(head.dim, head.dim, vb.pp("pre_classifier"))
            .context("missing pre_classifier weights")?;
        let classifier =
            linear(head.dim, 2, vb.pp("classifier")).context("missing classifier weights")?;

        Ok(Self {
            model,
            pre_classifier,
            classifier,
            tokenizer,
            device,
            max_tokens: head.max_position_embeddings.max(2),
            positive,
        })
    }

    /// Softmax over the two logits for one token sequence.
    fn forward(&self, ids: &[u32]) -> candle_core::Result<Vec<f32>> {
        let input = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        // Single unpadded sequence: nothing is masked.
        let mask = Tensor::zeros((ids.len(), ids.len()), DType::U8, &self.device)?;
        let hidden = self.model.forward(&input, &mask)?;
        let cls = hidden.i((.., 0))?;
        let pooled = self.pre_classifier.forward(&cls)?.relu()?;
        let logits = self.classifier.forward(&pooled)?;
        candle_nn::ops::softmax(&logits, D::Minus1)?
            .squeeze(0)?
            .to_vec1::<f32>()
    }
}

impl ChunkScorer for DistilBertSentiment {
    fn probabilities(&self, chunk: &str) -> Result<[f32; 2]> {
        let encoding = self
            .tokenizer
            .encode(chunk, true)
            .map_err(|e| RankerError::Sentiment(format!("tokenization failed: {}", e)))?;
        let ids = truncate_ids(encoding.get_ids(), self.max_tokens);

        let probs = self
            .forward(&ids)
            .map_err(|e| RankerError::Sentiment(format!("DistilBERT forward pass failed: {}", e)))?;
        if probs.len() != 2 {
            return Err(RankerError::Sentiment(format!(
                "expected 2 class probabilities, got {}",
                probs.len()
            )));
        }

        let (neg, pos) = (probs[1 - self.positive], probs[self.positive]);
        if !(neg.is_finite() && pos.is_finite()) {
            return Err(RankerError::Sentiment(
                "classifier produced non-finite probabilities".to_string(),
            ));
        }
        Ok([neg, pos])
    }
}

/// Read every tensor of a safetensors file onto `device`.
fn load_weights(path: &Path, device: &Device) -> anyhow::Result<HashMap<String, Tensor>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let tensors = SafeTensors::deserialize(&bytes)
        .map_err(|e| anyhow!("invalid safetensors file {}: {:?}", path.display(), e))?;

    let mut map = HashMap::new();
    for (name, view) in tensors.tensors() {
        let dtype = match view.dtype() {
            Dtype::F32 => DType::F32,
            Dtype::F16 => DType::F16,
            Dtype::BF16 => DType::BF16,
            Dtype::I64 => DType::I64,
            Dtype::U8 => DType::U8,
            other => bail!("unsupported dtype {:?} for tensor '{}'", other, name),
        };
        let tensor = Tensor::from_raw_buffer(view.data(), dtype, view.shape(), device)
            .with_context(|| format!("failed to create tensor '{}'", name))?;
        map.insert(name, tensor);
    }
    Ok(map)
}

/// Keep at most `max` ids, preserving the trailing `[SEP]`.
fn truncate_ids(ids: &[u32], max: usize) -> Vec<u32> {
    if ids.len() <= max {
        return ids.to_vec();
    }
    let mut kept = ids[..max - 1].to_vec();
    kept.extend(ids.last().copied());
    kept
}

pub struct NeuralClassifier {
    scorer: Box<dyn ChunkScorer>,
    processor: TextProcessor,
    chunk_size: usize,
}

impl NeuralClassifier {
    pub fn new(scorer: Box<dyn ChunkScorer>, chunk_size: usize) -> Self {
        Self {
            scorer,
            processor: TextProcessor::new(),
            chunk_size,
        }
    }

    /// Load the DistilBERT checkpoint stored in `model_dir`.
    pub fn load(model_dir: &Path, chunk_size: usize) -> Result<Self> {
        let start = Instant::now();
        let scorer = DistilBertSentiment::load(model_dir)?;

        info!(
            "Loaded sentiment classifier from {} in {:.2?}",
            model_dir.display(),
            start.elapsed()
        );
        Ok(Self::new(Box::new(scorer), chunk_size))
    }
}

impl SentimentClassifier for NeuralClassifier {
    fn name(&self) -> &str {
        "neural"
    }

    /// Classifies each sentence-aligned chunk and averages their polarities.
    fn classify(&self, text: &str) -> Result<SentimentOutput> {
        let chunks = self.processor.chunk(text, self.chunk_size);
        if chunks.is_empty() {
            return Err(RankerError::Sentiment(
                "cannot classify empty text".to_string(),
            ));
        }

        let mut total = 0.0f32;
        for chunk in &chunks {
            let [neg, pos] = self.scorer.probabilities(chunk)?;
            total += if pos >= neg { pos } else { -neg };
        }
        Ok(SentimentOutput::from_polarity(total / chunks.len() as f32))
    }
}
