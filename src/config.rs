//! Configuration management for the candidate ranker

use crate::error::{RankerError, Result};
use crate::matching::{MatchingSettings, SubScoreWeights};
use crate::personality::{LikertScale, MergeWeights, TraitSettings};
use crate::sentiment::SentimentModelManager;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub models: ModelConfig,
    pub sentiment: SentimentConfig,
    pub traits: TraitConfig,
    pub matching: MatchingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    /// Hugging Face repository of the sentiment classification checkpoint.
    pub sentiment_model: String,
    /// Repository providing `tokenizer.json` when the checkpoint has none.
    pub tokenizer_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub use_neural: bool,
    pub timeout_ms: u64,
    pub chunk_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraitConfig {
    pub scale_factor: f32,
    pub adjustment_factor: f32,
    pub merge: MergeWeights,
    pub likert_min: i32,
    pub likert_max: i32,
    pub invert_neuroticism: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub education_decay: f32,
    pub similar_skill_threshold: f64,
    /// Weights applied to job profiles that do not set their own.
    pub weights: SubScoreWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".candidate-ranker")
            .join("models");

        Self {
            models_dir,
            sentiment_model: "distilbert/distilbert-base-uncased-finetuned-sst-2-english".to_string(),
            tokenizer_model: "distilbert/distilbert-base-uncased".to_string(),
        }
    }
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            use_neural: true,
            timeout_ms: 5000,
            chunk_size: 512,
        }
    }
}

impl Default for TraitConfig {
    fn default() -> Self {
        let settings = TraitSettings::default();
        let likert = LikertScale::default();
        Self {
            scale_factor: settings.scale_factor,
            adjustment_factor: settings.adjustment_factor,
            merge: MergeWeights::default(),
            likert_min: likert.min,
            likert_max: likert.max,
            invert_neuroticism: settings.invert_neuroticism,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        let settings = MatchingSettings::default();
        Self {
            education_decay: settings.education_decay,
            similar_skill_threshold: settings.similar_skill_threshold,
            weights: SubScoreWeights::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Config {
    /// Load from `path`, or the default location when `None`.
    ///
    /// A missing file is created with the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                RankerError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            RankerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("candidate-ranker")
            .join("config.toml")
    }

    /// Check the numeric options that serde cannot.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(RankerError::Configuration(msg));

        if self.sentiment.timeout_ms == 0 {
            return invalid("sentiment.timeout_ms must be greater than 0".to_string());
        }
        if self.sentiment.chunk_size == 0 {
            return invalid("sentiment.chunk_size must be greater than 0".to_string());
        }
        if !self.traits.scale_factor.is_finite() || self.traits.scale_factor <= 0.0 {
            return invalid(format!(
                "traits.scale_factor must be positive, got {}",
                self.traits.scale_factor
            ));
        }
        if !(0.0..=1.0).contains(&self.traits.adjustment_factor) {
            return invalid(format!(
                "traits.adjustment_factor must be within [0, 1], got {}",
                self.traits.adjustment_factor
            ));
        }
        if self.traits.likert_min >= self.traits.likert_max {
            return invalid(format!(
                "traits.likert_min ({}) must be below traits.likert_max ({})",
                self.traits.likert_min, self.traits.likert_max
            ));
        }
        if !(0.0..=1.0).contains(&self.matching.education_decay) {
            return invalid(format!(
                "matching.education_decay must be within [0, 1], got {}",
                self.matching.education_decay
            ));
        }
        if !(0.0..=1.0).contains(&self.matching.similar_skill_threshold) {
            return invalid(format!(
                "matching.similar_skill_threshold must be within [0, 1], got {}",
                self.matching.similar_skill_threshold
            ));
        }
        Ok(())
    }

    pub fn model_manager(&self) -> SentimentModelManager {
        SentimentModelManager::new(
            self.models.models_dir.clone(),
            self.models.sentiment_model.clone(),
            self.models.tokenizer_model.clone(),
        )
    }

    pub fn sentiment_timeout(&self) -> Duration {
        Duration::from_millis(self.sentiment.timeout_ms)
    }

    pub fn trait_settings(&self) -> TraitSettings {
        TraitSettings {
            scale_factor: self.traits.scale_factor,
            adjustment_factor: self.traits.adjustment_factor,
            invert_neuroticism: self.traits.invert_neuroticism,
        }
    }

    pub fn likert_scale(&self) -> Result<LikertScale> {
        LikertScale::new(self.traits.likert_min, self.traits.likert_max)
    }

    pub fn merge_weights(&self) -> MergeWeights {
        self.traits.merge
    }

    pub fn matching_settings(&self) -> MatchingSettings {
        MatchingSettings {
            education_decay: self.matching.education_decay,
            similar_skill_threshold: self.matching.similar_skill_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.sentiment.use_neural);
        assert_eq!(config.sentiment.chunk_size, 512);
        assert_eq!(config.traits.scale_factor, 25.0);
        assert_eq!(config.merge_weights(), MergeWeights::default());
        assert_eq!(config.output.format, OutputFormat::Console);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::load(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(config.traits.likert_max, 5);

        let reloaded = Config::load(Some(&path)).unwrap();
        assert_eq!(reloaded.models.sentiment_model, config.models.sentiment_model);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[traits.merge]\ntest_weight = 0.5\ncv_weight = 0.5\n\n[sentiment]\nuse_neural = false\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.merge_weights().test(), 0.5);
        assert!(!config.sentiment.use_neural);
        assert_eq!(config.sentiment.timeout_ms, 5000);
        assert_eq!(config.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[traits.merge]\ntest_weight = 0.9\ncv_weight = 0.4\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path)),
            Err(RankerError::Configuration(_))
        ));
    }

    #[test]
    fn test_invalid_likert_range_rejected() {
        let mut config = Config::default();
        config.traits.likert_min = 5;
        config.traits.likert_max = 1;
        assert!(config.validate().is_err());
    }
}
