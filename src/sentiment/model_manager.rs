//! Download and status tracking for the sentiment model files

use crate::error::{RankerError, Result};
use crate::sentiment::neural::{NeuralClassifier, MODEL_FILES};
use hf_hub::api::tokio::{Api, ApiRepo};
use hf_hub::Repo;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStatus {
    pub repo_id: String,
    pub model_dir: PathBuf,
    pub missing_files: Vec<String>,
}

impl ModelStatus {
    pub fn is_ready(&self) -> bool {
        self.missing_files.is_empty()
    }
}

pub struct SentimentModelManager {
    models_dir: PathBuf,
    repo_id: String,
    /// Repository to take `tokenizer.json` from when the checkpoint lacks one.
    tokenizer_repo_id: String,
}

impl SentimentModelManager {
    pub fn new(
        models_dir: impl Into<PathBuf>,
        repo_id: impl Into<String>,
        tokenizer_repo_id: impl Into<String>,
    ) -> Self {
        Self {
            models_dir: models_dir.into(),
            repo_id: repo_id.into(),
            tokenizer_repo_id: tokenizer_repo_id.into(),
        }
    }

    /// Local directory for the configured repository.
    pub fn model_dir(&self) -> PathBuf {
        self.models_dir.join(self.repo_id.replace('/', "--"))
    }

    pub fn missing_files(&self) -> Vec<String> {
        let dir = self.model_dir();
        MODEL_FILES
            .iter()
            .filter(|f| !dir.join(f).exists())
            .map(|f| f.to_string())
            .collect()
    }

    pub fn status(&self) -> ModelStatus {
        ModelStatus {
            repo_id: self.repo_id.clone(),
            model_dir: self.model_dir(),
            missing_files: self.missing_files(),
        }
    }

    /// Fetch the missing model files from the Hugging Face Hub into
    /// `model_dir`.
    pub async fn download(&self) -> Result<PathBuf> {
        let target = self.model_dir();
        let missing = self.missing_files();
        if missing.is_empty() {
            info!("Model {} already present at {}", self.repo_id, target.display());
            return Ok(target);
        }

        fs::create_dir_all(&target).await.map_err(|e| {
            RankerError::ModelLoading(format!("Failed to create models directory: {}", e))
        })?;

        let api = Api::new()
            .map_err(|e| RankerError::ModelLoading(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.repo(Repo::model(self.repo_id.clone()));

        info!("Downloading {} into {}", self.repo_id, target.display());
        for file in &missing {
            let cached = match repo.get(file).await {
                Ok(cached) => cached,
                Err(e) if file == "tokenizer.json" && self.tokenizer_repo_id != self.repo_id => {
                    warn!(
                        "{} has no tokenizer.json ({}), using {}",
                        self.repo_id, e, self.tokenizer_repo_id
                    );
                    let fallback = api.repo(Repo::model(self.tokenizer_repo_id.clone()));
                    fetch(&fallback, file).await?
                }
                Err(e) => {
                    return Err(RankerError::ModelLoading(format!(
                        "Failed to download {}: {}",
                        file, e
                    )))
                }
            };
            fs::copy(&cached, target.join(file)).await.map_err(|e| {
                RankerError::ModelLoading(format!("Failed to copy {}: {}", file, e))
            })?;
        }

        Ok(target)
    }

    pub fn load_classifier(&self, chunk_size: usize) -> Result<NeuralClassifier> {
        NeuralClassifier::load(&self.model_dir(), chunk_size)
    }
}

async fn fetch(repo: &ApiRepo, file: &str) -> Result<PathBuf> {
    repo.get(file)
        .await
        .map_err(|e| RankerError::ModelLoading(format!("Failed to download {}: {}", file, e)))
}
