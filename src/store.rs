//! JSON file store of candidate profiles used by the CLI

use crate::error::Result;
use crate::matching::CandidateProfile;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A stored record that could not be read back as a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub index: usize,
    pub candidate_id: Option<String>,
    pub reason: String,
    /// The record as it was read, written back unchanged on save.
    #[serde(skip)]
    pub raw: Value,
}

pub struct CandidateStore {
    path: PathBuf,
    candidates: Vec<CandidateProfile>,
    rejected: Vec<RejectedRecord>,
}

impl CandidateStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// Records that fail to deserialize are kept aside in `rejected` and
    /// written back at their original position on save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                candidates: Vec::new(),
                rejected: Vec::new(),
            });
        }

        let content = std::fs::read_to_string(&path)?;
        let records: Vec<Value> = if content.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&content)?
        };

        let mut candidates = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            let candidate_id = record
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string);
            match serde_json::from_value::<CandidateProfile>(record.clone()) {
                Ok(candidate) => candidates.push(candidate),
                Err(e) => {
                    warn!("Ignoring malformed candidate record {}: {}", index, e);
                    rejected.push(RejectedRecord {
                        index,
                        candidate_id,
                        reason: e.to_string(),
                        raw: record,
                    });
                }
            }
        }

        info!(
            "Loaded {} candidates from {}",
            candidates.len(),
            path.display()
        );
        Ok(Self {
            path,
            candidates,
            rejected,
        })
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut records = self
            .candidates
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<Value>, _>>()?;
        for record in &self.rejected {
            records.insert(record.index.min(records.len()), record.raw.clone());
        }
        let content = serde_json::to_string_pretty(&records)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn candidates(&self) -> &[CandidateProfile] {
        &self.candidates
    }

    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    pub fn get(&self, id: &str) -> Option<&CandidateProfile> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut CandidateProfile> {
        self.candidates.iter_mut().find(|c| c.id == id)
    }

    /// Insert, or replace the candidate with the same id. A malformed
    /// record carrying that id is replaced too.
    pub fn upsert(&mut self, candidate: CandidateProfile) {
        self.rejected
            .retain(|r| r.candidate_id.as_deref() != Some(candidate.id.as_str()));
        match self.candidates.iter_mut().find(|c| c.id == candidate.id) {
            Some(existing) => *existing = candidate,
            None => self.candidates.push(candidate),
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
