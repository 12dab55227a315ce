//! Routing of CV files to the matching extractor

use crate::error::{RankerError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if self.enable_cache {
            if let Some(cached) = self.cache.get(path) {
                debug!("Using cached text for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(RankerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path) {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(RankerError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }

        Ok(text)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_routes_and_caches() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("cv.txt");
        let md = dir.path().join("cv.md");
        std::fs::write(&txt, "Plain text").unwrap();
        std::fs::write(&md, "# Title\n\nBody").unwrap();

        let mut manager = InputManager::new();
        assert_eq!(manager.extract_text(&txt).await.unwrap(), "Plain text");
        assert_eq!(manager.extract_text(&md).await.unwrap(), "Title\nBody");
        assert_eq!(manager.cache_size(), 2);

        manager.clear_cache();
        assert_eq!(manager.cache_size(), 0);
    }

    #[tokio::test]
    async fn test_rejects_missing_and_unknown() {
        let dir = TempDir::new().unwrap();
        let mut manager = InputManager::new().with_cache(false);
        assert!(matches!(
            manager.extract_text(&dir.path().join("missing.txt")).await,
            Err(RankerError::InvalidInput(_))
        ));

        let docx = dir.path().join("cv.docx");
        std::fs::write(&docx, "x").unwrap();
        assert!(matches!(
            manager.extract_text(&docx).await,
            Err(RankerError::UnsupportedFormat(_))
        ));
    }
}
