//! Plain text extraction from CV files

use crate::error::{RankerError, Result};
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            RankerError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&content))
    }
}

/// Markdown source to plain text, one block element per line.
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak => text.push(' '),
            Event::HardBreak => text.push('\n'),
            Event::End(Tag::Paragraph | Tag::Heading(..) | Tag::Item | Tag::CodeBlock(_)) => {
                text.push('\n')
            }
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_to_text() {
        let md = "# Jane Doe\n\nCreative **engineer** with `Rust`.\n\n- Led the team\n- Mentored juniors\n";
        assert_eq!(
            markdown_to_text(md),
            "Jane Doe\nCreative engineer with Rust.\nLed the team\nMentored juniors"
        );
    }

    #[tokio::test]
    async fn test_plain_text_extractor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        std::fs::write(&path, "Plain CV").unwrap();
        assert_eq!(PlainTextExtractor.extract(&path).await.unwrap(), "Plain CV");
    }

    #[tokio::test]
    async fn test_missing_pdf_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            PdfExtractor.extract(&dir.path().join("cv.pdf")).await,
            Err(RankerError::Io(_))
        ));
    }
}
