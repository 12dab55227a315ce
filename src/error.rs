//! Error handling for the candidate ranker

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Sentiment analysis error: {0}")]
    Sentiment(String),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, RankerError>;

impl RankerError {
    /// Shorthand used by the validating constructors.
    pub fn validation(msg: impl Into<String>) -> Self {
        RankerError::Validation(msg.into())
    }
}

/// Convert anyhow errors from the model loader to our custom error type
impl From<anyhow::Error> for RankerError {
    fn from(err: anyhow::Error) -> Self {
        RankerError::ModelLoading(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = RankerError::validation("answer 6 out of range");
        assert_eq!(err.to_string(), "Validation error: answer 6 out of range");
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: RankerError = anyhow::Context::context(
            Err::<(), _>(anyhow::anyhow!("tokenizer.json not found")),
            "failed to load tokenizer",
        )
        .unwrap_err()
        .into();
        assert!(matches!(
            err,
            RankerError::ModelLoading(msg) if msg == "failed to load tokenizer: tokenizer.json not found"
        ));
    }
}
