//! CLI interface for the candidate ranker

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "candidate-ranker")]
#[command(about = "Personality-aware candidate ranking against job profiles")]
#[command(long_about = "Extract Big-Five traits from CVs, score personality tests, and rank candidates against a job profile's skills, experience, education, certifications and desired traits")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract Big-Five traits from a single CV
    Extract {
        /// Path to CV file (PDF, TXT, MD)
        cv: PathBuf,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,

        /// Use only the rule-based sentiment analyzer
        #[arg(long)]
        no_neural: bool,
    },

    /// Score five Likert answers of the personality test
    Test {
        /// Comma or space separated answers, e.g. "4,2,5,3,1"
        answers: String,

        #[arg(long)]
        json: bool,
    },

    /// Merge a CV-derived and a test-derived trait vector
    Merge {
        /// Five comma separated CV trait scores (O,C,E,A,N)
        #[arg(long)]
        cv: Option<String>,

        /// Five comma separated test trait scores (O,C,E,A,N)
        #[arg(long)]
        test: Option<String>,

        /// Weight of the test vector; the CV gets the remainder
        #[arg(long)]
        test_weight: Option<f32>,

        #[arg(long)]
        json: bool,
    },

    /// Add CVs to the candidate store, extracting their traits
    Submit {
        /// CV files (PDF, TXT, MD); the file stem becomes the candidate id
        #[arg(required = true)]
        cvs: Vec<PathBuf>,

        /// Candidate store file
        #[arg(short, long, default_value = "candidates.json")]
        store: PathBuf,

        /// Use only the rule-based sentiment analyzer
        #[arg(long)]
        no_neural: bool,
    },

    /// Record personality test answers for a stored candidate
    Answer {
        /// Candidate id
        candidate: String,

        /// Comma or space separated answers, e.g. "4,2,5,3,1"
        answers: String,

        /// Candidate store file
        #[arg(short, long, default_value = "candidates.json")]
        store: PathBuf,
    },

    /// Rank stored candidates against a job profile
    Rank {
        /// Path to job profile (TOML)
        #[arg(short, long)]
        job: PathBuf,

        /// Candidate store file
        #[arg(short, long, default_value = "candidates.json")]
        store: PathBuf,

        /// Show sub-scores and gaps
        #[arg(short, long)]
        detailed: bool,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Only show the top N candidates
        #[arg(long)]
        top: Option<usize>,
    },

    /// Sentiment model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// Download the sentiment checkpoint used by the neural classifier
    Download,

    /// Show whether the neural classifier can be loaded
    Status,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

/// Candidate id for a CV file: its stem.
pub fn candidate_id_for(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rank() {
        let cli = Cli::parse_from(["candidate-ranker", "rank", "--job", "job.toml", "--top", "3"]);
        match cli.command {
            Commands::Rank { job, store, top, .. } => {
                assert_eq!(job, PathBuf::from("job.toml"));
                assert_eq!(store, PathBuf::from("candidates.json"));
                assert_eq!(top, Some(3));
            }
            _ => panic!("expected rank command"),
        }
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("MD"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("job.TOML"), &["toml"]).is_ok());
        assert!(validate_file_extension(Path::new("job.yaml"), &["toml"]).is_err());
        assert!(validate_file_extension(Path::new("job"), &["toml"]).is_err());
    }

    #[test]
    fn test_candidate_id_for() {
        assert_eq!(candidate_id_for(Path::new("cvs/jane_doe.pdf")).as_deref(), Some("jane_doe"));
    }
}
