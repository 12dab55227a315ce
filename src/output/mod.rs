//! Ranking reports and their output formats

pub mod formatter;
pub mod report;

pub use formatter::{render_traits, OutputFormatter, ReportGenerator};
pub use report::RankingReport;
