//! Text processing and structured CV parsing

pub mod cv_parser;
pub mod text_processor;

pub use cv_parser::{CvParser, ParsedCv};
pub use text_processor::TextProcessor;
