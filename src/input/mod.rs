//! CV file loading
//! Detects the file type and extracts plain text for the engine

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use file_detector::FileType;
pub use manager::InputManager;
