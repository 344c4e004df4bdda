pub mod analyzer;
pub mod error;
pub mod prompt;
pub mod rating;
pub mod transcript;
pub mod video_id;

pub use analyzer::Analyzer;
pub use error::AnalysisError;
