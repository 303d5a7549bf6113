//! Resume screener library
//!
//! Scores a resume against a job description: semantic similarity from static
//! sentence embeddings, skill coverage against a categorized taxonomy, and
//! YAKE keyword highlights for both documents.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, ScreenerError};
pub use processing::analyzer::{AnalysisReport, ScreeningPipeline};
pub use processing::normalizer::DocumentText;
