//! CLI interface for the resume screener

use crate::config::OutputFormat;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Extensions accepted for resumes and job description files
pub const DOCUMENT_EXTENSIONS: [&str; 4] = ["pdf", "docx", "txt", "md"];

#[derive(Parser)]
#[command(name = "resume-screener")]
#[command(about = "Resume vs job description match scoring")]
#[command(long_about = "Score how well a resume fits a job description using semantic embeddings, skill taxonomy matching and keyword extraction")]
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
    /// Score a resume against a job description
    #[command(group(ArgGroup::new("job_source").required(true).args(["job", "job_text"])))]
    Analyze {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Job description text given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Skill taxonomy YAML (overrides the configured one)
        #[arg(long)]
        skills: Option<PathBuf>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save formatted output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Write the downloadable JSON report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Also print the extracted text previews
        #[arg(short, long)]
        detailed: bool,
    },

    /// List the skill taxonomy
    Skills {
        /// Skill taxonomy YAML (overrides the configured one)
        #[arg(long)]
        skills: Option<PathBuf>,
    },

    /// Embedding model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List available and downloaded models
    List,

    /// Download a model
    Download {
        /// Model id, name or Hugging Face repo id
        model: String,

        /// Force re-download if model exists
        #[arg(short, long)]
        force: bool,
    },

    /// Show model information
    Info {
        /// Model id
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the default configuration file
    Init,

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
        None => Err(format!("File has no extension: {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_requires_a_job_source() {
        assert!(Cli::try_parse_from(["resume-screener", "analyze", "--resume", "cv.pdf"]).is_err());
        assert!(Cli::try_parse_from([
            "resume-screener",
            "analyze",
            "--resume",
            "cv.pdf",
            "--job",
            "job.txt",
            "--job-text",
            "python"
        ])
        .is_err());

        let cli = Cli::try_parse_from([
            "resume-screener",
            "analyze",
            "--resume",
            "cv.pdf",
            "--job-text",
            "python and aws",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze { job, job_text, .. } => {
                assert!(job.is_none());
                assert_eq!(job_text.as_deref(), Some("python and aws"));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.PDF"), &DOCUMENT_EXTENSIONS).is_ok());
        assert!(validate_file_extension(Path::new("cv.docx"), &DOCUMENT_EXTENSIONS).is_ok());
        assert!(validate_file_extension(Path::new("cv.odt"), &DOCUMENT_EXTENSIONS).is_err());
        assert!(validate_file_extension(Path::new("cv"), &DOCUMENT_EXTENSIONS).is_err());
    }
}
