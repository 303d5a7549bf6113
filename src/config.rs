//! Configuration management for the resume screener

use crate::error::{Result, ScreenerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub models: ModelConfig,
    pub skills: SkillsConfig,
    pub keywords: KeywordConfig,
    pub report: ReportConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    /// Registry id (see `models list`) or a local model directory
    pub embedding_model: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsConfig {
    /// When unset the bundled taxonomy is used
    pub taxonomy_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub max_keywords: usize,
    pub ngrams: usize,
    pub dedup_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub keyword_limit: usize,
    pub job_description_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub display_keywords: usize,
    pub display_bucket_skills: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-screener")
            .join("models");

        Self {
            models_dir,
            embedding_model: "potion-base-8M".to_string(),
        }
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            max_keywords: 20,
            ngrams: 3,
            dedup_threshold: 0.9,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            keyword_limit: 20,
            job_description_limit: 4000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            display_keywords: 15,
            display_bucket_skills: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: ModelConfig::default(),
            skills: SkillsConfig::default(),
            keywords: KeywordConfig::default(),
            report: ReportConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the default location.
    ///
    /// A missing file at the default location yields the defaults; nothing is
    /// written to disk.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    Self::load_from(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScreenerError::Configuration(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ScreenerError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ScreenerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-screener")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }

    fn validate(&self) -> Result<()> {
        if self.keywords.ngrams == 0 {
            return Err(ScreenerError::Configuration(
                "keywords.ngrams must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.keywords.dedup_threshold) {
            return Err(ScreenerError::Configuration(format!(
                "keywords.dedup_threshold must be within [0, 1], got {}",
                self.keywords.dedup_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = Config::from_toml("[keywords]\nmax_keywords = 5\n").unwrap();

        assert_eq!(config.keywords.max_keywords, 5);
        assert_eq!(config.keywords.ngrams, 3);
        assert_eq!(config.report.job_description_limit, 4000);
        assert_eq!(config.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        let result = Config::from_toml("[keywords\nmax_keywords = ");
        assert!(matches!(result, Err(ScreenerError::Configuration(_))));
    }

    #[test]
    fn test_invalid_ngrams_rejected() {
        let result = Config::from_toml("[keywords]\nngrams = 0\n");
        assert!(matches!(result, Err(ScreenerError::Configuration(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.output.format = OutputFormat::Markdown;
        config.skills.taxonomy_path = Some(PathBuf::from("/tmp/skills.yaml"));
        config.save(&path).unwrap();

        let reloaded = Config::load(Some(&path)).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load(Some(&temp_dir.path().join("absent.toml")));
        assert!(result.is_err());
    }
}
