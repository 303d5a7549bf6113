//! Input manager: turns files on disk into normalized document text

use crate::error::{Result, ScreenerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use crate::processing::normalizer::DocumentText;
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct InputManager {
    cache: HashMap<PathBuf, DocumentText>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Extract the text of a resume or job description file.
    ///
    /// The extension is checked before the file is read. An extractor that
    /// produces no text is reported as `ExtractionFailure`.
    pub async fn extract_text(&mut self, path: &Path) -> Result<DocumentText> {
        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(path) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        let file_type = FileType::from_path(path);
        if !file_type.is_supported() {
            return Err(ScreenerError::UnsupportedFormat(format!(
                "{} (expected .pdf, .docx, .txt or .md)",
                path.display()
            )));
        }

        if !path.exists() {
            return Err(ScreenerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let bytes = fs::read(path).await?;
        info!("Extracting {:?} text from: {}", file_type, path.display());
        let text = Self::extract_bytes(file_type, &bytes)?;

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }

        Ok(text)
    }

    /// Route raw bytes of an already identified file type to its extractor.
    pub fn extract_bytes(file_type: FileType, bytes: &[u8]) -> Result<DocumentText> {
        let raw = match file_type {
            FileType::Pdf => PdfExtractor.extract(bytes),
            FileType::Docx => DocxExtractor.extract(bytes),
            FileType::Text => PlainTextExtractor.extract(bytes),
            FileType::Markdown => MarkdownExtractor.extract(bytes),
            FileType::Unknown => {
                return Err(ScreenerError::UnsupportedFormat(
                    "unknown file type".to_string(),
                ))
            }
        };

        let text = DocumentText::new(&raw);
        if text.is_empty() {
            return Err(ScreenerError::ExtractionFailure(format!(
                "no text could be extracted from {:?} document",
                file_type
            )));
        }

        Ok(text)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::text_extractor::test_support::docx_with_body;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_unsupported_extension_rejected_before_reading() {
        let mut manager = InputManager::new();
        // Does not exist either: the extension gate must fire first
        let result = manager.extract_text(Path::new("/nonexistent/resume.xyz")).await;
        assert!(matches!(result, Err(ScreenerError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_missing_file_is_invalid_input() {
        let mut manager = InputManager::new();
        let result = manager.extract_text(Path::new("/nonexistent/resume.pdf")).await;
        assert!(matches!(result, Err(ScreenerError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_extraction_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.pdf");
        std::fs::write(&path, b"not really a pdf").unwrap();

        let mut manager = InputManager::new();
        let result = manager.extract_text(&path).await;
        assert!(matches!(result, Err(ScreenerError::ExtractionFailure(_))));
        assert_eq!(manager.cache_size(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_only_text_is_extraction_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blank.txt");
        std::fs::write(&path, b" \n\t \n").unwrap();

        let result = InputManager::new().extract_text(&path).await;
        assert!(matches!(result, Err(ScreenerError::ExtractionFailure(_))));
    }

    #[tokio::test]
    async fn test_docx_file_extracted_and_cached() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("resume.docx");
        let bytes = docx_with_body("<w:p><w:r><w:t>Python   developer</w:t></w:r></w:p>");
        std::fs::write(&path, bytes).unwrap();

        let mut manager = InputManager::new();
        let text = manager.extract_text(&path).await.unwrap();
        assert_eq!(text.as_str(), "Python developer");
        assert_eq!(manager.cache_size(), 1);

        // Served from cache even once the file is gone
        std::fs::remove_file(&path).unwrap();
        let cached = manager.extract_text(&path).await.unwrap();
        assert_eq!(cached, text);

        manager.clear_cache();
        assert_eq!(manager.cache_size(), 0);
    }

    #[tokio::test]
    async fn test_cache_can_be_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("job.md");
        std::fs::write(&path, b"# Backend Engineer\n\nRust and SQL").unwrap();

        let mut manager = InputManager::new().with_cache(false);
        let text = manager.extract_text(&path).await.unwrap();
        assert_eq!(text.as_str(), "Backend Engineer Rust and SQL");
        assert_eq!(manager.cache_size(), 0);
    }
}
