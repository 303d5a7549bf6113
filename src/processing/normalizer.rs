//! Text normalization

use serde::{Deserialize, Serialize};
use std::fmt;

/// Collapse every whitespace run to a single space and trim both ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized document text (resume or job description).
///
/// The only way to build one is through [`normalize`], so every instance is
/// whitespace-collapsed and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentText(String);

impl DocumentText {
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// First `max_chars` characters, cut on a char boundary.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.0.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }

    /// [`preview`](Self::preview) with "..." appended when text was cut off.
    pub fn preview_with_ellipsis(&self, max_chars: usize) -> String {
        let preview = self.preview(max_chars);
        if preview.len() < self.0.len() {
            format!("{}...", preview)
        } else {
            preview.to_string()
        }
    }
}

impl From<&str> for DocumentText {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for DocumentText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_mixed_whitespace() {
        let raw = "  Senior\tEngineer\n\n  Rust \r\n and   Go  ";
        assert_eq!(normalize(raw), "Senior Engineer Rust and Go");
    }

    #[test]
    fn test_empty_and_blank_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn test_no_double_whitespace_remains() {
        let samples = [
            "a  b",
            "\u{00A0}x\u{2003}\u{2003}y\u{00A0}",
            "line one\n\nline two\n",
            "tabs\t\t\tand spaces   ",
        ];

        for sample in samples {
            let normalized = normalize(sample);
            assert_eq!(normalized.trim(), normalized);
            let chars: Vec<char> = normalized.chars().collect();
            assert!(chars
                .windows(2)
                .all(|w| !(w[0].is_whitespace() && w[1].is_whitespace())));
        }
    }

    #[test]
    fn test_document_text_preview_respects_char_boundaries() {
        let doc = DocumentText::new("résumé   café");
        assert_eq!(doc.as_str(), "résumé café");
        assert_eq!(doc.preview(3), "rés");
        assert_eq!(doc.preview(100), "résumé café");
        assert_eq!(doc.char_count(), 11);
    }

    #[test]
    fn test_preview_with_ellipsis_marks_truncation() {
        let doc = DocumentText::new("résumé café");
        assert_eq!(doc.preview_with_ellipsis(6), "résumé...");
        assert_eq!(doc.preview_with_ellipsis(11), "résumé café");
        assert_eq!(doc.preview_with_ellipsis(100), "résumé café");
    }
}
