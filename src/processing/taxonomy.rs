//! Skill taxonomy loading
//!
//! The taxonomy is a YAML document mapping a category ("bucket") name to a
//! list of skill strings:
//!
//! ```yaml
//! languages: [Python, Java, Rust]
//! cloud:
//!   - AWS
//!   - GCP
//! ```
//!
//! Skills are lower-cased and deduplicated per category, keeping the first
//! occurrence. Anything that is not exactly `mapping<string, list<string>>`
//! is rejected as a configuration error.

use crate::error::{Result, ScreenerError};
use log::{info, warn};
use serde::Serialize;
use serde_yaml::Value;
use std::collections::HashSet;
use std::path::Path;

/// Taxonomy shipped with the binary, used when no other source is configured
pub const BUNDLED_TAXONOMY: &str = include_str!("../../skills.yaml");

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
}

/// Immutable category -> skills mapping, categories in document order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SkillTaxonomy {
    categories: Vec<SkillCategory>,
}

impl SkillTaxonomy {
    /// Parse and validate a taxonomy document.
    pub fn from_yaml(source: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(source)
            .map_err(|e| ScreenerError::Configuration(format!("Malformed skill taxonomy: {}", e)))?;

        let mapping = match document {
            Value::Mapping(mapping) => mapping,
            Value::Null => {
                return Err(ScreenerError::Configuration(
                    "Skill taxonomy is empty".to_string(),
                ))
            }
            other => {
                return Err(ScreenerError::Configuration(format!(
                    "Skill taxonomy must be a mapping of category to skill list, found {}",
                    value_kind(&other)
                )))
            }
        };

        let mut categories = Vec::with_capacity(mapping.len());
        let mut dropped = 0usize;

        for (key, value) in &mapping {
            let name = match key {
                Value::String(name) => name.clone(),
                other => {
                    return Err(ScreenerError::Configuration(format!(
                        "Skill category names must be strings, found {}",
                        value_kind(other)
                    )))
                }
            };

            let entries = match value {
                Value::Sequence(entries) => entries,
                other => {
                    return Err(ScreenerError::Configuration(format!(
                        "Category '{}' must hold a list of skills, found {}",
                        name,
                        value_kind(other)
                    )))
                }
            };

            let mut seen = HashSet::new();
            let mut skills = Vec::with_capacity(entries.len());
            for entry in entries {
                let skill = match entry {
                    Value::String(skill) => skill.to_lowercase(),
                    other => {
                        return Err(ScreenerError::Configuration(format!(
                            "Category '{}' contains a non-string skill ({})",
                            name,
                            value_kind(other)
                        )))
                    }
                };

                // An empty pattern would match every document
                if skill.trim().is_empty() {
                    dropped += 1;
                    continue;
                }

                if seen.insert(skill.clone()) {
                    skills.push(skill);
                }
            }

            categories.push(SkillCategory { name, skills });
        }

        if dropped > 0 {
            warn!("Dropped {} empty skill entries from taxonomy", dropped);
        }

        let taxonomy = Self { categories };
        if taxonomy.is_empty() {
            warn!("Skill taxonomy has no categories; skill matching will find nothing");
        }
        info!(
            "Loaded skill taxonomy: {} categories, {} skills",
            taxonomy.categories.len(),
            taxonomy.skill_count()
        );

        Ok(taxonomy)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            ScreenerError::Configuration(format!(
                "Failed to read skill taxonomy '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&source)
    }

    pub fn bundled() -> Result<Self> {
        Self::from_yaml(BUNDLED_TAXONOMY)
    }

    /// Load from `path` when given, otherwise the bundled taxonomy.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::bundled(),
        }
    }

    pub fn categories(&self) -> &[SkillCategory] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&SkillCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Total skill entries across categories (a skill listed twice counts twice)
    pub fn skill_count(&self) -> usize {
        self.categories.iter().map(|c| c.skills.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
