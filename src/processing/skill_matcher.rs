//! Skill matching against the taxonomy (exact and fuzzy)

use crate::error::{Result, ScreenerError};
use crate::processing::fuzzy::partial_ratio;
use crate::processing::taxonomy::SkillTaxonomy;
use aho_corasick::{AhoCorasick, MatchKind};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Minimum partial-ratio score for a token to count as a fuzzy hit
pub const FUZZY_THRESHOLD: f64 = 90.0;

/// Skills found for one taxonomy category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSkills {
    pub bucket: String,
    /// Sorted, deduplicated
    pub skills: Vec<String>,
}

/// Skills found in one text
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchResult {
    /// One entry per taxonomy category, in taxonomy order
    pub found_by_bucket: Vec<BucketSkills>,
    pub flat_skills: BTreeSet<String>,
}

impl MatchResult {
    pub fn bucket(&self, name: &str) -> Option<&[String]> {
        self.found_by_bucket
            .iter()
            .find(|b| b.bucket == name)
            .map(|b| b.skills.as_slice())
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.flat_skills.contains(skill)
    }

    pub fn is_empty(&self) -> bool {
        self.flat_skills.is_empty()
    }
}

/// Matches texts against a fixed taxonomy.
///
/// The exact path runs one Aho-Corasick pass over the lower-cased text with
/// every distinct skill as a pattern. Skills that are not present verbatim can
/// still be found through the fuzzy path: any whitespace token whose
/// partial ratio against the skill reaches [`FUZZY_THRESHOLD`]. Multi-word
/// skills never take the fuzzy path since a single token cannot hold them.
///
/// Known limitation: partial ratio aligns the shorter string inside the longer
/// one, so a short token that appears inside a skill counts as a hit. The
/// token "a" scores 100 against "aws" and reports it present.
pub struct SkillMatcher {
    taxonomy: Arc<SkillTaxonomy>,
    exact_matcher: AhoCorasick,
    /// Distinct skills; index == Aho-Corasick pattern id
    patterns: Vec<String>,
    /// Per category, the pattern id of each skill
    category_patterns: Vec<Vec<usize>>,
}

impl SkillMatcher {
    pub fn new(taxonomy: Arc<SkillTaxonomy>) -> Result<Self> {
        let mut patterns: Vec<String> = Vec::new();
        let mut pattern_ids: HashMap<String, usize> = HashMap::new();
        let mut category_patterns = Vec::with_capacity(taxonomy.categories().len());

        for category in taxonomy.categories() {
            let ids = category
                .skills
                .iter()
                .map(|skill| {
                    *pattern_ids.entry(skill.clone()).or_insert_with(|| {
                        patterns.push(skill.clone());
                        patterns.len() - 1
                    })
                })
                .collect();
            category_patterns.push(ids);
        }

        // Standard semantics so overlapping iteration reports every pattern present
        let exact_matcher = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&patterns)
            .map_err(|e| ScreenerError::Configuration(format!("Failed to build skill matcher: {}", e)))?;

        debug!("Skill matcher built over {} distinct skills", patterns.len());

        Ok(Self {
            taxonomy,
            exact_matcher,
            patterns,
            category_patterns,
        })
    }

    /// Find every taxonomy skill present in `text`.
    ///
    /// `fuzzy` enables the token-level fuzzy fallback for skills that are not
    /// present verbatim.
    pub fn match_skills(&self, text: &str, fuzzy: bool) -> MatchResult {
        let text_lower = text.to_lowercase();

        let mut present = vec![false; self.patterns.len()];
        for mat in self.exact_matcher.find_overlapping_iter(&text_lower) {
            present[mat.pattern().as_usize()] = true;
        }

        if fuzzy {
            // Repeated words only need comparing once
            let tokens: BTreeSet<&str> = text_lower.split_whitespace().collect();

            for (id, skill) in self.patterns.iter().enumerate() {
                if present[id] || skill.contains(char::is_whitespace) {
                    continue;
                }
                present[id] = tokens
                    .iter()
                    .any(|token| partial_ratio(skill, token) >= FUZZY_THRESHOLD);
            }
        }

        let mut found_by_bucket = Vec::with_capacity(self.category_patterns.len());
        let mut flat_skills = BTreeSet::new();

        for (category, ids) in self.taxonomy.categories().iter().zip(&self.category_patterns) {
            let skills: BTreeSet<&String> = ids
                .iter()
                .filter(|&&id| present[id])
                .map(|&id| &self.patterns[id])
                .collect();

            flat_skills.extend(skills.iter().map(|s| (*s).clone()));
            found_by_bucket.push(BucketSkills {
                bucket: category.name.clone(),
                skills: skills.into_iter().cloned().collect(),
            });
        }

        debug!(
            "Matched {} skills (fuzzy: {}) in {} characters of text",
            flat_skills.len(),
            fuzzy,
            text.len()
        );

        MatchResult {
            found_by_bucket,
            flat_skills,
        }
    }

    pub fn taxonomy(&self) -> &SkillTaxonomy {
        &self.taxonomy
    }

    /// Number of distinct skills across all categories
    pub fn skill_count(&self) -> usize {
        self.patterns.len()
    }
}
