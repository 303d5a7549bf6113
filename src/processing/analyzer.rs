//! Analysis pipeline: scoring, skill matching and keyword extraction for one
//! resume / job description pair, packaged into an [`AnalysisReport`].

use crate::config::{Config, KeywordConfig};
use crate::error::{Result, ScreenerError};
use crate::processing::embeddings::SemanticScorer;
use crate::processing::keywords::KeywordExtractor;
use crate::processing::normalizer::DocumentText;
use crate::processing::skill_matcher::{MatchResult, SkillMatcher};
use crate::processing::taxonomy::SkillTaxonomy;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

/// Resume vs JD skills for one taxonomy category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCoverage {
    pub bucket: String,
    pub resume: Vec<String>,
    pub jd: Vec<String>,
    pub overlap_count: usize,
}

/// Result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Semantic fit in [0, 100]
    pub match_score: f64,
    /// JD skills also found in the resume, sorted
    pub matched_skills: Vec<String>,
    /// JD skills not found in the resume, sorted
    pub missing_skills: Vec<String>,
    pub jd_keywords: Vec<String>,
    pub resume_keywords: Vec<String>,
    /// In taxonomy order
    pub skills_by_bucket: Vec<BucketCoverage>,
}

impl AnalysisReport {
    pub fn bucket(&self, name: &str) -> Option<&BucketCoverage> {
        self.skills_by_bucket.iter().find(|b| b.bucket == name)
    }

    /// Buckets ordered by overlap count, largest first (ties keep taxonomy order)
    pub fn buckets_by_overlap(&self) -> Vec<&BucketCoverage> {
        let mut buckets: Vec<&BucketCoverage> = self.skills_by_bucket.iter().collect();
        buckets.sort_by(|a, b| b.overlap_count.cmp(&a.overlap_count));
        buckets
    }
}

/// Combine matcher, scorer and keyword outputs into a report.
///
/// `resume_skills` and `jd_skills` must come from the same taxonomy.
pub fn assemble_report(
    resume_skills: &MatchResult,
    jd_skills: &MatchResult,
    match_score: f64,
    jd_keywords: Vec<String>,
    resume_keywords: Vec<String>,
) -> AnalysisReport {
    let matched_skills: Vec<String> = jd_skills
        .flat_skills
        .intersection(&resume_skills.flat_skills)
        .cloned()
        .collect();
    let missing_skills: Vec<String> = jd_skills
        .flat_skills
        .difference(&resume_skills.flat_skills)
        .cloned()
        .collect();

    let skills_by_bucket = jd_skills
        .found_by_bucket
        .iter()
        .map(|jd_bucket| {
            let resume = resume_skills
                .bucket(&jd_bucket.bucket)
                .map(<[String]>::to_vec)
                .unwrap_or_default();

            let resume_set: BTreeSet<&String> = resume.iter().collect();
            let jd_set: BTreeSet<&String> = jd_bucket.skills.iter().collect();
            let overlap_count = resume_set.intersection(&jd_set).count();

            BucketCoverage {
                bucket: jd_bucket.bucket.clone(),
                resume,
                jd: jd_bucket.skills.clone(),
                overlap_count,
            }
        })
        .collect();

    AnalysisReport {
        match_score,
        matched_skills,
        missing_skills,
        jd_keywords,
        resume_keywords,
        skills_by_bucket,
    }
}

/// Long-lived analysis context: taxonomy, matcher, keyword extractor and the
/// (lazily loaded) embedding model. Build once, share by reference.
pub struct ScreeningPipeline {
    matcher: Arc<SkillMatcher>,
    keywords: Arc<KeywordExtractor>,
    scorer: SemanticScorer,
    max_keywords: usize,
}

impl ScreeningPipeline {
    pub fn new(
        taxonomy: Arc<SkillTaxonomy>,
        scorer: SemanticScorer,
        keyword_config: KeywordConfig,
    ) -> Result<Self> {
        let max_keywords = keyword_config.max_keywords;
        Ok(Self {
            matcher: Arc::new(SkillMatcher::new(taxonomy)?),
            keywords: Arc::new(KeywordExtractor::new(keyword_config)),
            scorer,
            max_keywords,
        })
    }

    pub fn from_config(config: &Config, taxonomy: Arc<SkillTaxonomy>, scorer: SemanticScorer) -> Result<Self> {
        Self::new(taxonomy, scorer, config.keywords.clone())
    }

    /// Analyze one resume against one job description.
    ///
    /// The resume is matched with fuzzy matching on, the job description with
    /// it off. Semantic scoring and the lexical work (matching and keyword
    /// extraction) both run on the blocking pool, concurrently.
    pub async fn analyze(&self, resume: &DocumentText, jd: &DocumentText) -> Result<AnalysisReport> {
        let start_time = Instant::now();
        info!(
            "Analyzing resume ({} chars) against job description ({} chars)",
            resume.char_count(),
            jd.char_count()
        );

        let matcher = Arc::clone(&self.matcher);
        let keywords = Arc::clone(&self.keywords);
        let max_keywords = self.max_keywords;
        let (resume_text, jd_text) = (resume.clone(), jd.clone());
        let lexical = tokio::task::spawn_blocking(move || {
            lexical_analysis(&matcher, &keywords, &resume_text, &jd_text, max_keywords)
        });

        let (match_score, lexical) = tokio::join!(self.scorer.score(resume.as_str(), jd.as_str()), lexical);
        let match_score = match_score?;
        let lexical = lexical
            .map_err(|e| ScreenerError::InvalidInput(format!("Lexical analysis task failed: {}", e)))?;

        let report = assemble_report(
            &lexical.resume_skills,
            &lexical.jd_skills,
            match_score,
            lexical.jd_keywords,
            lexical.resume_keywords,
        );

        debug!(
            "Analysis finished in {:?}: score {:.2}, {} matched, {} missing",
            start_time.elapsed(),
            report.match_score,
            report.matched_skills.len(),
            report.missing_skills.len()
        );

        Ok(report)
    }

    pub fn taxonomy(&self) -> &SkillTaxonomy {
        self.matcher.taxonomy()
    }

    pub fn scorer(&self) -> &SemanticScorer {
        &self.scorer
    }

    pub fn matcher(&self) -> &SkillMatcher {
        &self.matcher
    }

    pub fn keyword_extractor(&self) -> &KeywordExtractor {
        &self.keywords
    }
}

struct LexicalAnalysis {
    resume_skills: MatchResult,
    jd_skills: MatchResult,
    resume_keywords: Vec<String>,
    jd_keywords: Vec<String>,
}

fn lexical_analysis(
    matcher: &SkillMatcher,
    keywords: &KeywordExtractor,
    resume: &DocumentText,
    jd: &DocumentText,
    max_keywords: usize,
) -> LexicalAnalysis {
    LexicalAnalysis {
        resume_skills: matcher.match_skills(resume.as_str(), true),
        jd_skills: matcher.match_skills(jd.as_str(), false),
        resume_keywords: keywords.extract(resume.as_str(), max_keywords),
        jd_keywords: keywords.extract(jd.as_str(), max_keywords),
    }
}
