//! Downloadable JSON report

use crate::config::ReportConfig;
use crate::error::Result;
use crate::processing::analyzer::AnalysisReport;
use crate::processing::normalizer::DocumentText;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Snapshot of one analysis, shaped for saving to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadReport {
    pub match_score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub jd_keywords: Vec<String>,
    pub resume_keywords: Vec<String>,
    /// ISO-8601 UTC, `Z` suffixed
    pub timestamp: String,
    /// Job description text, possibly truncated
    pub job_description: String,
}

impl DownloadReport {
    pub fn from_analysis(
        report: &AnalysisReport,
        job_description: &DocumentText,
        config: &ReportConfig,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let capped = |keywords: &[String]| -> Vec<String> {
            keywords.iter().take(config.keyword_limit).cloned().collect()
        };

        Self {
            match_score: report.match_score,
            matched_skills: report.matched_skills.clone(),
            missing_skills: report.missing_skills.clone(),
            jd_keywords: capped(&report.jd_keywords),
            resume_keywords: capped(&report.resume_keywords),
            timestamp: generated_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            job_description: job_description
                .preview(config.job_description_limit)
                .to_string(),
        }
    }

    /// Same as [`DownloadReport::from_analysis`], stamped with the current time
    pub fn now(report: &AnalysisReport, job_description: &DocumentText, config: &ReportConfig) -> Self {
        Self::from_analysis(report, job_description, config, Utc::now())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        crate::output::formatter::save_report_to_file(&self.to_json_pretty()?, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn analysis() -> AnalysisReport {
        AnalysisReport {
            match_score: 71.25,
            matched_skills: vec!["python".to_string()],
            missing_skills: vec!["aws".to_string(), "docker".to_string()],
            jd_keywords: (0..30).map(|i| format!("jd keyword {}", i)).collect(),
            resume_keywords: vec!["python experience".to_string()],
            skills_by_bucket: Vec::new(),
        }
    }

    #[test]
    fn test_fields_and_limits() {
        let config = ReportConfig {
            keyword_limit: 20,
            job_description_limit: 10,
        };
        let jd = DocumentText::new("Senior Python engineer, AWS and Docker");
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();

        let report = DownloadReport::from_analysis(&analysis(), &jd, &config, at);

        assert_eq!(report.match_score, 71.25);
        assert_eq!(report.jd_keywords.len(), 20);
        assert_eq!(report.resume_keywords, vec!["python experience"]);
        assert_eq!(report.job_description, "Senior Pyt");
        assert_eq!(report.timestamp, "2024-03-05T14:30:00.000000Z");
    }

    #[test]
    fn test_short_job_description_kept_whole() {
        let jd = DocumentText::new("Rust developer");
        let report = DownloadReport::now(&analysis(), &jd, &ReportConfig::default());
        assert_eq!(report.job_description, "Rust developer");
        assert!(report.timestamp.ends_with('Z'));
    }

    #[test]
    fn test_json_has_expected_keys() {
        let jd = DocumentText::new("Rust developer");
        let report = DownloadReport::now(&analysis(), &jd, &ReportConfig::default());
        let value: serde_json::Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();

        for key in [
            "match_score",
            "matched_skills",
            "missing_skills",
            "jd_keywords",
            "resume_keywords",
            "timestamp",
            "job_description",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(value["missing_skills"][1], "docker");
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports").join("analysis.json");
        let jd = DocumentText::new("Rust developer");

        let report = DownloadReport::now(&analysis(), &jd, &ReportConfig::default());
        report.save(&path).unwrap();

        let loaded: DownloadReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, report);
    }
}
