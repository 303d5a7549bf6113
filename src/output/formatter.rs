//! Output formatters for analysis reports (console, JSON, Markdown)

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::processing::analyzer::{AnalysisReport, BucketCoverage};
use colored::{Color, Colorize};
use std::path::Path;

/// Number of missing skills listed under "focus on these"
const FOCUS_LIMIT: usize = 20;

/// Trait for rendering an analysis report
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    display_keywords: usize,
    display_bucket_skills: usize,
}

/// JSON formatter for scripting and downstream tools
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    display_keywords: usize,
    display_bucket_skills: usize,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn score_label(score: f64) -> (&'static str, Color) {
    match score {
        s if s >= 85.0 => ("STRONG FIT", Color::Green),
        s if s >= 70.0 => ("GOOD FIT", Color::BrightGreen),
        s if s >= 55.0 => ("PARTIAL FIT", Color::Yellow),
        _ => ("WEAK FIT", Color::Red),
    }
}

/// Up to `limit` skills joined with commas, "-" when there are none
fn skill_cell(skills: &[String], limit: usize) -> String {
    if skills.is_empty() {
        "-".to_string()
    } else {
        skills
            .iter()
            .take(limit)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn keyword_line(keywords: &[String], limit: usize) -> String {
    if keywords.is_empty() {
        "(none)".to_string()
    } else {
        keywords
            .iter()
            .take(limit)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, display_keywords: usize, display_bucket_skills: usize) -> Self {
        Self {
            use_colors,
            display_keywords,
            display_bucket_skills,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let (badge, color) = score_label(score);
        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_bucket(&self, bucket: &BucketCoverage) -> String {
        let overlap = format!("overlap {}", bucket.overlap_count);
        let overlap = if bucket.overlap_count > 0 {
            self.colorize(&overlap, Color::Green)
        } else {
            self.colorize(&overlap, Color::Red)
        };

        format!(
            "  {} ({})\n    resume: {}\n    job:    {}\n",
            bucket.bucket,
            overlap,
            skill_cell(&bucket.resume, self.display_bucket_skills),
            skill_cell(&bucket.jd, self.display_bucket_skills)
        )
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📊 RESUME SCREENING ANALYSIS", 1));
        output.push_str(&format!(
            "Match Score: {:.2}% {}\n",
            report.match_score,
            self.format_score_badge(report.match_score)
        ));
        output.push_str(&format!(
            "Matched skills: {} | Missing skills: {}\n",
            self.colorize(&report.matched_skills.len().to_string(), Color::Green),
            self.colorize(&report.missing_skills.len().to_string(), Color::Yellow)
        ));

        output.push_str(&self.format_header("🔑 Top Keywords", 2));
        output.push_str(&format!(
            "{} {}\n",
            self.colorize("Job description:", Color::Cyan),
            keyword_line(&report.jd_keywords, self.display_keywords)
        ));
        output.push_str(&format!(
            "{} {}\n",
            self.colorize("Resume:", Color::Cyan),
            keyword_line(&report.resume_keywords, self.display_keywords)
        ));

        output.push_str(&self.format_header("🗂️ Skills by Category", 2));
        for bucket in report.buckets_by_overlap() {
            output.push_str(&self.format_bucket(bucket));
        }

        if !report.matched_skills.is_empty() {
            output.push_str(&self.format_header("✅ Matched Skills", 3));
            for skill in &report.matched_skills {
                output.push_str(&format!("  • {}\n", self.colorize(skill, Color::Green)));
            }
        }

        if report.missing_skills.is_empty() {
            output.push_str(&self.format_header("🎉 No missing skills detected", 3));
        } else {
            output.push_str(&self.format_header("🎯 Focus on these missing skills", 3));
            for skill in report.missing_skills.iter().take(FOCUS_LIMIT) {
                output.push_str(&format!("  • {}\n", self.colorize(skill, Color::Yellow)));
            }
            if report.missing_skills.len() > FOCUS_LIMIT {
                output.push_str(&format!(
                    "  ... and {} more\n",
                    report.missing_skills.len() - FOCUS_LIMIT
                ));
            }
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

impl MarkdownFormatter {
    pub fn new(display_keywords: usize, display_bucket_skills: usize) -> Self {
        Self {
            display_keywords,
            display_bucket_skills,
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# 📊 Resume Screening Report\n\n");
        output.push_str(&format!(
            "**Match Score:** {:.2}% ({})\n\n",
            report.match_score,
            score_label(report.match_score).0
        ));
        output.push_str(&format!(
            "**Matched skills:** {} | **Missing skills:** {}\n\n",
            report.matched_skills.len(),
            report.missing_skills.len()
        ));

        output.push_str("## Top Keywords\n\n");
        output.push_str(&format!(
            "- **Job description:** {}\n",
            keyword_line(&report.jd_keywords, self.display_keywords)
        ));
        output.push_str(&format!(
            "- **Resume:** {}\n\n",
            keyword_line(&report.resume_keywords, self.display_keywords)
        ));

        output.push_str("## Skills by Category\n\n");
        output.push_str("| Category | Resume | Job Description | Overlap |\n");
        output.push_str("|----------|--------|-----------------|---------|\n");
        for bucket in report.buckets_by_overlap() {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                bucket.bucket,
                skill_cell(&bucket.resume, self.display_bucket_skills),
                skill_cell(&bucket.jd, self.display_bucket_skills),
                bucket.overlap_count
            ));
        }
        output.push('\n');

        output.push_str("## Matched Skills\n\n");
        if report.matched_skills.is_empty() {
            output.push_str("_None_\n\n");
        } else {
            for skill in &report.matched_skills {
                output.push_str(&format!("- {}\n", skill));
            }
            output.push('\n');
        }

        output.push_str("## Missing Skills\n\n");
        if report.missing_skills.is_empty() {
            output.push_str("🎉 No missing skills detected.\n");
        } else {
            output.push_str("Focus on these:\n\n");
            for skill in report.missing_skills.iter().take(FOCUS_LIMIT) {
                output.push_str(&format!("- {}\n", skill));
            }
        }

        Ok(output)
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::from_config(&OutputConfig::default())
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(
                config.color_output,
                config.display_keywords,
                config.display_bucket_skills,
            ),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(
                config.display_keywords,
                config.display_bucket_skills,
            ),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}
