//! Output formatters for ranking reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{RankedEntry, RankingReport};
use crate::personality::TraitVector;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting ranking reports
pub trait OutputFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal output with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Dispatches to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
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

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = score_badge(score);
        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_entry(&self, entry: &RankedEntry) -> String {
        let result = &entry.result;
        let mut out = format!(
            "#{:<3} {:<28} {:>5.1}% {}\n",
            result.rank,
            entry.display_name(),
            result.final_score * 100.0,
            self.format_score_badge(entry.score_percentage())
        );

        if self.detailed {
            let s = &result.sub_scores;
            out.push_str(&format!(
                "     skills {:.2} | experience {:.2} | education {:.2} | certifications {:.2} | personality {:.2}\n",
                s.skills, s.experience, s.education, s.certifications, s.personality
            ));
            if !result.gaps.missing_skills.is_empty() {
                out.push_str(&format!(
                    "     {} {}\n",
                    self.colorize("missing skills:", Color::Red),
                    result.gaps.missing_skills.join(", ")
                ));
            }
            for similar in &result.gaps.similar_skills {
                out.push_str(&format!(
                    "     {} {} ~ {} ({:.2})\n",
                    self.colorize("close match:", Color::Yellow),
                    similar.required,
                    similar.candidate,
                    similar.similarity
                ));
            }
            if !result.gaps.missing_certifications.is_empty() {
                out.push_str(&format!(
                    "     {} {}\n",
                    self.colorize("missing certifications:", Color::Red),
                    result.gaps.missing_certifications.join(", ")
                ));
            }
        }
        out
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();
        let title = if report.job.title.is_empty() {
            report.job.id.clone()
        } else {
            format!("{} ({})", report.job.title, report.job.id)
        };

        output.push_str(&self.format_header(&format!("CANDIDATE RANKING: {}", title), 1));
        output.push_str(&format!(
            "Generated: {} | Candidates: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.candidates_considered,
            report.metadata.processing_time_ms
        ));

        if self.detailed {
            output.push_str(&self.format_header("Requirements", 2));
            output.push_str(&format!(
                "Skills: {}\nExperience: {} years\nEducation: {}\nCertifications: {}\n",
                list_or_none(&report.job.required_skills),
                report.job.min_years_experience,
                report.job.required_education,
                list_or_none(&report.job.required_certifications)
            ));
            output.push_str("Desired traits:\n");
            output.push_str(&render_traits(&report.job.desired_traits, self.use_colors));
        }

        output.push_str(&self.format_header("Ranking", 2));
        if report.entries.is_empty() {
            output.push_str("No candidates to rank.\n");
        }
        for entry in &report.entries {
            output.push_str(&self.format_entry(entry));
        }

        if !report.skipped.is_empty() {
            output.push_str(&self.format_header("Skipped", 3));
            for skipped in &report.skipped {
                output.push_str(&format!(
                    "{} {}: {}\n",
                    self.colorize("✗", Color::Red),
                    skipped.candidate_id,
                    skipped.reason
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut md = String::new();
        let title = if report.job.title.is_empty() {
            &report.job.id
        } else {
            &report.job.title
        };

        md.push_str(&format!("# Candidate Ranking: {}\n\n", title));
        if self.include_metadata {
            md.push_str(&format!(
                "*Generated {} by candidate-ranker {}*\n\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.ranker_version
            ));
        }

        md.push_str("## Requirements\n\n");
        md.push_str(&format!(
            "- **Skills:** {}\n",
            list_or_none(&report.job.required_skills)
        ));
        md.push_str(&format!(
            "- **Experience:** {} years\n",
            report.job.min_years_experience
        ));
        md.push_str(&format!("- **Education:** {}\n", report.job.required_education));
        md.push_str(&format!(
            "- **Certifications:** {}\n\n",
            list_or_none(&report.job.required_certifications)
        ));

        md.push_str("## Ranking\n\n");
        if report.entries.is_empty() {
            md.push_str("No candidates to rank.\n");
        } else {
            md.push_str("| Rank | Candidate | Score | Skills | Experience | Education | Certifications | Personality |\n");
            md.push_str("|---:|---|---:|---:|---:|---:|---:|---:|\n");
            for entry in &report.entries {
                let s = &entry.result.sub_scores;
                md.push_str(&format!(
                    "| {} | {} | {:.1}% | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |\n",
                    entry.result.rank,
                    entry.display_name(),
                    entry.result.final_score * 100.0,
                    s.skills,
                    s.experience,
                    s.education,
                    s.certifications,
                    s.personality
                ));
            }
        }

        if !report.skipped.is_empty() {
            md.push_str("\n## Skipped Candidates\n\n");
            for skipped in &report.skipped {
                md.push_str(&format!("- `{}`: {}\n", skipped.candidate_id, skipped.reason));
            }
        }

        Ok(md)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &RankingReport, format: &OutputFormat) -> Result<String> {
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

/// One bar per trait, scaled to 20 cells.
pub fn render_traits(traits: &TraitVector, use_colors: bool) -> String {
    let mut out = String::new();
    for (t, score) in traits.iter() {
        let filled = (score * 20.0).round() as usize;
        let bar = format!("{}{}", "■".repeat(filled), "·".repeat(20 - filled.min(20)));
        let bar = if use_colors {
            bar.color(trait_color(score)).to_string()
        } else {
            bar
        };
        out.push_str(&format!("  {:<18} {} {:.2}\n", t.as_str(), bar, score));
    }
    out
}

fn trait_color(score: f32) -> Color {
    if score >= 0.66 {
        Color::Green
    } else if score >= 0.33 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn score_badge(score: u8) -> (&'static str, Color) {
    match score {
        90..=100 => ("EXCELLENT", Color::Green),
        80..=89 => ("STRONG", Color::BrightGreen),
        70..=79 => ("GOOD", Color::Yellow),
        60..=69 => ("FAIR", Color::BrightYellow),
        50..=59 => ("WEAK", Color::Red),
        _ => ("POOR", Color::BrightRed),
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, job_id: &str, timestamp: bool) -> String {
    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_ranking{}.txt", job_id, timestamp_suffix),
        OutputFormat::Json => format!("{}_ranking{}.json", job_id, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_ranking{}.md", job_id, timestamp_suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{rank_candidates, CandidateProfile, JobProfile};

    fn report() -> RankingReport {
        let job = JobProfile::from_toml_str(
            "id = \"data\"\ntitle = \"Data Engineer\"\nrequired_skills = [\"python\", \"sql\"]\n",
        )
        .unwrap();
        let candidates = vec![
            CandidateProfile::new("alice").with_skills(["python", "sql"]),
            CandidateProfile::new("bob").with_skills(["pyhton"]),
            CandidateProfile::new("broken").with_experience(f64::NAN),
        ];
        let outcome = rank_candidates(&job, &candidates);
        RankingReport::new(&job, outcome, &candidates, 3)
    }

    #[test]
    fn test_console_plain() {
        let out = ConsoleFormatter::new(false, true).format_report(&report()).unwrap();
        assert!(out.contains("CANDIDATE RANKING: Data Engineer (data)"));
        assert!(out.contains("#1   alice"));
        assert!(out.contains("[EXCELLENT]"));
        assert!(out.contains("missing skills: python, sql"));
        assert!(out.contains("broken"));
    }

    #[test]
    fn test_json_round_trip_fields() {
        let out = JsonFormatter::new(false).format_report(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["entries"][0]["result"]["candidate_id"], "alice");
        assert_eq!(value["skipped"][0]["candidate_id"], "broken");
    }

    #[test]
    fn test_markdown_table() {
        let out = MarkdownFormatter::new(false).format_report(&report()).unwrap();
        assert!(out.starts_with("# Candidate Ranking: Data Engineer"));
        assert!(out.contains("| 1 | alice | 100.0% |"));
        assert!(out.contains("## Skipped Candidates"));
    }

    #[test]
    fn test_render_traits() {
        let out = render_traits(&TraitVector::neutral(), false);
        assert_eq!(out.lines().count(), 5);
        assert!(out.contains("openness"));
        assert!(out.contains("0.50"));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(&OutputFormat::Markdown, "data", false), "data_ranking.md");
    }
}
