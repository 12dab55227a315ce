//! Structured field extraction from plain CV text

use crate::error::{RankerError, Result};
use crate::matching::profile::{CandidateProfile, EducationLevel};
use aho_corasick::{AhoCorasick, MatchKind};
use chrono::Datelike;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const SECTION_EXPERIENCE: &[&str] = &["experience", "work history", "employment"];
const SECTION_EDUCATION: &[&str] = &["education", "academic", "university", "college"];
const SECTION_INTERESTS: &[&str] = &["interests", "hobbies", "activities"];
const SECTION_SKILLS: &[&str] = &["skills"];
const SECTION_CERTIFICATIONS: &[&str] = &["certifications"];

/// Fields recovered from a CV.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedCv {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: BTreeSet<String>,
    pub certifications: BTreeSet<String>,
    pub experience: Vec<String>,
    pub education: Vec<String>,
    pub interests: Vec<String>,
    pub years_experience: f64,
    pub education_level: EducationLevel,
}

impl ParsedCv {
    /// Seed a candidate profile; trait vectors are filled in later.
    pub fn into_profile(self, id: impl Into<String>) -> CandidateProfile {
        let mut profile = CandidateProfile::new(id);
        profile.name = self.name;
        profile.email = self.email;
        profile.phone = self.phone;
        profile.skills = self.skills;
        profile.certifications = self.certifications;
        profile.years_experience = self.years_experience;
        profile.education = self.education_level;
        profile
    }
}

pub struct CvParser {
    skills: Vec<String>,
    skill_matcher: AhoCorasick,
    certifications: Vec<String>,
    certification_matcher: AhoCorasick,
    email_regex: Regex,
    phone_regex: Regex,
    years_regex: Regex,
    range_regex: Regex,
}

impl CvParser {
    pub fn new() -> Result<Self> {
        Self::with_custom_skills(Vec::new())
    }

    /// Parser recognising extra skill names on top of the defaults.
    pub fn with_custom_skills(additional_skills: Vec<String>) -> Result<Self> {
        let mut skills: Vec<String> = Self::default_skills()
            .iter()
            .map(|s| s.to_string())
            .chain(additional_skills.into_iter().map(|s| s.trim().to_lowercase()))
            .filter(|s| !s.is_empty())
            .collect();
        skills.sort();
        skills.dedup();

        let certifications: Vec<String> = Self::default_certifications()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let skill_matcher = Self::build_matcher(&skills)?;
        let certification_matcher = Self::build_matcher(&certifications)?;

        Ok(Self {
            skills,
            skill_matcher,
            certifications,
            certification_matcher,
            email_regex: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
                .expect("Invalid email regex"),
            phone_regex: Regex::new(r"(\+\d{1,3}[- ]?)?\(?\d{3}\)?[- ]?\d{3}[- ]?\d{4}")
                .expect("Invalid phone regex"),
            years_regex: Regex::new(r"(?i)\b(\d{1,2}(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)\b")
                .expect("Invalid years regex"),
            range_regex: Regex::new(
                r"(?i)\b((?:19|20)\d{2})\s*(?:-|to)\s*((?:19|20)\d{2}|present|current|now)\b",
            )
            .expect("Invalid date range regex"),
        })
    }

    fn build_matcher(patterns: &[String]) -> Result<AhoCorasick> {
        AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(patterns)
            .map_err(|e| RankerError::Processing(format!("Failed to build CV matcher: {}", e)))
    }

    pub fn parse(&self, text: &str) -> ParsedCv {
        self.parse_with_year(text, chrono::Utc::now().year())
    }

    /// Parse with an explicit "current year" for open-ended date ranges.
    pub fn parse_with_year(&self, text: &str, current_year: i32) -> ParsedCv {
        let all_headers = all_section_headers();
        let education = extract_section(text, SECTION_EDUCATION, &all_headers);

        ParsedCv {
            name: self.extract_name(text),
            email: self.email_regex.find(text).map(|m| m.as_str().to_string()),
            phone: self.phone_regex.find(text).map(|m| m.as_str().trim().to_string()),
            skills: self.extract_skills(text),
            certifications: self.extract_certifications(text),
            experience: extract_section(text, SECTION_EXPERIENCE, &all_headers),
            education_level: EducationLevel::detect(&education.join("\n"))
                .max(EducationLevel::detect(text)),
            education,
            interests: extract_section(text, SECTION_INTERESTS, &all_headers),
            years_experience: self.extract_years(text, current_year),
        }
    }

    /// First of the opening lines made of two or more capitalised words.
    fn extract_name(&self, text: &str) -> Option<String> {
        text.lines().take(5).find_map(|line| {
            let words: Vec<&str> = line.split_whitespace().collect();
            let capitalised = words
                .iter()
                .all(|w| w.chars().next().map_or(false, char::is_uppercase));
            if words.len() >= 2 && capitalised && !line.contains('@') {
                Some(words[..2].join(" "))
            } else {
                None
            }
        })
    }

    /// Known skills named in the text, matched case-insensitively.
    pub fn extract_skills(&self, text: &str) -> BTreeSet<String> {
        let lowered = text.to_lowercase();
        self.skill_matcher
            .find_iter(&lowered)
            .filter(|m| is_whole_word(&lowered, m.start(), m.end()))
            .map(|m| self.skills[m.pattern().as_usize()].clone())
            .collect()
    }

    /// Named certifications found anywhere, plus the full text of any line
    /// that only says "certified"/"certificate".
    pub fn extract_certifications(&self, text: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();

        for line in text.lines() {
            let lower = line.to_lowercase();
            let mut named_on_line = false;
            for m in self.certification_matcher.find_iter(&lower) {
                if !is_whole_word(&lower, m.start(), m.end()) {
                    continue;
                }
                let name = &self.certifications[m.pattern().as_usize()];
                if Self::generic_certification_words().contains(&name.as_str()) {
                    continue;
                }
                found.insert(name.clone());
                named_on_line = true;
            }

            let generic = Self::generic_certification_words()
                .iter()
                .any(|w| lower.contains(w));
            let is_header = SECTION_CERTIFICATIONS.contains(&lower.trim().trim_end_matches(':'));
            if generic && !named_on_line && !is_header {
                let cleaned = lower
                    .trim()
                    .trim_start_matches(|c: char| !c.is_alphanumeric())
                    .to_string();
                if !cleaned.is_empty() {
                    found.insert(cleaned);
                }
            }
        }

        found
    }

    /// Largest explicit "N years" claim, or the employment span if larger.
    ///
    /// Date ranges are read from the experience section only (the whole text
    /// minus the education section when there is no experience header), and
    /// overlapping ranges are merged before their lengths are added up.
    pub fn extract_years(&self, text: &str, current_year: i32) -> f64 {
        let explicit = self
            .years_regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1)?.as_str().parse::<f64>().ok())
            .fold(0.0f64, f64::max);

        let all_headers = all_section_headers();
        let mut scope = extract_section(text, SECTION_EXPERIENCE, &all_headers);
        if scope.is_empty() {
            let education = extract_section(text, SECTION_EDUCATION, &all_headers);
            scope = text
                .lines()
                .map(str::trim)
                .filter(|line| !education.iter().any(|e| e.as_str() == *line))
                .map(str::to_string)
                .collect();
        }

        let intervals: Vec<(i32, i32)> = scope
            .iter()
            .flat_map(|line| self.range_regex.captures_iter(line))
            .filter_map(|cap| {
                let start: i32 = cap.get(1)?.as_str().parse().ok()?;
                let end = cap.get(2)?.as_str().parse::<i32>().unwrap_or(current_year);
                (end >= start && end <= current_year).then_some((start, end))
            })
            .collect();

        explicit.max(merged_span(intervals) as f64)
    }

    fn default_skills() -> &'static [&'static str] {
        &[
            "python", "java", "javascript", "typescript", "rust", "go", "html", "css", "react",
            "angular", "node.js", "sql", "mongodb", "postgresql", "mysql", "aws", "azure", "gcp",
            "docker", "kubernetes", "git", "ci/cd", "agile", "scrum", "machine learning",
            "data analysis", "project management", "communication", "leadership",
            "problem solving",
        ]
    }

    fn default_certifications() -> &'static [&'static str] {
        &[
            "certified", "certificate", "certification", "pmp", "csm", "aws certified",
            "azure certified", "google cloud certified", "oracle certified",
            "microsoft certified", "cissp", "itil",
        ]
    }

    fn generic_certification_words() -> &'static [&'static str] {
        &["certified", "certificate", "certification"]
    }
}

fn all_section_headers() -> Vec<&'static str> {
    SECTION_EXPERIENCE
        .iter()
        .chain(SECTION_EDUCATION)
        .chain(SECTION_INTERESTS)
        .chain(SECTION_SKILLS)
        .chain(SECTION_CERTIFICATIONS)
        .copied()
        .collect()
}

/// Total years covered by the union of `[start, end]` intervals.
fn merged_span(mut intervals: Vec<(i32, i32)>) -> i32 {
    intervals.sort_unstable();
    let mut total = 0;
    let mut current: Option<(i32, i32)> = None;
    for (start, end) in intervals {
        current = match current {
            Some((s, e)) if start <= e => Some((s, e.max(end))),
            Some((s, e)) => {
                total += e - s;
                Some((start, end))
            }
            None => Some((start, end)),
        };
    }
    total + current.map_or(0, |(s, e)| e - s)
}

/// Lines following a section header up to the next header.
fn extract_section(text: &str, headers: &[&str], all_headers: &[&str]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut inside = false;

    for line in text.lines() {
        let lower = line.trim().to_lowercase();
        let trimmed = lower.trim_end_matches(':');
        let is_header_line = lower.split_whitespace().count() <= 3;

        if is_header_line && headers.iter().any(|h| trimmed.contains(h)) {
            inside = true;
            continue;
        }
        if inside && is_header_line && all_headers.iter().any(|h| trimmed.contains(h)) {
            break;
        }
        if inside && !line.trim().is_empty() {
            lines.push(line.trim().to_string());
        }
    }

    lines
}

fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric());
    let after_ok = text[end..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric());
    before_ok && after_ok
}
