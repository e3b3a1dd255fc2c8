//! Rule tables driving extraction and cleaning.
//!
//! Everything here is plain data. The extractor and cleaner compile their
//! regexes from a [`RuleSet`] once at construction, so a rules file can swap
//! vocabularies or thresholds without touching the parsing code.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HEADER_PATTERN: &str =
    r"cause\s+system\s+component\s+manufactur(?:er)?\s+reportable\s+to\s+i[r][il1][s5]";
pub const DEFAULT_SECTION_BREAK_PATTERN: &str = r"\n\s*(?:1[0-9]|[2-9])\.[^\n]*";
pub const DEFAULT_MANUFACTURER_CODE_PATTERN: &str = r"^(?:[A-Z]\d{2,5}|[A-Z0-9]{2,6}|\d{2,4})$";

const ARTIFACT_CHARS: [&str; 2] = ["\u{00a0}", "\u{f0b7}"];
const HEADER_LEAK_WORDS: [&str; 5] = ["LICENSEE", "EVENT", "REPORT", "LER", "SUPPLEMENTAL"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub extraction: ExtractionRules,
    pub cleaning: CleaningRules,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionRules {
    /// Characters replaced by a plain space before anything else runs.
    pub artifact_chars: Vec<String>,
    /// Matched case-insensitively; the last match anchors the table.
    pub header_pattern: String,
    pub section_break_pattern: String,
    pub yes_tokens: Vec<String>,
    pub no_tokens: Vec<String>,
    pub min_row_tokens: usize,
    pub leading_line_limit: usize,
    pub joined_line_limit: usize,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            artifact_chars: to_strings(&ARTIFACT_CHARS),
            header_pattern: DEFAULT_HEADER_PATTERN.to_string(),
            section_break_pattern: DEFAULT_SECTION_BREAK_PATTERN.to_string(),
            yes_tokens: to_strings(&["Y", "YES"]),
            no_tokens: to_strings(&["N", "NO"]),
            min_row_tokens: 5,
            leading_line_limit: 3,
            joined_line_limit: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningRules {
    pub artifact_chars: Vec<String>,
    /// Stripped from both ends of every value.
    pub edge_trim_chars: String,
    pub null_tokens: Vec<String>,
    pub iris_yes_tokens: Vec<String>,
    pub iris_no_tokens: Vec<String>,
    pub cause_max_len: usize,
    pub cause_pattern: String,
    pub system_max_len: usize,
    pub system_pattern: String,
    pub system_reserved_words: Vec<String>,
    pub component_max_len: usize,
    pub component_pattern: String,
    pub component_reserved_words: Vec<String>,
    pub manufacturer_max_len: usize,
    pub manufacturer_fixes: Vec<ManufacturerFix>,
    pub manufacturer_code_pattern: String,
    pub gibberish: GibberishThresholds,
    /// Null count among System/Component/Manufacturer that marks a record low quality.
    pub low_quality_min_missing: usize,
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self {
            artifact_chars: to_strings(&ARTIFACT_CHARS),
            edge_trim_chars: " ,;".to_string(),
            null_tokens: to_strings(&[
                "",
                "n/a",
                "na",
                "-",
                "--",
                "—",
                "none",
                "null",
                "(cid:9)",
                "(cid:10)",
                "n/a n/a",
                "n/a n/a n/a",
            ]),
            iris_yes_tokens: to_strings(&["y", "yes", "true", "1", "yes."]),
            iris_no_tokens: to_strings(&["n", "no", "false", "0", "no."]),
            cause_max_len: 3,
            cause_pattern: r"^[A-Z]$".to_string(),
            system_max_len: 8,
            system_pattern: r"^[A-Z]{1,4}$".to_string(),
            system_reserved_words: to_strings(&HEADER_LEAK_WORDS),
            component_max_len: 20,
            component_pattern: r"^[A-Z0-9\-]{1,12}$".to_string(),
            component_reserved_words: to_strings(&HEADER_LEAK_WORDS),
            manufacturer_max_len: 20,
            manufacturer_fixes: vec![
                ManufacturerFix::new(r"(?i)\bFlowsery\b", "Flowserve"),
                ManufacturerFix::new(r"(?i)\bFlowserv\b", "Flowserve"),
                ManufacturerFix::new(r"(?i)\bU\.?S\.?\s+Motors\b", "US Motors"),
            ],
            manufacturer_code_pattern: DEFAULT_MANUFACTURER_CODE_PATTERN.to_string(),
            gibberish: GibberishThresholds::default(),
            low_quality_min_missing: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManufacturerFix {
    pub pattern: String,
    pub replacement: String,
}

impl ManufacturerFix {
    fn new(pattern: &str, replacement: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

/// Hand-tuned limits for rejecting OCR noise in manufacturer names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GibberishThresholds {
    pub max_len: usize,
    /// Applies only when the value contains at least one digit.
    pub min_alpha_ratio: f64,
    pub single_letter_run: usize,
    pub letter_space_repeats: usize,
}

impl Default for GibberishThresholds {
    fn default() -> Self {
        Self {
            max_len: 120,
            min_alpha_ratio: 0.45,
            single_letter_run: 6,
            letter_space_repeats: 10,
        }
    }
}

pub fn load_rules(path: Option<&Path>) -> Result<RuleSet> {
    let Some(path) = path else {
        return Ok(RuleSet::default());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file {}", path.display()))?;
    parse_rules(&raw).with_context(|| format!("failed to parse rules file {}", path.display()))
}

pub fn parse_rules(raw: &str) -> Result<RuleSet> {
    let rules: RuleSet = toml::from_str(raw).context("invalid rules toml")?;
    Ok(rules)
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_rules_file_keeps_remaining_defaults() {
        let raw = r#"
            [cleaning]
            system_reserved_words = ["LICENSEE", "FACILITY"]

            [cleaning.gibberish]
            min_alpha_ratio = 0.6

            [extraction]
            leading_line_limit = 5
        "#;

        let rules = parse_rules(raw).expect("partial rules should parse");
        assert_eq!(rules.cleaning.system_reserved_words, vec!["LICENSEE", "FACILITY"]);
        assert_eq!(rules.cleaning.component_reserved_words.len(), 5);
        assert!((rules.cleaning.gibberish.min_alpha_ratio - 0.6).abs() < f64::EPSILON);
        assert_eq!(rules.cleaning.gibberish.single_letter_run, 6);
        assert_eq!(rules.extraction.leading_line_limit, 5);
        assert_eq!(rules.extraction.joined_line_limit, 4);
        assert_eq!(rules.extraction.header_pattern, DEFAULT_HEADER_PATTERN);
    }

    #[test]
    fn manufacturer_fixes_can_be_replaced() {
        let raw = r#"
            [[cleaning.manufacturer_fixes]]
            pattern = "(?i)\\bWestinghous\\b"
            replacement = "Westinghouse"
        "#;

        let rules = parse_rules(raw).expect("fix table should parse");
        assert_eq!(rules.cleaning.manufacturer_fixes.len(), 1);
        assert_eq!(rules.cleaning.manufacturer_fixes[0].replacement, "Westinghouse");
    }

    #[test]
    fn missing_rules_path_yields_defaults() {
        let rules = load_rules(None).expect("defaults");
        assert_eq!(rules.extraction.min_row_tokens, 5);
        assert_eq!(rules.cleaning.manufacturer_max_len, 20);
        assert_eq!(rules.cleaning.null_tokens.len(), 12);
    }

    #[test]
    fn malformed_rules_file_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("rules.toml");
        fs::write(&path, "[cleaning\nnot toml").expect("write fixture");

        let error = load_rules(Some(&path)).expect_err("malformed toml should fail");
        assert!(format!("{error:#}").contains("rules.toml"));
    }
}
