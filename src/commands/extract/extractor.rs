use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExtractionOutcome {
    Row {
        row: ParsedRow,
        strategy: RowStrategy,
    },
    Miss {
        header_found: bool,
        candidate_line_count: usize,
    },
}

/// Finds the component-failure table header in report text and reads the
/// first plausible data row beneath its last occurrence.
pub(crate) struct HeaderAnchoredExtractor {
    artifact_chars: Vec<String>,
    line_endings: Regex,
    horizontal_space: Regex,
    header: Regex,
    section_break: Regex,
    yes_no_token: Regex,
    parser: RowParser,
    leading_line_limit: usize,
    joined_line_limit: usize,
}

impl HeaderAnchoredExtractor {
    pub(crate) fn new(rules: &ExtractionRules) -> Result<Self> {
        let parser = RowParser::new(rules);

        let mut terminal_tokens = parser
            .terminal_tokens()
            .map(regex::escape)
            .collect::<Vec<String>>();
        terminal_tokens.sort();
        let yes_no_pattern = format!(r"\b(?:{})\b", terminal_tokens.join("|"));

        Ok(Self {
            artifact_chars: rules
                .artifact_chars
                .iter()
                .filter(|value| !value.is_empty())
                .cloned()
                .collect(),
            // page breaks and the other Unicode line separators end a line too
            line_endings: Regex::new(r"\r\n?|[\x0B\x0C\x1C-\x1E\x{85}\x{2028}\x{2029}]")
                .context("failed to compile line ending regex")?,
            horizontal_space: Regex::new(r"[ \t]+")
                .context("failed to compile horizontal space regex")?,
            header: RegexBuilder::new(&rules.header_pattern)
                .case_insensitive(true)
                .build()
                .with_context(|| {
                    format!("failed to compile header regex: {}", rules.header_pattern)
                })?,
            section_break: Regex::new(&rules.section_break_pattern).with_context(|| {
                format!(
                    "failed to compile section break regex: {}",
                    rules.section_break_pattern
                )
            })?,
            yes_no_token: RegexBuilder::new(&yes_no_pattern)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("failed to compile yes/no regex: {yes_no_pattern}"))?,
            parser,
            leading_line_limit: rules.leading_line_limit,
            joined_line_limit: rules.joined_line_limit,
        })
    }

    pub(crate) fn extract(&self, text: &str) -> ExtractionOutcome {
        let normalized = self.normalize(text);
        let (body, header_found) = self.after_last_header(&normalized);
        let region = self.bound_table_region(body);

        let lines = region
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<&str>>();

        let context = StrategyContext {
            parser: &self.parser,
            yes_no_token: &self.yes_no_token,
            leading_line_limit: self.leading_line_limit,
            joined_line_limit: self.joined_line_limit,
        };

        for strategy in RowStrategy::ORDERED {
            if let Some(row) = strategy.apply(&context, &lines) {
                return ExtractionOutcome::Row { row, strategy };
            }
        }

        ExtractionOutcome::Miss {
            header_found,
            candidate_line_count: lines.len(),
        }
    }

    pub(crate) fn normalize(&self, text: &str) -> String {
        let mut cleaned = text.to_string();
        for artifact in &self.artifact_chars {
            cleaned = cleaned.replace(artifact.as_str(), " ");
        }

        let cleaned = self.line_endings.replace_all(&cleaned, "\n");
        let cleaned = self.horizontal_space.replace_all(&cleaned, " ");
        cleaned.trim().to_string()
    }

    /// Text following the final header match, or the whole text when the
    /// header never appears.
    fn after_last_header<'a>(&self, text: &'a str) -> (&'a str, bool) {
        match self.header.find_iter(text).last() {
            Some(found) => (&text[found.end()..], true),
            None => (text, false),
        }
    }

    fn bound_table_region<'a>(&self, body: &'a str) -> &'a str {
        match self.section_break.find(body) {
            Some(found) => &body[..found.start()],
            None => body,
        }
    }
}
