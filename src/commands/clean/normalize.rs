use super::*;

/// Shared first pass over every raw field: strip artifacts, collapse
/// horizontal whitespace, and map empty-value vocabulary to `None`.
pub(crate) struct ValueNormalizer {
    artifact_chars: Vec<String>,
    horizontal_space: Regex,
    edge_trim_chars: Vec<char>,
    null_tokens: HashSet<String>,
}

impl ValueNormalizer {
    pub(crate) fn new(rules: &CleaningRules) -> Result<Self> {
        Ok(Self {
            artifact_chars: rules
                .artifact_chars
                .iter()
                .filter(|value| !value.is_empty())
                .cloned()
                .collect(),
            horizontal_space: Regex::new(r"[ \t]+")
                .context("failed to compile horizontal space regex")?,
            edge_trim_chars: rules.edge_trim_chars.chars().collect(),
            null_tokens: rules
                .null_tokens
                .iter()
                .map(|token| token.trim().to_lowercase())
                .collect(),
        })
    }

    pub(crate) fn value(&self, raw: &str) -> Option<String> {
        let mut value = raw.to_string();
        for artifact in &self.artifact_chars {
            value = value.replace(artifact.as_str(), " ");
        }

        let value = self.horizontal_space.replace_all(&value, " ");
        let value = self.trim_edges(&value);
        if self.null_tokens.contains(&value.to_lowercase()) {
            return None;
        }

        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        Some(value.to_string())
    }

    /// Uppercased, space-free code truncated to `max_len` characters.
    pub(crate) fn code(&self, raw: &str, max_len: usize, letters_only: bool) -> Option<String> {
        let value = self.value(raw)?.to_uppercase().replace(' ', "");
        let code = value
            .chars()
            .filter(|character: &char| !letters_only || character.is_ascii_uppercase())
            .take(max_len)
            .collect::<String>();

        if code.is_empty() { None } else { Some(code) }
    }

    pub(crate) fn trim_edges<'a>(&self, value: &'a str) -> &'a str {
        value.trim_matches(|character: char| self.edge_trim_chars.contains(&character))
    }
}
