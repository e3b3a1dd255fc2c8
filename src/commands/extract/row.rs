use super::*;

/// One table row split into its five columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedRow {
    pub(crate) cause: String,
    pub(crate) system: String,
    pub(crate) component: String,
    pub(crate) manufacturer: String,
    pub(crate) reportable: Reportable,
}

impl ParsedRow {
    pub(crate) fn into_raw_record(self, ler: &str) -> RawRecord {
        RawRecord {
            ler: ler.to_string(),
            cause: self.cause,
            system: self.system,
            component: self.component,
            manufacturer: self.manufacturer,
            reportable_to_iris: self.reportable.as_str().to_string(),
        }
    }
}

/// Positional row parser: `cause system component manufacturer... yes/no`.
#[derive(Debug, Clone)]
pub(crate) struct RowParser {
    terminal_tokens: HashMap<String, Reportable>,
    min_tokens: usize,
}

impl RowParser {
    pub(crate) fn new(rules: &ExtractionRules) -> Self {
        let mut terminal_tokens = HashMap::new();
        for token in &rules.yes_tokens {
            terminal_tokens.insert(token.to_uppercase(), Reportable::Yes);
        }
        for token in &rules.no_tokens {
            terminal_tokens.insert(token.to_uppercase(), Reportable::No);
        }

        Self {
            terminal_tokens,
            // cause, system, component, manufacturer and the terminal token
            min_tokens: rules.min_row_tokens.max(5),
        }
    }

    pub(crate) fn parse(&self, line: &str) -> Option<ParsedRow> {
        let tokens = line.split_whitespace().collect::<Vec<&str>>();
        if tokens.len() < self.min_tokens {
            return None;
        }

        let (last, head) = tokens.split_last()?;
        let reportable = *self.terminal_tokens.get(&last.to_uppercase())?;

        Some(ParsedRow {
            cause: head[0].to_string(),
            system: head[1].to_string(),
            component: head[2].to_string(),
            manufacturer: head[3..].join(" "),
            reportable,
        })
    }

    pub(crate) fn terminal_tokens(&self) -> impl Iterator<Item = &str> {
        self.terminal_tokens.keys().map(String::as_str)
    }
}
