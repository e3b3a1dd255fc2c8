use super::*;

/// Ways of locating the data row inside the bounded table region, in
/// precedence order. The first strategy to yield a row wins.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) enum RowStrategy {
    /// Each of the first few lines on its own.
    LeadingLines,
    /// Any line carrying a standalone yes/no token.
    YesNoLines,
    /// The first few lines glued together, for manufacturer names wrapped
    /// onto a second line.
    JoinedLeadingLines,
}

impl RowStrategy {
    pub(crate) const ORDERED: [RowStrategy; 3] = [
        RowStrategy::LeadingLines,
        RowStrategy::YesNoLines,
        RowStrategy::JoinedLeadingLines,
    ];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::LeadingLines => "leading_lines",
            Self::YesNoLines => "yes_no_lines",
            Self::JoinedLeadingLines => "joined_leading_lines",
        }
    }

    pub(crate) fn apply(self, context: &StrategyContext<'_>, lines: &[&str]) -> Option<ParsedRow> {
        match self {
            Self::LeadingLines => lines
                .iter()
                .take(context.leading_line_limit)
                .find_map(|line| context.parser.parse(line)),
            Self::YesNoLines => lines
                .iter()
                .filter(|line| context.yes_no_token.is_match(line))
                .find_map(|line| context.parser.parse(line)),
            Self::JoinedLeadingLines => {
                if lines.is_empty() {
                    return None;
                }
                let joined = lines
                    .iter()
                    .take(context.joined_line_limit)
                    .copied()
                    .collect::<Vec<&str>>()
                    .join(" ");
                context.parser.parse(&joined)
            }
        }
    }
}

pub(crate) struct StrategyContext<'a> {
    pub(crate) parser: &'a RowParser,
    pub(crate) yes_no_token: &'a Regex,
    pub(crate) leading_line_limit: usize,
    pub(crate) joined_line_limit: usize,
}

pub(crate) fn tally_strategies(used: &[RowStrategy]) -> Vec<StrategyCount> {
    RowStrategy::ORDERED
        .iter()
        .map(|strategy| StrategyCount {
            strategy: strategy.as_str().to_string(),
            count: used.iter().filter(|value| *value == strategy).count(),
        })
        .collect()
}
