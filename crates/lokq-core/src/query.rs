//! Session data model: label selectors, line filters, the time range, and
//! rendering of the final LogQL expression and logcli argument vector.

use crate::error::QueryError;
use std::fmt;

/// Operator applied to a single stream label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMatcher {
    Eq,
    Neq,
    RegexEq,
    RegexNeq,
}

impl LabelMatcher {
    const MENU_ORDER: [LabelMatcher; 4] = [
        LabelMatcher::Eq,
        LabelMatcher::Neq,
        LabelMatcher::RegexEq,
        LabelMatcher::RegexNeq,
    ];

    pub fn token(self) -> &'static str {
        match self {
            LabelMatcher::Eq => "=",
            LabelMatcher::Neq => "!=",
            LabelMatcher::RegexEq => "=~",
            LabelMatcher::RegexNeq => "!~",
        }
    }

    /// Equality operators take a value picked from the known candidates;
    /// regex operators take a free-text pattern.
    pub fn wants_known_value(self) -> bool {
        matches!(self, LabelMatcher::Eq | LabelMatcher::Neq)
    }

    /// Parse a numbered-menu answer. Empty input means the default (`=`);
    /// any other non-numeric or out-of-range input is a hard failure.
    pub fn from_menu_choice(input: &str) -> Result<Self, QueryError> {
        menu_choice(input, &Self::MENU_ORDER, LabelMatcher::Eq)
    }

    pub fn menu_lines() -> [&'static str; 4] {
        [
            "1. = (equals)",
            "2. != (not equals)",
            "3. =~ (regex match)",
            "4. !~ (regex not match)",
        ]
    }
}

impl fmt::Display for LabelMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Operator of a full-line filter applied after label matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMatcher {
    Contains,
    NotContains,
    Regex,
    NotRegex,
}

impl LineMatcher {
    const MENU_ORDER: [LineMatcher; 4] = [
        LineMatcher::Contains,
        LineMatcher::NotContains,
        LineMatcher::Regex,
        LineMatcher::NotRegex,
    ];

    pub fn token(self) -> &'static str {
        match self {
            LineMatcher::Contains => "|=",
            LineMatcher::NotContains => "!=",
            LineMatcher::Regex => "|~",
            LineMatcher::NotRegex => "!~",
        }
    }

    /// Same menu rules as [`LabelMatcher::from_menu_choice`], default `|=`.
    pub fn from_menu_choice(input: &str) -> Result<Self, QueryError> {
        menu_choice(input, &Self::MENU_ORDER, LineMatcher::Contains)
    }

    pub fn menu_lines() -> [&'static str; 4] {
        [
            "1. |= (contains)",
            "2. != (does not contain)",
            "3. |~ (matches regex)",
            "4. !~ (does not match regex)",
        ]
    }
}

impl fmt::Display for LineMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

fn menu_choice<T: Copy>(input: &str, order: &[T; 4], default: T) -> Result<T, QueryError> {
    if input.is_empty() {
        return Ok(default);
    }
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| order.get(i).copied())
        .ok_or_else(|| QueryError::InvalidChoice(input.to_string()))
}

/// One label constraint, immutable once appended to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSelector {
    pub label: String,
    pub matcher: LabelMatcher,
    pub value: String,
}

impl fmt::Display for LabelSelector {
    // Values are embedded verbatim; embedded double quotes are not escaped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}\"{}\"", self.label, self.matcher, self.value)
    }
}

/// Optional full-line filter; absence is `None`, never an empty filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFilter {
    pub matcher: LineMatcher,
    pub text: String,
}

/// Time window of the query, exactly one shape per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeRange {
    /// Relative window ending now, e.g. `1h`. The token is handed to logcli
    /// unvalidated.
    Since(String),
    /// Absolute window; both ends are already normalized RFC3339 strings.
    Between { from: String, to: String },
}

impl TimeRange {
    pub fn args(&self) -> Vec<String> {
        match self {
            TimeRange::Since(duration) => vec!["--since".to_string(), duration.clone()],
            TimeRange::Between { from, to } => vec![
                "--from".to_string(),
                from.clone(),
                "--to".to_string(),
                to.clone(),
            ],
        }
    }
}

/// Everything one builder run accumulates; consumed once by rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub selectors: Vec<LabelSelector>,
    pub line_filter: Option<LineFilter>,
    pub range: TimeRange,
}

impl Session {
    /// Render the LogQL expression: selectors joined by commas in selection
    /// order inside `{...}`, plus the line filter segment when present.
    pub fn expression(&self) -> String {
        let clauses: Vec<String> = self.selectors.iter().map(|s| s.to_string()).collect();
        let mut expr = format!("{{{}}}", clauses.join(","));
        if let Some(filter) = &self.line_filter {
            expr.push_str(&format!(" {} \"{}\"", filter.matcher, filter.text));
        }
        expr
    }

    /// Full argument vector: `[logcli, query, <expr>, <time args...>]`.
    pub fn command_args(&self, logcli: &str) -> Vec<String> {
        let mut args = vec![
            logcli.to_string(),
            "query".to_string(),
            self.expression(),
        ];
        args.extend(self.range.args());
        args
    }
}
