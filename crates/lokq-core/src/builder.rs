//! The interactive query-construction state machine.
//!
//! The machine only ever moves forward: time range, then the label loop,
//! then the optional line filter. Any error aborts the whole session; there
//! is no retry and no resume. All terminal and subprocess I/O sits behind
//! [`Prompter`] and [`LabelSource`] so the machine can be driven by scripted
//! doubles in tests.

use crate::error::QueryError;
use crate::query::{LabelMatcher, LabelSelector, LineFilter, LineMatcher, Session, TimeRange};
use crate::time;
use std::collections::HashSet;

/// Interactive capability: show a line, read a line, pick one of N strings.
pub trait Prompter {
    fn say(&mut self, line: &str);

    /// Print `prompt` without a trailing newline and read one line of input,
    /// trimmed.
    fn read_line(&mut self, prompt: &str) -> Result<String, QueryError>;

    /// Let the user pick exactly one of `candidates`.
    fn pick_one(&mut self, prompt: &str, candidates: &[String]) -> Result<String, QueryError>;
}

/// Source of label names and label values, scoped to the session's time
/// range so suggestions match the query being built.
pub trait LabelSource {
    fn labels(&self, range: &TimeRange) -> Result<Vec<String>, QueryError>;

    fn label_values(&self, label: &str, range: &TimeRange) -> Result<Vec<String>, QueryError>;
}

enum State {
    SelectingTimeRange,
    SelectingLabels {
        range: TimeRange,
    },
    SelectingLineFilter {
        range: TimeRange,
        selectors: Vec<LabelSelector>,
    },
}

pub struct QueryBuilder<'a, P, S> {
    prompter: &'a mut P,
    source: &'a S,
}

impl<'a, P: Prompter, S: LabelSource> QueryBuilder<'a, P, S> {
    pub fn new(prompter: &'a mut P, source: &'a S) -> Self {
        Self { prompter, source }
    }

    /// Drive the session to completion and return the accumulated state.
    pub fn run(mut self) -> Result<Session, QueryError> {
        let mut state = State::SelectingTimeRange;
        loop {
            state = match state {
                State::SelectingTimeRange => State::SelectingLabels {
                    range: self.select_time_range()?,
                },
                State::SelectingLabels { range } => {
                    let selectors = self.select_labels(&range)?;
                    State::SelectingLineFilter { range, selectors }
                }
                State::SelectingLineFilter { range, selectors } => {
                    let line_filter = self.select_line_filter()?;
                    return Ok(Session {
                        selectors,
                        line_filter,
                        range,
                    });
                }
            };
        }
    }

    fn select_time_range(&mut self) -> Result<TimeRange, QueryError> {
        self.prompter.say("Select time range type:");
        self.prompter.say("1. Relative (e.g., 1h, 24h)");
        self.prompter.say("2. Absolute (specific dates)");
        let choice = self.prompter.read_line("Enter choice (1-2): ")?;

        match choice.as_str() {
            "1" => {
                let duration = self
                    .prompter
                    .read_line("Enter relative time (e.g., 1h, 24h, 7d): ")?;
                Ok(TimeRange::Since(duration))
            }
            "2" => {
                let start = self
                    .prompter
                    .read_line("Enter start time (YYYY-MM-DD HH:MM or YYYY-MM-DD): ")?;
                let end = self
                    .prompter
                    .read_line("Enter end time (YYYY-MM-DD HH:MM or YYYY-MM-DD): ")?;
                Ok(TimeRange::Between {
                    from: time::normalize(&start, true)?,
                    to: time::normalize(&end, false)?,
                })
            }
            other => Err(QueryError::InvalidChoice(other.to_string())),
        }
    }

    fn select_labels(&mut self, range: &TimeRange) -> Result<Vec<LabelSelector>, QueryError> {
        let mut selectors: Vec<LabelSelector> = Vec::new();

        loop {
            self.show_selected(&selectors);

            let available = self.available_labels(range, &selectors)?;
            if available.is_empty() {
                self.prompter.say("No more labels available.");
                break;
            }

            let label = self.prompter.pick_one("Select label:", &available)?;
            let matcher = self.select_label_matcher(&label)?;
            let value = self.select_value(&label, matcher, range)?;
            selectors.push(LabelSelector {
                label,
                matcher,
                value,
            });

            let answer = self.prompter.read_line("\nAdd more labels? (y/N): ")?;
            if !is_yes(&answer) {
                break;
            }
        }

        Ok(selectors)
    }

    fn show_selected(&mut self, selectors: &[LabelSelector]) {
        if selectors.is_empty() {
            return;
        }
        self.prompter.say("");
        self.prompter.say("=== Current labels ===");
        for selector in selectors {
            self.prompter.say(&format!("[SET] {selector}"));
        }
    }

    /// Labels already constraining the session are excluded; comparison is
    /// exact and case-sensitive.
    fn available_labels(
        &mut self,
        range: &TimeRange,
        selectors: &[LabelSelector],
    ) -> Result<Vec<String>, QueryError> {
        let chosen: HashSet<&str> = selectors.iter().map(|s| s.label.as_str()).collect();
        let labels = self.source.labels(range)?;
        Ok(labels
            .into_iter()
            .filter(|label| !chosen.contains(label.as_str()))
            .collect())
    }

    fn select_label_matcher(&mut self, label: &str) -> Result<LabelMatcher, QueryError> {
        self.prompter.say("");
        self.prompter
            .say(&format!("Select operator for '{label}' (default: 1):"));
        for line in LabelMatcher::menu_lines() {
            self.prompter.say(line);
        }
        let choice = self
            .prompter
            .read_line("Enter number (1-4) or press Enter for default: ")?;
        LabelMatcher::from_menu_choice(&choice)
    }

    fn select_value(
        &mut self,
        label: &str,
        matcher: LabelMatcher,
        range: &TimeRange,
    ) -> Result<String, QueryError> {
        if matcher.wants_known_value() {
            let values = self.source.label_values(label, range)?;
            if values.is_empty() {
                return Err(QueryError::NoCandidates(format!(
                    "label '{label}' has no known values"
                )));
            }
            self.prompter
                .pick_one(&format!("Select value for '{label}':"), &values)
        } else {
            self.prompter
                .read_line(&format!("Enter regex pattern for '{label}': "))
        }
    }

    fn select_line_filter(&mut self) -> Result<Option<LineFilter>, QueryError> {
        let answer = self.prompter.read_line("\nAdd line filter? (y/N): ")?;
        if !is_yes(&answer) {
            return Ok(None);
        }

        self.prompter.say("");
        self.prompter.say("Select line filter operator (default: 1):");
        for line in LineMatcher::menu_lines() {
            self.prompter.say(line);
        }
        let choice = self
            .prompter
            .read_line("Enter number (1-4) or press Enter for default: ")?;
        let matcher = LineMatcher::from_menu_choice(&choice)?;

        let text = self.prompter.read_line("Enter filter text: ")?;
        Ok(Some(LineFilter { matcher, text }))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
}
