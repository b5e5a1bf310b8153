//! Parsed units of a crontab time field.
//!
//! A time field such as `1-5,*/15,mon` is a comma-separated list of
//! elements. Each element parses into exactly one [`TimeToken`].

use std::fmt;

/// One element of a crontab time field.
///
/// Tokens are produced by [`parse`](crate::fsm::parse) and never modified
/// afterwards. Ordering problems such as `start > end` are left in place
/// here and reported later by [`diagnose`](crate::diagnose::diagnose).
///
/// The `Display` impl renders the canonical source text of the token, so
/// rendering a token and parsing the result again yields an equal token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TimeToken {
    /// `*`
    Star,
    /// `*/N`
    StarStep { step: u32 },
    /// `N`
    Time { value: u32 },
    /// `N-N`
    Range { start: u32, end: u32 },
    /// `N-N/N`
    RangeStep { start: u32, end: u32, step: u32 },
    /// `T`, a symbolic name such as `mon` or `jan`.
    Text { name: String },
    /// `T-T`
    TextRange { start: String, end: String },
    /// `T-T/N`
    TextRangeStep {
        start: String,
        end: String,
        step: u32,
    },
}

impl TimeToken {
    /// Short name of the token shape, used in logs and tests.
    pub fn kind(&self) -> &'static str {
        match self {
            TimeToken::Star => "star",
            TimeToken::StarStep { .. } => "star_step",
            TimeToken::Time { .. } => "time",
            TimeToken::Range { .. } => "range",
            TimeToken::RangeStep { .. } => "range_step",
            TimeToken::Text { .. } => "text",
            TimeToken::TextRange { .. } => "text_range",
            TimeToken::TextRangeStep { .. } => "text_range_step",
        }
    }

    /// Returns the step of step-bearing tokens.
    pub fn step(&self) -> Option<u32> {
        match self {
            TimeToken::StarStep { step }
            | TimeToken::RangeStep { step, .. }
            | TimeToken::TextRangeStep { step, .. } => Some(*step),
            _ => None,
        }
    }

    pub fn is_star(&self) -> bool {
        matches!(self, TimeToken::Star)
    }
}

impl fmt::Display for TimeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeToken::Star => f.write_str("*"),
            TimeToken::StarStep { step } => write!(f, "*/{}", step),
            TimeToken::Time { value } => write!(f, "{}", value),
            TimeToken::Range { start, end } => write!(f, "{}-{}", start, end),
            TimeToken::RangeStep { start, end, step } => {
                write!(f, "{}-{}/{}", start, end, step)
            }
            TimeToken::Text { name } => f.write_str(name),
            TimeToken::TextRange { start, end } => write!(f, "{}-{}", start, end),
            TimeToken::TextRangeStep { start, end, step } => {
                write!(f, "{}-{}/{}", start, end, step)
            }
        }
    }
}
