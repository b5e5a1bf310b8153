//! Finite state machine for crontab time fields.
//!
//! The grammar is a transition table keyed on `(state, character class)`
//! and built once on first use. Running the machine over a field is a pure
//! function of the input, so the table can be shared by any number of
//! concurrent parses.
//!
//! Each comma-separated element of a field matches one of:
//!
//! ```text
//! *      */N     N      N-N     N-N/N     T      T-T     T-T/N
//! ```
//!
//! where `N` is one or more ASCII digits and `T` one or more ASCII letters.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::token::TimeToken;

static GRAMMAR: Lazy<Grammar> = Lazy::new(Grammar::crontab);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum State {
    Start,
    Next,
    Star,
    StarStepStart,
    StarStep,
    Time,
    RangeStart,
    Range,
    RangeStepStart,
    RangeStep,
    Text,
    TextRangeStart,
    TextRange,
    TextRangeStepStart,
    TextRangeStep,
}

/// Input characters are disjoint classes; anything else has no transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum CharClass {
    Digit,
    Letter,
    Star,
    Dash,
    Slash,
    Comma,
}

impl CharClass {
    fn of(c: char) -> Option<CharClass> {
        match c {
            '0'..='9' => Some(CharClass::Digit),
            'a'..='z' | 'A'..='Z' => Some(CharClass::Letter),
            '*' => Some(CharClass::Star),
            '-' => Some(CharClass::Dash),
            '/' => Some(CharClass::Slash),
            ',' => Some(CharClass::Comma),
            _ => None,
        }
    }
}

/// Token shape produced when an element is complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Star,
    StarStep,
    Time,
    Range,
    RangeStep,
    Text,
    TextRange,
    TextRangeStep,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    /// Append the character to the current time/name buffer.
    Push,
    /// Append the character to the step buffer.
    PushStep,
    /// Move the current buffer to the range start.
    Dash,
    Skip,
    /// Build a token of the given shape from the buffers and reset them.
    Emit(Shape),
}

struct Grammar {
    transitions: HashMap<(State, CharClass), (Action, State)>,
    accept: HashMap<State, Shape>,
}

impl Grammar {
    fn new() -> Self {
        Grammar {
            transitions: HashMap::new(),
            accept: HashMap::new(),
        }
    }

    fn on(&mut self, class: CharClass, state: State, action: Action, next: State) {
        self.transitions.insert((state, class), (action, next));
    }

    fn accept(&mut self, state: State, shape: Shape) {
        self.accept.insert(state, shape);
    }

    /// Builds the table for the five-field crontab time grammar.
    fn crontab() -> Self {
        use CharClass::*;

        let mut g = Grammar::new();

        // *
        g.on(Star, State::Start, Action::Skip, State::Star);
        g.on(Star, State::Next, Action::Skip, State::Star);
        g.accept(State::Star, Shape::Star);
        g.on(Comma, State::Star, Action::Emit(Shape::Star), State::Next);
        // */N
        g.on(Slash, State::Star, Action::Skip, State::StarStepStart);
        g.on(Digit, State::StarStepStart, Action::PushStep, State::StarStep);
        g.on(Digit, State::StarStep, Action::PushStep, State::StarStep);
        g.accept(State::StarStep, Shape::StarStep);
        g.on(Comma, State::StarStep, Action::Emit(Shape::StarStep), State::Next);

        // N
        g.on(Digit, State::Start, Action::Push, State::Time);
        g.on(Digit, State::Next, Action::Push, State::Time);
        g.on(Digit, State::Time, Action::Push, State::Time);
        g.accept(State::Time, Shape::Time);
        g.on(Comma, State::Time, Action::Emit(Shape::Time), State::Next);
        // N-N
        g.on(Dash, State::Time, Action::Dash, State::RangeStart);
        g.on(Digit, State::RangeStart, Action::Push, State::Range);
        g.on(Digit, State::Range, Action::Push, State::Range);
        g.accept(State::Range, Shape::Range);
        g.on(Comma, State::Range, Action::Emit(Shape::Range), State::Next);
        // N-N/N
        g.on(Slash, State::Range, Action::Skip, State::RangeStepStart);
        g.on(Digit, State::RangeStepStart, Action::PushStep, State::RangeStep);
        g.on(Digit, State::RangeStep, Action::PushStep, State::RangeStep);
        g.accept(State::RangeStep, Shape::RangeStep);
        g.on(Comma, State::RangeStep, Action::Emit(Shape::RangeStep), State::Next);

        // T
        g.on(Letter, State::Start, Action::Push, State::Text);
        g.on(Letter, State::Next, Action::Push, State::Text);
        g.on(Letter, State::Text, Action::Push, State::Text);
        g.accept(State::Text, Shape::Text);
        g.on(Comma, State::Text, Action::Emit(Shape::Text), State::Next);
        // T-T
        g.on(Dash, State::Text, Action::Dash, State::TextRangeStart);
        g.on(Letter, State::TextRangeStart, Action::Push, State::TextRange);
        g.on(Letter, State::TextRange, Action::Push, State::TextRange);
        g.accept(State::TextRange, Shape::TextRange);
        g.on(Comma, State::TextRange, Action::Emit(Shape::TextRange), State::Next);
        // T-T/N
        g.on(Slash, State::TextRange, Action::Skip, State::TextRangeStepStart);
        g.on(Digit, State::TextRangeStepStart, Action::PushStep, State::TextRangeStep);
        g.on(Digit, State::TextRangeStep, Action::PushStep, State::TextRangeStep);
        g.accept(State::TextRangeStep, Shape::TextRangeStep);
        g.on(
            Comma,
            State::TextRangeStep,
            Action::Emit(Shape::TextRangeStep),
            State::Next,
        );

        g
    }

    fn next(&self, state: State, c: char) -> Option<(Action, State)> {
        let class = CharClass::of(c)?;
        self.transitions.get(&(state, class)).copied()
    }
}

/// Where and why a field failed to parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// Input consumed before the failure.
    pub consumed: String,
    /// The character with no valid transition, or `None` when the input
    /// ended in the middle of an element.
    pub offending: Option<char>,
    /// Input after the offending character.
    pub remaining: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offending {
            Some(c) => write!(f, "\"{}[[{}]]{}\"", self.consumed, c, self.remaining),
            None => write!(f, "\"{}\" is incomplete", self.consumed),
        }
    }
}

impl std::error::Error for ParseError {}

/// Result of running the grammar over one field.
///
/// Tokens completed before a failure are kept even when `error` is set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub tokens: Vec<TimeToken>,
    pub error: Option<ParseError>,
}

impl ParseOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// True when the field imposes no restriction: a lone `*`, or nothing
    /// parsed at all.
    pub fn is_star_only(&self) -> bool {
        match self.tokens.as_slice() {
            [] => true,
            [token] => token.is_star(),
            _ => false,
        }
    }
}

#[derive(Default)]
struct Scratch {
    time: String,
    range: String,
    step: String,
    tokens: Vec<TimeToken>,
}

impl Scratch {
    fn apply(&mut self, action: Action, c: char) {
        match action {
            Action::Push => self.time.push(c),
            Action::PushStep => self.step.push(c),
            Action::Dash => self.range = std::mem::take(&mut self.time),
            Action::Skip => {}
            Action::Emit(shape) => self.emit(shape),
        }
    }

    fn emit(&mut self, shape: Shape) {
        let time = std::mem::take(&mut self.time);
        let range = std::mem::take(&mut self.range);
        let step = std::mem::take(&mut self.step);

        let token = match shape {
            Shape::Star => TimeToken::Star,
            Shape::StarStep => TimeToken::StarStep {
                step: number(&step),
            },
            Shape::Time => TimeToken::Time {
                value: number(&time),
            },
            Shape::Range => TimeToken::Range {
                start: number(&range),
                end: number(&time),
            },
            Shape::RangeStep => TimeToken::RangeStep {
                start: number(&range),
                end: number(&time),
                step: number(&step),
            },
            Shape::Text => TimeToken::Text { name: time },
            Shape::TextRange => TimeToken::TextRange {
                start: range,
                end: time,
            },
            Shape::TextRangeStep => TimeToken::TextRangeStep {
                start: range,
                end: time,
                step: number(&step),
            },
        };
        self.tokens.push(token);
    }
}

/// Digits only ever reach here; oversized numbers saturate so they are
/// still reported as too high.
fn number(digits: &str) -> u32 {
    digits.bytes().fold(0u32, |acc, b| {
        acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
    })
}

/// Parses one crontab time field into tokens.
///
/// Never panics: on the first character without a transition the tokens
/// completed so far are returned together with a [`ParseError`] splitting
/// the input at that character. Running out of input in the middle of an
/// element (`1-`, `*/`, a trailing `,`, the empty string) is reported the
/// same way with no offending character.
///
/// # Examples
///
/// ```rust
/// use chkcrontab::{parse, TimeToken};
///
/// let outcome = parse("1-5,*/15");
/// assert!(outcome.is_ok());
/// assert_eq!(outcome.tokens[1], TimeToken::StarStep { step: 15 });
/// ```
pub fn parse(field: &str) -> ParseOutcome {
    let grammar = &*GRAMMAR;
    let mut scratch = Scratch::default();
    let mut state = State::Start;

    for (idx, c) in field.char_indices() {
        match grammar.next(state, c) {
            Some((action, next)) => {
                scratch.apply(action, c);
                state = next;
            }
            None => {
                return ParseOutcome {
                    tokens: scratch.tokens,
                    error: Some(ParseError {
                        consumed: field[..idx].to_string(),
                        offending: Some(c),
                        remaining: field[idx + c.len_utf8()..].to_string(),
                    }),
                };
            }
        }
    }

    match grammar.accept.get(&state) {
        Some(&shape) => {
            scratch.emit(shape);
            ParseOutcome {
                tokens: scratch.tokens,
                error: None,
            }
        }
        None => ParseOutcome {
            tokens: scratch.tokens,
            error: Some(ParseError {
                consumed: field.to_string(),
                offending: None,
                remaining: String::new(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(outcome: &ParseOutcome) -> Vec<(&'static str, String)> {
        outcome
            .tokens
            .iter()
            .map(|t| (t.kind(), t.to_string()))
            .collect()
    }

    fn assert_parses(field: &str, expected: &[(&str, &str)]) {
        let outcome = parse(field);
        assert!(outcome.is_ok(), "unexpected error for {:?}: {:?}", field, outcome.error);
        let expected: Vec<(&str, String)> =
            expected.iter().map(|(k, s)| (*k, s.to_string())).collect();
        assert_eq!(kinds(&outcome), expected);
    }

    fn assert_fails(field: &str, expected: &[(&str, &str)]) {
        let outcome = parse(field);
        assert!(outcome.error.is_some(), "expected error for {:?}", field);
        let expected: Vec<(&str, String)> =
            expected.iter().map(|(k, s)| (*k, s.to_string())).collect();
        assert_eq!(kinds(&outcome), expected);
    }

    #[test]
    fn test_simple_stars() {
        assert_parses("*", &[("star", "*")]);
        assert_parses("*/2", &[("star_step", "*/2")]);
        assert_fails("*-*", &[]);
    }

    #[test]
    fn test_simple_time() {
        assert_parses("3", &[("time", "3")]);
        assert_fails("5/2", &[]);
        assert_parses("1-9", &[("range", "1-9")]);
        assert_parses("11-49/2", &[("range_step", "11-49/2")]);
    }

    #[test]
    fn test_simple_text() {
        assert_parses("mon", &[("text", "mon")]);
        assert_parses("mon-fri", &[("text_range", "mon-fri")]);
        assert_parses("mon-fri/2", &[("text_range_step", "mon-fri/2")]);
        assert_fails("mon/2", &[]);
    }

    #[test]
    fn test_mixed_character_classes() {
        for field in ["m2", "2m", "2*", "*2", "*m", "m*"] {
            assert_fails(field, &[]);
        }
    }

    #[test]
    fn test_punctuation_errors() {
        for field in ["-", ",", "/", "*/tue", "*/,", "*//2", "**", "--", "//", ",,"] {
            assert_fails(field, &[]);
        }
    }

    #[test]
    fn test_errors_keep_completed_tokens() {
        assert_fails("1-55,34//3,6-9", &[("range", "1-55")]);
        assert_fails("5-mon", &[]);
        assert_fails("mon-78", &[]);
        assert_fails("1-2-3", &[]);
        assert_fails("1-20/2/3", &[]);
        assert_fails("23,**,33", &[("time", "23")]);
    }

    #[test]
    fn test_comma_separated_elements() {
        assert_parses(
            "mon,tue,thu",
            &[("text", "mon"), ("text", "tue"), ("text", "thu")],
        );
        assert_parses(
            "mon,3,*,*/2,mon-fri,1-2,3-4/2",
            &[
                ("text", "mon"),
                ("time", "3"),
                ("star", "*"),
                ("star_step", "*/2"),
                ("text_range", "mon-fri"),
                ("range", "1-2"),
                ("range_step", "3-4/2"),
            ],
        );
    }

    #[test]
    fn test_error_splits_at_offending_char() {
        let outcome = parse("1,2x,3");
        let error = outcome.error.unwrap();
        assert_eq!(error.consumed, "1,2");
        assert_eq!(error.offending, Some('x'));
        assert_eq!(error.remaining, ",3");
        assert_eq!(error.to_string(), "\"1,2[[x]],3\"");
        assert_eq!(outcome.tokens, vec![TimeToken::Time { value: 1 }]);
    }

    #[test]
    fn test_incomplete_input() {
        for field in ["", "1-", "*/", "1,", "mon-", "1-5/"] {
            let outcome = parse(field);
            let error = outcome.error.expect(field);
            assert_eq!(error.offending, None);
            assert_eq!(error.to_string(), format!("\"{}\" is incomplete", field));
        }
        assert_eq!(parse("1,").tokens, vec![TimeToken::Time { value: 1 }]);
    }

    #[test]
    fn test_non_ascii_input_does_not_panic() {
        let outcome = parse("1,é5");
        let error = outcome.error.unwrap();
        assert_eq!(error.offending, Some('é'));
        assert_eq!(error.remaining, "5");
    }

    #[test]
    fn test_leading_zeros_and_overflow() {
        assert_eq!(parse("0001").tokens, vec![TimeToken::Time { value: 1 }]);
        assert_eq!(
            parse("99999999999").tokens,
            vec![TimeToken::Time { value: u32::MAX }]
        );
    }

    #[test]
    fn test_rendered_tokens_reparse_equal() {
        let outcome = parse("*,*/3,4,5-6,7-8/9,Jan,mon-FRI,sun-sat/2,12-1");
        assert!(outcome.is_ok());
        for token in &outcome.tokens {
            let reparsed = parse(&token.to_string());
            assert_eq!(reparsed.tokens, vec![token.clone()]);
        }
    }

    #[test]
    fn test_star_only() {
        assert!(parse("*").is_star_only());
        assert!(parse("x").is_star_only());
        assert!(!parse("*,*").is_star_only());
        assert!(!parse("*/2").is_star_only());
        assert!(!parse("3").is_star_only());
    }
}
