//! Value checks for parsed time tokens.

use crate::limits::FieldLimit;
use crate::token::TimeToken;

/// Checks one token against the limits of the field it appeared in.
///
/// Every applicable check runs; a token can produce several messages.
/// Each message names the field and quotes the token.
///
/// A range is checked for a low start and a high end. Together with the
/// `start > end` check this covers every out-of-bounds range without
/// reporting the same bound twice.
///
/// # Examples
///
/// ```rust
/// use chkcrontab::{diagnose, parse, Field};
///
/// let token = &parse("12-1").tokens[0];
/// let messages = diagnose(token, Field::Hour.limit());
/// assert_eq!(messages, vec!["12 is greater than 1 in field \"hour\" (12-1)"]);
/// ```
pub fn diagnose(token: &TimeToken, limit: &FieldLimit) -> Vec<String> {
    let mut check = Check {
        token,
        limit,
        messages: Vec::new(),
    };

    match token {
        TimeToken::Star => {}
        TimeToken::StarStep { step } => {
            check.low_step(*step);
            check.high(*step);
        }
        TimeToken::Time { value } => {
            check.low(*value);
            check.high(*value);
        }
        TimeToken::Range { start, end } => {
            check.order(*start, *end);
            check.low(*start);
            check.high(*end);
        }
        TimeToken::RangeStep { start, end, step } => {
            check.order(*start, *end);
            check.low(*start);
            check.high(*end);
            check.low_step(*step);
            check.step_past_end(*step, *end);
            check.high(*step);
        }
        TimeToken::Text { name } => {
            check.alias(name);
        }
        TimeToken::TextRange { start, end } => {
            check.alias(start);
            check.alias(end);
        }
        TimeToken::TextRangeStep { start, end, step } => {
            check.alias(start);
            check.alias(end);
            check.low_step(*step);
            check.high(*step);
        }
    }

    check.messages
}

struct Check<'a> {
    token: &'a TimeToken,
    limit: &'a FieldLimit,
    messages: Vec<String>,
}

impl Check<'_> {
    /// Appends `what` followed by the field name and the quoted token.
    fn push(&mut self, what: String, preposition: &str) {
        self.messages.push(format!(
            "{} {} field \"{}\" ({})",
            what, preposition, self.limit.name, self.token
        ));
    }

    fn low(&mut self, value: u32) {
        if value < self.limit.min {
            self.push(format!("{} is too low", value), "for");
        }
    }

    fn high(&mut self, value: u32) {
        if value > self.limit.max {
            self.push(format!("{} is too high", value), "for");
        }
    }

    fn order(&mut self, start: u32, end: u32) {
        if start > end {
            self.push(format!("{} is greater than {}", start, end), "in");
        }
    }

    fn low_step(&mut self, step: u32) {
        if step < 1 {
            self.push(format!("{} is too low", step), "for");
        }
    }

    fn step_past_end(&mut self, step: u32, end: u32) {
        if step > end {
            self.push(
                format!("the step ({}) is greater than the last number ({})", step, end),
                "in",
            );
        }
    }

    fn alias(&mut self, name: &str) {
        if !self.limit.is_valid_alias(name) {
            self.push(format!("{} is not valid", name), "for");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsm::parse;
    use crate::limits::Field;

    /// Parses `data`, checks the token count and returns all messages.
    fn field_messages(field: Field, count: usize, data: &str) -> Vec<String> {
        let outcome = parse(data);
        assert!(outcome.is_ok(), "{:?}", outcome.error);
        assert_eq!(outcome.tokens.len(), count);
        outcome
            .tokens
            .iter()
            .flat_map(|token| diagnose(token, field.limit()))
            .collect()
    }

    #[test]
    fn test_minute() {
        assert_eq!(field_messages(Field::Minute, 6, "0,1,30,59,60,61").len(), 2);
        assert_eq!(field_messages(Field::Minute, 3, "0-59,0-60,0-61").len(), 2);
        // 10 > 5 in 0-5/10; 60 > 33 and 60 > 59 in 0-33/60; 61 and 60 in 0-61/60
        assert_eq!(
            field_messages(Field::Minute, 4, "0-5/10,0-10/5,0-33/60,0-61/60").len(),
            5
        );
        assert_eq!(field_messages(Field::Minute, 3, "mon,mon-fri,mon-fri/3").len(), 5);
    }

    #[test]
    fn test_minute_boundaries() {
        assert!(field_messages(Field::Minute, 1, "59").is_empty());
        assert!(field_messages(Field::Minute, 1, "0").is_empty());
        assert_eq!(
            field_messages(Field::Minute, 1, "60"),
            vec!["60 is too high for field \"minute\" (60)"]
        );
    }

    #[test]
    fn test_hour() {
        assert_eq!(field_messages(Field::Hour, 6, "0,1,12,23,24,25").len(), 2);
        assert_eq!(
            field_messages(Field::Hour, 7, "0-12,1-12,12-13,12-1,23-24,24-30,25-1").len(),
            4
        );
        assert_eq!(
            field_messages(
                Field::Hour,
                6,
                "0-12/2,1-3/0,12-13/14,12-1/2,23-24/25,24-30/2"
            )
            .len(),
            8
        );
    }

    #[test]
    fn test_hour_reversed_range_reports_once() {
        assert_eq!(
            field_messages(Field::Hour, 1, "12-1"),
            vec!["12 is greater than 1 in field \"hour\" (12-1)"]
        );
    }

    #[test]
    fn test_day_of_month() {
        assert_eq!(
            field_messages(Field::DayOfMonth, 6, "0,0001,15,31,32,33").len(),
            3
        );
        assert_eq!(
            field_messages(Field::DayOfMonth, 7, "0-15,1-15,15-16,15-1,31-32,32-30,33-1").len(),
            5
        );
        assert_eq!(
            field_messages(
                Field::DayOfMonth,
                6,
                "0-14/2,1-3/0,14-16/17,14-1/2,31-32/33,32-30/2"
            )
            .len(),
            9
        );
    }

    #[test]
    fn test_month() {
        assert_eq!(field_messages(Field::Month, 6, "0,1,7,12,13,14").len(), 3);
        assert_eq!(
            field_messages(Field::Month, 7, "0-7,1-7,7-8,7-1,12-13,13-10,14-1").len(),
            5
        );
        assert_eq!(
            field_messages(Field::Month, 6, "0-12/2,1-3/0,4-8/9,14-1/2,12-13/14,13-10/2").len(),
            9
        );
        assert!(field_messages(Field::Month, 2, "jan,JUL-dec").is_empty());
    }

    #[test]
    fn test_day_of_week() {
        assert_eq!(field_messages(Field::DayOfWeek, 6, "0,1,4,7,8,9").len(), 2);
        assert_eq!(
            field_messages(Field::DayOfWeek, 7, "0-4,1-4,4-5,4-1,7-8,8-7,9-1").len(),
            4
        );
        assert_eq!(
            field_messages(Field::DayOfWeek, 6, "0-3/2,1-3/0,3-5/6,3-1/2,7-8/9,8-7/2").len(),
            8
        );
    }

    #[test]
    fn test_day_of_week_alias_case() {
        let upper = field_messages(Field::DayOfWeek, 1, "MON-FRI");
        let lower = field_messages(Field::DayOfWeek, 1, "mon-fri");
        assert!(upper.is_empty());
        assert_eq!(upper, lower);
        assert_eq!(
            field_messages(Field::DayOfWeek, 1, "mon-jan"),
            vec!["jan is not valid for field \"day of week\" (mon-jan)"]
        );
    }

    #[test]
    fn test_star_steps() {
        assert!(diagnose(&TimeToken::Star, Field::Minute.limit()).is_empty());
        assert_eq!(
            field_messages(Field::Minute, 1, "*/0"),
            vec!["0 is too low for field \"minute\" (*/0)"]
        );
        assert_eq!(field_messages(Field::Hour, 1, "*/24").len(), 1);
        assert!(field_messages(Field::Hour, 1, "*/23").is_empty());
    }

    #[test]
    fn test_text_range_step() {
        // jan twice, step 0 too low
        assert_eq!(
            field_messages(Field::DayOfWeek, 1, "jan-jan/0").len(),
            3
        );
        assert_eq!(field_messages(Field::DayOfWeek, 1, "mon-fri/8").len(), 1);
    }

    #[test]
    fn test_message_wording() {
        assert_eq!(
            field_messages(Field::Hour, 1, "0-30/40"),
            vec![
                "30 is too high for field \"hour\" (0-30/40)",
                "the step (40) is greater than the last number (30) in field \"hour\" (0-30/40)",
                "40 is too high for field \"hour\" (0-30/40)",
            ]
        );
    }
}
