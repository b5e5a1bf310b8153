//! Message categories that findings are tagged with.
//!
//! The string forms are what appears in the report and what
//! `# chkcrontab: disable-msg=<CATEGORY>` directives name.

use std::fmt;
use std::str::FromStr;

use crate::error::CheckError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticCategory {
    /// Unescaped `%` in a command.
    BarePercent,
    /// Malformed `chkcrontab:` directive.
    DirectiveError,
    FieldParseError,
    FieldValueError,
    /// Unknown `@period`.
    InvalidAt,
    InvalidUser,
    /// Line matched no known shape.
    UnparseableLine,
    /// Assignment with an empty right-hand side.
    QuoteValues,
    /// `$` in an assignment; cron does not expand variables.
    ShellVar,
    UserNotFound,
    /// Minute is `*` while hour is restricted.
    HoursNotMinutes,
}

/// Lookup table between categories and their names.
static NAMES: [(DiagnosticCategory, &str); 11] = [
    (DiagnosticCategory::BarePercent, "BARE_PERCENT"),
    (DiagnosticCategory::DirectiveError, "CHKCRONTAB_ERROR"),
    (DiagnosticCategory::FieldParseError, "FIELD_PARSE_ERROR"),
    (DiagnosticCategory::FieldValueError, "FIELD_VALUE_ERROR"),
    (DiagnosticCategory::InvalidAt, "INVALID_AT"),
    (DiagnosticCategory::InvalidUser, "INVALID_USER"),
    (DiagnosticCategory::UnparseableLine, "LINE_ERROR"),
    (DiagnosticCategory::QuoteValues, "QUOTE_VALUES"),
    (DiagnosticCategory::ShellVar, "SHELL_VAR"),
    (DiagnosticCategory::UserNotFound, "USER_NOT_FOUND"),
    (DiagnosticCategory::HoursNotMinutes, "HOURS_NOT_MINUTES"),
];

impl DiagnosticCategory {
    pub fn all() -> impl Iterator<Item = DiagnosticCategory> {
        NAMES.iter().map(|(category, _)| *category)
    }

    pub fn as_str(self) -> &'static str {
        NAMES
            .iter()
            .find(|(category, _)| *category == self)
            .map(|(_, name)| *name)
            .unwrap_or_default()
    }
}

impl FromStr for DiagnosticCategory {
    type Err = CheckError;

    /// Exact, case-sensitive match on the category name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(category, _)| *category)
            .ok_or_else(|| CheckError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
