//! Classifies crontab lines and validates each kind.
//!
//! Classification is an ordered list of patterns; the first one that
//! matches decides the line kind:
//!
//! 1. blank
//! 2. `#` comment, or a `# chkcrontab: <command>=<category>` directive
//! 3. `NAME = value` assignment
//! 4. `@period user command`
//! 5. `min hour dom month dow user command`
//! 6. anything else is unparseable

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::category::DiagnosticCategory;
use crate::diagnose::diagnose;
use crate::fsm::{parse, ParseOutcome};
use crate::limits::Field;
use crate::log::LogCounter;
use crate::users::Users;

static DIRECTIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#+\s*chkcrontab:\s*(.*)=(.*)").unwrap());

static ASSIGNMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*\s*=(.*)").unwrap());

static AT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@(\S+)\s+(\S+)\s+(.*)").unwrap());

static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    let field = r"[*0-9a-zA-Z,/-]+";
    Regex::new(&format!(
        r"^\s*({f})\s+({f})\s+({f})\s+({f})\s+({f})\s+(\S+)\s+(.*)",
        f = field
    ))
    .unwrap()
});

/// Periods accepted after `@`.
pub const AT_PERIODS: &[&str] = &[
    "reboot", "yearly", "annually", "monthly", "weekly", "daily", "midnight", "hourly",
];

/// Percent sign not preceded by a backslash.
static BARE_PERCENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\\]%").unwrap());

/// A classified crontab line, owning what it needs to validate itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CronLine {
    Blank,
    Comment,
    Directive {
        command: String,
        category: String,
    },
    Assignment {
        value: String,
    },
    At {
        period: String,
        user: String,
        command: String,
    },
    Time {
        /// Raw minute, hour, day of month, month and day of week fields.
        fields: [String; 5],
        user: String,
        command: String,
    },
    Unknown,
}

/// Decides what kind of line `line` is. Surrounding whitespace is ignored.
pub fn classify(line: &str) -> CronLine {
    let line = line.trim();

    if line.is_empty() {
        return CronLine::Blank;
    }

    if line.starts_with('#') {
        return match DIRECTIVE_RE.captures(line) {
            Some(caps) => CronLine::Directive {
                command: caps[1].to_string(),
                category: caps[2].to_string(),
            },
            None => CronLine::Comment,
        };
    }

    if let Some(caps) = ASSIGNMENT_RE.captures(line) {
        return CronLine::Assignment {
            value: caps[1].to_string(),
        };
    }

    if let Some(caps) = AT_RE.captures(line) {
        return CronLine::At {
            period: caps[1].to_string(),
            user: caps[2].to_string(),
            command: caps[3].to_string(),
        };
    }

    if let Some(caps) = TIME_RE.captures(line) {
        return CronLine::Time {
            fields: [
                caps[1].to_string(),
                caps[2].to_string(),
                caps[3].to_string(),
                caps[4].to_string(),
                caps[5].to_string(),
            ],
            user: caps[6].to_string(),
            command: caps[7].to_string(),
        };
    }

    CronLine::Unknown
}

impl CronLine {
    pub fn kind(&self) -> &'static str {
        match self {
            CronLine::Blank => "blank",
            CronLine::Comment => "comment",
            CronLine::Directive { .. } => "directive",
            CronLine::Assignment { .. } => "assignment",
            CronLine::At { .. } => "at",
            CronLine::Time { .. } => "time",
            CronLine::Unknown => "unknown",
        }
    }

    /// Records the problems with this line in `log`.
    ///
    /// Directives change which categories `log` records; the change applies
    /// to lines validated afterwards.
    pub fn validate(&self, log: &mut LogCounter, users: &Users<'_>) {
        trace!(kind = self.kind(), "validating line");
        match self {
            CronLine::Blank | CronLine::Comment => {}
            CronLine::Directive { command, category } => {
                validate_directive(command, category, log)
            }
            CronLine::Assignment { value } => validate_assignment(value, log),
            CronLine::At {
                period,
                user,
                command,
            } => {
                if !AT_PERIODS.contains(&period.as_str()) {
                    log.line_error(
                        DiagnosticCategory::InvalidAt,
                        format!("Invalid @ directive \"{}\"", period),
                    );
                }
                validate_action(user, command, log, users);
            }
            CronLine::Time {
                fields,
                user,
                command,
            } => {
                validate_time_fields(fields, log);
                validate_action(user, command, log, users);
            }
            CronLine::Unknown => {
                log.line_error(DiagnosticCategory::UnparseableLine, "Failed to parse line.")
            }
        }
    }
}

fn validate_directive(command: &str, category: &str, log: &mut LogCounter) {
    let parsed = category.parse::<DiagnosticCategory>();
    if let Err(err) = &parsed {
        log.line_error(DiagnosticCategory::DirectiveError, err.to_string());
    }

    let disable = match command {
        "disable-msg" => true,
        "enable-msg" => false,
        _ => {
            log.line_error(
                DiagnosticCategory::DirectiveError,
                "Invalid chkcrontab command - must be enable-msg or disable-msg.",
            );
            return;
        }
    };

    if let Ok(category) = parsed {
        if disable {
            log.suppress(category);
        } else {
            log.unsuppress(category);
        }
    }
}

fn validate_assignment(value: &str, log: &mut LogCounter) {
    // `FOO=` followed by nothing would otherwise be read as a job line.
    if value.trim().is_empty() {
        log.line_error(
            DiagnosticCategory::QuoteValues,
            "Variable assignments in crontabs must contain non-whitespace characters (try quotes).",
        );
    }
    if value.contains('$') {
        log.line_warn(
            DiagnosticCategory::ShellVar,
            "Variable assignments in crontabs are not like shell.  $VAR is not expanded.",
        );
    }
}

fn validate_time_fields(fields: &[String; 5], log: &mut LogCounter) {
    let parsed: Vec<ParseOutcome> = Field::ALL
        .iter()
        .zip(fields.iter())
        .map(|(field, text)| {
            let outcome = parse(text);
            if let Some(err) = &outcome.error {
                log.line_error(
                    DiagnosticCategory::FieldParseError,
                    format!("Failed to fully parse \"{}\" field here: {}", field, err),
                );
            }
            for token in &outcome.tokens {
                for message in diagnose(token, field.limit()) {
                    log.line_error(DiagnosticCategory::FieldValueError, message);
                }
            }
            outcome
        })
        .collect();

    let minute = &parsed[Field::Minute as usize];
    let hour = &parsed[Field::Hour as usize];
    if minute.is_star_only() && !hour.is_star_only() {
        log.line_warn(
            DiagnosticCategory::HoursNotMinutes,
            "Cron will run this every minute for the hours set.",
        );
    }
}

/// User and command checks shared by `@period` and five-field lines.
/// Neither runs for a whitelisted user.
fn validate_action(user: &str, command: &str, log: &mut LogCounter, users: &Users<'_>) {
    if users.is_whitelisted(user) {
        return;
    }
    users.check(user, log);

    if command.starts_with('%') || BARE_PERCENT_RE.is_match(command) {
        log.line_warn(
            DiagnosticCategory::BarePercent,
            "A bare % is a line break in crontab and is commonly not intended.",
        );
    }
}
