//! # chkcrontab
//!
//! A static checker for crontab files.
//!
//! ## Usage
//!
//! Add chkcrontab crate to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! chkcrontab = "0.1"
//! ```
//!
//! The checker understands the system crontab format used by `/etc/crontab`
//! and `/etc/cron.d`, where every job line names the user it runs as:
//!
//! ```text
//! min   hour   day of month   month   day of week   user   command
//! *     *      *              *       *             root   /usr/bin/true
//! @period                                           user   command
//! ```
//!
//! Each line is classified, validated, and its findings are reported as
//! errors or warnings. The overall [`Verdict`] is `0` for a clean file, `1`
//! when there are only warnings and `2` when there is at least one error.
//!
//! Findings can be switched off from inside the file. The directive applies
//! to the lines that follow it:
//!
//! ```text
//! # chkcrontab: disable-msg=USER_NOT_FOUND
//! * * * * * appuser /opt/app/bin/tick
//! # chkcrontab: enable-msg=USER_NOT_FOUND
//! ```
//!
//! A simple example:
//!
//! ```rust,no_run
//! use chkcrontab::{Checker, Config};
//!
//! fn main() -> chkcrontab::Result<()> {
//!     let checker = Checker::from_config(&Config::default().whitelist_user("deploy"));
//!     let report = checker.check_path("/etc/cron.d/backup")?;
//!
//!     print!("{}", report);
//!     std::process::exit(report.verdict().code());
//! }
//! ```
//!
//! Async example:
//! ```rust,ignore
//! use chkcrontab::AsyncChecker;
//!
//! #[tokio::main]
//! async fn main() {
//!     let checker = AsyncChecker::new();
//!     for result in checker.check_paths(&["/etc/crontab", "/etc/cron.d/backup"]).await {
//!         match result {
//!             Ok(report) => print!("{}", report),
//!             Err(err) => eprintln!("{}", err),
//!         }
//!     }
//! }
//! ```
//!
//! The time-field grammar and value checks are usable on their own:
//!
//! ```rust
//! use chkcrontab::{diagnose, parse, Field};
//!
//! let outcome = parse("0-61/2");
//! assert!(outcome.is_ok());
//! let messages = diagnose(&outcome.tokens[0], Field::Minute.limit());
//! assert_eq!(messages, vec!["61 is too high for field \"minute\" (0-61/2)"]);
//! ```

#[cfg(feature = "async")]
mod async_checker;
#[cfg(feature = "sync")]
mod batch;
mod category;
mod checker;
mod config;
mod diagnose;
mod error;
mod fsm;
mod limits;
mod line;
mod log;
mod token;
mod users;

#[cfg(feature = "async")]
pub use crate::async_checker::AsyncChecker;
pub use crate::{
    category::DiagnosticCategory,
    checker::{filename_is_valid, Checker},
    config::Config,
    diagnose::diagnose,
    error::CheckError,
    fsm::{parse, ParseError, ParseOutcome},
    limits::{Field, FieldLimit, FIELD_LIMITS},
    line::{classify, CronLine, AT_PERIODS},
    log::{Entry, Finding, LineReport, LogCounter, Report, Severity, Verdict},
    token::TimeToken,
    users::{PasswdResolver, StaticResolver, UserLookup, UserResolver, Users, DEFAULT_WHITELIST},
};

pub type Result<T> = std::result::Result<T, CheckError>;

/// Checks one file with the default settings plus `extra_users` on the
/// whitelist, and returns its verdict.
pub fn check<P, I, S>(path: P, extra_users: I) -> Result<Verdict>
where
    P: AsRef<std::path::Path>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let config = Config::default().whitelist_users(extra_users);
    let report = Checker::from_config(&config).check_path(path)?;
    Ok(report.verdict())
}
