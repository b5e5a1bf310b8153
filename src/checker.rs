//! Runs the line checks over whole files.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::CheckError;
use crate::line::classify;
use crate::log::{LogCounter, Report};
use crate::users::{PasswdResolver, UserResolver, Users};
use crate::Result;

/// Characters cron accepts in the name of a file under `/etc/cron.d`.
static UNSAFE_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());

/// Names that are expected to be post-processed, or that belong to cron
/// setups which do accept dots.
static NAME_WHITELIST: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"\.in$", r"\.cron$", r"\.disabled$", r"^(\S+\.)?cron\.d$"]
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap())
        .collect()
});

/// Whether cron would read a file with this base name.
pub fn filename_is_valid(name: &str) -> bool {
    !UNSAFE_NAME_RE.is_match(name) || NAME_WHITELIST.iter().any(|re| re.is_match(name))
}

/// Checks crontab files.
///
/// A checker holds only settings. Each file gets a fresh [`LogCounter`],
/// so `disable-msg` directives never leak from one file into another.
///
/// # Examples
///
/// ```rust
/// use chkcrontab::{Checker, Config, StaticResolver, Verdict};
///
/// let resolver: StaticResolver = ["root"].into_iter().collect();
/// let checker = Checker::with_resolver(&Config::default(), resolver);
///
/// let report = checker.check_str("*/5 * * * * root /usr/bin/true\n");
/// assert_eq!(report.verdict(), Verdict::Clean);
///
/// let report = checker.check_str("FOO=$HOME\n");
/// assert_eq!(report.verdict(), Verdict::Warnings);
/// ```
#[derive(Debug)]
pub struct Checker<R = PasswdResolver> {
    whitelist: HashSet<String>,
    resolver: R,
    check_filename: bool,
}

impl Checker<PasswdResolver> {
    /// Checker with default settings, resolving users from `/etc/passwd`.
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Self {
        let resolver = PasswdResolver::new(config.passwd_path.clone());
        Self::with_resolver(config, resolver)
    }
}

impl Default for Checker<PasswdResolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Checker<R>
where
    R: UserResolver,
{
    pub fn with_resolver(config: &Config, resolver: R) -> Self {
        Checker {
            whitelist: config.whitelist.iter().cloned().collect(),
            resolver,
            check_filename: config.check_filename,
        }
    }

    pub fn whitelist_user(&mut self, user: impl Into<String>) {
        self.whitelist.insert(user.into());
    }

    fn users(&self) -> Users<'_> {
        Users {
            whitelist: &self.whitelist,
            resolver: &self.resolver,
        }
    }

    /// Checks crontab text that did not come from a file.
    pub fn check_str(&self, contents: &str) -> Report {
        let mut log = LogCounter::new();
        self.check_lines(contents, &mut log);
        log.into_report()
    }

    /// Checks the file at `path`.
    ///
    /// A missing file is not an error: it yields a report holding a single
    /// file-level error. Other read failures are returned as
    /// [`CheckError::Io`].
    pub fn check_path(&self, path: impl AsRef<Path>) -> Result<Report> {
        let path = path.as_ref();
        match fs::read(path) {
            Ok(bytes) => Ok(self.check_contents(path, &String::from_utf8_lossy(&bytes))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(self.missing(path)),
            Err(source) => Err(CheckError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub(crate) fn missing(&self, path: &Path) -> Report {
        info!(path = %path.display(), "crontab does not exist");
        let mut log = LogCounter::new();
        log.error(format!("File \"{}\" does not exist.", path.display()));
        log.into_report()
    }

    pub(crate) fn check_contents(&self, path: &Path, contents: &str) -> Report {
        info!(path = %path.display(), "checking crontab");
        let mut log = LogCounter::new();

        if self.check_filename {
            if let Some(name) = path.file_name() {
                if !filename_is_valid(&name.to_string_lossy()) {
                    log.warn("Cron will not process this file - its name must match [A-Za-z0-9_-]+ .");
                }
            }
        }

        self.check_lines(contents, &mut log);
        info!(
            path = %path.display(),
            errors = log.error_count(),
            warnings = log.warn_count(),
            "finished crontab"
        );
        log.into_report()
    }

    fn check_lines(&self, contents: &str, log: &mut LogCounter) {
        let users = self.users();
        for (idx, raw) in contents.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            let cron_line = classify(line);
            debug!(line_no, kind = cron_line.kind(), "classified line");
            cron_line.validate(log, &users);
            log.flush(line_no, line);
        }
    }
}
