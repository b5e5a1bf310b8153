//! User name checks for schedule lines.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use tracing::{debug, warn};

use crate::category::DiagnosticCategory;
use crate::log::LogCounter;

/// Accounts that packages commonly create on install, so a missing one is
/// not worth a warning.
pub const DEFAULT_WHITELIST: &[&str] = &["postgres", "buildbot"];

/// Longest user name cron accepts.
const MAX_USER_LEN: usize = 31;

static INVALID_USER_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r##"[\s!"#$%&'()*+,/:;<=>?@\[\\\]^`{|}~]"##).unwrap());

/// Outcome of looking a user up on the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserLookup {
    Found,
    NotFound,
}

/// Answers whether an account exists.
pub trait UserResolver: Send + Sync {
    fn lookup(&self, name: &str) -> UserLookup;
}

/// Resolves users from a passwd-format file, read once on first lookup.
///
/// A file that cannot be read resolves nothing, so every user is reported
/// as not found.
#[derive(Debug)]
pub struct PasswdResolver {
    path: PathBuf,
    names: OnceCell<HashSet<String>>,
}

impl PasswdResolver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PasswdResolver {
            path: path.into(),
            names: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn names(&self) -> &HashSet<String> {
        self.names.get_or_init(|| match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let names = parse_passwd(&contents);
                debug!(path = %self.path.display(), count = names.len(), "loaded accounts");
                names
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "cannot read account database");
                HashSet::new()
            }
        })
    }
}

impl Default for PasswdResolver {
    fn default() -> Self {
        PasswdResolver::new("/etc/passwd")
    }
}

impl UserResolver for PasswdResolver {
    fn lookup(&self, name: &str) -> UserLookup {
        if self.names().contains(name) {
            UserLookup::Found
        } else {
            UserLookup::NotFound
        }
    }
}

fn parse_passwd(contents: &str) -> HashSet<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split(':').next())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolver over a fixed set of names.
#[derive(Clone, Debug, Default)]
pub struct StaticResolver {
    names: HashSet<String>,
}

impl<S: Into<String>> FromIterator<S> for StaticResolver {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        StaticResolver {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl UserResolver for StaticResolver {
    fn lookup(&self, name: &str) -> UserLookup {
        if self.names.contains(name) {
            UserLookup::Found
        } else {
            UserLookup::NotFound
        }
    }
}

/// Whitelist plus resolver, as used by one checker.
pub struct Users<'a> {
    pub whitelist: &'a HashSet<String>,
    pub resolver: &'a dyn UserResolver,
}

impl Users<'_> {
    pub fn is_whitelisted(&self, user: &str) -> bool {
        self.whitelist.contains(user)
    }

    /// Validates the user column of a schedule line.
    ///
    /// Malformed names are errors. A well-formed name that does not resolve
    /// is only a warning, since the account may be created later.
    pub fn check(&self, user: &str, log: &mut LogCounter) {
        if self.is_whitelisted(user) {
            return;
        }
        if user.chars().count() > MAX_USER_LEN {
            log.line_error(
                DiagnosticCategory::InvalidUser,
                format!("Username too long \"{}\"", user),
            );
        } else if user.starts_with('-') || INVALID_USER_CHARS.is_match(user) {
            log.line_error(
                DiagnosticCategory::InvalidUser,
                format!("Invalid username \"{}\"", user),
            );
        } else if self.resolver.lookup(user) == UserLookup::NotFound {
            log.line_warn(
                DiagnosticCategory::UserNotFound,
                format!("User \"{}\" not found.", user),
            );
        }
    }
}
