//! Checker settings.

use std::path::PathBuf;

use crate::users::DEFAULT_WHITELIST;

/// Settings for a [`Checker`](crate::Checker).
///
/// # Examples
///
/// ```rust
/// use chkcrontab::Config;
///
/// let config = Config::new()
///     .whitelist_user("deploy")
///     .passwd_path("/srv/chroot/etc/passwd")
///     .check_filename(false);
/// assert!(config.whitelist.iter().any(|u| u == "deploy"));
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    /// Users that are never looked up or validated.
    pub whitelist: Vec<String>,
    /// passwd-format file used to decide whether a user exists.
    pub passwd_path: PathBuf,
    /// Warn when cron would skip the file because of its name.
    pub check_filename: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            whitelist: DEFAULT_WHITELIST.iter().map(|u| u.to_string()).collect(),
            passwd_path: PathBuf::from("/etc/passwd"),
            check_filename: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn whitelist_user(mut self, user: impl Into<String>) -> Self {
        self.whitelist.push(user.into());
        self
    }

    pub fn whitelist_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist.extend(users.into_iter().map(Into::into));
        self
    }

    pub fn passwd_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.passwd_path = path.into();
        self
    }

    pub fn check_filename(mut self, enabled: bool) -> Self {
        self.check_filename = enabled;
        self
    }
}
