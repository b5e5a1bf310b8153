use std::io;
use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use tracing::warn;

use crate::checker::Checker;
use crate::config::Config;
use crate::error::CheckError;
use crate::log::Report;
use crate::users::{PasswdResolver, UserResolver};
use crate::Result;

/// Checks crontab files on a tokio runtime.
///
/// Files are read with `tokio::fs`; the line checks run on the blocking
/// pool since user lookups may read the passwd database.
pub struct AsyncChecker<R = PasswdResolver> {
    inner: Arc<Checker<R>>,
}

impl<R> Clone for AsyncChecker<R> {
    fn clone(&self) -> Self {
        AsyncChecker {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AsyncChecker<PasswdResolver> {
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Self {
        AsyncChecker::from_checker(Checker::from_config(config))
    }
}

impl Default for AsyncChecker<PasswdResolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> AsyncChecker<R>
where
    R: UserResolver + 'static,
{
    pub fn from_checker(checker: Checker<R>) -> Self {
        AsyncChecker {
            inner: Arc::new(checker),
        }
    }

    /// Check a single file.
    pub async fn check_path(&self, path: impl AsRef<Path>) -> Result<Report> {
        let path = path.as_ref().to_path_buf();
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(self.inner.missing(&path));
            }
            Err(source) => return Err(CheckError::Io { path, source }),
        };

        let checker = Arc::clone(&self.inner);
        let worker_path = path.clone();
        tokio::task::spawn_blocking(move || {
            let contents = String::from_utf8_lossy(&bytes);
            checker.check_contents(&worker_path, &contents)
        })
        .await
        .map_err(|err| {
            warn!(path = %path.display(), %err, "check task failed");
            CheckError::Worker(path)
        })
    }

    /// Check all files concurrently. Results are in input order.
    pub async fn check_paths<P>(&self, paths: &[P]) -> Vec<Result<Report>>
    where
        P: AsRef<Path>,
    {
        join_all(paths.iter().map(|path| self.check_path(path))).await
    }
}
