//! Checking several files on worker threads.

use std::path::Path;
use std::thread;

use tracing::debug;

use crate::checker::Checker;
use crate::error::CheckError;
use crate::log::Report;
use crate::users::UserResolver;
use crate::Result;

impl<R> Checker<R>
where
    R: UserResolver,
{
    /// Checks every path and returns the results in input order.
    ///
    /// Files are spread over at most one worker per available core. Each
    /// file is checked independently, exactly as [`check_path`] would.
    ///
    /// [`check_path`]: Checker::check_path
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chkcrontab::{Checker, Config, StaticResolver, Verdict};
    ///
    /// let checker = Checker::with_resolver(&Config::default(), StaticResolver::default());
    /// let results = checker.check_paths(&["/nonexistent/a", "/nonexistent/b"]);
    /// assert_eq!(results.len(), 2);
    /// assert_eq!(results[0].as_ref().unwrap().verdict(), Verdict::Errors);
    /// ```
    pub fn check_paths<P>(&self, paths: &[P]) -> Vec<Result<Report>>
    where
        P: AsRef<Path> + Sync,
    {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(paths.len())
            .max(1);
        debug!(files = paths.len(), workers, "checking crontabs");

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, &Path)>();
        let (done_tx, done_rx) = crossbeam_channel::unbounded();

        for (idx, path) in paths.iter().enumerate() {
            // The receiver is alive until the end of this function.
            let _ = job_tx.send((idx, path.as_ref()));
        }
        drop(job_tx);

        thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let done_tx = done_tx.clone();
                scope.spawn(move || {
                    for (idx, path) in job_rx.iter() {
                        if done_tx.send((idx, self.check_path(path))).is_err() {
                            return;
                        }
                    }
                });
            }
        });
        drop(done_tx);

        let mut results: Vec<Option<Result<Report>>> = paths.iter().map(|_| None).collect();
        for (idx, result) in done_rx.iter() {
            results[idx] = Some(result);
        }

        results
            .into_iter()
            .zip(paths)
            .map(|(result, path)| {
                result.unwrap_or_else(|| Err(CheckError::Worker(path.as_ref().to_path_buf())))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::log::Verdict;
    use crate::users::StaticResolver;
    use std::fs;

    #[test]
    fn test_results_keep_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for (i, contents) in ["* * * * * root true\n", "FOO=$BAR\n", "junk\n"]
            .iter()
            .enumerate()
        {
            let path = dir.path().join(format!("tab{}", i));
            fs::write(&path, contents).unwrap();
            paths.push(path);
        }
        paths.push(dir.path().join("missing"));

        let checker = Checker::with_resolver(&Config::default(), StaticResolver::from_iter(["root"]));
        let verdicts: Vec<Verdict> = checker
            .check_paths(&paths)
            .into_iter()
            .map(|r| r.unwrap().verdict())
            .collect();
        assert_eq!(
            verdicts,
            vec![Verdict::Clean, Verdict::Warnings, Verdict::Errors, Verdict::Errors]
        );
    }

    #[test]
    fn test_empty_batch() {
        let checker = Checker::with_resolver(&Config::default(), StaticResolver::default());
        let paths: Vec<&str> = Vec::new();
        assert!(checker.check_paths(&paths).is_empty());
    }

    #[test]
    fn test_suppression_does_not_cross_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        fs::write(&first, "# chkcrontab: disable-msg=SHELL_VAR\nFOO=$BAR\n").unwrap();
        fs::write(&second, "FOO=$BAR\n").unwrap();

        let checker = Checker::with_resolver(&Config::default(), StaticResolver::default());
        let results = checker.check_paths(&[first, second]);
        assert_eq!(results[0].as_ref().unwrap().verdict(), Verdict::Clean);
        assert_eq!(results[1].as_ref().unwrap().verdict(), Verdict::Warnings);
    }
}
