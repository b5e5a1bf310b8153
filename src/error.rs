use std::path::PathBuf;

use thiserror;

#[derive(thiserror::Error, Debug)]
pub enum CheckError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("\"{0}\" is an unknown message category")]
    UnknownCategory(String),
    #[error("Worker stopped before checking {0}")]
    Worker(PathBuf),
}
