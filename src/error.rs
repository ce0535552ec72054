use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a run before the playlist is touched.
///
/// Nothing is written to the status file for these.
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("{} not found in environment", crate::config::TOKEN_ENV_VAR)]
    MissingToken,

    #[error("{} file not found!", .0.display())]
    FileNotFound(PathBuf),
}
