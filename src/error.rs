use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Bad format token or option value. Argument arity is rejected by clap
    /// before this is ever constructed.
    #[error("{0}")]
    Usage(String),

    #[error("cannot access '{}': no such file", .0.display())]
    FileNotFound(PathBuf),

    #[error("cannot parse '{}': {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("cannot create directory '{}': {reason}", .path.display())]
    DirectoryCreate { path: PathBuf, reason: String },

    #[error("interrupted")]
    Interrupted,
}

impl Error {
    pub(crate) fn parse(path: &Path, reason: impl Into<String>) -> Self {
        Error::Parse {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub(crate) fn directory_create(path: &Path, reason: impl Into<String>) -> Self {
        Error::DirectoryCreate {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
