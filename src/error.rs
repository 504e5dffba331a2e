use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("graph has no nodes")]
    InvalidGraph,

    #[error("invalid parameter {name}={value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("malformed edge record at line {line}: {reason}")]
    MalformedEdgeRecord { line: usize, reason: String },

    #[error("cannot read edge source {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_parameter(name: &'static str, value: impl ToString) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }
}
