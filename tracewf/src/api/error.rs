use thiserror::Error;

use crate::dag::DagError;

pub type Result<T> = core::result::Result<T, ConvertError>;

/// Fatal conditions of a converter run.
///
/// Row rejections, link timeouts and cyclic encodings are not errors; they
/// are reported through [`crate::api::function::Verdict`] and
/// [`crate::dag::linker::LinkResult`].
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("trace line {line}: {message}")]
    Parse { line: u64, message: String },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Dag(#[from] DagError),
}

impl ConvertError {
    pub fn parse(line: u64, message: impl Into<String>) -> Self {
        ConvertError::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ConvertError::Config(message.into())
    }
}

impl From<serde_yaml::Error> for ConvertError {
    fn from(e: serde_yaml::Error) -> Self {
        ConvertError::Config(e.to_string())
    }
}
