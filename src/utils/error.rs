//! The `error` module defines the error types used within `subsink`.
//!
//! Every failure here is local to a single message: the sink reports it and
//! moves on to the next delivery.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while expanding templates or writing a message out.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The wall clock could not be read.
    #[error("error obtaining system time")]
    ClockUnavailable,

    /// A component of the target path exists but is not a directory.
    #[error("path component is not a directory: {0}")]
    PathNotADirectory(PathBuf),

    #[error("cannot create directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot open outfile {path}: {source}")]
    FileOpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write failed: {0}")]
    Write(#[from] io::Error),

    /// A token named a value that is not configured (e.g. `topic7` with three subscriptions).
    #[error("token '{0}' has no value")]
    TokenNotFound(String),
}

pub type Result<T> = std::result::Result<T, OutputError>;

/// Errors that end a subscriber session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no topics to subscribe to")]
    NoTopics,

    #[error("subscribe request failed: {0}")]
    Subscribe(#[from] rumqttc::ClientError),
}
