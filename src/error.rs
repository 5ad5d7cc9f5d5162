use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("'{}' is not a directory", path.display())]
    InvalidInput { path: PathBuf },

    #[error("Merge of day '{day}' failed: {reason}")]
    MergeInvocation { day: String, reason: String },

    #[error("Clip '{}' has no numeric sequence suffix", path.display())]
    UnorderedClip { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MergeError>;
