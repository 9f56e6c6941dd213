//! Error types for loading, discretizing and writing measurement tables.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum DiscretizeError {
    #[error("cannot open '{}': {source}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {context}: {message}")]
    Parse { context: String, message: String },

    #[error("feature count mismatch: {left} features vs {right} features")]
    ShapeMismatch { left: usize, right: usize },

    #[error("feature order mismatch at column {position}: '{left}' vs '{right}'")]
    FeatureMismatch {
        position: usize,
        left: String,
        right: String,
    },

    #[error("unknown feature '{0}'")]
    UnknownFeature(String),

    #[error("formula error: {0}")]
    Formula(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DiscretizeError {
    pub(crate) fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        DiscretizeError::Parse {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, DiscretizeError>;
