//! Error types for cascade-fs

use std::path::PathBuf;

/// Result type for cascade-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cascade-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {format} file {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("unsupported file format `{extension}`")]
    UnsupportedFormat { extension: String },

    #[error("template not found: {path}")]
    TemplateNotFound { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
