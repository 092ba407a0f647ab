// src/error.rs
use thiserror::Error;

/// Why a worksheet could not be loaded.
///
/// Every variant carries a readable cause, and `Display` prints only that
/// cause so the panel can show one message regardless of the kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Missing or rejected credentials.
    #[error("{0}")]
    Auth(String),

    /// Spreadsheet key or worksheet title did not resolve.
    #[error("{0}")]
    NotFound(String),

    /// Network or service failure.
    #[error("{0}")]
    Transport(String),
}

impl LoadError {
    /// Short label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::Auth(_) => "auth",
            LoadError::NotFound(_) => "not_found",
            LoadError::Transport(_) => "transport",
        }
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("{0}")]
    CsvError(#[from] csv::Error),

    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("export task failed: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}
