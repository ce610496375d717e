// admin/error.rs - errors that end an admin command

use allowlist_database::{CredentialsError, CsvError, StoreError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("{0}")]
    Usage(String),

    #[error("Failed to load config file {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error(
        "Service account key not found: {}\nDownload a service account key from the Firebase console and place it at that path:\n{console_url}",
        .path.display()
    )]
    MissingCredentials { path: PathBuf, console_url: String },

    #[error("Failed to initialize Firestore: {0}")]
    Credentials(#[from] CredentialsError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Csv(#[from] CsvError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to set up logging: {0}")]
    Tracing(String),
}
