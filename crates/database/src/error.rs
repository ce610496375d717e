// database/error.rs - error types for the store, CSV import and credential loading

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to send request to the document store: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Document store returned {status}: {body}")]
    Status { status: http::StatusCode, body: String },

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Malformed document for domain \"{domain_id}\": {reason}")]
    MalformedDocument { domain_id: String, reason: String },

    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("CSV file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read CSV file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV file: {0}")]
    Parse(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("Service account key not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read service account key {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid service account key: {0}")]
    InvalidKey(#[from] serde_json::Error),

    #[error("Invalid Firestore endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Service account key has no project_id and none was configured")]
    MissingProject,

    #[error("Failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Failed to exchange token assertion: {0}")]
    TokenRequest(#[from] reqwest::Error),

    #[error("Token endpoint returned {status}: {body}")]
    TokenRejected { status: http::StatusCode, body: String },
}
