//! Error types for the encoding fix library.
//!
//! Only run-aborting conditions live here. Individual ALTER or metadata-query
//! failures are recoverable and are collected into the
//! [`MigrationReport`](crate::MigrationReport) instead.

use thiserror::Error;

/// Fatal error type: any of these aborts the whole run.
#[derive(Error, Debug)]
pub enum FixError {
    /// Could not establish a connection to the MySQL server.
    #[error("Could not connect to MySQL at {host}:{port}: {source}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: sqlx::Error,
    },

    /// Connected, but the target database could not be selected.
    #[error("Cannot select database '{database}': {source}")]
    DatabaseSelect {
        database: String,
        #[source]
        source: sqlx::Error,
    },

    /// Invalid CLI input or configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error (report output).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FixError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            FixError::Config(_) | FixError::Json(_) => 1,
            FixError::Connection { .. } => 2,
            FixError::DatabaseSelect { .. } => 3,
        }
    }

    /// Format error with full details including the error chain.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\n\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for fatal operations.
pub type Result<T> = std::result::Result<T, FixError>;
