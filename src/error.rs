//! Error taxonomy for the data manager.
//!
//! Every fallible core operation returns [`Result`]. Callers at the edges
//! (CLI, web layer) wrap these with `anyhow` context or map them onto HTTP
//! status codes.

use thiserror::Error;

/// Errors surfaced by the data manager core.
#[derive(Error, Debug)]
pub enum DataError {
    /// Configuration file missing, unreadable, or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The requested artifact has no registered search specification.
    #[error("no updater associated with artifact: {0}")]
    UnrecognizedArtifact(String),

    /// The cluster could not be reached or the request failed in transit.
    #[error("cluster unreachable: {0}")]
    Connectivity(#[from] reqwest::Error),

    /// The cluster answered with a non-success status.
    #[error("cluster returned {status}: {body}")]
    Remote { status: u16, body: String },

    /// A remote call did not complete within the caller's deadline.
    #[error("{0} timed out")]
    Timeout(String),

    /// Index creation was not acknowledged by the cluster.
    #[error("index creation for '{0}' was not acknowledged")]
    NotAcknowledged(String),

    /// The aggregation response did not have the expected structure.
    #[error("unexpected aggregation response: {0}")]
    UnexpectedShape(String),

    /// An import record had the wrong number of fields.
    #[error("invalid record shape: expected {expected} fields, found {found}")]
    RecordShape { expected: usize, found: usize },

    /// Import aborted at the given data record (1-based, header excluded).
    #[error("import aborted at record {record}: {source}")]
    Import {
        record: u64,
        #[source]
        source: Box<DataError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DataError>;
