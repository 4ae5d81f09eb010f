// src/error.rs
//
// Error taxonomy for a benchmark run. Anything from the connector is fatal;
// operation errors are absorbed by the runner except where noted.

use thiserror::Error;

/// Fatal errors. Any of these ends the process with a non-zero status.
#[derive(Error, Debug)]
pub enum BenchError {
    /// The transport (TCP or TLS) could not be established.
    #[error("Could not connect to IMAP: {address}: {reason}")]
    Connect { address: String, reason: String },

    /// The server rejected the credentials.
    #[error("Cannot authenticate: {user}: {reason}")]
    Auth { user: String, reason: String },

    /// The mailbox could not be selected, so there is no message count to benchmark.
    #[error("Folder {folder} is unavailable ({reason}). Please check the mailbox exists and contains messages")]
    EmptyMailbox { folder: String, reason: String },

    /// A SEARCH could not be dispatched at all (malformed command or severed connection).
    #[error("Search '{command}' could not be dispatched: {source}")]
    SearchDispatch {
        command: String,
        #[source]
        source: OperationError,
    },

    /// Writing a result line failed.
    #[error("Failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

/// Failure of a single FETCH/SEARCH/LOGOUT call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// Server answered NO (e.g. message expunged mid-benchmark).
    #[error("server rejected command: {0}")]
    Rejected(String),

    /// Server answered BAD (command could not be parsed).
    #[error("server reported malformed command: {0}")]
    Malformed(String),

    /// The connection failed underneath the command.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl OperationError {
    /// Rejections are the only failures a SEARCH can recover from.
    pub fn is_recoverable_search(&self) -> bool {
        matches!(self, OperationError::Rejected(_))
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
