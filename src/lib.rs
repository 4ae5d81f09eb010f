// src/lib.rs
//
// Library entry point for imap-roadrunner.
// Re-exports modules needed by integration tests.

pub mod benchmark;
pub mod cfg;
pub mod cli;
pub mod client_ops;
pub mod error;
pub mod imap_client;
pub mod operation;
pub mod report;
pub mod runner;

pub use benchmark::{CycleSummary, Roadrunner};
pub use client_ops::{Clock, Connected, Connector, FetchedItem, MailSession, RealClock, SessionState};
pub use error::{BenchError, OperationError};
