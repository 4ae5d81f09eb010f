// src/client_ops.rs
//
// Trait abstraction for the IMAP client capability the benchmark consumes.
// Production code dials a real server; tests plug in an in-memory mailbox.

use std::fmt;
use std::time::Instant;

use crate::cfg::target::Target;
use crate::error::{BenchError, OperationError};

/// Lifecycle of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
    MailboxSelected,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Authenticated => "authenticated",
            SessionState::MailboxSelected => "mailbox-selected",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// One untagged FETCH response, reduced to its literal payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedItem {
    pub seq: u32,
    pub literals: Vec<Vec<u8>>,
}

/// An authenticated session with a mailbox selected.
pub trait MailSession {
    fn state(&self) -> SessionState;

    /// `items` is the parenthesised FETCH attribute list.
    fn fetch(&mut self, sequence_set: &str, items: &str) -> Result<Vec<FetchedItem>, OperationError>;

    /// Returns matching sequence numbers in ascending order.
    fn search(&mut self, criteria: &str) -> Result<Vec<u32>, OperationError>;

    fn logout(&mut self) -> Result<(), OperationError>;
}

/// A freshly connected session and the selected mailbox's message count.
pub struct Connected {
    pub session: Box<dyn MailSession>,
    pub message_count: u32,
}

impl fmt::Debug for Connected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connected")
            .field("state", &self.session.state())
            .field("message_count", &self.message_count)
            .finish()
    }
}

/// Dials, authenticates and selects. A single attempt, no retries.
pub trait Connector {
    fn connect(&self, target: &Target) -> Result<Connected, BenchError>;
}

/// Monotonic time source, so tests can control elapsed durations.
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> Instant;
}

/// Real clock implementation using `Instant::now`.
#[derive(Clone, Default)]
pub struct RealClock;

impl Clock for RealClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
