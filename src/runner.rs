// src/runner.rs
//
// Times a single operation against a session and reduces the response to a
// (bytes, elapsed) record.

use log::{debug, warn};
use std::time::Duration;

use crate::client_ops::{Clock, FetchedItem, MailSession};
use crate::error::{BenchError, OperationError};
use crate::operation::{OperationKind, OperationSpec, Request};

/// Outcome of one executed operation. Handed to the reporter and dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub cycle: u32,
    /// Stringified sequence set the operation targeted.
    pub sequence: String,
    pub bytes: usize,
    pub elapsed: Duration,
    /// The command as issued.
    pub label: String,
    pub kind: OperationKind,
    /// Set when a recoverable error produced a zero-size record.
    pub error: Option<OperationError>,
}

/// Concatenate every literal of the first response item and return the length.
pub fn reduce_fetch(items: &[FetchedItem]) -> usize {
    let Some(first) = items.first() else {
        return 0;
    };
    let mut buf: Vec<u8> = Vec::new();
    for literal in &first.literals {
        buf.extend_from_slice(literal);
    }
    buf.len()
}

/// Size of the untagged SEARCH data, i.e. the space-separated id list.
pub fn reduce_search(ids: &[u32]) -> usize {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" ")
        .len()
}

/// Execute one operation and time it.
///
/// FETCH failures and SEARCH rejections are logged and yield a zero-size
/// record. A SEARCH that cannot be dispatched (BAD or a dead connection) is
/// returned as `BenchError::SearchDispatch`.
pub fn run_operation<C: Clock>(
    session: &mut dyn MailSession,
    spec: &OperationSpec,
    cycle: u32,
    clock: &C,
) -> Result<ResultRecord, BenchError> {
    let sequence = spec.sequence.to_string();
    let label = spec.command();

    let start = clock.now();
    let (bytes, error) = match &spec.request {
        Request::Fetch(items) => match session.fetch(&sequence, &items.to_string()) {
            Ok(fetched) => (reduce_fetch(&fetched), None),
            Err(e) => {
                warn!("Message {} could not be retrieved: {}", sequence, e);
                (0, Some(e))
            }
        },
        Request::Search { .. } => {
            let criteria = spec.search_criteria().unwrap_or_default();
            match session.search(&criteria) {
                Ok(ids) => (reduce_search(&ids), None),
                Err(e) if e.is_recoverable_search() => {
                    warn!("Search '{}' was rejected: {}", criteria, e);
                    (0, Some(e))
                }
                Err(e) => {
                    return Err(BenchError::SearchDispatch {
                        command: label,
                        source: e,
                    })
                }
            }
        }
    };
    let elapsed = clock.now().saturating_duration_since(start);

    debug!("[{}] {} => {} bytes in {:?}", spec.kind, label, bytes, elapsed);
    Ok(ResultRecord {
        cycle,
        sequence,
        bytes,
        elapsed,
        label,
        kind: spec.kind,
        error,
    })
}
