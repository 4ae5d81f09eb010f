// src/operation.rs
//
// What gets measured: sequence sets, fetch attribute lists, and the fixed
// per-cycle battery of operations.

use std::fmt;

pub const DEFAULT_SUBJECT_TERM: &str = "ben";
pub const DEFAULT_BODY_TERM: &str = "nova";
pub const DEFAULT_CYCLES: u32 = 3;

/// Message sequence numbers targeted by one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceSet {
    Single(u32),
    Range { start: u32, end: u32 },
    /// The range of an empty mailbox. Renders as an empty string.
    Empty,
}

impl SequenceSet {
    /// `1:count`, or `Empty` when the mailbox holds nothing.
    pub fn all(count: u32) -> Self {
        if count == 0 {
            SequenceSet::Empty
        } else {
            SequenceSet::Range { start: 1, end: count }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SequenceSet::Empty)
    }
}

impl fmt::Display for SequenceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SequenceSet::Single(id) => write!(f, "{}", id),
            SequenceSet::Range { start, end } if start == end => write!(f, "{}", start),
            SequenceSet::Range { start, end } => write!(f, "{}:{}", start, end),
            SequenceSet::Empty => Ok(()),
        }
    }
}

/// FETCH data items, rendered as a parenthesised list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchItems(Vec<String>);

impl FetchItems {
    /// Returns `None` for an empty list; a FETCH needs at least one item.
    pub fn new<I, S>(items: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items
            .into_iter()
            .map(Into::into)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if items.is_empty() {
            None
        } else {
            Some(FetchItems(items))
        }
    }

    /// Date, flags, size and the whole message, without setting \Seen.
    pub fn full_message() -> Self {
        FetchItems(
            ["INTERNALDATE", "FLAGS", "RFC822.SIZE", "BODY.PEEK[]"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    /// Date, flags, size and the header block only.
    pub fn header_only() -> Self {
        FetchItems(
            ["INTERNALDATE", "FLAGS", "RFC822.SIZE", "RFC822.HEADER"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}

impl fmt::Display for FetchItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(" "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    FetchOne,
    FetchRange,
    FetchHeaders,
    Search,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::FetchOne => "fetch-one",
            OperationKind::FetchRange => "fetch-range",
            OperationKind::FetchHeaders => "fetch-headers",
            OperationKind::Search => "search",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Fetch(FetchItems),
    Search { field: String, term: String },
}

/// One command of the battery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSpec {
    pub kind: OperationKind,
    pub sequence: SequenceSet,
    pub request: Request,
}

impl OperationSpec {
    pub fn fetch(kind: OperationKind, sequence: SequenceSet, items: FetchItems) -> Self {
        OperationSpec {
            kind,
            sequence,
            request: Request::Fetch(items),
        }
    }

    pub fn search(sequence: SequenceSet, field: &str, term: &str) -> Self {
        OperationSpec {
            kind: OperationKind::Search,
            sequence,
            request: Request::Search {
                field: field.to_string(),
                term: term.to_string(),
            },
        }
    }

    /// SEARCH criteria, scoped to the sequence set unless it is empty.
    pub fn search_criteria(&self) -> Option<String> {
        match &self.request {
            Request::Search { field, term } => {
                let key = format!("{} {}", field, quote(term));
                if self.sequence.is_empty() {
                    Some(key)
                } else {
                    Some(format!("{} {}", self.sequence, key))
                }
            }
            Request::Fetch(_) => None,
        }
    }

    /// The command as issued; used as the operation label in reports.
    pub fn command(&self) -> String {
        match &self.request {
            Request::Fetch(items) => format!("FETCH {} {}", self.sequence, items),
            Request::Search { .. } => {
                format!("SEARCH {}", self.search_criteria().unwrap_or_default())
            }
        }
    }
}

/// IMAP quoted string.
fn quote(term: &str) -> String {
    format!("\"{}\"", term.replace('\\', "\\\\").replace('"', "\\\""))
}

/// What one cycle runs, independent of the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchPlan {
    pub cycles: u32,
    pub subject_term: String,
    pub body_term: String,
    pub full_items: FetchItems,
    pub header_items: FetchItems,
}

impl Default for BenchPlan {
    fn default() -> Self {
        BenchPlan {
            cycles: DEFAULT_CYCLES,
            subject_term: DEFAULT_SUBJECT_TERM.to_string(),
            body_term: DEFAULT_BODY_TERM.to_string(),
            full_items: FetchItems::full_message(),
            header_items: FetchItems::header_only(),
        }
    }
}

impl BenchPlan {
    /// The fixed battery for a mailbox of `message_count` messages, in order:
    /// one full fetch per message, a full range fetch, a header-only range
    /// fetch, a SUBJECT search and a BODY search. Always `message_count + 4` long.
    pub fn battery(&self, message_count: u32) -> Vec<OperationSpec> {
        let range = SequenceSet::all(message_count);

        let mut specs: Vec<OperationSpec> = (1..=message_count)
            .map(|id| {
                OperationSpec::fetch(
                    OperationKind::FetchOne,
                    SequenceSet::Single(id),
                    self.full_items.clone(),
                )
            })
            .collect();

        specs.push(OperationSpec::fetch(
            OperationKind::FetchRange,
            range,
            self.full_items.clone(),
        ));
        specs.push(OperationSpec::fetch(
            OperationKind::FetchHeaders,
            range,
            self.header_items.clone(),
        ));
        specs.push(OperationSpec::search(range, "SUBJECT", &self.subject_term));
        specs.push(OperationSpec::search(range, "BODY", &self.body_term));
        specs
    }
}
