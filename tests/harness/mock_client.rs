// tests/harness/mock_client.rs
//
// Mock IMAP client for testing.
// Records all commands for verification and serves them from a VirtualMailbox.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use imap_roadrunner::cfg::target::Target;
use imap_roadrunner::{
    BenchError, Connected, Connector, FetchedItem, MailSession, OperationError, SessionState,
};

use crate::harness::virtual_clock::VirtualClock;
use crate::harness::virtual_mailbox::VirtualMailbox;

/// Recorded command types for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedAction {
    Connect { address: String },
    Login { user: String },
    Select { mailbox: String, read_only: bool },
    Fetch { sequence: String, items: String },
    Search { criteria: String },
    Logout,
}

impl RecordedAction {
    pub fn is_fetch(&self) -> bool {
        matches!(self, RecordedAction::Fetch { .. })
    }

    pub fn is_search(&self) -> bool {
        matches!(self, RecordedAction::Search { .. })
    }
}

type Actions = Arc<RwLock<Vec<RecordedAction>>>;

/// Hands out `MockSession`s over a shared `VirtualMailbox`.
pub struct MockConnector {
    mailbox: Arc<RwLock<VirtualMailbox>>,
    clock: VirtualClock,
    actions: Actions,
    user: String,
    password: String,
    refuse: bool,
    reported_count: Option<u32>,
    sever_after: Option<usize>,
    fetch_latency: Duration,
    search_latency: Duration,
}

impl MockConnector {
    /// Accepts `alice` / `secret`; fetches take 10ms and searches 5ms.
    pub fn new(mailbox: Arc<RwLock<VirtualMailbox>>, clock: VirtualClock) -> Self {
        Self {
            mailbox,
            clock,
            actions: Arc::new(RwLock::new(Vec::new())),
            user: "alice".to_string(),
            password: "secret".to_string(),
            refuse: false,
            reported_count: None,
            sever_after: None,
            fetch_latency: Duration::from_millis(10),
            search_latency: Duration::from_millis(5),
        }
    }

    /// Refuse every connection at the transport level.
    pub fn refusing(mut self) -> Self {
        self.refuse = true;
        self
    }

    /// Report `count` messages at SELECT regardless of what is stored.
    pub fn reporting_count(mut self, count: u32) -> Self {
        self.reported_count = Some(count);
        self
    }

    /// Drop the connection after `commands` FETCH/SEARCH commands per session.
    pub fn severing_after(mut self, commands: usize) -> Self {
        self.sever_after = Some(commands);
        self
    }

    pub fn with_latency(mut self, fetch: Duration, search: Duration) -> Self {
        self.fetch_latency = fetch;
        self.search_latency = search;
        self
    }

    // ===== Action Recording =====

    pub fn get_recorded_actions(&self) -> Vec<RecordedAction> {
        self.actions.read().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&RecordedAction) -> bool) -> usize {
        self.actions.read().unwrap().iter().filter(|a| predicate(a)).count()
    }

    pub fn logout_count(&self) -> usize {
        self.count(|a| *a == RecordedAction::Logout)
    }

    pub fn connect_count(&self) -> usize {
        self.count(|a| matches!(a, RecordedAction::Connect { .. }))
    }

    fn record_action(&self, action: RecordedAction) {
        self.actions.write().unwrap().push(action);
    }
}

impl Connector for MockConnector {
    fn connect(&self, target: &Target) -> Result<Connected, BenchError> {
        let address = target.address();
        self.record_action(RecordedAction::Connect {
            address: address.clone(),
        });
        if self.refuse {
            return Err(BenchError::Connect {
                address,
                reason: "Connection refused (os error 111)".to_string(),
            });
        }

        let user = &target.credentials.user;
        self.record_action(RecordedAction::Login { user: user.clone() });
        if *user != self.user || target.credentials.password.unsecure() != self.password {
            return Err(BenchError::Auth {
                user: user.clone(),
                reason: "No Response: [AUTHENTICATIONFAILED] Invalid credentials".to_string(),
            });
        }

        let count = {
            let mailbox = self.mailbox.read().unwrap();
            if !mailbox.has_folder(&target.mailbox) {
                return Err(BenchError::EmptyMailbox {
                    folder: target.mailbox.clone(),
                    reason: "No Response: Mailbox doesn't exist".to_string(),
                });
            }
            mailbox.message_count(&target.mailbox)
        };
        self.record_action(RecordedAction::Select {
            mailbox: target.mailbox.clone(),
            read_only: target.read_only,
        });

        Ok(Connected {
            session: Box::new(MockSession {
                mailbox: Arc::clone(&self.mailbox),
                folder: target.mailbox.clone(),
                clock: self.clock.clone(),
                actions: Arc::clone(&self.actions),
                sever_after: self.sever_after,
                commands: 0,
                fetch_latency: self.fetch_latency,
                search_latency: self.search_latency,
                state: SessionState::MailboxSelected,
            }),
            message_count: self.reported_count.unwrap_or(count),
        })
    }
}

/// A session bound to one folder of the virtual mailbox.
pub struct MockSession {
    mailbox: Arc<RwLock<VirtualMailbox>>,
    folder: String,
    clock: VirtualClock,
    actions: Actions,
    sever_after: Option<usize>,
    commands: usize,
    fetch_latency: Duration,
    search_latency: Duration,
    state: SessionState,
}

impl MockSession {
    fn severed(&self) -> bool {
        self.sever_after.is_some_and(|limit| self.commands > limit)
    }

    fn begin_command(&mut self, action: RecordedAction) -> Result<(), OperationError> {
        self.actions.write().unwrap().push(action);
        self.commands += 1;
        if self.severed() {
            return Err(OperationError::Transport("connection reset by peer".to_string()));
        }
        Ok(())
    }
}

fn parse_sequence(sequence: &str) -> Result<(u32, u32), OperationError> {
    let invalid = || OperationError::Malformed(format!("Invalid sequence set '{}'", sequence));
    match sequence.split_once(':') {
        Some((start, end)) => Ok((
            start.parse().map_err(|_| invalid())?,
            end.parse().map_err(|_| invalid())?,
        )),
        None => {
            let id = sequence.parse().map_err(|_| invalid())?;
            Ok((id, id))
        }
    }
}

fn unquote(term: &str) -> String {
    let term = term.trim();
    let inner = term
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(term);
    inner.replace("\\\"", "\"").replace("\\\\", "\\")
}

impl MailSession for MockSession {
    fn state(&self) -> SessionState {
        self.state
    }

    fn fetch(&mut self, sequence_set: &str, items: &str) -> Result<Vec<FetchedItem>, OperationError> {
        self.begin_command(RecordedAction::Fetch {
            sequence: sequence_set.to_string(),
            items: items.to_string(),
        })?;
        self.clock.advance(self.fetch_latency);

        let (start, end) = parse_sequence(sequence_set)?;
        let mailbox = self.mailbox.read().unwrap();

        let mut out = Vec::new();
        for seq in start..=end {
            let message = mailbox
                .get(&self.folder, seq)
                .ok_or_else(|| OperationError::Rejected(format!("message {} does not exist", seq)))?;

            let mut literals = Vec::new();
            if items.contains("RFC822.HEADER") {
                literals.push(message.header().to_vec());
            }
            if items.contains("BODY.PEEK[]") || items.contains("BODY[]") {
                literals.push(message.raw.clone());
            }
            if items.contains("BODY.PEEK[TEXT]") {
                literals.push(message.body().to_vec());
            }
            out.push(FetchedItem { seq, literals });
        }
        Ok(out)
    }

    fn search(&mut self, criteria: &str) -> Result<Vec<u32>, OperationError> {
        self.begin_command(RecordedAction::Search {
            criteria: criteria.to_string(),
        })?;
        self.clock.advance(self.search_latency);

        let mailbox = self.mailbox.read().unwrap();
        let malformed = || OperationError::Malformed(format!("Could not parse SEARCH '{}'", criteria));

        let (range, rest) = match criteria.split_once(' ') {
            Some((first, rest)) if first.starts_with(|c: char| c.is_ascii_digit()) => {
                (parse_sequence(first)?, rest)
            }
            _ => ((1, mailbox.message_count(&self.folder)), criteria),
        };
        let (field, term) = rest.split_once(' ').ok_or_else(malformed)?;

        mailbox
            .search(&self.folder, range, field, &unquote(term))
            .ok_or_else(malformed)
    }

    fn logout(&mut self) -> Result<(), OperationError> {
        self.actions.write().unwrap().push(RecordedAction::Logout);
        self.state = SessionState::Closed;
        if self.severed() {
            return Err(OperationError::Transport("connection reset by peer".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sequence() {
        assert_eq!(parse_sequence("4").unwrap(), (4, 4));
        assert_eq!(parse_sequence("1:9").unwrap(), (1, 9));
        assert!(matches!(parse_sequence(""), Err(OperationError::Malformed(_))));
        assert!(parse_sequence("1:*").is_err());
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"ben\""), "ben");
        assert_eq!(unquote(r#""say \"hi\"""#), "say \"hi\"");
        assert_eq!(unquote("plain"), "plain");
    }

    #[test]
    fn test_recorded_action_helpers() {
        let fetch = RecordedAction::Fetch {
            sequence: "1".to_string(),
            items: "(FLAGS)".to_string(),
        };
        assert!(fetch.is_fetch());
        assert!(!fetch.is_search());
        assert!(RecordedAction::Search {
            criteria: "SUBJECT \"x\"".to_string()
        }
        .is_search());
    }
}
