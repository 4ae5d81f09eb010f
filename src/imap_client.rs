// src/imap_client.rs
//
// The `Connector`/`MailSession` seam implemented over the `imap` crate,
// on plain TCP or on native-tls with verification turned off.

use imap::{Client, Session};
use log::{debug, info};
use native_tls::TlsConnector;
use std::io::{Read, Write};
use std::net::TcpStream;

use crate::cfg::target::{Target, Transport};
use crate::client_ops::{Connected, Connector, FetchedItem, MailSession, SessionState};
use crate::error::{BenchError, OperationError};

fn operation_error(err: imap::error::Error) -> OperationError {
    use imap::error::Error;

    match err {
        Error::No(msg) => OperationError::Rejected(msg),
        Error::Bad(msg) => OperationError::Malformed(msg),
        Error::Validate(e) => OperationError::Malformed(e.to_string()),
        other => OperationError::Transport(other.to_string()),
    }
}

/// Certificate and hostname checks are both disabled so self-signed test
/// servers can be benchmarked. Not suitable for a general-purpose client.
fn insecure_tls_connector() -> Result<TlsConnector, native_tls::Error> {
    TlsConnector::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .build()
}

/// Dials real IMAP servers.
#[derive(Debug, Clone, Default)]
pub struct ImapConnector;

impl ImapConnector {
    pub fn new() -> Self {
        ImapConnector
    }
}

impl Connector for ImapConnector {
    fn connect(&self, target: &Target) -> Result<Connected, BenchError> {
        let address = target.address();
        let connect_error = |reason: String| BenchError::Connect {
            address: address.clone(),
            reason,
        };
        debug!("Dialing {} over {}", address, target.transport);

        match target.transport {
            Transport::Plaintext => {
                let tcp = TcpStream::connect((target.host.as_str(), target.port()))
                    .map_err(|e| connect_error(e.to_string()))?;
                let mut client = Client::new(tcp);
                client
                    .read_greeting()
                    .map_err(|e| connect_error(e.to_string()))?;
                login_and_select(client, target)
            }
            Transport::Tls => {
                let tls = insecure_tls_connector().map_err(|e| connect_error(e.to_string()))?;
                let client = imap::connect(
                    (target.host.as_str(), target.port()),
                    target.host.as_str(),
                    &tls,
                )
                .map_err(|e| connect_error(e.to_string()))?;
                login_and_select(client, target)
            }
        }
    }
}

/// NO and BAD are the server's answer to the command itself. Anything else
/// (I/O, TLS, a dropped link, an unparsable reply) means the connection is
/// gone and is reported as a connect failure.
fn is_server_reply(err: &imap::error::Error) -> bool {
    matches!(err, imap::error::Error::No(_) | imap::error::Error::Bad(_))
}

fn connection_dropped(target: &Target, err: imap::error::Error) -> BenchError {
    BenchError::Connect {
        address: target.address(),
        reason: err.to_string(),
    }
}

fn login_and_select<T>(client: Client<T>, target: &Target) -> Result<Connected, BenchError>
where
    T: Read + Write + 'static,
{
    let user = &target.credentials.user;
    debug!("Session is {}; logging in as {}", SessionState::Unauthenticated, user);

    let mut session = client
        .login(user, target.credentials.password.unsecure())
        .map_err(|(e, _client)| {
            if is_server_reply(&e) {
                BenchError::Auth {
                    user: user.clone(),
                    reason: e.to_string(),
                }
            } else {
                connection_dropped(target, e)
            }
        })?;
    debug!("Session is {}", SessionState::Authenticated);

    let selected = if target.read_only {
        session.examine(&target.mailbox)
    } else {
        session.select(&target.mailbox)
    };

    let mailbox = match selected {
        Ok(mailbox) => mailbox,
        Err(e) if is_server_reply(&e) => {
            // still release the connection before failing
            session.logout().ok();
            return Err(BenchError::EmptyMailbox {
                folder: target.mailbox.clone(),
                reason: e.to_string(),
            });
        }
        Err(e) => return Err(connection_dropped(target, e)),
    };

    info!(
        "Selected {} ({} messages, read-only={})",
        target.mailbox, mailbox.exists, target.read_only
    );

    Ok(Connected {
        session: Box::new(ImapSession {
            inner: session,
            state: SessionState::MailboxSelected,
        }),
        message_count: mailbox.exists,
    })
}

/// A live `imap::Session` with its mailbox selected.
pub struct ImapSession<T: Read + Write> {
    inner: Session<T>,
    state: SessionState,
}

impl<T: Read + Write> MailSession for ImapSession<T> {
    fn state(&self) -> SessionState {
        self.state
    }

    fn fetch(&mut self, sequence_set: &str, items: &str) -> Result<Vec<FetchedItem>, OperationError> {
        debug!("FETCH {} {}", sequence_set, items);
        let fetches = self.inner.fetch(sequence_set, items).map_err(operation_error)?;

        let items = fetches
            .iter()
            .map(|fetch| FetchedItem {
                seq: fetch.message,
                literals: [fetch.header(), fetch.body(), fetch.text()]
                    .iter()
                    .flatten()
                    .map(|literal| literal.to_vec())
                    .collect(),
            })
            .collect();
        Ok(items)
    }

    fn search(&mut self, criteria: &str) -> Result<Vec<u32>, OperationError> {
        debug!("SEARCH {}", criteria);
        let found = self.inner.search(criteria).map_err(operation_error)?;
        let mut ids: Vec<u32> = found.into_iter().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    fn logout(&mut self) -> Result<(), OperationError> {
        debug!("LOGOUT");
        self.state = SessionState::Closed;
        self.inner.logout().map_err(operation_error)
    }
}
