// src/cfg/target.rs

use secure_string::SecureString;
use std::fmt;

pub const PLAINTEXT_PORT: u16 = 143;
pub const TLS_PORT: u16 = 993;

/// How the connector reaches the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Plaintext,
    /// TLS with certificate verification disabled, for self-signed test servers.
    Tls,
}

impl Transport {
    pub fn from_tls_flag(tls: bool) -> Self {
        if tls {
            Transport::Tls
        } else {
            Transport::Plaintext
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Transport::Plaintext => PLAINTEXT_PORT,
            Transport::Tls => TLS_PORT,
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Plaintext => write!(f, "plaintext"),
            Transport::Tls => write!(f, "tls"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: String,
    pub password: SecureString,
}

/// The server, account and mailbox under test. Built once at startup.
#[derive(Debug, Clone)]
pub struct Target {
    pub host: String,
    pub port: Option<u16>,
    pub transport: Transport,
    pub credentials: Credentials,
    pub mailbox: String,
    pub read_only: bool,
}

impl Target {
    /// Port to dial: the explicit one, else the transport's well-known port.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.transport.default_port())
    }

    /// `host:port`, with IPv6 literals bracketed.
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port())
        } else {
            format!("{}:{}", self.host, self.port())
        }
    }
}

/// Split a `-server` value into host and optional port.
///
/// Accepts `host`, `host:port`, `[v6]`, `[v6]:port` and bare IPv6 literals.
/// A suffix that is not a valid port is left as part of the host.
pub fn split_host_port(server: &str) -> (String, Option<u16>) {
    let server = server.trim();

    if let Some(rest) = server.strip_prefix('[') {
        if let Some((host, tail)) = rest.split_once(']') {
            let port = tail.strip_prefix(':').and_then(|p| p.parse().ok());
            return (host.to_string(), port);
        }
    }

    // more than one colon without brackets is an IPv6 literal
    if server.matches(':').count() == 1 {
        if let Some((host, port)) = server.rsplit_once(':') {
            if let Ok(port) = port.parse::<u16>() {
                return (host.to_string(), Some(port));
            }
        }
    }

    (server.to_string(), None)
}
