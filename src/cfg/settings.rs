// src/cfg/settings.rs
//
// Layers command line (and its env fallbacks) over the YAML file over the
// built-in defaults. The result is immutable for the rest of the run.

use log::debug;
use thiserror::Error;

use crate::cfg::config::Config;
use crate::cfg::secure;
use crate::cfg::target::{split_host_port, Credentials, Target, Transport};
use crate::cli::Cli;
use crate::operation::{BenchPlan, FetchItems, DEFAULT_BODY_TERM, DEFAULT_CYCLES, DEFAULT_SUBJECT_TERM};

pub const DEFAULT_FOLDER: &str = "Inbox";

/// Problems that are reported together with the usage text.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{0} missing from arguments")]
    Missing(&'static str),

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub target: Target,
    pub plan: BenchPlan,
    pub csv: bool,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn fetch_items(
    field: &'static str,
    items: Option<Vec<String>>,
    default: FetchItems,
) -> Result<FetchItems, SettingsError> {
    match items {
        None => Ok(default),
        Some(items) => FetchItems::new(items).ok_or(SettingsError::Invalid {
            field,
            reason: "at least one FETCH item is required".to_string(),
        }),
    }
}

fn parse_cycles(raw: &str) -> Result<u32, SettingsError> {
    let invalid = |reason: String| SettingsError::Invalid {
        field: "cycle",
        reason,
    };
    let cycles: i64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(format!("'{}' is not a number", raw)))?;
    if cycles < 1 {
        return Err(invalid("must be at least 1".to_string()));
    }
    u32::try_from(cycles).map_err(|_| invalid(format!("{} is out of range", cycles)))
}

impl Settings {
    pub fn resolve(cli: &Cli, file: Option<Config>) -> Result<Self, SettingsError> {
        let file = file.unwrap_or_default();

        let user = non_empty(cli.user.clone())
            .or(non_empty(file.user))
            .ok_or(SettingsError::Missing("User"))?;
        let password = secure::secure_opt(cli.pass.clone())
            .or(file.pass)
            .ok_or(SettingsError::Missing("Password"))?;
        let server = non_empty(cli.server.clone())
            .or(non_empty(file.server))
            .ok_or(SettingsError::Missing("Server"))?;

        let (host, embedded_port) = split_host_port(&server);
        if host.is_empty() {
            return Err(SettingsError::Invalid {
                field: "server",
                reason: format!("'{}' has no host", server),
            });
        }

        let cycles = match cli.cycle.as_deref() {
            Some(raw) => parse_cycles(raw)?,
            None => file.cycle.unwrap_or(DEFAULT_CYCLES),
        };
        if cycles == 0 {
            return Err(SettingsError::Invalid {
                field: "cycle",
                reason: "must be at least 1".to_string(),
            });
        }

        let transport = Transport::from_tls_flag(cli.tls || file.tls.unwrap_or(false));
        let target = Target {
            host,
            port: cli.port.or(embedded_port).or(file.port),
            transport,
            credentials: Credentials { user, password },
            mailbox: non_empty(cli.folder.clone())
                .or(non_empty(file.folder))
                .unwrap_or_else(|| DEFAULT_FOLDER.to_string()),
            read_only: !(cli.readwrite || file.readwrite.unwrap_or(false)),
        };

        let plan = BenchPlan {
            cycles,
            subject_term: non_empty(cli.subject.clone())
                .or(non_empty(file.subject_term))
                .unwrap_or_else(|| DEFAULT_SUBJECT_TERM.to_string()),
            body_term: non_empty(cli.body.clone())
                .or(non_empty(file.body_term))
                .unwrap_or_else(|| DEFAULT_BODY_TERM.to_string()),
            full_items: fetch_items("full-items", file.full_items, FetchItems::full_message())?,
            header_items: fetch_items("header-items", file.header_items, FetchItems::header_only())?,
        };

        let csv = cli.csv || file.csv.unwrap_or(false);
        debug!(
            "Resolved target {} ({}), mailbox {}, {} cycles, csv={}",
            target.address(),
            target.transport,
            target.mailbox,
            plan.cycles,
            csv
        );

        Ok(Settings { target, plan, csv })
    }
}
