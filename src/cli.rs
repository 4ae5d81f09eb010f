// src/cli.rs

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Long flags that may also be written with a single dash (`-user alice`).
const FLAG_NAMES: &[&str] = &[
    "user", "pass", "server", "folder", "cycle", "csv", "tls", "port", "subject", "body",
    "readwrite", "config", "debug", "help", "version",
];

/// Command-line interface options for imap-roadrunner.
#[derive(Parser, Debug, Default)]
#[command(
    name = "imap-roadrunner",
    version,
    about = "Simple IMAP benchmarking tool",
    long_about = None
)]
pub struct Cli {
    /// Username to authenticate (required)
    #[arg(long, env = "IMAP_USERNAME", allow_hyphen_values = true)]
    pub user: Option<String>,

    /// Password to authenticate (required)
    #[arg(long, env = "IMAP_PASSWORD", hide_env_values = true, allow_hyphen_values = true)]
    pub pass: Option<String>,

    /// Remote IMAP server, optionally as host:port (required)
    #[arg(long, env = "IMAP_SERVER")]
    pub server: Option<String>,

    /// Folder to select [default: Inbox]
    #[arg(long)]
    pub folder: Option<String>,

    /// Number of times to cycle [default: 3]
    // kept as text so a bad count is reported with the usage, like a missing flag
    #[arg(long, allow_negative_numbers = true)]
    pub cycle: Option<String>,

    /// Flag for CSV output
    #[arg(long)]
    pub csv: bool,

    /// Flag for connecting via TLS/SSL (port 993 instead of 143)
    #[arg(long)]
    pub tls: bool,

    /// Port override; takes precedence over host:port and the TLS default
    #[arg(long)]
    pub port: Option<u16>,

    /// Term for the SUBJECT search [default: ben]
    #[arg(long, allow_hyphen_values = true)]
    pub subject: Option<String>,

    /// Term for the BODY search [default: nova]
    #[arg(long, allow_hyphen_values = true)]
    pub body: Option<String>,

    /// SELECT the folder read-write instead of EXAMINE
    #[arg(long)]
    pub readwrite: bool,

    /// Path to a YAML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Turn on debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Rewrite Go-style `-flag` / `-flag=value` arguments to `--flag`.
/// Only known flag names are touched, so values starting with `-` survive,
/// and nothing after a bare `--` is rewritten.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;

    for (i, arg) in args.into_iter().map(Into::into).enumerate() {
        if i == 0 || passthrough {
            out.push(arg);
            continue;
        }

        let rewritten = arg.to_str().and_then(|s| {
            if s == "--" {
                return None;
            }
            let name = s.strip_prefix('-').filter(|rest| !rest.starts_with('-'))?;
            let flag = name.split_once('=').map_or(name, |(flag, _)| flag);
            FLAG_NAMES.contains(&flag).then(|| OsString::from(format!("-{}", s)))
        });

        if arg == "--" {
            passthrough = true;
        }
        out.push(rewritten.unwrap_or(arg));
    }

    out
}
