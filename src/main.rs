use clap::{CommandFactory, Parser};
use env_logger::Builder;
use eyre::Result;
use log::{debug, LevelFilter};
use std::io;
use std::process;
use std::time::Instant;

use imap_roadrunner::cfg::config::load_config;
use imap_roadrunner::cfg::settings::Settings;
use imap_roadrunner::cli::{normalize_args, Cli};
use imap_roadrunner::imap_client::ImapConnector;
use imap_roadrunner::report::reporter_for;
use imap_roadrunner::{RealClock, Roadrunner};

fn main() -> Result<()> {
    let started = Instant::now();

    // parse command-line
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    // warnings on by default so absorbed operation failures are visible
    Builder::new()
        .filter_level(if cli.debug { LevelFilter::Debug } else { LevelFilter::Warn })
        .parse_default_env()
        .try_init()
        .ok();

    let file = cli.config.as_deref().map(load_config).transpose()?;

    let settings = match Settings::resolve(&cli, file) {
        Ok(settings) => settings,
        Err(e) => {
            println!("{}", e);
            Cli::command().print_help()?;
            process::exit(1);
        }
    };

    let connector = ImapConnector::new();
    let roadrunner = Roadrunner::new(&connector, &settings.target, &settings.plan, RealClock);
    let mut reporter = reporter_for(settings.csv, io::stdout());

    let total = roadrunner.execute_since(started, reporter.as_mut())?;
    debug!("Finished in {:?}", total);

    Ok(())
}
