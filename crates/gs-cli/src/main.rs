//! `guest-session` command-line driver
//!
//! Runs reconciliation passes against a JSON file-backed session store.

mod render;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use gs_client::GraphqlClientFactory;
use gs_core::{GuestSession, SessionConfig};
use gs_reconcile::QueryParams;
use gs_session::{FileStore, SessionStore};
use render::UpdateSummary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let store = Arg::new("store")
        .long("store")
        .default_value("guest-session.json")
        .value_parser(value_parser!(PathBuf))
        .help("Session store file");
    let config = Arg::new("config")
        .long("config")
        .default_value("guest-session.toml")
        .value_parser(value_parser!(PathBuf))
        .help("Configuration file (defaults apply when missing)");
    let json = Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON");

    Command::new("guest-session")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reconcile guest credentials and editorial toggles from URL query parameters")
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("apply")
                .about("Run one reconciliation pass for a URL or query string")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .help("Full URL or raw query string"),
                )
                .arg(store.clone())
                .arg(config.clone())
                .arg(json.clone()),
        )
        .subcommand(
            Command::new("show")
                .about("Print the persisted session state (tokens redacted)")
                .arg(store.clone())
                .arg(config.clone())
                .arg(json),
        )
        .subcommand(
            Command::new("end")
                .about("End the session and drop the stored record")
                .arg(store)
                .arg(config),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn parse_input(input: &str) -> QueryParams {
    if input.contains("://") {
        if let Ok(params) = QueryParams::parse_url(input) {
            return params;
        }
    }
    match input.split_once('?') {
        Some((_, query)) => QueryParams::parse(query),
        None => QueryParams::parse(input),
    }
}

fn open_store(args: &ArgMatches) -> Result<(SessionConfig, FileStore)> {
    let config_path = args
        .get_one::<PathBuf>("config")
        .context("missing --config")?;
    let store_path = args.get_one::<PathBuf>("store").context("missing --store")?;

    let config = SessionConfig::load(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    let store = FileStore::with_key(store_path, &config.storage_key);
    tracing::debug!(
        store = %store_path.display(),
        key = %config.storage_key,
        "session store opened"
    );
    Ok((config, store))
}

fn open_session(args: &ArgMatches) -> Result<GuestSession<FileStore, GraphqlClientFactory>> {
    let (config, store) = open_store(args)?;
    let store_path = store.path().to_path_buf();

    GuestSession::start(config, store, GraphqlClientFactory::new())
        .with_context(|| format!("opening session store {}", store_path.display()))
}

fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("apply", args)) => {
            let input = args.get_one::<String>("input").context("missing input")?;
            let mut session = open_session(args)?;
            let update = session.on_query_change(&parse_input(input))?;
            let summary = UpdateSummary::new(&update);
            tracing::info!(
                applied = update.log.applied_count(),
                skipped = update.log.skipped_count(),
                client = summary.client.is_some(),
                "apply finished"
            );

            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&summary.to_json())?);
            } else {
                print!("{}", summary.to_text());
            }
        }
        Some(("show", args)) => {
            // Read only: no seeding, so a missing store file stays missing
            let (_, store) = open_store(args)?;
            let state = store
                .snapshot()
                .with_context(|| format!("reading session store {}", store.path().display()))?;

            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&render::state_json(&state))?);
            } else {
                print!("{}", render::state_text(&state));
            }
        }
        Some(("end", args)) => {
            open_session(args)?.end().context("clearing session store")?;
            tracing::info!("session ended");
            println!("session ended");
        }
        Some((other, _)) => tracing::warn!(command = other, "unknown command"),
        None => {}
    }
    Ok(())
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));
    run(&matches)
}
