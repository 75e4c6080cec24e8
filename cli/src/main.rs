//! Cambio CLI
//!
//! Query currencies and run exchange calculations from the command line.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cambio_engine::{CurrencyCatalog, EngineConfig, ExchangeDesk};

mod boundary;

use boundary::Response;

/// Cambio exchange CLI
#[derive(Parser, Debug)]
#[command(name = "cambio")]
#[command(about = "Currency lookups and exchange calculations")]
struct Args {
    /// JSON currency catalog (defaults to the built-in sample)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Decimal places in converted amounts
    #[arg(long)]
    decimal_places: Option<u32>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all currencies
    List {
        /// ID of a currency to leave out
        #[arg(long)]
        exclude: Option<String>,
    },
    /// Find a currency by its ID
    Get {
        /// Currency ID
        id: String,
    },
    /// Show the default currencies to exchange
    Defaults {
        /// Sort order: asc or desc
        order: Option<String>,
    },
    /// Calculate a currency exchange
    Calculate {
        /// Currency to convert from
        from: String,
        /// Currency to convert to
        to: String,
        /// Value in the from currency
        #[arg(long)]
        value: Option<String>,
    },
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    );

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_desk(args: &Args) -> anyhow::Result<ExchangeDesk> {
    let mut config = EngineConfig::from_env();
    if let Some(places) = args.decimal_places {
        config.decimal_places = places;
    }

    let catalog = match args.catalog.as_ref().or(config.catalog_path.as_ref()) {
        Some(path) => CurrencyCatalog::load_from_path(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        None => {
            info!("No catalog given, using the built-in sample");
            CurrencyCatalog::sample()?
        }
    };

    if let Some(pair) = catalog.default_pair.clone() {
        config.default_pair = pair;
    }
    debug!(?config, "Engine configuration");

    let store = catalog.into_store()?;
    let desk = ExchangeDesk::new(Arc::new(store), &config)?;
    Ok(desk)
}

fn dispatch(desk: &ExchangeDesk, command: &Command) -> anyhow::Result<Response> {
    match command {
        Command::List { exclude } => boundary::list(desk, exclude.as_deref()),
        Command::Get { id } => boundary::get(desk, id),
        Command::Defaults { order } => boundary::defaults(desk, order.as_deref()),
        Command::Calculate { from, to, value } => {
            boundary::calculate(desk, from, to, value.as_deref())
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.json_logs);

    let desk = build_desk(&args)?;
    let response = dispatch(&desk, &args.command)?;

    println!("{}", serde_json::to_string_pretty(&response.body)?);

    let code = response.status.exit_code();
    debug!(status = ?response.status, code, "Request finished");
    Ok(ExitCode::from(code as u8))
}
