//! mktscan - exchange market-data scanner.
//!
//! Ranked listings, single-symbol quotes and depth over REST, and live
//! prices over the ticker stream.

use anyhow::Result;
use clap::{Parser, Subcommand};
use mktscan_app::config::CONFIG_ENV_VAR;
use mktscan_app::render::render_update;
use mktscan_app::{resolve_config_path, AppConfig, Application};
use tracing::info;

/// Exchange market-data scanner
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via MKTSCAN_CONFIG env var)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tradable USDT instruments, majors first, then by 24h volume
    Top {
        /// Maximum number of instruments (defaults to rank_limit)
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Last traded price
    Price { symbol: String },
    /// 24h market summary
    Market { symbol: String },
    /// Top 20 order-book levels per side
    Depth { symbol: String },
    /// Partial-book stream URL for a symbol
    DepthUrl { symbol: String },
    /// Stream live prices until Ctrl-C (defaults to the top ranked symbols)
    Watch { symbols: Vec<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize TLS crypto provider (must be before any WS connections)
    mktscan_ws::init_crypto();

    let args = Args::parse();

    let source = resolve_config_path(args.config, std::env::var(CONFIG_ENV_VAR).ok());
    let config = AppConfig::load(&source)?;

    mktscan_telemetry::init_logging(&config.telemetry.log_level)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config_path = %source.path().display(),
        rest_url = %config.rest_url,
        ws_url = %config.ws_url,
        "Configuration loaded"
    );

    let app = Application::new(config)?;

    match args.command {
        Command::Top { limit, json } => println!("{}", app.top(limit, json).await?),
        Command::Price { symbol } => println!("{}", app.price(&symbol).await?),
        Command::Market { symbol } => print!("{}", app.market(&symbol).await?),
        Command::Depth { symbol } => print!("{}", app.depth(&symbol).await?),
        Command::DepthUrl { symbol } => println!("{}", app.depth_url(&symbol)?),
        Command::Watch { symbols } => {
            let count = app
                .watch(symbols, |update| println!("{}", render_update(update)))
                .await?;
            info!(count, "Watch finished");
        }
    }

    Ok(())
}
