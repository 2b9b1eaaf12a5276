//! Smartcoin Node - consensus inspection front end for the Smartcoin core.
//!
//! This is the main entry point for the smartcoin-node binary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use smartcoin_consensus::NetworkProfile;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod commands;
mod config;

use config::NodeConfig;

/// Smartcoin consensus node.
#[derive(Parser, Debug)]
#[command(name = "smartcoin-node")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "smartcoin-node.toml")]
    config: PathBuf,

    /// Network to select (main, test, regtest)
    #[arg(short, long)]
    network: Option<String>,

    /// Log level
    #[arg(long)]
    log_level: Option<String>,

    /// Print version and exit
    #[arg(long)]
    version_info: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Build the network profile, verify genesis and print a summary
    Check,
    /// Show the rule-set governing a height
    Rules {
        #[arg(long)]
        height: u32,
    },
    /// Print the genesis block
    Genesis,
    /// Compute the bits required for the block after the last header
    NextWork {
        /// JSON array of {height, time, bits} ending at the tip
        #[arg(long)]
        headers: PathBuf,
        /// Candidate block time (UNIX seconds)
        #[arg(long)]
        time: u32,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version_info {
        print_version();
        return Ok(());
    }

    // Load configuration
    let config = NodeConfig::load(&args.config, &args)?;

    // Initialize logging
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Smartcoin Node v{}", env!("CARGO_PKG_VERSION"));
    info!("Network: {}", config.network);

    let profile = NetworkProfile::select(&config.network)
        .with_context(|| format!("Cannot select network {:?}", config.network))?;

    let report = match args.command.unwrap_or(Command::Check) {
        Command::Check => commands::check(profile)?,
        Command::Rules { height } => commands::rules(profile, height)?,
        Command::Genesis => commands::genesis(profile)?,
        Command::NextWork { headers, time } => {
            let entries = commands::load_headers(&headers)?;
            commands::next_work(profile, entries, time)?
        }
    };
    print!("{}", report);

    Ok(())
}

fn print_version() {
    println!("Smartcoin Node");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Built with:");
    println!("  scrypt and X11 proof of work");
    println!("  Dark Gravity Wave / DigiShield / Kimoto Gravity Well retargeting");
}
