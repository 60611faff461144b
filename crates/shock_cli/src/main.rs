//! shockctl - Command Line Operations for Event Shock Simulation
//!
//! # Commands
//!
//! - `shockctl generate --start <date> --end <date>` - Baseline random-walk series
//! - `shockctl shock --event <text>` - Simulated crash and recovery for an event
//! - `shockctl compare --event <text>` - Withdraw / add / hold outcomes
//! - `shockctl scenarios` - Known events and preset scenarios
//! - `shockctl assess --text <text>` - Keyword impact report
//!
//! Results go to stdout; logs go to stderr.

use clap::{Parser, Subcommand};
use std::io::Write;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;

pub use error::{CliError, Result};

/// Event shock simulation CLI
#[derive(Parser)]
#[command(name = "shockctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a baseline price series
    Generate {
        /// First calendar day (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// Last calendar day (YYYY-MM-DD)
        #[arg(short, long)]
        end: String,

        /// Output format (json, csv, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Simulate an event's crash and recovery
    Shock {
        /// Event description
        #[arg(short, long)]
        event: String,

        /// Output format (json, csv, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Compare withdraw, add and hold strategies over an event
    Compare {
        /// Event description
        #[arg(short, long)]
        event: String,

        /// Starting units held
        #[arg(short, long, conflicts_with = "investment")]
        units: Option<f64>,

        /// Starting cash converted to units at the first close
        #[arg(short, long)]
        investment: Option<f64>,

        /// Output format (json, csv, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// List known events and preset scenarios
    Scenarios {
        /// Output format (json, csv, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Assess the market impact of an event description
    Assess {
        /// Event description
        #[arg(short, long)]
        text: String,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!("Verbose mode enabled");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Generate { start, end, format } => {
            commands::generate::run(&mut out, &start, &end, &format)
        }
        Commands::Shock { event, format } => commands::shock::run(&mut out, &event, &format),
        Commands::Compare {
            event,
            units,
            investment,
            format,
        } => commands::compare::run(&mut out, &event, units, investment, &format),
        Commands::Scenarios { format } => commands::scenarios::run(&mut out, &format),
        Commands::Assess { text, format } => commands::assess::run(&mut out, &text, &format),
    }?;

    out.flush()?;
    Ok(())
}
