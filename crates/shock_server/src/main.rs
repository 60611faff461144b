//! shock_server - HTTP front end for event shock simulation
//!
//! Serves the crash/recovery simulations, strategy comparisons and preset
//! portfolio scenarios as JSON. Live quotes and generated commentary are
//! optional: without `--enable-market-data` every series is synthetic, and
//! without `OPENAI_API_KEY` narratives come from the built-in templates.
//!
//! ```text
//! shock_server --port 5002 --enable-market-data
//! SHOCK_LOG_LEVEL=debug shock_server --config shock.toml
//! ```

use clap::Parser;
use shock_server::config::{build_config, env_vars, CliArgs as ConfigCliArgs};
use shock_server::server::Server;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Simulated market reactions to world events, over HTTP
#[derive(Parser, Debug)]
#[command(name = "shock_server")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML file with server, [market_data] and [analysis] sections
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Interface for the simulation API (default 0.0.0.0)
    #[arg(long, env = env_vars::HOST)]
    host: Option<String>,

    /// Port for the simulation API (default 5002)
    #[arg(short, long, env = env_vars::PORT)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG wins when set
    #[arg(long, env = env_vars::LOG_LEVEL)]
    log_level: Option<String>,

    /// Fetch index and asset history from the chart API; synthetic series
    /// remain the fallback on any failure
    #[arg(long)]
    enable_market_data: bool,
}

impl From<Args> for ConfigCliArgs {
    fn from(args: Args) -> Self {
        ConfigCliArgs {
            config_file: args.config,
            host: args.host,
            port: args.port,
            log_level: args.log_level,
            enable_market_data: args.enable_market_data,
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cli_args: ConfigCliArgs = args.into();
    let config = build_config(&cli_args)?;

    init_tracing(config.log_level.as_filter_str());

    tracing::info!(version = shock_server::VERSION, "starting shock_server");
    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        index_symbol = %config.market_data.index_symbol,
        market_data = if config.market_data.enabled { "chart api" } else { "synthetic" },
        narratives = if config.analysis.is_enabled() { config.analysis.model.as_str() } else { "templates" },
        "simulation sources"
    );

    let server = Server::new(config);
    tracing::info!(address = %server.socket_addr()?, "binding simulation api");

    server.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_args_map_onto_config_layer() {
        let args = Args::try_parse_from([
            "shock_server",
            "--config",
            "shock.toml",
            "--port",
            "6100",
            "--enable-market-data",
        ])
        .unwrap();
        let cli: ConfigCliArgs = args.into();

        assert_eq!(cli.config_file, Some(PathBuf::from("shock.toml")));
        assert_eq!(cli.port, Some(6100));
        assert!(cli.enable_market_data);
    }
}
