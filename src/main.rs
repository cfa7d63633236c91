//! Policy gateway binary.
//!
//! Startup order: logging → config (fatal on error) → metrics exporter →
//! config watcher → listener bind → serve until shutdown.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use policy_gateway::config::loader::load_config;
use policy_gateway::config::watcher::ConfigWatcher;
use policy_gateway::http::HttpServer;
use policy_gateway::lifecycle::Shutdown;
use policy_gateway::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "policy-gateway", about = "Policy-enforcing reverse proxy gateway")]
struct Cli {
    /// Path to the gateway policy configuration file.
    #[arg(long, default_value = "gateway.toml")]
    config: PathBuf,

    /// Listen port for the proxy server.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Log verbosity level (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    tracing::info!("policy-gateway v0.1.0 starting");

    // Serving without a policy would silently disable all blocking and
    // masking, so a bad config aborts startup.
    let config = load_config(&cli.config)?;

    tracing::info!(
        target_url = %config.target_url,
        target_port = %config.target_port,
        blocked_headers = config.blocked_headers.len(),
        blocked_query_params = config.blocked_query_params.len(),
        masked_keys = config.masked_needed_keys.len(),
        gate_all_methods = config.gate_all_methods,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let (watcher, config_updates) = ConfigWatcher::new(&cli.config);
    let _watcher_guard = match watcher.run() {
        Ok(guard) => Some(guard),
        Err(e) => {
            tracing::warn!(error = %e, "Config watcher unavailable; hot reload disabled");
            None
        }
    };

    let listener = TcpListener::bind(("0.0.0.0", cli.port)).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server
        .run(listener, config_updates, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
