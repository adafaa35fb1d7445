//! Enviro Exporter binary.
//!
//! Opens the sensor board and serves readings on port 8001 until interrupted.

use anyhow::Context;
use clap::Parser;
use enviro_exporter::{run_until_interrupted, SensorContext, ServerConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "enviro_exporter")]
#[command(about = "Serve BME280 and PMS5003 readings as JSON over HTTP")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Bind the IPv6 wildcard address instead of the IPv4 one
    #[arg(long = "enableipv6")]
    enable_ipv6: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging()?;

    let sensors = SensorContext::open().context("failed to open sensors")?;
    info!("Sensors initialized");

    let config = ServerConfig::new(cli.enable_ipv6);
    info!("Binding {}", config.bind_address());

    run_until_interrupted(config, sensors)
        .await
        .context("web server failed")?;

    Ok(())
}

fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
