mod args;

use std::process::ExitCode;

use anyhow::{Context as _, Result};
use args::Args;
use carbon_watch::{
    clock::NetworkClock,
    hw::{IioAdc, IioDht11, Operstate},
    node::Node,
    upload::HttpPublisher,
};
use clap::Parser as _;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    let args = Args::parse();
    let config = args.to_config();

    info!(
        sensor_id = config.sensor_id,
        barangay_id = config.barangay_id,
        endpoint = %config.endpoint,
        interface = %args.interface,
        "starting carbon-watch"
    );

    let gas = IioAdc::new(&args.gas_adc);
    let climate = IioDht11::new(&args.dht_device);
    let link = Operstate::for_interface(&args.interface);
    let clock = NetworkClock::new(&config.ntp_server, config.timezone);
    let publisher =
        HttpPublisher::new(&config.endpoint).context("failed to create HTTP publisher")?;

    let mut node = Node::new(config, gas, climate, link, clock, publisher);

    node.start().await.context("failed to start node")?;
    node.run(shutdown_signal()).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
