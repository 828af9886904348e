//! sealgate-server - hold a master secret behind a threshold seal
//!
//! usage:
//!   sealgate-server --threshold 3 --shares 5 --port 8200
//!
//! on start a fresh master secret is generated and split. the unseal keys
//! are printed once on stdout and the server comes up sealed; submit any
//! `threshold` of them to `PUT /v1/sys/unseal`.

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use metrics::gauge;
use metrics_exporter_prometheus::PrometheusBuilder;
use sealgate::{shamir, MasterSecret, SealConfig, SealCoordinator};
use sealgate_server::{router, AppState};
use tracing::{info, warn};

/// sealgate-server - threshold seal/unseal gate
#[derive(Parser)]
#[command(name = "sealgate-server")]
#[command(about = "hold a master secret behind a threshold seal")]
#[command(version)]
struct Args {
    /// port to listen on
    #[arg(short, long, default_value = "8200")]
    port: u16,

    /// bind address
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// shares required to unseal
    #[arg(short, long, default_value = "3")]
    threshold: usize,

    /// shares to generate
    #[arg(short, long, default_value = "5")]
    shares: usize,

    /// prometheus endpoint port (disabled when unset)
    #[arg(long)]
    metrics_port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sealgate=info".parse()?)
                .add_directive("sealgate_server=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = SealConfig::new(args.threshold, args.shares)?;

    if let Some(metrics_port) = args.metrics_port {
        let metrics_addr: SocketAddr = format!("{}:{}", args.bind, metrics_port)
            .parse()
            .context("invalid metrics address")?;
        PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()
            .context("failed to install prometheus metrics exporter")?;
        info!("  metrics: {}", metrics_addr);
    }

    // the secret only lives long enough to be split
    let shares = {
        let secret = MasterSecret::generate();
        shamir::split(&secret, &config)
    };

    println!("unseal keys ({} of {} required):", config.threshold(), config.total_shares());
    for (i, share) in shares.iter().enumerate() {
        println!("  key {}: {}", i + 1, share.to_hex());
    }
    drop(shares);
    warn!("unseal keys are shown once, store them separately");

    let core = SealCoordinator::new(config);
    gauge!("sealgate_sealed").set(1.0);
    gauge!("sealgate_unseal_progress").set(0.0);

    info!("sealgate-server v{}", env!("CARGO_PKG_VERSION"));
    info!("  threshold: {} of {}", config.threshold(), config.total_shares());
    info!("  bind: {}:{}", args.bind, args.port);

    let app = router(AppState::new(core));

    let addr = format!("{}:{}", args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("listening on {} (sealed)", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
