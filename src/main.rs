//! Mediaseek CLI
//!
//! Runs the record store server, the gateway, or both in one process, and
//! looks up positions on a running gateway.

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures_util::future::join_all;
use mediaseek::api::{build_gateway_router, build_store_router, serve, GatewayState, StoreState};
use mediaseek::config::{generate_default_config, Config, LoggingConfig};
use mediaseek::search::DurationStats;
use mediaseek::store::{RecordSource, RemoteStore, ShardedStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "mediaseek")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Predictive lookup of media segments by timestamp")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/mediaseek/config.toml, /etc/mediaseek/config.toml, ./mediaseek.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a fake dataset and serve it as a record store
    Store,

    /// Run the gateway against a remote record store
    Gateway {
        /// Record store URL (overrides config)
        #[arg(long)]
        store_url: Option<String>,
    },

    /// Run record store and gateway in one process
    Standalone,

    /// Look up positions on a running gateway
    Locate {
        /// Timestamps to look up (Unix ms)
        #[arg(required = true, allow_negative_numbers = true)]
        positions: Vec<i64>,
        /// Gateway URL
        #[arg(long, default_value = "http://localhost:8902")]
        gateway_url: String,
    },

    /// Print the default configuration file
    InitConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::InitConfig = cli.command {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_tracing(&config.logging);

    match cli.command {
        Commands::Store => run_store(&config).await,
        Commands::Gateway { store_url } => run_gateway(&config, store_url).await,
        Commands::Standalone => run_standalone(&config).await,
        Commands::Locate {
            positions,
            gateway_url,
        } => run_locate(&gateway_url, &positions, &config).await,
        Commands::InitConfig => Ok(()),
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("mediaseek={},tower_http=info", logging.level))
    });
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_store(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Starting record store v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(ShardedStore::generate(&config.store.generate_options())?);
    let router = build_store_router(StoreState::new(store));
    serve(router, &config.store.addr(), "Record store").await?;
    Ok(())
}

async fn run_gateway(config: &Config, store_url: Option<String>) -> anyhow::Result<()> {
    tracing::info!("Starting gateway v{}", env!("CARGO_PKG_VERSION"));

    let mut gateway = config.gateway.clone();
    if let Some(url) = store_url {
        gateway.store_url = url;
    }
    let remote = RemoteStore::new(gateway.store_url.as_str(), gateway.request_timeout())?;
    tracing::info!("Record store: {}", remote.base_url());

    let source: Arc<dyn RecordSource> = Arc::new(remote);
    let addr = gateway.addr();
    let state = GatewayState::new(
        source,
        Arc::new(DurationStats::new()),
        config.search.search_config(),
        gateway,
    );

    serve(build_gateway_router(state), &addr, "Gateway").await?;
    Ok(())
}

async fn run_standalone(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Starting record store and gateway v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(ShardedStore::generate(&config.store.generate_options())?);
    let store_router = build_store_router(StoreState::new(Arc::clone(&store)));

    let source: Arc<dyn RecordSource> = store;
    let gateway_router = build_gateway_router(GatewayState::new(
        source,
        Arc::new(DurationStats::new()),
        config.search.search_config(),
        config.gateway.clone(),
    ));

    let store_addr = config.store.addr();
    let gateway_addr = config.gateway.addr();
    tokio::try_join!(
        serve(store_router, &store_addr, "Record store"),
        serve(gateway_router, &gateway_addr, "Gateway"),
    )?;
    Ok(())
}

async fn run_locate(gateway_url: &str, positions: &[i64], config: &Config) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.gateway.search_timeout_ms))
        .build()?;
    let base = gateway_url.trim_end_matches('/');

    let lookups = positions.iter().map(|&position| {
        let client = &client;
        async move {
            let url = format!("{}/media-segment?position={}", base, position);
            let response = client.get(&url).send().await?;
            let status = response.status();
            let body: serde_json::Value = response.json().await?;
            Ok::<_, reqwest::Error>((position, status, body))
        }
    });

    for result in join_all(lookups).await {
        let (position, status, body) = result.context("gateway request failed")?;
        match body.get("result") {
            Some(segment) if !segment.is_null() => println!("{} -> {}", position, segment),
            _ => println!("{} -> not found ({})", position, status),
        }
    }

    Ok(())
}
