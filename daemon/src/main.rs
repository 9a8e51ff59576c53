//! continua daemon — entry point for running the lead-capture service.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use continua_assets::FsAssetStore;
use continua_delivery::ResendMailer;
use continua_downloads::DownloadGate;
use continua_rpc::{RpcServer, ServiceConfig};
use continua_store_lmdb::{environment::DEFAULT_MAP_SIZE, LmdbEnvironment};
use continua_utils::LogFormat;
use continua_verification::VerificationWorkflow;

#[derive(Parser)]
#[command(name = "continua-daemon", about = "continua lead-capture service daemon")]
struct Cli {
    /// Port for the HTTP API.
    #[arg(long, env = "CONTINUA_PORT")]
    port: Option<u16>,

    /// Data directory for contact storage.
    #[arg(long, env = "CONTINUA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Public base URL of the site; verification links point here.
    #[arg(long, env = "CONTINUA_SITE_BASE_URL")]
    site_base_url: Option<String>,

    /// Directory holding the downloadable book PDFs.
    #[arg(long, env = "CONTINUA_ASSETS_DIR")]
    assets_dir: Option<PathBuf>,

    /// From-address used on verification emails.
    #[arg(long, env = "CONTINUA_FROM_ADDRESS")]
    from_address: Option<String>,

    /// Email provider API key. Env-only: never a flag a process listing
    /// could expose, never part of the config file.
    #[arg(long, env = "RESEND_API_KEY", hide_env_values = true)]
    resend_api_key: String,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "CONTINUA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "CONTINUA_LOG_FORMAT")]
    log_format: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = match cli.config {
        Some(ref path) => {
            let path = path.display().to_string();
            Some(
                ServiceConfig::from_toml_file(&path)
                    .with_context(|| format!("loading config file {path}"))?,
            )
        }
        None => None,
    };

    let base = file_config.unwrap_or_default();
    let config = ServiceConfig {
        port: cli.port.unwrap_or(base.port),
        data_dir: cli.data_dir.unwrap_or(base.data_dir),
        site_base_url: cli.site_base_url.unwrap_or(base.site_base_url),
        assets_dir: cli.assets_dir.unwrap_or(base.assets_dir),
        from_address: cli.from_address.unwrap_or(base.from_address),
        log_level: cli.log_level.unwrap_or(base.log_level),
        log_format: cli.log_format.unwrap_or(base.log_format),
    };

    let format: LogFormat = config
        .log_format
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    continua_utils::init_tracing(format, &config.log_level);

    tracing::info!(
        port = config.port,
        data_dir = %config.data_dir.display(),
        assets_dir = %config.assets_dir.display(),
        "starting continua daemon"
    );

    let env = LmdbEnvironment::open(&config.data_dir, DEFAULT_MAP_SIZE)
        .with_context(|| format!("opening data dir {}", config.data_dir.display()))?;
    let store = Arc::new(env.contact_store());

    let mailer = Arc::new(ResendMailer::new(
        cli.resend_api_key,
        config.from_address.clone(),
        config.site_base_url.clone(),
    ));
    let assets = Arc::new(FsAssetStore::new(config.assets_dir.clone()));

    let workflow = Arc::new(VerificationWorkflow::new(
        store.clone(),
        store.clone(),
        mailer,
    ));
    let gate = Arc::new(DownloadGate::new(store.clone(), store, assets));

    RpcServer::new(config.port, workflow, gate).start().await?;

    tracing::info!("continua daemon exited cleanly");
    Ok(())
}
