// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ERS demo — attendee registration + Cloud Foundry routing check
//
//  HTTP:     axum on a multi-threaded tokio runtime
//  Storage:  in-memory attendee store, optional JSON state file
//  Platform: VCAP_APPLICATION / VCAP_SERVICES read per request
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use clap::{Parser, ValueEnum};
use ers_api::{ApiState, AttendeeService};
use ers_core::config::ServerConfig;
use ers_core::env::ProcessEnv;
use ers_core::platform::RUSTC_VERSION;
use ers_store::{AttendeeRepository, AttendeeStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ers", version, about = "ERS demo — attendee registration service")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "ers.yaml")]
    config: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// JSON state file for attendees. Overrides `store.state_file` from the
    /// config file.
    #[arg(long)]
    state_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ── Tracing ──
    init_tracing(&cli.log_level, cli.log_format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        rustc = RUSTC_VERSION,
        "ERS demo starting"
    );

    // ── Config ──
    let config = if cli.config.exists() {
        info!(path = %cli.config.display(), "Loading config file");
        ServerConfig::load(&cli.config)?
    } else {
        info!("No config file found, using defaults");
        ServerConfig::default()
    };

    // ── Attendee store ──
    let state_file = cli.state_file.or(config.store.state_file.clone());
    let store = match state_file {
        Some(path) => {
            info!(path = %path.display(), "Using attendee state file");
            AttendeeStore::open(path)
        }
        None => {
            info!("No state file configured, attendees kept in memory only");
            AttendeeStore::new()
        }
    };
    info!(attendees = store.count(), "Attendee store ready");

    // ── HTTP ──
    let env = Arc::new(ProcessEnv);
    let addr = config.effective_addr(env.as_ref());
    let state = Arc::new(ApiState {
        attendees: AttendeeService::new(Arc::new(store)),
        env,
        runtime_version: RUSTC_VERSION.to_string(),
    });

    ers_api::serve(addr, state, shutdown_signal()).await?;

    info!("ERS demo stopped");
    Ok(())
}

fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Resolves on SIGTERM (`cf stop`, docker stop) or Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping...");
}
