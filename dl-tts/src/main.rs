//! dl-tts - Text-to-speech service
//!
//! Wraps a voice synthesis server with validation, duration estimates and
//! an in-memory result cache. Reference voices go to object storage.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use dl_common::config::{config_file_path, ensure_directory, load_toml_config, resolve_data_dir};
use dl_common::logging::init_tracing;
use dl_common::storage;
use dl_tts::backend::VoiceServerBackend;
use dl_tts::config::{TtsConfig, MODULE_NAME};
use dl_tts::service::TtsService;
use dl_tts::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};

/// Command-line arguments for dl-tts
#[derive(Parser, Debug)]
#[command(name = "dl-tts")]
#[command(about = "Text-to-speech service for DailyLesson")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config)
    #[arg(short, long, env = "DL_TTS_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides config)
    #[arg(long, env = "DL_TTS_BIND")]
    bind: Option<String>,

    /// Voice synthesis server base URL (overrides config)
    #[arg(long, env = "VOICE_SERVER_URL")]
    voice_server: Option<String>,

    /// Data folder
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = config_file_path(args.config.as_deref(), MODULE_NAME);
    let config: TtsConfig = load_toml_config(config_path.as_deref())
        .context("Failed to load configuration")?;

    init_tracing(&config.logging).context("Failed to initialize logging")?;

    info!(
        "Starting DailyLesson TTS service ({}) v{}",
        MODULE_NAME,
        env!("CARGO_PKG_VERSION")
    );

    let data_dir = resolve_data_dir(args.data_dir.as_deref(), config.data_dir.as_deref());
    ensure_directory(&data_dir).context("Failed to create data folder")?;
    info!("Data folder: {}", data_dir.display());

    let store = storage::from_config(&config.storage.clone().with_env_overrides(), &data_dir)
        .context("Failed to configure object storage")?;

    let voice_server = args
        .voice_server
        .unwrap_or_else(|| config.voice_server_url.clone());
    let backend = VoiceServerBackend::new(&voice_server, Duration::from_secs(config.timeout_secs))
        .context("Failed to configure voice server client")?;
    info!("Voice server: {}", voice_server);

    let service = Arc::new(TtsService::new(Arc::new(backend), store));
    let app = build_router(AppState::new(service));

    let port = args.port.unwrap_or(config.port);
    let bind = args.bind.unwrap_or_else(|| config.bind_address.clone());
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", bind, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("dl-tts listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
