//! dl-lessons - Lesson generation API
//!
//! Serves generated lessons, daily curriculum lessons, the sitemap and the
//! user store over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use dl_common::config::{config_file_path, ensure_directory, load_toml_config, resolve_data_dir};
use dl_common::logging::init_tracing;
use dl_lessons::config::{LessonsConfig, MODULE_NAME};
use dl_lessons::curriculum::{CurriculumLoader, DirectorySource};
use dl_lessons::lesson::{LessonCache, LessonGenerator, LessonLibrary, RandomChooser};
use dl_lessons::users::UserStore;
use dl_lessons::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};

/// Command-line arguments for dl-lessons
#[derive(Parser, Debug)]
#[command(name = "dl-lessons")]
#[command(about = "Lesson generation API for DailyLesson")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config)
    #[arg(short, long, env = "DL_LESSONS_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides config)
    #[arg(long, env = "DL_LESSONS_BIND")]
    bind: Option<String>,

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
    let config: LessonsConfig = load_toml_config(config_path.as_deref())
        .context("Failed to load configuration")?;

    init_tracing(&config.logging).context("Failed to initialize logging")?;

    info!(
        "Starting DailyLesson lessons API ({}) v{}",
        MODULE_NAME,
        env!("CARGO_PKG_VERSION")
    );
    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("Config file: none (defaults)"),
    }

    let data_dir = resolve_data_dir(args.data_dir.as_deref(), config.data_dir.as_deref());
    ensure_directory(&data_dir).context("Failed to create data folder")?;
    info!("Data folder: {}", data_dir.display());

    let mut library = LessonLibrary::builtin();
    if let Some(dir) = &config.lesson_dir {
        library = library
            .with_directory(dir)
            .with_context(|| format!("Failed to load lesson DNA from {}", dir.display()))?;
    }
    info!("Lesson library: {} lessons", library.len());

    let generator = Arc::new(LessonGenerator::new(
        Arc::new(library),
        Arc::new(LessonCache::new()),
        Arc::new(RandomChooser),
    ));

    let curriculum_dir = config.curriculum_dir(&data_dir);
    info!("Curriculum folder: {}", curriculum_dir.display());
    let curriculum = Arc::new(CurriculumLoader::new(Arc::new(DirectorySource::new(
        curriculum_dir,
    ))));

    let users = Arc::new(UserStore::open(config.user_store_path(&data_dir)).await);
    info!("User store: {}", users.path().display());

    let state = AppState::new(generator, curriculum, users, config.site_base_url.clone());
    let app = build_router(state);

    let port = args.port.unwrap_or(config.port);
    let bind = args.bind.unwrap_or_else(|| config.bind_address.clone());
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", bind, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("dl-lessons listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
