//! dl-video - Lesson video generator
//!
//! Reads generated lesson JSON files, renders each as an avatar video and
//! stores the result. Prints one outcome per lesson as JSON.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use dl_common::config::{config_file_path, ensure_directory, load_toml_config, resolve_data_dir};
use dl_common::logging::init_tracing;
use dl_common::{storage, GeneratedLesson};
use dl_video::config::{VideoConfig, MODULE_NAME};
use dl_video::{Avatar, HeygenClient, LessonVideoProcessor};
use tracing::info;

/// Command-line arguments for dl-video
#[derive(Parser, Debug)]
#[command(name = "dl-video")]
#[command(about = "Generate avatar videos for DailyLesson lessons")]
#[command(version)]
struct Args {
    /// Generated lesson JSON file (repeatable)
    #[arg(short, long = "lesson-file", required = true)]
    lesson_file: Vec<PathBuf>,

    /// Presenter avatar (ken, kelly)
    #[arg(short, long, default_value = "ken")]
    avatar: Avatar,

    /// Data folder
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

async fn read_lesson(path: &Path) -> Result<GeneratedLesson> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid lesson JSON in {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = config_file_path(args.config.as_deref(), MODULE_NAME);
    let config: VideoConfig = load_toml_config::<VideoConfig>(config_path.as_deref())
        .context("Failed to load configuration")?
        .with_env_overrides();

    init_tracing(&config.logging).context("Failed to initialize logging")?;
    info!("DailyLesson video generator ({}) v{}", MODULE_NAME, env!("CARGO_PKG_VERSION"));

    let Some(api_key) = config.api_key.clone() else {
        bail!("HEYGEN_API_KEY is not set");
    };

    let mut lessons = Vec::with_capacity(args.lesson_file.len());
    for path in &args.lesson_file {
        lessons.push(read_lesson(path).await?);
    }

    let data_dir = resolve_data_dir(args.data_dir.as_deref(), config.data_dir.as_deref());
    ensure_directory(&data_dir).context("Failed to create data folder")?;
    let store = storage::from_config(&config.storage, &data_dir)
        .context("Failed to configure object storage")?;

    let client = HeygenClient::new(
        &config.heygen_base_url,
        api_key,
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("Failed to configure video API client")?;

    let processor = LessonVideoProcessor::new(
        Arc::new(client),
        store,
        config.avatars.clone(),
        config.processor_settings(),
    );

    let outcomes = processor.batch_generate(&lessons, args.avatar).await;
    let succeeded = outcomes.iter().filter(|o| o.success).count();
    info!("{} of {} videos generated", succeeded, outcomes.len());

    println!("{}", serde_json::to_string_pretty(&outcomes)?);
    Ok(())
}
