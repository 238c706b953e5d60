//! Lesson video pipeline
//!
//! submit -> poll until finished -> download -> store at
//! `lessons/<YYYY-MM-DD>/<lesson_id>.mp4`

use crate::avatar::{Avatar, AvatarCatalog};
use crate::heygen::{VideoJob, VideoService, VideoStatus};
use crate::script::extract_script;
use chrono::{DateTime, SecondsFormat, Utc};
use dl_common::storage::{ObjectStore, PutObject};
use dl_common::{Error, GeneratedLesson, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Polling and pacing intervals
#[derive(Debug, Clone, Copy)]
pub struct ProcessorSettings {
    pub poll_interval: Duration,
    /// Ceiling on the wait for one video
    pub timeout: Duration,
    /// Pause between submissions in a batch
    pub batch_delay: Duration,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            timeout: Duration::from_secs(600),
            batch_delay: Duration::from_secs(5),
        }
    }
}

/// A stored lesson video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedVideo {
    pub lesson_id: String,
    pub video_url: String,
    pub heygen_video_id: String,
    pub avatar: Avatar,
    /// Estimated narration seconds
    pub duration: u64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeMetadata {
    pub avatar: Avatar,
    pub duration: u64,
    pub generated_at: DateTime<Utc>,
}

/// Per-lesson result of a batch; failures are reported, not raised
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoOutcome {
    pub success: bool,
    pub lesson_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heygen_video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<OutcomeMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VideoOutcome {
    fn from_result(lesson_id: &str, result: Result<GeneratedVideo>) -> Self {
        match result {
            Ok(video) => Self {
                success: true,
                lesson_id: video.lesson_id,
                video_url: Some(video.video_url),
                heygen_video_id: Some(video.heygen_video_id),
                metadata: Some(OutcomeMetadata {
                    avatar: video.avatar,
                    duration: video.duration,
                    generated_at: video.generated_at,
                }),
                error: None,
            },
            Err(e) => Self {
                success: false,
                lesson_id: lesson_id.to_string(),
                video_url: None,
                heygen_video_id: None,
                metadata: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Object key for a lesson video generated at `at`
pub fn video_key(lesson_id: &str, at: DateTime<Utc>) -> String {
    format!("lessons/{}/{}.mp4", at.format("%Y-%m-%d"), lesson_id)
}

pub struct LessonVideoProcessor {
    video: Arc<dyn VideoService>,
    store: Arc<dyn ObjectStore>,
    avatars: AvatarCatalog,
    settings: ProcessorSettings,
}

impl LessonVideoProcessor {
    pub fn new(
        video: Arc<dyn VideoService>,
        store: Arc<dyn ObjectStore>,
        avatars: AvatarCatalog,
        settings: ProcessorSettings,
    ) -> Self {
        Self {
            video,
            store,
            avatars,
            settings,
        }
    }

    pub fn settings(&self) -> &ProcessorSettings {
        &self.settings
    }

    /// Produce and store the video for one lesson
    pub async fn generate(&self, lesson: &GeneratedLesson, avatar: Avatar) -> Result<GeneratedVideo> {
        let lesson_id = lesson.lesson_id();
        let ids = self.avatars.resolve(avatar)?;
        let script = extract_script(lesson);
        if script.word_count == 0 {
            return Err(Error::InvalidInput(format!(
                "Lesson '{}' has no voice text",
                lesson_id
            )));
        }

        let video_id = self
            .video
            .submit(&VideoJob {
                script: script.full_script,
                ids,
            })
            .await?;
        info!(lesson_id, video_id = %video_id, avatar = %avatar, "Video generation started");

        let source_url = self.wait_for_video(&video_id).await?;
        let generated_at = Utc::now();
        let video_url = self.store_video(&source_url, lesson_id, generated_at).await?;

        info!(lesson_id, url = %video_url, "Lesson video stored");
        Ok(GeneratedVideo {
            lesson_id: lesson_id.to_string(),
            video_url,
            heygen_video_id: video_id,
            avatar,
            duration: script.estimated_duration,
            generated_at,
        })
    }

    /// Poll until the job completes, fails, or the timeout passes
    ///
    /// Errors while checking status are logged and the poll continues.
    pub async fn wait_for_video(&self, video_id: &str) -> Result<String> {
        let started = Instant::now();

        while started.elapsed() < self.settings.timeout {
            match self.video.status(video_id).await {
                Ok(VideoStatus::Completed { video_url }) => return Ok(video_url),
                Ok(VideoStatus::Failed { error }) => {
                    return Err(Error::upstream(
                        "Heygen API",
                        format!("Video generation failed: {}", error),
                    ));
                }
                Ok(VideoStatus::InProgress(status)) => {
                    info!(video_id, status = %status, "Video still rendering");
                }
                Err(e) => warn!(video_id, error = %e, "Error checking video status"),
            }
            tokio::time::sleep(self.settings.poll_interval).await;
        }

        Err(Error::Timeout("Video generation timed out".to_string()))
    }

    async fn store_video(
        &self,
        source_url: &str,
        lesson_id: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<String> {
        let bytes = self.video.download(source_url).await?;
        let object = PutObject::new(video_key(lesson_id, generated_at), bytes, "video/mp4")
            .with_metadata("lesson-id", lesson_id)
            .with_metadata(
                "generated-at",
                generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            );
        self.store.put(object).await
    }

    /// Generate videos one after another, pausing between submissions
    pub async fn batch_generate(
        &self,
        lessons: &[GeneratedLesson],
        avatar: Avatar,
    ) -> Vec<VideoOutcome> {
        let mut outcomes = Vec::with_capacity(lessons.len());

        for (index, lesson) in lessons.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.settings.batch_delay).await;
            }
            info!(lesson_id = lesson.lesson_id(), "Processing lesson");

            let result = self.generate(lesson, avatar).await;
            if let Err(e) = &result {
                error!(lesson_id = lesson.lesson_id(), error = %e, "Video generation failed");
            }
            outcomes.push(VideoOutcome::from_result(lesson.lesson_id(), result));
        }

        outcomes
    }
}
