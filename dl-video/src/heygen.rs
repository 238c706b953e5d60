//! Video synthesis API client
//!
//! Heygen v2: `POST /video/generate` submits a job, `GET /video/<id>`
//! reports its status. Either response may carry its payload at the top
//! level or wrapped in `data`.

use crate::avatar::AvatarIds;
use async_trait::async_trait;
use dl_common::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.heygen.com/v2";

const USER_AGENT: &str = concat!("dl-video/", env!("CARGO_PKG_VERSION"));
const SERVICE_NAME: &str = "Heygen API";
const BACKGROUND_COLOR: &str = "#f0f8ff";

/// Video job to submit
#[derive(Debug, Clone)]
pub struct VideoJob {
    pub script: String,
    pub ids: AvatarIds,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VideoStatus {
    /// Still queued or rendering; carries the reported status label
    InProgress(String),
    Completed { video_url: String },
    Failed { error: String },
}

/// External video synthesis service
#[async_trait]
pub trait VideoService: Send + Sync {
    /// Submit a job, returning the service's video id
    async fn submit(&self, job: &VideoJob) -> Result<String>;

    async fn status(&self, video_id: &str) -> Result<VideoStatus>;

    /// Fetch a finished video file
    async fn download(&self, video_url: &str) -> Result<Vec<u8>>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    video_inputs: [VideoInput<'a>; 1],
    dimension: Dimension,
    aspect_ratio: &'static str,
}

#[derive(Serialize)]
struct VideoInput<'a> {
    character: Character<'a>,
    voice: VoiceInput<'a>,
    background: Background,
}

#[derive(Serialize)]
struct Character<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    avatar_id: &'a str,
    avatar_style: &'static str,
}

#[derive(Serialize)]
struct VoiceInput<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    input_text: &'a str,
    voice_id: &'a str,
}

#[derive(Serialize)]
struct Background {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'static str,
}

#[derive(Serialize)]
struct Dimension {
    width: u32,
    height: u32,
}

impl<'a> GenerateRequest<'a> {
    fn new(job: &'a VideoJob) -> Self {
        Self {
            video_inputs: [VideoInput {
                character: Character {
                    kind: "avatar",
                    avatar_id: &job.ids.avatar_id,
                    avatar_style: "normal",
                },
                voice: VoiceInput {
                    kind: "text",
                    input_text: &job.script,
                    voice_id: &job.ids.voice_id,
                },
                background: Background {
                    kind: "color",
                    value: BACKGROUND_COLOR,
                },
            }],
            dimension: Dimension {
                width: 1920,
                height: 1080,
            },
            aspect_ratio: "16:9",
        }
    }
}

#[derive(Debug, Deserialize)]
struct SubmitPayload {
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct StatusPayload {
    status: String,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    error: Option<Value>,
}

/// Payload at `data` when present, the whole body otherwise
fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("data").map_or(false, Value::is_object) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Best human-readable message in an error body
fn error_message(body: &Value) -> Option<String> {
    let candidates = [
        body.get("message"),
        body.get("error").and_then(|e| e.get("message")),
        body.get("error"),
    ];
    candidates.into_iter().flatten().find_map(|v| match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    })
}

fn parse_status(body: Value) -> Result<VideoStatus> {
    let payload: StatusPayload = serde_json::from_value(unwrap_data(body))
        .map_err(|e| Error::upstream(SERVICE_NAME, format!("Invalid status response: {}", e)))?;

    match payload.status.as_str() {
        "completed" => payload
            .video_url
            .map(|video_url| VideoStatus::Completed { video_url })
            .ok_or_else(|| Error::upstream(SERVICE_NAME, "Completed video has no video_url")),
        "failed" => {
            let error = match payload.error {
                Some(Value::String(s)) => s,
                Some(other) => error_message(&other).unwrap_or_else(|| other.to_string()),
                None => "unknown error".to_string(),
            };
            Ok(VideoStatus::Failed { error })
        }
        _ => Ok(VideoStatus::InProgress(payload.status)),
    }
}

pub struct HeygenClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HeygenClient {
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| format!("HTTP {}", status));
            return Err(Error::upstream(SERVICE_NAME, message));
        }
        if body.is_null() {
            return Err(Error::upstream(SERVICE_NAME, "Response was not JSON"));
        }
        Ok(body)
    }
}

#[async_trait]
impl VideoService for HeygenClient {
    async fn submit(&self, job: &VideoJob) -> Result<String> {
        let response = self
            .http_client
            .post(self.url("/video/generate"))
            .header("X-Api-Key", &self.api_key)
            .json(&GenerateRequest::new(job))
            .send()
            .await?;

        let body = Self::read_json(response).await?;
        let payload: SubmitPayload = serde_json::from_value(unwrap_data(body))
            .map_err(|e| Error::upstream(SERVICE_NAME, format!("Invalid submit response: {}", e)))?;
        debug!(video_id = %payload.video_id, "Video job submitted");
        Ok(payload.video_id)
    }

    async fn status(&self, video_id: &str) -> Result<VideoStatus> {
        let response = self
            .http_client
            .get(self.url(&format!("/video/{}", video_id)))
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        parse_status(Self::read_json(response).await?)
    }

    async fn download(&self, video_url: &str) -> Result<Vec<u8>> {
        let response = self.http_client.get(video_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::upstream(
                "Video download",
                format!("Failed to download video: HTTP {}", status),
            ));
        }
        Ok(response.bytes().await?.to_vec())
    }
}
