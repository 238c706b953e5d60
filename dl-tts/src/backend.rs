//! HTTP voice server backend
//!
//! The voice server answers `POST /generate-speech` with
//! `{success, audio_url, duration, message}`; `audio_url` is relative to the
//! server (`/audio/<file>.wav`). Both resolve under the base URL's path, so a
//! server mounted at `http://host/tts` is reached at `http://host/tts/generate-speech`.

use crate::service::SpeechBackend;
use crate::voice::{Voice, VoiceProfile};
use async_trait::async_trait;
use dl_common::{Error, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("dl-tts/", env!("CARGO_PKG_VERSION"));
const SERVICE_NAME: &str = "Voice server";

#[derive(Debug, Serialize)]
struct GenerateSpeechRequest<'a> {
    text: &'a str,
    speed: f64,
    pitch: f32,
    voice_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateSpeechResponse {
    success: bool,
    #[serde(default)]
    audio_url: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct VoiceServerBackend {
    http_client: reqwest::Client,
    base_url: Url,
}

impl VoiceServerBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("Invalid voice server URL '{}': {}", base_url, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Resolve `path` under the base URL; absolute URLs pass through
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::Config(format!("Invalid voice server path '{}': {}", path, e)))
    }
}

#[async_trait]
impl SpeechBackend for VoiceServerBackend {
    async fn synthesize(
        &self,
        text: &str,
        voice: Voice,
        profile: &VoiceProfile,
        _language: &str,
        speed: f64,
    ) -> Result<String> {
        let url = self.endpoint("generate-speech")?;
        debug!(url = %url, voice = %voice, "Requesting speech");

        let response = self
            .http_client
            .post(url)
            .json(&GenerateSpeechRequest {
                text,
                speed,
                pitch: profile.pitch,
                voice_id: voice.as_str(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(
                SERVICE_NAME,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let body: GenerateSpeechResponse = response
            .json()
            .await
            .map_err(|e| Error::upstream(SERVICE_NAME, format!("Invalid response: {}", e)))?;

        if !body.success {
            return Err(Error::upstream(
                SERVICE_NAME,
                body.message.unwrap_or_else(|| "Speech generation failed".to_string()),
            ));
        }

        let audio_url = body
            .audio_url
            .ok_or_else(|| Error::upstream(SERVICE_NAME, "Response missing audio_url"))?;
        Ok(self.endpoint(&audio_url)?.to_string())
    }

    fn environment(&self) -> &str {
        "voice-server"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_resolves_relative_audio_url() {
        let router = Router::new().route(
            "/generate-speech",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["voice_id"], "ken");
                assert_eq!(body["text"], "Hello there");
                Json(json!({
                    "success": true,
                    "audio_url": "/audio/tmp123.wav",
                    "duration": 1.0,
                    "message": "Voice cloned successfully"
                }))
            }),
        );
        let base = spawn_server(router).await;

        let backend = VoiceServerBackend::new(&base, Duration::from_secs(5)).unwrap();
        let url = backend
            .synthesize("Hello there", Voice::Ken, &Voice::Ken.profile(), "en-US", 1.0)
            .await
            .unwrap();
        assert_eq!(url, format!("{}/audio/tmp123.wav", base));
    }

    #[tokio::test]
    async fn test_reported_failure_is_upstream_error() {
        let router = Router::new().route(
            "/generate-speech",
            post(|| async { Json(json!({"success": false, "message": "Error: not ready"})) }),
        );
        let base = spawn_server(router).await;

        let backend = VoiceServerBackend::new(&base, Duration::from_secs(5)).unwrap();
        let err = backend
            .synthesize("Hi", Voice::Kelly, &Voice::Kelly.profile(), "en-US", 1.0)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Voice server error: Error: not ready");
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let router = Router::new().route(
            "/generate-speech",
            post(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "busy") }),
        );
        let base = spawn_server(router).await;

        let backend = VoiceServerBackend::new(&base, Duration::from_secs(5)).unwrap();
        let err = backend
            .synthesize("Hi", Voice::Kelly, &Voice::Kelly.profile(), "en-US", 1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_keeps_base_url_path_prefix() {
        let router = Router::new().route(
            "/tts/generate-speech",
            post(|| async {
                Json(json!({"success": true, "audio_url": "/audio/x.wav"}))
            }),
        );
        let origin = spawn_server(router).await;
        let base = format!("{}/tts", origin);

        let backend = VoiceServerBackend::new(&base, Duration::from_secs(5)).unwrap();
        let url = backend
            .synthesize("Hi", Voice::Ken, &Voice::Ken.profile(), "en-US", 1.0)
            .await
            .unwrap();
        assert_eq!(url, format!("{}/tts/audio/x.wav", origin));
    }

    #[test]
    fn test_endpoint_resolution() {
        let backend =
            VoiceServerBackend::new("http://voice.example/tts", Duration::from_secs(1)).unwrap();
        assert_eq!(
            backend.endpoint("generate-speech").unwrap().as_str(),
            "http://voice.example/tts/generate-speech"
        );
        assert_eq!(
            backend.endpoint("https://cdn.example/a.wav").unwrap().as_str(),
            "https://cdn.example/a.wav"
        );

        let bare = VoiceServerBackend::new("http://voice.example", Duration::from_secs(1)).unwrap();
        assert_eq!(
            bare.endpoint("/audio/tmp.wav").unwrap().as_str(),
            "http://voice.example/audio/tmp.wav"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            VoiceServerBackend::new("not a url", Duration::from_secs(1)),
            Err(Error::Config(_))
        ));
    }
}
