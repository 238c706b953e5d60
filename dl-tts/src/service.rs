//! Speech synthesis with validation, duration estimate and result cache

use crate::voice::{Voice, VoiceProfile};
use async_trait::async_trait;
use dl_common::storage::{ObjectStore, PutObject};
use dl_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

pub const MAX_TEXT_CHARS: usize = 1000;
pub const WORDS_PER_MINUTE: f64 = 150.0;

/// `POST /synthesize` body
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_speed")]
    pub speed: f64,
}

fn default_voice() -> String {
    "kelly".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_speed() -> f64 {
    1.0
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: default_voice(),
            language: default_language(),
            speed: default_speed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisResult {
    pub audio_url: String,
    /// Estimated spoken seconds
    pub duration: f64,
    pub cached: bool,
}

/// Spoken length estimate at 150 words per minute, scaled by speed
pub fn estimate_duration(text: &str, speed: f64) -> f64 {
    let words = text.split_whitespace().count() as f64;
    words / WORDS_PER_MINUTE * 60.0 / speed
}

/// Text must hold 1..=1000 characters; speed must be a positive number
pub fn validate(text: &str, speed: f64) -> Result<()> {
    let chars = text.chars().count();
    if chars == 0 || chars > MAX_TEXT_CHARS {
        return Err(Error::InvalidInput(format!(
            "Text must be between 1 and {} characters",
            MAX_TEXT_CHARS
        )));
    }
    if !speed.is_finite() || speed <= 0.0 {
        return Err(Error::InvalidInput("Speed must be a positive number".to_string()));
    }
    Ok(())
}

/// Opaque speech synthesizer
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Synthesize `text`, returning a URL for the audio
    async fn synthesize(
        &self,
        text: &str,
        voice: Voice,
        profile: &VoiceProfile,
        language: &str,
        speed: f64,
    ) -> Result<String>;

    /// Short name reported by `/status`
    fn environment(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TtsKey {
    voice: Voice,
    language: String,
    speed_bits: u64,
    text: String,
}

/// Audio URLs keyed by the exact (voice, language, speed, text) request
#[derive(Debug, Default)]
pub struct TtsCache {
    entries: RwLock<HashMap<TtsKey, String>>,
}

impl TtsCache {
    pub fn new() -> Self {
        Self::default()
    }

    async fn get(&self, key: &TtsKey) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    async fn insert(&self, key: TtsKey, audio_url: String) {
        self.entries.write().await.insert(key, audio_url);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct TtsStatus {
    pub status: &'static str,
    pub voices: Vec<&'static str>,
    pub cache_size: usize,
    pub environment: String,
}

pub struct TtsService {
    backend: Arc<dyn SpeechBackend>,
    cache: TtsCache,
    store: Arc<dyn ObjectStore>,
}

impl TtsService {
    pub fn new(backend: Arc<dyn SpeechBackend>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            backend,
            cache: TtsCache::new(),
            store,
        }
    }

    pub fn cache(&self) -> &TtsCache {
        &self.cache
    }

    pub async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResult> {
        validate(&request.text, request.speed)?;
        let voice = Voice::parse(&request.voice)?;
        let duration = estimate_duration(&request.text, request.speed);

        let key = TtsKey {
            voice,
            language: request.language.clone(),
            speed_bits: request.speed.to_bits(),
            text: request.text.clone(),
        };

        if let Some(audio_url) = self.cache.get(&key).await {
            debug!(voice = %voice, "TTS cache hit");
            return Ok(SynthesisResult {
                audio_url,
                duration,
                cached: true,
            });
        }

        let audio_url = self
            .backend
            .synthesize(
                &request.text,
                voice,
                &voice.profile(),
                &request.language,
                request.speed,
            )
            .await?;
        self.cache.insert(key, audio_url.clone()).await;

        info!(voice = %voice, chars = request.text.chars().count(), "Synthesized speech");
        Ok(SynthesisResult {
            audio_url,
            duration,
            cached: false,
        })
    }

    /// Store reference audio at `voices/<voice>/reference.wav`, returning its URL
    pub async fn upload_reference_voice(&self, audio: Vec<u8>, voice: &str) -> Result<String> {
        let voice = Voice::parse(voice)?;
        if audio.is_empty() {
            return Err(Error::InvalidInput("No file provided".to_string()));
        }

        let key = format!("voices/{}/reference.wav", voice);
        let url = self
            .store
            .put(PutObject::new(key, audio, "audio/wav").with_metadata("voice", voice.as_str()))
            .await?;

        info!(voice = %voice, url = %url, "Reference voice uploaded");
        Ok(url)
    }

    pub async fn status(&self) -> TtsStatus {
        TtsStatus {
            status: "ready",
            voices: Voice::ALL.iter().map(|v| v.as_str()).collect(),
            cache_size: self.cache.len().await,
            environment: self.backend.environment().to_string(),
        }
    }
}
