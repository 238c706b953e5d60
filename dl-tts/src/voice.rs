//! Voice profiles

use dl_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Kelly,
    Ken,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceProfile {
    pub name: &'static str,
    pub gender: &'static str,
    pub language: &'static str,
    pub pitch: f32,
    pub rate: f32,
}

impl Voice {
    pub const ALL: [Voice; 2] = [Voice::Kelly, Voice::Ken];

    pub fn parse(label: &str) -> Result<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "kelly" => Ok(Voice::Kelly),
            "ken" => Ok(Voice::Ken),
            other => Err(Error::InvalidInput(format!(
                "Unknown voice '{}'; expected one of: kelly, ken",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Kelly => "kelly",
            Voice::Ken => "ken",
        }
    }

    pub fn profile(&self) -> VoiceProfile {
        match self {
            Voice::Kelly => VoiceProfile {
                name: "Kelly",
                gender: "female",
                language: "en-US",
                pitch: 1.1,
                rate: 0.9,
            },
            Voice::Ken => VoiceProfile {
                name: "Ken",
                gender: "male",
                language: "en-US",
                pitch: 0.9,
                rate: 0.85,
            },
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Voice name -> profile, as served by `GET /voices`
pub fn voice_profiles() -> BTreeMap<&'static str, VoiceProfile> {
    Voice::ALL
        .iter()
        .map(|voice| (voice.as_str(), voice.profile()))
        .collect()
}
