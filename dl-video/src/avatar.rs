//! Presenter avatars and their video-service identifiers

use dl_common::config::env_or;
use dl_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Avatar {
    #[default]
    Ken,
    Kelly,
}

impl Avatar {
    pub fn as_str(&self) -> &'static str {
        match self {
            Avatar::Ken => "ken",
            Avatar::Kelly => "kelly",
        }
    }
}

impl fmt::Display for Avatar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Avatar {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ken" => Ok(Avatar::Ken),
            "kelly" => Ok(Avatar::Kelly),
            other => Err(Error::InvalidInput(format!(
                "Unknown avatar '{}'; expected ken or kelly",
                other
            ))),
        }
    }
}

/// Avatar and voice identifiers on the video service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarIds {
    pub avatar_id: String,
    pub voice_id: String,
}

/// Configured identifiers for both presenters
///
/// TOML `[avatars]` section; `KEN_AVATAR_ID`, `KEN_VOICE_ID`,
/// `KELLY_AVATAR_ID` and `KELLY_VOICE_ID` win over file values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvatarCatalog {
    #[serde(default)]
    pub ken_avatar_id: Option<String>,
    #[serde(default)]
    pub ken_voice_id: Option<String>,
    #[serde(default)]
    pub kelly_avatar_id: Option<String>,
    #[serde(default)]
    pub kelly_voice_id: Option<String>,
}

impl AvatarCatalog {
    pub fn with_env_overrides(self) -> Self {
        Self {
            ken_avatar_id: env_or("KEN_AVATAR_ID", self.ken_avatar_id),
            ken_voice_id: env_or("KEN_VOICE_ID", self.ken_voice_id),
            kelly_avatar_id: env_or("KELLY_AVATAR_ID", self.kelly_avatar_id),
            kelly_voice_id: env_or("KELLY_VOICE_ID", self.kelly_voice_id),
        }
    }

    pub fn resolve(&self, avatar: Avatar) -> Result<AvatarIds> {
        let (avatar_id, voice_id, prefix) = match avatar {
            Avatar::Ken => (&self.ken_avatar_id, &self.ken_voice_id, "KEN"),
            Avatar::Kelly => (&self.kelly_avatar_id, &self.kelly_voice_id, "KELLY"),
        };

        let avatar_id = avatar_id.clone().ok_or_else(|| {
            Error::Config(format!("No avatar id configured for {} ({}_AVATAR_ID)", avatar, prefix))
        })?;
        let voice_id = voice_id.clone().ok_or_else(|| {
            Error::Config(format!("No voice id configured for {} ({}_VOICE_ID)", avatar, prefix))
        })?;
        Ok(AvatarIds { avatar_id, voice_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("Ken".parse::<Avatar>().unwrap(), Avatar::Ken);
        assert_eq!("kelly".parse::<Avatar>().unwrap(), Avatar::Kelly);
        assert!("bob".parse::<Avatar>().is_err());
        assert_eq!(Avatar::default(), Avatar::Ken);
    }

    #[test]
    fn test_resolve() {
        let catalog = AvatarCatalog {
            ken_avatar_id: Some("av-ken".into()),
            ken_voice_id: Some("vo-ken".into()),
            kelly_avatar_id: Some("av-kelly".into()),
            kelly_voice_id: None,
        };
        assert_eq!(
            catalog.resolve(Avatar::Ken).unwrap(),
            AvatarIds {
                avatar_id: "av-ken".into(),
                voice_id: "vo-ken".into()
            }
        );
        let err = catalog.resolve(Avatar::Kelly).unwrap_err();
        assert!(err.to_string().contains("KELLY_VOICE_ID"));
    }
}
