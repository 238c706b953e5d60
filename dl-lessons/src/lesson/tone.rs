//! Tone profiles: phrase fragments, avatar and delivery guidance per tone

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Fun,
    Grandmother,
    #[default]
    Neutral,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Fun, Tone::Grandmother, Tone::Neutral];

    /// Exact (case-insensitive) match against a known tone
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "fun" => Some(Tone::Fun),
            "grandmother" => Some(Tone::Grandmother),
            "neutral" => Some(Tone::Neutral),
            _ => None,
        }
    }

    /// Unknown labels fall back to [`Tone::Neutral`]
    pub fn parse_or_default(label: &str) -> Self {
        Self::parse(label).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Fun => "fun",
            Tone::Grandmother => "grandmother",
            Tone::Neutral => "neutral",
        }
    }

    pub fn profile(&self) -> &'static ToneProfile {
        match self {
            Tone::Fun => &FUN,
            Tone::Grandmother => &GRANDMOTHER,
            Tone::Neutral => &NEUTRAL,
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interchangeable phrase fragments and presentation for one tone
#[derive(Debug)]
pub struct ToneProfile {
    pub tone: Tone,
    pub openings: &'static [&'static str],
    pub encouragements: &'static [&'static str],
    pub closings: &'static [&'static str],
    pub avatar: &'static str,
    pub guidance: &'static str,
}

static GRANDMOTHER: ToneProfile = ToneProfile {
    tone: Tone::Grandmother,
    openings: &["Oh sweetheart,", "My dear,", "Precious one,"],
    encouragements: &["What a wise soul you are!", "You have such insight!"],
    closings: &["Rest well, dear heart.", "What a treasure you are."],
    avatar: "kelly",
    guidance: "Use warm, nurturing tone with gentle encouragement",
};

static FUN: ToneProfile = ToneProfile {
    tone: Tone::Fun,
    openings: &["Alright superstar!", "Ready to level up?", "Time for magic!"],
    encouragements: &["BOOM! You nailed it!", "You're crushing this!"],
    closings: &["You're going to be amazing!", "See you tomorrow, champion!"],
    avatar: "kelly",
    guidance: "Use energetic, playful delivery with lots of enthusiasm",
};

static NEUTRAL: ToneProfile = ToneProfile {
    tone: Tone::Neutral,
    openings: &["Welcome.", "Let's begin.", "Here's what's important."],
    encouragements: &["Excellent thinking.", "You understand.", "That's exactly right."],
    closings: &[
        "This foundation will serve you well.",
        "You've built valuable skills.",
    ],
    avatar: "ken",
    guidance: "Use calm, measured delivery with clear explanations",
};
