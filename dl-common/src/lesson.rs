//! Generated lesson document
//!
//! Produced by the lesson generator (dl-lessons), serialized to JSON by the
//! HTTP API and consumed by the video pipeline (dl-video).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a script entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptType {
    Opening,
    Example,
    Question,
    OptionAResponse,
    OptionBResponse,
    Encouragement,
}

/// One voice/on-screen text pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEntry {
    /// 1-based position in the lesson
    pub script_number: u32,
    pub script_type: ScriptType,
    pub voice_text: String,
    pub on_screen_text: String,
    /// Avatar presenting this entry (`ken`, `kelly`)
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonMetadata {
    pub lesson_id: String,
    pub title: String,
    /// Learner age as requested (not validated)
    pub age_target: i64,
    /// Age bucket used to pick the expression (`early_childhood`, `youth`, ...)
    pub age_category: String,
    /// Resolved tone profile name
    pub tone: String,
    /// Free-form language label; no translation happens
    pub language: String,
    pub complexity: String,
    pub duration: String,
    pub generated_at: DateTime<Utc>,
    /// Day of year, for daily lessons
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    /// Date label, for daily lessons
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionNotes {
    pub tone_guidance: String,
    pub age_considerations: String,
    pub language_notes: String,
}

/// Complete lesson: metadata plus ordered scripts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedLesson {
    pub lesson_metadata: LessonMetadata,
    pub scripts: Vec<ScriptEntry>,
    pub production_notes: ProductionNotes,
}

impl GeneratedLesson {
    pub fn lesson_id(&self) -> &str {
        &self.lesson_metadata.lesson_id
    }

    /// Voice texts of all scripts, in order
    pub fn voice_texts(&self) -> impl Iterator<Item = &str> {
        self.scripts.iter().map(|s| s.voice_text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_type_wire_names() {
        let json = serde_json::to_string(&ScriptType::OptionAResponse).unwrap();
        assert_eq!(json, "\"option_a_response\"");
        let parsed: ScriptType = serde_json::from_str("\"encouragement\"").unwrap();
        assert_eq!(parsed, ScriptType::Encouragement);
    }

    #[test]
    fn test_metadata_omits_absent_day() {
        let metadata = LessonMetadata {
            lesson_id: "negotiation_skills".into(),
            title: "Collaborative Problem Solving".into(),
            age_target: 30,
            age_category: "young_adult".into(),
            tone: "neutral".into(),
            language: "english".into(),
            complexity: "intermediate".into(),
            duration: "10-15 minutes".into(),
            generated_at: Utc::now(),
            day: None,
            date: None,
        };
        let json = serde_json::to_value(&metadata).unwrap();
        assert!(json.get("day").is_none());
        assert!(json.get("date").is_none());
        assert_eq!(json["age_target"], 30);
    }
}
