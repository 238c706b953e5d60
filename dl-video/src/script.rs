//! Narration script extraction

use dl_common::GeneratedLesson;
use serde::Serialize;

pub const WORDS_PER_MINUTE: f64 = 150.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonScript {
    /// Voice texts joined by single spaces
    pub full_script: String,
    pub word_count: usize,
    /// Whole seconds, rounded up
    pub estimated_duration: u64,
    pub segments: usize,
}

/// One flowing narration built from every script entry, in order
pub fn extract_script(lesson: &GeneratedLesson) -> LessonScript {
    let full_script = lesson.voice_texts().collect::<Vec<_>>().join(" ");
    let word_count = full_script.split_whitespace().count();
    let estimated_duration = (word_count as f64 / WORDS_PER_MINUTE * 60.0).ceil() as u64;

    LessonScript {
        full_script,
        word_count,
        estimated_duration,
        segments: lesson.scripts.len(),
    }
}
