//! Lesson generation
//!
//! `request -> cache lookup -> DNA -> bucket expression + tone profile -> scripts`

use super::age::{age_considerations, AgeBucket};
use super::cache::{LessonCache, LessonKey};
use super::chooser::{pick, PhraseChooser};
use super::dna::{LessonDna, LessonLibrary};
use super::tone::Tone;
use chrono::Utc;
use dl_common::lesson::ScriptType;
use dl_common::{Error, GeneratedLesson, LessonMetadata, ProductionNotes, Result, ScriptEntry};
use std::sync::Arc;
use tracing::{debug, info};

/// One generation request
#[derive(Debug, Clone, PartialEq)]
pub struct LessonRequest {
    pub lesson_id: String,
    pub age: i64,
    /// Raw tone label; unknown labels render with the neutral profile
    pub tone: String,
    pub language: String,
    pub force_regenerate: bool,
    /// Calendar stamp copied into metadata for daily lessons
    pub day: Option<u32>,
    pub date: Option<String>,
}

impl LessonRequest {
    pub fn new(
        lesson_id: impl Into<String>,
        age: i64,
        tone: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            lesson_id: lesson_id.into(),
            age,
            tone: tone.into(),
            language: language.into(),
            force_regenerate: false,
            day: None,
            date: None,
        }
    }

    pub fn force_regenerate(mut self, force: bool) -> Self {
        self.force_regenerate = force;
        self
    }

    pub fn with_day(mut self, day: u32, date: impl Into<String>) -> Self {
        self.day = Some(day);
        self.date = Some(date.into());
        self
    }

    pub fn key(&self) -> LessonKey {
        LessonKey::new(&self.lesson_id, self.age, &self.tone, &self.language)
    }
}

pub struct LessonGenerator {
    library: Arc<LessonLibrary>,
    cache: Arc<LessonCache>,
    chooser: Arc<dyn PhraseChooser>,
}

impl LessonGenerator {
    pub fn new(
        library: Arc<LessonLibrary>,
        cache: Arc<LessonCache>,
        chooser: Arc<dyn PhraseChooser>,
    ) -> Self {
        Self {
            library,
            cache,
            chooser,
        }
    }

    pub fn library(&self) -> &LessonLibrary {
        &self.library
    }

    pub fn cache(&self) -> &LessonCache {
        &self.cache
    }

    /// Generate (or fetch from cache) a lesson held in the library
    pub async fn generate(&self, request: &LessonRequest) -> Result<Arc<GeneratedLesson>> {
        let dna = self
            .library
            .get(&request.lesson_id)
            .ok_or_else(|| Error::NotFound(format!("Lesson '{}' not found", request.lesson_id)))?;
        self.generate_from_dna(dna, request).await
    }

    /// Generate from DNA that need not live in the library
    ///
    /// Shares the cache with [`generate`](Self::generate); the key uses
    /// `request.lesson_id`.
    pub async fn generate_from_dna(
        &self,
        dna: &LessonDna,
        request: &LessonRequest,
    ) -> Result<Arc<GeneratedLesson>> {
        let key = request.key();

        if !request.force_regenerate {
            if let Some(cached) = self.cache.get(&key).await {
                debug!(cache_key = %key, "Lesson cache hit");
                return Ok(cached);
            }
        }

        let lesson = Arc::new(self.render(dna, request)?);
        self.cache.insert(key.clone(), lesson.clone()).await;

        info!(
            cache_key = %key,
            scripts = lesson.scripts.len(),
            forced = request.force_regenerate,
            "Generated lesson"
        );
        Ok(lesson)
    }

    fn render(&self, dna: &LessonDna, request: &LessonRequest) -> Result<GeneratedLesson> {
        let bucket = AgeBucket::for_age(request.age);
        let expression = dna.expression_for(bucket).ok_or_else(|| {
            Error::Internal(format!("Lesson '{}' has no age expressions", dna.lesson_id))
        })?;
        let profile = Tone::parse_or_default(&request.tone).profile();
        let chooser = self.chooser.as_ref();
        let avatar = profile.avatar;

        let concept = expression.concept_name.to_lowercase();
        let principle = lower_first(&dna.core_principle);

        let mut scripts = Vec::with_capacity(3 + dna.questions.len() * 3);
        let mut push = |script_type: ScriptType, voice_text: String, on_screen_text: String| {
            let script_number = scripts.len() as u32 + 1;
            scripts.push(ScriptEntry {
                script_number,
                script_type,
                voice_text,
                on_screen_text,
                avatar: avatar.to_string(),
            });
        };

        push(
            ScriptType::Opening,
            format!(
                "{} Today we're exploring {}. {} is about {}.",
                pick(chooser, profile.openings),
                concept,
                dna.title,
                principle
            ),
            expression.concept_name.clone(),
        );

        if !expression.example.is_empty() {
            push(
                ScriptType::Example,
                format!(
                    "Think about {}. That's a perfect moment for {}.",
                    expression.example, concept
                ),
                format!("Example: {}", upper_first(&expression.example)),
            );
        }

        for question in &dna.questions {
            push(
                ScriptType::Question,
                question.question.clone(),
                format!("A: {}  |  B: {}", question.option_a, question.option_b),
            );
            push(
                ScriptType::OptionAResponse,
                question.option_a_response.clone(),
                question.option_a.clone(),
            );
            push(
                ScriptType::OptionBResponse,
                question.option_b_response.clone(),
                question.option_b.clone(),
            );
        }

        let encouragement = pick(chooser, profile.encouragements);
        push(
            ScriptType::Encouragement,
            format!("{} {}", encouragement, pick(chooser, profile.closings)),
            encouragement.to_string(),
        );

        Ok(GeneratedLesson {
            lesson_metadata: LessonMetadata {
                lesson_id: request.lesson_id.clone(),
                title: dna.title.clone(),
                age_target: request.age,
                age_category: bucket.as_str().to_string(),
                tone: profile.tone.as_str().to_string(),
                language: request.language.clone(),
                complexity: expression.complexity_level.clone(),
                duration: expression.attention_span.clone(),
                generated_at: Utc::now(),
                day: request.day,
                date: request.date.clone(),
            },
            scripts,
            production_notes: ProductionNotes {
                tone_guidance: profile.guidance.to_string(),
                age_considerations: age_considerations(request.age).to_string(),
                language_notes: format!("Content in {}", request.language),
            },
        })
    }
}

fn lower_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn upper_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::chooser::FixedChooser;

    fn generator() -> LessonGenerator {
        LessonGenerator::new(
            Arc::new(LessonLibrary::builtin()),
            Arc::new(LessonCache::new()),
            Arc::new(FixedChooser(0)),
        )
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(lower_first("Finding Common Ground"), "finding Common Ground");
        assert_eq!(upper_first("when roommates disagree"), "When roommates disagree");
        assert_eq!(lower_first(""), "");
    }

    #[tokio::test]
    async fn test_script_order() {
        let lesson = generator()
            .generate(&LessonRequest::new("negotiation_skills", 30, "neutral", "english"))
            .await
            .unwrap();

        let types: Vec<ScriptType> = lesson.scripts.iter().map(|s| s.script_type).collect();
        assert_eq!(
            types,
            vec![
                ScriptType::Opening,
                ScriptType::Example,
                ScriptType::Question,
                ScriptType::OptionAResponse,
                ScriptType::OptionBResponse,
                ScriptType::Encouragement,
            ]
        );
        let numbers: Vec<u32> = lesson.scripts.iter().map(|s| s.script_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn test_pinned_fragments() {
        let lesson = generator()
            .generate(&LessonRequest::new("negotiation_skills", 30, "neutral", "english"))
            .await
            .unwrap();

        assert_eq!(
            lesson.scripts[0].voice_text,
            "Welcome. Today we're exploring collaborative negotiation. \
             Collaborative Problem Solving is about understanding others' interests creates better solutions."
        );
        assert_eq!(lesson.scripts[0].on_screen_text, "Collaborative Negotiation");
        assert_eq!(
            lesson.scripts[5].voice_text,
            "Excellent thinking. This foundation will serve you well."
        );
        assert!(lesson.scripts.iter().all(|s| s.avatar == "ken"));
    }

    #[tokio::test]
    async fn test_metadata_and_notes() {
        let lesson = generator()
            .generate(&LessonRequest::new("negotiation_skills", 40, "grandmother", "spanish"))
            .await
            .unwrap();

        let meta = &lesson.lesson_metadata;
        assert_eq!(meta.lesson_id, "negotiation_skills");
        assert_eq!(meta.age_target, 40);
        assert_eq!(meta.age_category, "midlife");
        assert_eq!(meta.tone, "grandmother");
        assert_eq!(meta.language, "spanish");
        assert_eq!(meta.complexity, "advanced");
        assert_eq!(meta.duration, "15-20 minutes");
        assert_eq!(lesson.production_notes.language_notes, "Content in spanish");
        assert!(lesson.production_notes.tone_guidance.contains("warm, nurturing"));
        assert!(lesson.scripts.iter().all(|s| s.avatar == "kelly"));
    }

    #[tokio::test]
    async fn test_unknown_tone_renders_neutral() {
        let lesson = generator()
            .generate(&LessonRequest::new("daily_learning", 25, "pirate", "english"))
            .await
            .unwrap();
        assert_eq!(lesson.lesson_metadata.tone, "neutral");
        assert_eq!(lesson.scripts[0].avatar, "ken");
    }

    #[tokio::test]
    async fn test_missing_example_skips_example_script() {
        let lesson = generator()
            .generate(&LessonRequest::new("daily_learning", 25, "fun", "english"))
            .await
            .unwrap();
        assert!(lesson
            .scripts
            .iter()
            .all(|s| s.script_type != ScriptType::Example));
        assert_eq!(lesson.scripts.len(), 5);
    }

    #[tokio::test]
    async fn test_fallback_bucket_keeps_requested_category() {
        let lesson = generator()
            .generate(&LessonRequest::new("daily_learning", 5, "fun", "english"))
            .await
            .unwrap();
        assert_eq!(lesson.lesson_metadata.age_category, "early_childhood");
        assert_eq!(lesson.scripts[0].on_screen_text, "Learning");
    }

    #[tokio::test]
    async fn test_multiple_questions() {
        let lesson = generator()
            .generate(&LessonRequest::new("sharing_kindness", 12, "fun", "english"))
            .await
            .unwrap();
        assert_eq!(lesson.scripts.len(), 9);
        assert_eq!(lesson.scripts[8].script_type, ScriptType::Encouragement);
    }

    #[tokio::test]
    async fn test_day_stamp_copied() {
        let request = LessonRequest::new("daily_learning", 25, "neutral", "english")
            .with_day(32, "February 1");
        let lesson = generator().generate(&request).await.unwrap();
        assert_eq!(lesson.lesson_metadata.day, Some(32));
        assert_eq!(lesson.lesson_metadata.date.as_deref(), Some("February 1"));
    }
}
