//! Daily lessons built from the curriculum
//!
//! Each day-of-year topic becomes a `daily_lesson_<day>` template that runs
//! through the regular generator and cache.

use crate::curriculum::{CurriculumLoader, DailyTopic};
use crate::lesson::{
    AgeBucket, AgeExpression, LessonDna, LessonGenerator, LessonQuestion, LessonRequest, Tone,
};
use dl_common::calendar;
use dl_common::{Error, GeneratedLesson, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const DEFAULT_AGE: i64 = 25;
pub const DEFAULT_LANGUAGE: &str = "english";
pub const MIN_AGE: i64 = 2;
pub const MAX_AGE: i64 = 102;

/// Query parameters of the daily lesson endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyParams {
    pub day: Option<u32>,
    pub age: Option<i64>,
    pub tone: Option<String>,
    pub language: Option<String>,
}

/// Resolved, validated daily lesson request
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRequest {
    pub day: u32,
    pub age: i64,
    pub tone: Tone,
    pub language: String,
}

impl DailyParams {
    /// Apply defaults and validate; `today` fills a missing day
    pub fn resolve(self, today: u32) -> Result<DailyRequest> {
        let age = self.age.unwrap_or(DEFAULT_AGE);
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(Error::InvalidInput(format!(
                "Age must be between {} and {}",
                MIN_AGE, MAX_AGE
            )));
        }

        let tone = match self.tone.as_deref() {
            None => Tone::Neutral,
            Some(label) => Tone::parse(label).ok_or_else(|| {
                Error::InvalidInput("Tone must be one of: grandmother, fun, neutral".to_string())
            })?,
        };

        let language = self
            .language
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Ok(DailyRequest {
            day: self.day.unwrap_or(today),
            age,
            tone,
            language,
        })
    }
}

/// Template for one curriculum day
pub fn daily_dna(topic: &DailyTopic) -> LessonDna {
    let tiers = [
        (AgeBucket::EarlyChildhood, "basic", "3-5 minutes"),
        (AgeBucket::Youth, "basic", "5-10 minutes"),
        (AgeBucket::YoungAdult, "intermediate", "10-15 minutes"),
        (AgeBucket::Midlife, "advanced", "15-20 minutes"),
        (AgeBucket::WisdomYears, "reflective", "10-15 minutes"),
    ];

    let age_expressions: BTreeMap<AgeBucket, AgeExpression> = tiers
        .into_iter()
        .map(|(bucket, complexity, span)| {
            (
                bucket,
                AgeExpression {
                    concept_name: topic.title.clone(),
                    complexity_level: complexity.to_string(),
                    attention_span: span.to_string(),
                    example: String::new(),
                },
            )
        })
        .collect();

    LessonDna {
        lesson_id: format!("daily_lesson_{}", topic.day),
        title: topic.title.clone(),
        core_principle: topic.learning_objective.clone(),
        age_expressions,
        questions: vec![LessonQuestion {
            question: "What will you do with what you learned today?".to_string(),
            option_a: "Try it out today".to_string(),
            option_b: "Think it over first".to_string(),
            option_a_response: "Wonderful! Putting ideas into practice is how they stick."
                .to_string(),
            option_b_response: "Good thinking. Reflection turns information into understanding."
                .to_string(),
        }],
    }
}

/// Load the day's topic and generate (or fetch) its lesson
pub async fn daily_lesson(
    generator: &LessonGenerator,
    curriculum: &CurriculumLoader,
    request: &DailyRequest,
) -> Result<Arc<GeneratedLesson>> {
    let topic = curriculum.load_daily_topic(request.day).await?;
    let dna = daily_dna(&topic);

    let lesson_request = LessonRequest::new(
        dna.lesson_id.clone(),
        request.age,
        request.tone.as_str(),
        request.language.clone(),
    )
    .with_day(topic.day, topic.date.clone());

    generator.generate_from_dna(&dna, &lesson_request).await
}

/// Today's day-of-year in UTC
pub fn today() -> u32 {
    calendar::current_day_of_year()
}
