//! Lesson DNA: the static template behind every rendered lesson
//!
//! A template holds the title, the core principle, one expression per age
//! bucket and a small set of questions. Templates are read-only once the
//! library is built.

use super::age::AgeBucket;
use dl_common::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info};

/// How a lesson is pitched to one age bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeExpression {
    pub concept_name: String,
    pub complexity_level: String,
    pub attention_span: String,
    /// Situation the learner can picture; empty skips the example script
    #[serde(default)]
    pub example: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonQuestion {
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_a_response: String,
    pub option_b_response: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonDna {
    pub lesson_id: String,
    pub title: String,
    pub core_principle: String,
    pub age_expressions: BTreeMap<AgeBucket, AgeExpression>,
    pub questions: Vec<LessonQuestion>,
}

impl LessonDna {
    /// Structural checks applied to every template entering a library
    pub fn validate(&self) -> Result<()> {
        if self.lesson_id.trim().is_empty() {
            return Err(Error::InvalidInput("Lesson DNA has an empty lesson_id".to_string()));
        }
        if self.age_expressions.is_empty() {
            return Err(Error::InvalidInput(format!(
                "Lesson DNA '{}' has no age expressions",
                self.lesson_id
            )));
        }
        if self.questions.is_empty() {
            return Err(Error::InvalidInput(format!(
                "Lesson DNA '{}' has no questions",
                self.lesson_id
            )));
        }
        Ok(())
    }

    /// Expression for a bucket: exact match, else `youth`, else the youngest defined
    pub fn expression_for(&self, bucket: AgeBucket) -> Option<&AgeExpression> {
        self.age_expressions
            .get(&bucket)
            .or_else(|| self.age_expressions.get(&AgeBucket::Youth))
            .or_else(|| self.age_expressions.values().next())
    }
}

/// Summary row for lesson listings
#[derive(Debug, Clone, Serialize)]
pub struct LessonSummary {
    pub lesson_id: String,
    pub title: String,
}

/// Immutable set of lesson templates keyed by id
#[derive(Debug, Clone, Default)]
pub struct LessonLibrary {
    lessons: HashMap<String, LessonDna>,
}

impl LessonLibrary {
    /// Empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Library holding the templates compiled into the binary
    pub fn builtin() -> Self {
        let mut library = Self::new();
        for dna in BUILTIN_LESSONS.iter() {
            library.lessons.insert(dna.lesson_id.clone(), dna.clone());
        }
        library
    }

    /// Add (or replace) a template
    pub fn insert(&mut self, dna: LessonDna) -> Result<()> {
        dna.validate()?;
        self.lessons.insert(dna.lesson_id.clone(), dna);
        Ok(())
    }

    /// Add every `*.json` template found in `dir`
    ///
    /// Templates with an id already present replace the existing entry.
    /// Any unreadable or malformed file fails the whole load.
    pub fn with_directory(mut self, dir: &Path) -> Result<Self> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let content = std::fs::read_to_string(&path)?;
            let dna: LessonDna = serde_json::from_str(&content).map_err(|e| {
                Error::Config(format!("Invalid lesson DNA {}: {}", path.display(), e))
            })?;
            if self.lessons.contains_key(&dna.lesson_id) {
                info!(lesson_id = %dna.lesson_id, "Lesson DNA file replaces built-in template");
            }
            debug!(lesson_id = %dna.lesson_id, path = %path.display(), "Loaded lesson DNA");
            self.insert(dna)?;
        }

        Ok(self)
    }

    pub fn get(&self, lesson_id: &str) -> Option<&LessonDna> {
        self.lessons.get(lesson_id)
    }

    /// Sorted lesson ids
    pub fn lesson_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lessons.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Sorted id/title pairs
    pub fn summaries(&self) -> Vec<LessonSummary> {
        self.lesson_ids()
            .into_iter()
            .filter_map(|id| {
                self.lessons.get(&id).map(|dna| LessonSummary {
                    lesson_id: id.clone(),
                    title: dna.title.clone(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }
}

fn expression(concept: &str, complexity: &str, span: &str, example: &str) -> AgeExpression {
    AgeExpression {
        concept_name: concept.to_string(),
        complexity_level: complexity.to_string(),
        attention_span: span.to_string(),
        example: example.to_string(),
    }
}

fn question(q: &str, a: &str, b: &str, a_response: &str, b_response: &str) -> LessonQuestion {
    LessonQuestion {
        question: q.to_string(),
        option_a: a.to_string(),
        option_b: b.to_string(),
        option_a_response: a_response.to_string(),
        option_b_response: b_response.to_string(),
    }
}

static BUILTIN_LESSONS: Lazy<Vec<LessonDna>> = Lazy::new(|| {
    vec![
        LessonDna {
            lesson_id: "negotiation_skills".to_string(),
            title: "Collaborative Problem Solving".to_string(),
            core_principle: "Understanding others' interests creates better solutions".to_string(),
            age_expressions: BTreeMap::from([
                (
                    AgeBucket::EarlyChildhood,
                    expression(
                        "Sharing and Taking Turns",
                        "basic",
                        "3-5 minutes",
                        "when you and a friend both want the same toy",
                    ),
                ),
                (
                    AgeBucket::Youth,
                    expression(
                        "Working Things Out Together",
                        "basic",
                        "5-10 minutes",
                        "when your group disagrees about weekend plans",
                    ),
                ),
                (
                    AgeBucket::YoungAdult,
                    expression(
                        "Collaborative Negotiation",
                        "intermediate",
                        "10-15 minutes",
                        "when roommates disagree about household decisions",
                    ),
                ),
                (
                    AgeBucket::Midlife,
                    expression(
                        "Finding Common Ground",
                        "advanced",
                        "15-20 minutes",
                        "when family members have different preferences",
                    ),
                ),
                (
                    AgeBucket::WisdomYears,
                    expression(
                        "Guiding Others to Agreement",
                        "reflective",
                        "10-15 minutes",
                        "when helping others find common ground",
                    ),
                ),
            ]),
            questions: vec![question(
                "What do you think works better - trying to convince others you're right, or understanding what they really need?",
                "Convincing others I'm right",
                "Understanding what they need",
                "Being confident matters, and it works even better once you know what the other person needs.",
                "Exactly. When you understand what someone needs, you can find a solution that works for both of you.",
            )],
        },
        LessonDna {
            lesson_id: "daily_learning".to_string(),
            title: "Daily Lesson".to_string(),
            core_principle: "Learning through experience".to_string(),
            age_expressions: BTreeMap::from([
                (
                    AgeBucket::Youth,
                    expression("Learning", "basic", "5-10 minutes", ""),
                ),
                (
                    AgeBucket::YoungAdult,
                    expression("Skill Development", "intermediate", "10-15 minutes", ""),
                ),
                (
                    AgeBucket::Midlife,
                    expression("Wisdom Application", "advanced", "15-20 minutes", ""),
                ),
            ]),
            questions: vec![question(
                "What did you learn today?",
                "Something new",
                "Reinforced existing knowledge",
                "Great choice! Learning something new helps us grow.",
                "Excellent! Reinforcing what we know builds confidence.",
            )],
        },
        LessonDna {
            lesson_id: "sharing_kindness".to_string(),
            title: "Sharing Kindness".to_string(),
            core_principle: "Small acts of kindness grow when they are shared".to_string(),
            age_expressions: BTreeMap::from([
                (
                    AgeBucket::EarlyChildhood,
                    expression(
                        "Being Kind",
                        "basic",
                        "3-5 minutes",
                        "when a classmate drops all their crayons on the floor",
                    ),
                ),
                (
                    AgeBucket::Youth,
                    expression(
                        "Everyday Kindness",
                        "basic",
                        "5-10 minutes",
                        "when a new student is sitting alone at lunch",
                    ),
                ),
                (
                    AgeBucket::YoungAdult,
                    expression(
                        "Kindness in Community",
                        "intermediate",
                        "10-15 minutes",
                        "when a coworker is overwhelmed before a deadline",
                    ),
                ),
                (
                    AgeBucket::Midlife,
                    expression(
                        "Leading with Kindness",
                        "advanced",
                        "15-20 minutes",
                        "when a neighbor is struggling after a hard week",
                    ),
                ),
                (
                    AgeBucket::WisdomYears,
                    expression(
                        "A Legacy of Kindness",
                        "reflective",
                        "10-15 minutes",
                        "when a grandchild asks what made life meaningful",
                    ),
                ),
            ]),
            questions: vec![
                question(
                    "When someone needs help, what do you usually do first?",
                    "Wait to be asked",
                    "Offer help right away",
                    "Respecting space is thoughtful. Sometimes a gentle offer is all someone needs.",
                    "Wonderful! Offering help early shows people they are not alone.",
                ),
                question(
                    "Which kindness lasts longer?",
                    "A big gift",
                    "A small kind word every day",
                    "Gifts are lovely, and they mean the most when they come with care.",
                    "Yes! Small daily kindness builds trust that lasts.",
                ),
            ],
        },
    ]
});
