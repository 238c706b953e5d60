//! Lesson Generator/Cache
//!
//! Maps `(lesson id, age, tone, language)` to a rendered [`GeneratedLesson`]
//! and memoizes it per request fingerprint.
//!
//! [`GeneratedLesson`]: dl_common::GeneratedLesson

pub mod age;
pub mod cache;
pub mod chooser;
pub mod dna;
pub mod generator;
pub mod tone;

pub use age::AgeBucket;
pub use cache::{LessonCache, LessonKey};
pub use chooser::{FixedChooser, PhraseChooser, RandomChooser};
pub use dna::{AgeExpression, LessonDna, LessonLibrary, LessonQuestion, LessonSummary};
pub use generator::{LessonGenerator, LessonRequest};
pub use tone::{Tone, ToneProfile};
