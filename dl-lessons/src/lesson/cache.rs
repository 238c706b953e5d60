//! Generated lesson cache
//!
//! Entries never expire. They go away only through [`LessonCache::clear`] or
//! get replaced by a force-regenerate request. Concurrent misses on the same
//! key may both generate; the last insert wins.

use dl_common::GeneratedLesson;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Request fingerprint
///
/// `tone` is the label as requested, before fallback to a known profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LessonKey {
    pub lesson_id: String,
    pub age: i64,
    pub tone: String,
    pub language: String,
}

impl LessonKey {
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
        }
    }
}

impl fmt::Display for LessonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}_{}", self.lesson_id, self.age, self.tone, self.language)
    }
}

#[derive(Debug, Default)]
pub struct LessonCache {
    entries: RwLock<HashMap<LessonKey, Arc<GeneratedLesson>>>,
}

impl LessonCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &LessonKey) -> Option<Arc<GeneratedLesson>> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn insert(&self, key: LessonKey, lesson: Arc<GeneratedLesson>) {
        self.entries.write().await.insert(key, lesson);
    }

    /// Drop every entry, returning how many were held
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        count
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
