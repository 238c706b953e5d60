//! Curriculum loader
//!
//! A year of daily topics is split into twelve month files
//! (`january_curriculum.json` .. `december_curriculum.json`). Each file is
//! loaded once and kept until [`CurriculumLoader::clear_cache`].

use async_trait::async_trait;
use chrono::NaiveDate;
use dl_common::calendar::{self, CalendarDay};
use dl_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// First day-of-year of each month in a common (non-leap) year
///
/// December runs through day 366 so leap days land in December.
pub const MONTH_STARTS: [(u32, &str); 12] = [
    (1, "january"),
    (32, "february"),
    (60, "march"),
    (91, "april"),
    (121, "may"),
    (152, "june"),
    (182, "july"),
    (213, "august"),
    (244, "september"),
    (274, "october"),
    (305, "november"),
    (335, "december"),
];

const LAST_DAY: u32 = 366;
const FILE_SUFFIX: &str = "_curriculum.json";

/// Common year matching the [`MONTH_STARTS`] layout, used for date labels
const LABEL_YEAR: i32 = 2025;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTopic {
    pub day: u32,
    pub date: String,
    pub title: String,
    pub learning_objective: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCurriculum {
    pub month: String,
    pub days: Vec<DailyTopic>,
}

/// A calendar day paired with its curriculum topic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEntry {
    #[serde(flatten)]
    pub day: CalendarDay,
    pub topic: Option<DailyTopic>,
}

/// Month index (0-based) holding a day-of-year
fn month_index(day: u32) -> Option<usize> {
    if !(1..=LAST_DAY).contains(&day) {
        return None;
    }
    MONTH_STARTS.iter().rposition(|(start, _)| day >= *start)
}

/// Inclusive day range of a month index
fn month_range(index: usize) -> (u32, u32) {
    let start = MONTH_STARTS[index].0;
    let end = MONTH_STARTS
        .get(index + 1)
        .map(|(next, _)| next - 1)
        .unwrap_or(LAST_DAY);
    (start, end)
}

/// Month file for a day-of-year, `None` outside `1..=366`
pub fn month_file(day: u32) -> Option<String> {
    month_index(day).map(|i| format!("{}{}", MONTH_STARTS[i].1, FILE_SUFFIX))
}

/// Month file for a month name (case-insensitive)
pub fn month_file_for_name(month: &str) -> Option<String> {
    let month = month.trim().to_ascii_lowercase();
    MONTH_STARTS
        .iter()
        .find(|(_, name)| *name == month)
        .map(|(_, name)| format!("{}{}", name, FILE_SUFFIX))
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Minimal curriculum with one placeholder topic per day of the month
pub fn placeholder_curriculum(file_name: &str) -> MonthlyCurriculum {
    let month = file_name.trim_end_matches(FILE_SUFFIX).to_string();
    let days = MONTH_STARTS
        .iter()
        .position(|(_, name)| *name == month)
        .map(|index| {
            let (start, end) = month_range(index);
            (start..=end)
                .map(|day| {
                    let date = NaiveDate::from_yo_opt(LABEL_YEAR, day.min(365))
                        .map(calendar::date_label)
                        .unwrap_or_else(|| format!("{} {}", capitalize(&month), day - start + 1));
                    DailyTopic {
                        day,
                        title: format!("Daily Lesson for {}", date),
                        learning_objective: "Explore something new and connect it to everyday life."
                            .to_string(),
                        date,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    MonthlyCurriculum { month, days }
}

/// Where month files come from
#[async_trait]
pub trait CurriculumSource: Send + Sync {
    async fn load(&self, file_name: &str) -> Result<MonthlyCurriculum>;
}

/// Month files in a directory; a missing file yields the placeholder curriculum
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl CurriculumSource for DirectorySource {
    async fn load(&self, file_name: &str) -> Result<MonthlyCurriculum> {
        let path = self.dir.join(file_name);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                Error::Config(format!("Invalid curriculum file {}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    file = %path.display(),
                    "Curriculum file missing, using placeholder topics"
                );
                Ok(placeholder_curriculum(file_name))
            }
            Err(e) => Err(e.into()),
        }
    }
}

pub struct CurriculumLoader {
    source: Arc<dyn CurriculumSource>,
    cache: RwLock<HashMap<String, Arc<MonthlyCurriculum>>>,
}

impl CurriculumLoader {
    pub fn new(source: Arc<dyn CurriculumSource>) -> Self {
        Self {
            source,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Topic for a day-of-year (1..=366)
    pub async fn load_daily_topic(&self, day: u32) -> Result<DailyTopic> {
        let file_name = month_file(day)
            .ok_or_else(|| Error::InvalidInput(format!("Invalid day of year: {}", day)))?;
        let curriculum = self.load_file(&file_name).await?;

        curriculum
            .days
            .iter()
            .find(|topic| topic.day == day)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Topic not found for day {}", day)))
    }

    /// Whole curriculum for a month name
    pub async fn curriculum_for_month(&self, month: &str) -> Result<Arc<MonthlyCurriculum>> {
        let file_name = month_file_for_name(month)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown month: {}", month)))?;
        self.load_file(&file_name).await
    }

    /// Every day of `year` with the topic scheduled for its day-of-year
    pub async fn calendar(&self, year: i32) -> Result<Vec<CalendarEntry>> {
        let mut topics: HashMap<u32, DailyTopic> = self
            .all_topics()
            .await?
            .into_iter()
            .map(|topic| (topic.day, topic))
            .collect();

        Ok(calendar::all_days(year)
            .into_iter()
            .map(|day| CalendarEntry {
                topic: topics.remove(&day.day_of_year),
                day,
            })
            .collect())
    }

    /// Topics whose title or learning objective contain `query`, ignoring case
    pub async fn search(&self, query: &str) -> Result<Vec<DailyTopic>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(Error::InvalidInput("Search query is required".to_string()));
        }

        let matches: Vec<DailyTopic> = self
            .all_topics()
            .await?
            .into_iter()
            .filter(|topic| {
                topic.title.to_lowercase().contains(&needle)
                    || topic.learning_objective.to_lowercase().contains(&needle)
            })
            .collect();
        debug!(query = %needle, matches = matches.len(), "Curriculum search");
        Ok(matches)
    }

    /// Drop all cached months, returning how many were held
    pub async fn clear_cache(&self) -> usize {
        let mut cache = self.cache.write().await;
        let count = cache.len();
        cache.clear();
        info!(months = count, "Curriculum cache cleared");
        count
    }

    /// Cached month file names, sorted
    pub async fn cached_months(&self) -> Vec<String> {
        let mut months: Vec<String> = self.cache.read().await.keys().cloned().collect();
        months.sort();
        months
    }

    /// All topics of the year in month order
    async fn all_topics(&self) -> Result<Vec<DailyTopic>> {
        let mut topics = Vec::new();
        for (_, name) in MONTH_STARTS {
            let curriculum = self.load_file(&format!("{}{}", name, FILE_SUFFIX)).await?;
            topics.extend(curriculum.days.iter().cloned());
        }
        Ok(topics)
    }

    async fn load_file(&self, file_name: &str) -> Result<Arc<MonthlyCurriculum>> {
        if let Some(cached) = self.cache.read().await.get(file_name) {
            return Ok(cached.clone());
        }

        let curriculum = Arc::new(self.source.load(file_name).await?);
        debug!(file = file_name, days = curriculum.days.len(), "Loaded curriculum");
        self.cache
            .write()
            .await
            .insert(file_name.to_string(), curriculum.clone());
        Ok(curriculum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        loads: AtomicUsize,
    }

    #[async_trait]
    impl CurriculumSource for CountingSource {
        async fn load(&self, file_name: &str) -> Result<MonthlyCurriculum> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(placeholder_curriculum(file_name))
        }
    }

    #[test]
    fn test_month_file_boundaries() {
        assert_eq!(month_file(1).as_deref(), Some("january_curriculum.json"));
        assert_eq!(month_file(31).as_deref(), Some("january_curriculum.json"));
        assert_eq!(month_file(32).as_deref(), Some("february_curriculum.json"));
        assert_eq!(month_file(59).as_deref(), Some("february_curriculum.json"));
        assert_eq!(month_file(335).as_deref(), Some("december_curriculum.json"));
        assert_eq!(month_file(366).as_deref(), Some("december_curriculum.json"));
        assert_eq!(month_file(0), None);
        assert_eq!(month_file(367), None);
    }

    #[test]
    fn test_month_file_for_name() {
        assert_eq!(
            month_file_for_name("March").as_deref(),
            Some("march_curriculum.json")
        );
        assert_eq!(month_file_for_name("../secrets"), None);
    }

    #[test]
    fn test_placeholder_covers_month() {
        let december = placeholder_curriculum("december_curriculum.json");
        assert_eq!(december.month, "december");
        assert_eq!(december.days.len(), 32);
        assert_eq!(december.days[0].day, 335);
        assert_eq!(december.days[0].date, "December 1");
        assert_eq!(december.days.last().map(|d| d.day), Some(366));
        assert_eq!(december.days[30].date, "December 31");
        assert_eq!(december.days[31].date, "December 31");

        let february = placeholder_curriculum("february_curriculum.json");
        assert_eq!(february.days.len(), 28);
    }

    #[tokio::test]
    async fn test_months_are_cached_until_cleared() {
        let source = Arc::new(CountingSource {
            loads: AtomicUsize::new(0),
        });
        let loader = CurriculumLoader::new(source.clone());

        loader.load_daily_topic(32).await.unwrap();
        loader.load_daily_topic(40).await.unwrap();
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
        assert_eq!(loader.cached_months().await, vec!["february_curriculum.json"]);

        assert_eq!(loader.clear_cache().await, 1);
        loader.load_daily_topic(32).await.unwrap();
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalid_day() {
        let loader = CurriculumLoader::new(Arc::new(DirectorySource::new("/nonexistent")));
        assert!(matches!(
            loader.load_daily_topic(0).await,
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            loader.load_daily_topic(400).await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_directory_source_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let january = MonthlyCurriculum {
            month: "january".to_string(),
            days: vec![DailyTopic {
                day: 1,
                date: "January 1".to_string(),
                title: "The Sun - Our Magnificent Life-Giving Star".to_string(),
                learning_objective:
                    "Understand how scientific observation and measurement create shared global knowledge."
                        .to_string(),
            }],
        };
        std::fs::write(
            dir.path().join("january_curriculum.json"),
            serde_json::to_string(&january).unwrap(),
        )
        .unwrap();

        let loader = CurriculumLoader::new(Arc::new(DirectorySource::new(dir.path())));
        let topic = loader.load_daily_topic(1).await.unwrap();
        assert_eq!(topic.title, "The Sun - Our Magnificent Life-Giving Star");

        let missing = loader.load_daily_topic(2).await;
        assert!(matches!(missing, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_directory_source_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CurriculumLoader::new(Arc::new(DirectorySource::new(dir.path())));
        let topic = loader.load_daily_topic(100).await.unwrap();
        assert_eq!(topic.day, 100);
        assert_eq!(topic.date, "April 10");
    }

    #[tokio::test]
    async fn test_curriculum_for_month() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CurriculumLoader::new(Arc::new(DirectorySource::new(dir.path())));
        let july = loader.curriculum_for_month("JULY").await.unwrap();
        assert_eq!(july.month, "july");
        assert_eq!(july.days.len(), 31);
        assert!(matches!(
            loader.curriculum_for_month("smarch").await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_calendar_pairs_days_with_topics() {
        let source = Arc::new(CountingSource {
            loads: AtomicUsize::new(0),
        });
        let loader = CurriculumLoader::new(source.clone());

        let days = loader.calendar(2025).await.unwrap();
        assert_eq!(days.len(), 365);
        assert_eq!(source.loads.load(Ordering::SeqCst), 12);

        let first = &days[0];
        assert_eq!(first.day.formatted_date, "20250101");
        assert_eq!(first.day.weekday, "Wednesday");
        assert_eq!(
            first.topic.as_ref().map(|t| t.title.as_str()),
            Some("Daily Lesson for January 1")
        );
        assert!(days.iter().all(|entry| entry.topic.is_some()));

        let leap = loader.calendar(2024).await.unwrap();
        assert_eq!(leap.len(), 366);
        assert_eq!(leap[365].topic.as_ref().map(|t| t.day), Some(366));
        assert_eq!(source.loads.load(Ordering::SeqCst), 12);
    }

    #[tokio::test]
    async fn test_search_matches_title_and_objective() {
        let dir = tempfile::tempdir().unwrap();
        let march = MonthlyCurriculum {
            month: "march".to_string(),
            days: vec![
                DailyTopic {
                    day: 60,
                    date: "March 1".to_string(),
                    title: "Volcanoes and the Restless Earth".to_string(),
                    learning_objective: "See how heat inside the planet shapes the land."
                        .to_string(),
                },
                DailyTopic {
                    day: 61,
                    date: "March 2".to_string(),
                    title: "Honeybees".to_string(),
                    learning_objective: "Learn how a VOLCANIC island gets its first plants."
                        .to_string(),
                },
            ],
        };
        std::fs::write(
            dir.path().join("march_curriculum.json"),
            serde_json::to_string(&march).unwrap(),
        )
        .unwrap();

        let loader = CurriculumLoader::new(Arc::new(DirectorySource::new(dir.path())));
        let found = loader.search("  volcan ").await.unwrap();
        assert_eq!(found.iter().map(|t| t.day).collect::<Vec<_>>(), vec![60, 61]);

        let placeholders = loader.search("daily lesson for january 30").await.unwrap();
        assert_eq!(placeholders.len(), 1);
        assert_eq!(placeholders[0].day, 30);

        assert!(loader.search("zebra crossing").await.unwrap().is_empty());
        assert!(matches!(loader.search("   ").await, Err(Error::InvalidInput(_))));
    }
}
