//! # DailyLesson Common Library
//!
//! Shared code for all DailyLesson services including:
//! - Error types
//! - Configuration loading and data folder resolution
//! - Calendar (day-of-year) utilities
//! - Generated lesson document types
//! - Object storage (local folder and S3-compatible buckets)
//! - JSON response envelope

pub mod api;
pub mod calendar;
pub mod config;
pub mod error;
pub mod lesson;
pub mod logging;
pub mod storage;

pub use error::{Error, Result};
pub use lesson::{GeneratedLesson, LessonMetadata, ProductionNotes, ScriptEntry};
