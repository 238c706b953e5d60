//! dl-lessons library interface
//!
//! Lesson generation, curriculum, daily lessons, sitemap and user store,
//! exposed over HTTP by [`build_router`].

pub mod api;
pub mod config;
pub mod curriculum;
pub mod daily;
pub mod error;
pub mod lesson;
pub mod sitemap;
pub mod users;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use curriculum::CurriculumLoader;
use lesson::LessonGenerator;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use users::UserStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<LessonGenerator>,
    pub curriculum: Arc<CurriculumLoader>,
    pub users: Arc<UserStore>,
    /// Public site origin for sitemap URLs
    pub site_base_url: String,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        generator: Arc<LessonGenerator>,
        curriculum: Arc<CurriculumLoader>,
        users: Arc<UserStore>,
        site_base_url: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            curriculum,
            users,
            site_base_url: site_base_url.into(),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::lesson_routes())
        .merge(api::daily_routes())
        .merge(api::curriculum_routes())
        .merge(api::calendar_routes())
        .merge(api::cache_routes())
        .merge(api::sitemap_routes())
        .merge(api::user_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
