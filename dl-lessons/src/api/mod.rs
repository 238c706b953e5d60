//! HTTP API handlers for dl-lessons
//!
//! Every JSON response carries `success`; failures use the shared
//! `{success: false, error, code}` envelope.

pub mod cache;
pub mod calendar;
pub mod curriculum;
pub mod daily;
pub mod health;
pub mod lessons;
pub mod sitemap;
pub mod users;

pub use cache::cache_routes;
pub use calendar::calendar_routes;
pub use curriculum::curriculum_routes;
pub use daily::daily_routes;
pub use health::health_routes;
pub use lessons::lesson_routes;
pub use sitemap::sitemap_routes;
pub use users::user_routes;
