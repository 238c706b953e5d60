//! Sitemap endpoint

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{Datelike, Utc};

use crate::sitemap;
use crate::AppState;

/// GET /sitemap.xml
pub async fn get_sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let now = Utc::now();
    let xml = sitemap::build(&state.site_base_url, now.year(), now);

    (
        [
            (header::CONTENT_TYPE, "text/xml"),
            (
                header::CACHE_CONTROL,
                "public, s-maxage=86400, stale-while-revalidate",
            ),
        ],
        xml,
    )
}

pub fn sitemap_routes() -> Router<AppState> {
    Router::new().route("/sitemap.xml", get(get_sitemap))
}
