//! Integration tests for dl-lessons HTTP endpoints

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use dl_lessons::curriculum::{CurriculumLoader, DirectorySource};
use dl_lessons::lesson::{FixedChooser, LessonCache, LessonGenerator, LessonLibrary};
use dl_lessons::users::UserStore;
use dl_lessons::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: app over a temp data folder (kept alive by the returned guard)
async fn setup_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(LessonGenerator::new(
        Arc::new(LessonLibrary::builtin()),
        Arc::new(LessonCache::new()),
        Arc::new(FixedChooser(0)),
    ));
    let curriculum = Arc::new(CurriculumLoader::new(Arc::new(DirectorySource::new(
        dir.path().join("curriculum"),
    ))));
    let users = Arc::new(UserStore::open(dir.path().join("users.json")).await);
    let state = AppState::new(generator, curriculum, users, "https://mynextlesson.com");
    (build_router(state), dir)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let (app, _dir) = setup_app().await;
    for uri in ["/health", "/api/health"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["module"], "dl-lessons");
        assert!(body["version"].is_string());
        assert!(body["uptime_seconds"].is_u64());
    }
}

// =============================================================================
// Lessons
// =============================================================================

#[tokio::test]
async fn test_list_lessons() {
    let (app, _dir) = setup_app().await;
    let response = app.oneshot(get("/api/lessons")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    let ids: Vec<&str> = body["lessons"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["lesson_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["daily_learning", "negotiation_skills", "sharing_kindness"]);
}

#[tokio::test]
async fn test_get_lesson_dna() {
    let (app, _dir) = setup_app().await;
    let response = app
        .clone()
        .oneshot(get("/api/lessons/negotiation_skills"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["lesson"]["title"], "Collaborative Problem Solving");
    assert!(body["lesson"]["age_expressions"]["early_childhood"].is_object());

    let response = app.oneshot(get("/api/lessons/unknown")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_generate_lesson() {
    let (app, _dir) = setup_app().await;
    let response = app
        .oneshot(post_json(
            "/api/generate",
            json!({"lessonId": "negotiation_skills", "age": 8, "tone": "fun", "language": "english"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    let metadata = &body["lesson"]["lesson_metadata"];
    assert_eq!(metadata["lesson_id"], "negotiation_skills");
    assert_eq!(metadata["age_category"], "youth");
    assert_eq!(metadata["tone"], "fun");
    let scripts = body["lesson"]["scripts"].as_array().unwrap();
    assert_eq!(scripts[0]["script_type"], "opening");
    assert_eq!(scripts[0]["avatar"], "kelly");
    assert!(scripts[0]["voice_text"]
        .as_str()
        .unwrap()
        .starts_with("Alright superstar!"));
}

#[tokio::test]
async fn test_generate_is_cached_until_forced() {
    let (app, _dir) = setup_app().await;
    let request = json!({"lessonId": "daily_learning", "age": 30, "tone": "neutral"});

    let first = extract_json(
        app.clone()
            .oneshot(post_json("/api/generate", request.clone()))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    let second = extract_json(
        app.clone()
            .oneshot(post_json("/api/generate", request))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    assert_eq!(first, second);
    assert_eq!(first["lesson"]["lesson_metadata"]["language"], "english");

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let forced = extract_json(
        app.oneshot(post_json(
            "/api/generate",
            json!({"lessonId": "daily_learning", "age": 30, "tone": "neutral", "forceRegenerate": true}),
        ))
        .await
        .unwrap()
        .into_body(),
    )
    .await;
    assert_ne!(
        forced["lesson"]["lesson_metadata"]["generated_at"],
        first["lesson"]["lesson_metadata"]["generated_at"]
    );
}

#[tokio::test]
async fn test_generate_missing_fields() {
    let (app, _dir) = setup_app().await;
    let response = app
        .oneshot(post_json("/api/generate", json!({"lessonId": "daily_learning", "age": 30})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Missing required fields: lessonId, age, tone");
}

#[tokio::test]
async fn test_generate_unknown_lesson() {
    let (app, _dir) = setup_app().await;
    let response = app
        .oneshot(post_json(
            "/api/generate",
            json!({"lessonId": "quantum_knitting", "age": 30, "tone": "fun"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Lesson 'quantum_knitting' not found");
}

#[tokio::test]
async fn test_generate_malformed_body() {
    let (app, _dir) = setup_app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["code"], "BAD_REQUEST");
}

// =============================================================================
// Daily lessons and curriculum
// =============================================================================

#[tokio::test]
async fn test_daily_lesson() {
    let (app, _dir) = setup_app().await;
    let response = app
        .oneshot(get("/api/daily-lesson?day=32&age=40&tone=grandmother&language=french"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let metadata = &body["lesson"]["lesson_metadata"];
    assert_eq!(metadata["lesson_id"], "daily_lesson_32");
    assert_eq!(metadata["day"], 32);
    assert_eq!(metadata["date"], "February 1");
    assert_eq!(metadata["tone"], "grandmother");
    assert_eq!(metadata["language"], "french");
}

#[tokio::test]
async fn test_daily_lesson_validation() {
    let (app, _dir) = setup_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/daily-lesson?day=10&age=150"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Age must be between 2 and 102");

    let response = app
        .clone()
        .oneshot(get("/api/daily-lesson?day=10&tone=pirate"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get("/api/daily-lesson?day=400"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_curriculum_day_and_month() {
    let (app, _dir) = setup_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/curriculum/day/366"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["topic"]["day"], 366);
    assert_eq!(body["topic"]["date"], "December 31");

    let response = app
        .clone()
        .oneshot(get("/api/curriculum/month/march"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["curriculum"]["month"], "march");

    let response = app
        .oneshot(get("/api/curriculum/day/abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_calendar() {
    let (app, _dir) = setup_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/calendar?year=2024"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["year"], 2024);
    let days = body["days"].as_array().unwrap();
    assert_eq!(days.len(), 366);
    assert_eq!(days[0]["formatted_date"], "20240101");
    assert_eq!(days[0]["weekday"], "Monday");
    assert_eq!(days[0]["topic"]["title"], "Daily Lesson for January 1");
    assert_eq!(days[59]["date"], "2024-02-29");
    assert_eq!(days[365]["topic"]["day"], 366);

    let response = app
        .clone()
        .oneshot(get("/api/calendar?year=abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/api/calendar?year=0")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search() {
    let (app, _dir) = setup_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/search?q=Daily%20Lesson%20for%20February%2014"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["day"], 45);

    let response = app
        .clone()
        .oneshot(get("/api/search?q=everyday%20LIFE"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 366);

    for uri in ["/api/search?q=%20%20", "/api/search"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn test_cache_clear() {
    let (app, _dir) = setup_app().await;
    app.clone()
        .oneshot(post_json(
            "/api/generate",
            json!({"lessonId": "daily_learning", "age": 30, "tone": "neutral"}),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(get("/api/curriculum/day/1"))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json("/api/cache/clear", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["cleared_lessons"], 1);
    assert_eq!(body["cleared_months"], 1);
}

// =============================================================================
// Sitemap
// =============================================================================

#[tokio::test]
async fn test_sitemap() {
    let (app, _dir) = setup_app().await;
    let response = app.oneshot(get("/sitemap.xml")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/xml");
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, s-maxage=86400, stale-while-revalidate"
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let xml = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(xml.contains("<loc>https://mynextlesson.com/about</loc>"));
    assert_eq!(xml.matches("<url>").count(), 5 + 365 * 28);
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_user_lifecycle() {
    let (app, _dir) = setup_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/users",
            json!({"email": "ada@example.com", "name": "Ada"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    let user_id = body["user"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["credit_balance"], 0);

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/users/{}/credits/add", user_id),
            json!({"amount": 5}),
        ))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["credit_balance"], 5);

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/users/{}/credits/spend", user_id),
            json!({"amount": 8}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["code"], "INSUFFICIENT_CREDITS");

    let response = app
        .clone()
        .oneshot(get(&format!("/api/users/{}", user_id)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["user"]["credit_balance"], 5);

    let response = app.oneshot(get("/api/users/nobody")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// CORS
// =============================================================================

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _dir) = setup_app().await;
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/generate")
        .header(header::ORIGIN, "https://mynextlesson.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
