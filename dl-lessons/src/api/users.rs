//! User store endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::users::User;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreditsBody {
    pub amount: i64,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct CreditsResponse {
    pub success: bool,
    pub user_id: String,
    pub credit_balance: i64,
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserBody>, JsonRejection>,
) -> ApiResult<Json<UserResponse>> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let user = state.users.create_user(&body.email, &body.name).await?;
    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users
        .get_by_id(&user_id)
        .await
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}

/// POST /api/users/:id/credits/add
pub async fn add_credits(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Result<Json<CreditsBody>, JsonRejection>,
) -> ApiResult<Json<CreditsResponse>> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let credit_balance = state.users.increment_credits(&user_id, body.amount).await?;
    Ok(Json(CreditsResponse {
        success: true,
        user_id,
        credit_balance,
    }))
}

/// POST /api/users/:id/credits/spend
pub async fn spend_credits(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Result<Json<CreditsBody>, JsonRejection>,
) -> ApiResult<Json<CreditsResponse>> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let credit_balance = state.users.decrement_credits(&user_id, body.amount).await?;
    Ok(Json(CreditsResponse {
        success: true,
        user_id,
        credit_balance,
    }))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users/:id", get(get_user))
        .route("/api/users/:id/credits/add", post(add_credits))
        .route("/api/users/:id/credits/spend", post(spend_credits))
}
