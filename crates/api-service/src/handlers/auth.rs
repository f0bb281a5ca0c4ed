//! 账号相关的 HTTP 处理器
//!
//! 注册与登录；登录成功后签发携带套餐等级的 JWT。

use axum::{Json, extract::State};
use datagen_pipeline::PlanTier;
use sqlx::FromRow;
use tracing::{info, warn};
use validator::Validate;

use crate::auth::{hash_password, verify_password};
use crate::dto::{CredentialsRequest, MessageResponse, TokenResponse};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 数据库用户记录
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    plan: String,
}

/// 注册
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<MessageResponse>> {
    req.validate()?;

    let password_hash = hash_password(&req.password)?;

    let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES ($1, $2)")
        .bind(&req.username)
        .bind(&password_hash)
        .execute(state.db.pool())
        .await;

    match result {
        Ok(_) => {}
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(ApiError::UsernameTaken);
        }
        Err(e) => return Err(e.into()),
    }

    info!(username = %req.username, "User registered");
    Ok(Json(MessageResponse::new("注册成功")))
}

/// 登录
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>> {
    req.validate()?;

    let user = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, password_hash, plan FROM users WHERE username = $1",
    )
    .bind(&req.username)
    .fetch_optional(state.db.pool())
    .await?
    .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(username = %req.username, "Login failed: wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let plan = user.plan.parse::<PlanTier>().unwrap_or_else(|e| {
        warn!(user_id = user.id, error = %e, "Unknown plan stored for user, using free");
        PlanTier::Free
    });

    let (token, expires_at) = state
        .jwt_manager
        .generate_token(user.id, &user.username, plan)?;

    info!(user_id = user.id, plan = %plan, "User logged in");
    Ok(Json(TokenResponse { token, expires_at }))
}
