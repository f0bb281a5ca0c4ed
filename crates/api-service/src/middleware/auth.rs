//! JWT 认证中间件
//!
//! 验证请求中的 Bearer Token 并将 Claims 注入请求扩展。
//! 公开路由不强制认证，但携带有效 Token 时同样注入 Claims（数据接口据此确定套餐）。

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use datagen_pipeline::PlanTier;
use serde_json::json;

use crate::auth::Claims;
use crate::state::AppState;

/// 公开路由前缀（不需要认证）
const PUBLIC_PATHS: &[&str] = &[
    "/api/auth/",
    "/api/health",
    "/api/data/",
    "/api/payment/",
];

fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.iter().any(|p| path.starts_with(p))
}

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// 认证中间件
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let public = is_public(request.uri().path());

    let verified = bearer_token(&request).map(|token| state.jwt_manager.verify_token(token));

    match verified {
        Some(Ok(claims)) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        // 公开路由上的无效 Token 视为匿名访问
        _ if public => next.run(request).await,
        Some(Err(e)) => unauthorized_response(&e.to_string()),
        None => unauthorized_response("缺少认证 Token"),
    }
}

/// 生成 401 未授权响应
fn unauthorized_response(message: &str) -> Response {
    let body = json!({
        "success": false,
        "code": "UNAUTHORIZED",
        "message": message,
        "data": null
    });

    (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
}

/// 当前请求的套餐等级：有效 Token 中的 `plan`，否则为 free
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestPlan(pub PlanTier);

impl<S: Send + Sync> FromRequestParts<S> for RequestPlan {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let plan = parts
            .extensions
            .get::<Claims>()
            .map(|c| c.plan)
            .unwrap_or_default();
        Ok(Self(plan))
    }
}
