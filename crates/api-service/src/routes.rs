//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射，并组装带中间件的完整应用。

use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    http::HeaderValue,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use datagen_shared::observability::middleware as obs_middleware;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    handlers,
    middleware::{auth_middleware, rate_limit_middleware},
    state::AppState,
};

/// 账号路由（公开）
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
}

/// 字段记录路由（需要登录）
pub fn record_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/records",
            get(handlers::record::list_records).post(handlers::record::create_record),
        )
        .route(
            "/records/{id}",
            put(handlers::record::update_record).delete(handlers::record::delete_record),
        )
}

/// 支付路由
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/payment/create", post(handlers::payment::create_order))
        .route(
            "/payment/subscription",
            post(handlers::payment::create_subscription),
        )
}

/// 数据流水线路由（公开，套餐取自可选 Token）
pub fn data_routes() -> Router<AppState> {
    Router::new()
        .route("/data/formats", get(handlers::data::formats))
        .route("/data/generate", post(handlers::data::generate))
        .route("/data/import", post(handlers::data::import))
        .route("/data/export", post(handlers::data::export))
        .route("/data/preview", post(handlers::data::preview))
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/ready", get(handlers::health::ready))
}

/// 构建完整的 API 路由（不含 `/api` 前缀）
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(record_routes())
        .merge(payment_routes())
        .merge(data_routes())
        .merge(health_routes())
}

/// 跨域配置：为空或包含 `*` 时允许任意来源
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
            .collect();
        layer.allow_origin(origins)
    }
}

/// 为所有响应注入 HTTP 安全头
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert("x-xss-protection", HeaderValue::from_static("0"));
    response
}

/// 组装带中间件的应用
///
/// 中间件顺序（外 → 内）：request_id → http_tracing → cors → 限流 → auth → 安全头 → body 限制。
pub fn build_app(state: AppState, cors_origins: &[String], body_limit: usize) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(cors_layer(cors_origins))
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}
