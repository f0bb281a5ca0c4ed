//! 按客户端 IP 的限流中间件
//!
//! 进程内固定窗口计数器：同一窗口内每个客户端最多 `max_requests` 次请求，
//! 超出返回 429 并携带 `Retry-After`。健康检查不计入配额。

use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request, StatusCode, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use datagen_shared::config::RateLimitConfig;
use serde_json::json;
use tracing::warn;

use crate::state::AppState;

/// 计数表超过该大小时清理过期窗口
const PRUNE_THRESHOLD: usize = 10_000;

/// 客户端 → (窗口编号, 计数)
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: DashMap<String, (u64, u64)>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: DashMap::new(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled && self.config.max_requests > 0 && self.config.window_secs > 0
    }

    /// 记录一次请求；超限时返回距窗口结束的秒数
    pub fn check(&self, client: &str) -> Result<(), u64> {
        self.check_at(client, unix_now())
    }

    fn check_at(&self, client: &str, now: u64) -> Result<(), u64> {
        let window_secs = self.config.window_secs;
        let window = now / window_secs;

        if self.windows.len() > PRUNE_THRESHOLD {
            self.windows.retain(|_, (w, _)| *w == window);
        }

        let mut entry = self.windows.entry(client.to_string()).or_insert((window, 0));
        if entry.0 != window {
            *entry = (window, 0);
        }
        entry.1 += 1;

        if entry.1 > self.config.max_requests {
            Err(window_secs - now % window_secs)
        } else {
            Ok(())
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn is_exempt(path: &str) -> bool {
    path.starts_with("/api/health")
}

/// 代理头优先，其次是连接地址
fn client_key(request: &Request<Body>) -> String {
    let headers = request.headers();
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
        })
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let limiter = &state.rate_limiter;
    if !limiter.enabled() || is_exempt(request.uri().path()) {
        return next.run(request).await;
    }

    let client = client_key(&request);
    match limiter.check(&client) {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            warn!(client = %client, path = %request.uri().path(), "Rate limit exceeded");
            too_many_requests(retry_after)
        }
    }
}

fn too_many_requests(retry_after: u64) -> Response {
    let body = json!({
        "success": false,
        "code": "RATE_LIMITED",
        "message": "请求过于频繁，请稍后再试",
        "data": null
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, axum::Json(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
        response.headers_mut().insert(RETRY_AFTER, value);
    }
    response
}
