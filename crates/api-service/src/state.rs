//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use datagen_shared::config::RateLimitConfig;
use datagen_shared::database::Database;

use crate::auth::{JwtConfig, JwtManager};
use crate::middleware::RateLimiter;
use crate::payment::PaymentGateway;

/// Axum 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt_manager: Arc<JwtManager>,
    pub payment: Arc<dyn PaymentGateway>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(
        db: Database,
        jwt_config: JwtConfig,
        payment: Arc<dyn PaymentGateway>,
        rate_limit: RateLimitConfig,
    ) -> Self {
        Self {
            db,
            jwt_manager: Arc::new(JwtManager::new(jwt_config)),
            payment,
            rate_limiter: Arc::new(RateLimiter::new(rate_limit)),
        }
    }
}
