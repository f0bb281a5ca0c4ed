//! HTTP 中间件

pub mod auth;
pub mod rate_limit;

pub use auth::{RequestPlan, auth_middleware};
pub use rate_limit::{RateLimiter, rate_limit_middleware};
