//! HTTP 请求处理器

pub mod auth;
pub mod data;
pub mod health;
pub mod payment;
pub mod record;
