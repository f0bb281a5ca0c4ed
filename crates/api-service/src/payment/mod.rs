//! 支付网关
//!
//! 处理器只依赖 `PaymentGateway` trait，生产环境使用 PayPal 实现，测试中替换为内存实现。

mod paypal;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use paypal::PayPalGateway;

/// 支付错误
#[derive(Debug, Error)]
pub enum PaymentError {
    /// 缺少客户端凭据
    #[error("支付服务未配置")]
    NotConfigured,

    #[error("未指定订阅计划")]
    MissingPlanId,

    #[error("支付服务请求失败: {0}")]
    Transport(String),

    #[error("支付服务拒绝请求 (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("支付服务响应无效: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// 支付网关抽象
///
/// 返回值为支付服务商的原始响应对象，原样转发给调用方。
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// 创建一次性订单，`amount` 为十进制金额字符串
    async fn create_order(&self, amount: &str) -> Result<Value, PaymentError>;

    /// 创建订阅，`plan_id` 为空时使用配置中的计划
    async fn create_subscription(&self, plan_id: Option<&str>) -> Result<Value, PaymentError>;
}
