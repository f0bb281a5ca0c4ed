//! 支付 API 处理器
//!
//! 原样返回支付服务商的订单/订阅对象。

use axum::{Json, extract::State};
use serde_json::Value;

use crate::dto::{CreateOrderRequest, CreateSubscriptionRequest};
use crate::error::Result;
use crate::state::AppState;

/// 创建订单
///
/// POST /api/payment/create
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<Value>> {
    let amount = req.amount_text()?;
    let order = state.payment.create_order(&amount).await?;
    Ok(Json(order))
}

/// 创建订阅
///
/// POST /api/payment/subscription
pub async fn create_subscription(
    State(state): State<AppState>,
    Json(req): Json<CreateSubscriptionRequest>,
) -> Result<Json<Value>> {
    let subscription = state
        .payment
        .create_subscription(req.plan_id.as_deref())
        .await?;
    Ok(Json(subscription))
}
