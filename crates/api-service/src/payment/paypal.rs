//! PayPal REST 实现
//!
//! 每次调用先以客户端凭据换取 access token，再调用订单或订阅接口。

use std::time::Duration;

use async_trait::async_trait;
use datagen_shared::config::PaymentConfig;
use datagen_shared::observability::metrics::record_payment;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use super::{PaymentError, PaymentGateway};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// PayPal 网关
pub struct PayPalGateway {
    client: reqwest::Client,
    config: PaymentConfig,
}

impl PayPalGateway {
    pub fn new(config: PaymentConfig) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.credentials().is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    async fn access_token(&self) -> Result<String, PaymentError> {
        let (client_id, secret) = self
            .config
            .credentials()
            .ok_or(PaymentError::NotConfigured)?;

        let response = self
            .client
            .post(self.url("/v1/oauth2/token"))
            .basic_auth(client_id, Some(secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;

        let body = read_json(response).await?;
        let token: TokenResponse = serde_json::from_value(body)
            .map_err(|e| PaymentError::InvalidResponse(format!("access token: {e}")))?;
        Ok(token.access_token)
    }

    async fn post_json(&self, path: &str, payload: &Value) -> Result<Value, PaymentError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, PaymentError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(PaymentError::Rejected {
            status: status.as_u16(),
            body: text,
        });
    }
    serde_json::from_str(&text).map_err(|e| PaymentError::InvalidResponse(e.to_string()))
}

/// 订单请求体
pub(crate) fn order_payload(amount: &str, currency: &str) -> Value {
    json!({
        "intent": "CAPTURE",
        "purchase_units": [
            { "amount": { "currency_code": currency, "value": amount } }
        ]
    })
}

pub(crate) fn subscription_payload(plan_id: &str) -> Value {
    json!({ "plan_id": plan_id })
}

#[async_trait]
impl PaymentGateway for PayPalGateway {
    #[instrument(skip(self))]
    async fn create_order(&self, amount: &str) -> Result<Value, PaymentError> {
        let payload = order_payload(amount, &self.config.currency);
        let result = self.post_json("/v2/checkout/orders", &payload).await;
        record_payment("create_order", result.is_ok());

        match &result {
            Ok(order) => info!(order_id = ?order.get("id"), "PayPal order created"),
            Err(e) => warn!(error = %e, "PayPal order creation failed"),
        }
        result
    }

    #[instrument(skip(self))]
    async fn create_subscription(&self, plan_id: Option<&str>) -> Result<Value, PaymentError> {
        let plan_id = plan_id
            .filter(|p| !p.is_empty())
            .or(self.config.plan_id.as_deref())
            .ok_or(PaymentError::MissingPlanId)?;

        let payload = subscription_payload(plan_id);
        let result = self.post_json("/v1/billing/subscriptions", &payload).await;
        record_payment("create_subscription", result.is_ok());

        match &result {
            Ok(sub) => info!(subscription_id = ?sub.get("id"), plan_id, "PayPal subscription created"),
            Err(e) => warn!(error = %e, plan_id, "PayPal subscription creation failed"),
        }
        result
    }
}
