//! 响应 DTO 定义

use chrono::{DateTime, Utc};
use datagen_pipeline::{Column, Dataset, Row, UpsellSignal};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: i64,
}

/// 字段记录
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecordDto {
    pub id: i64,
    pub field_name: String,
    pub field_type: String,
    pub field_value: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub rows: Vec<RecordDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// 毫秒时间戳
    pub ts: i64,
}

/// 生成/导入结果
///
/// 超出套餐限制时 `upsell` 非空：生成请求不返回任何行，导入请求返回截断后的行。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetResponse {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upsell: Option<UpsellSignal>,
}

impl DatasetResponse {
    pub fn from_dataset(dataset: &Dataset, upsell: Option<UpsellSignal>) -> Self {
        Self {
            columns: dataset.columns.clone(),
            rows: dataset.rows.clone(),
            upsell,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFormatInfo {
    pub tag: String,
    pub extension: String,
    pub content_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatsResponse {
    pub export: Vec<ExportFormatInfo>,
    pub import: Vec<String>,
}
