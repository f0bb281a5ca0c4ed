//! 请求 DTO 定义

use datagen_pipeline::dataset::cell_text;
use datagen_pipeline::export::{ExportFormat, ExportOptions};
use datagen_pipeline::field::FieldSpec;
use datagen_pipeline::{Column, Dataset, PreviewSettings, Row};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::error::ApiError;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const DEFAULT_GENERATE_ROWS: usize = 10;

// ============================================
// 账号
// ============================================

/// 注册/登录请求
///
/// 缺失字段按空字符串处理，由 validator 统一报 400。
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "用户名长度必须在 1-50 之间"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "密码长度必须在 1-100 之间"))]
    pub password: String,
}

// ============================================
// 记录
// ============================================

/// 分页参数
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRecordsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl ListRecordsQuery {
    /// 页码至少为 1，每页条数限制在 [1, 100]
    pub fn normalized(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, page_size)
    }

    pub fn offset(&self) -> i64 {
        let (page, page_size) = self.normalized();
        (page - 1).saturating_mul(page_size)
    }
}

/// 创建/更新记录
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "fieldName 不能为空且不超过 255 个字符"))]
    pub field_name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "fieldType 不能为空且不超过 100 个字符"))]
    pub field_type: String,
    /// 任意 JSON 值，以文本形式存储
    #[serde(default)]
    pub field_value: Option<Value>,
}

impl RecordRequest {
    /// 校验并返回 fieldValue 的存储文本
    pub fn value_text(&self) -> Result<String, ApiError> {
        match &self.field_value {
            None | Some(Value::Null) => Err(ApiError::Validation("fieldValue 不能为空".to_string())),
            Some(value) => Ok(cell_text(value)),
        }
    }
}

/// 解析路径中的记录 ID（必须为正整数）
pub fn parse_record_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::InvalidId(raw.to_string()))
}

// ============================================
// 支付
// ============================================

/// 创建订单，金额可以是字符串或数字
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub amount: Value,
}

impl CreateOrderRequest {
    /// 返回正数金额的十进制文本
    pub fn amount_text(&self) -> Result<String, ApiError> {
        let text = match &self.amount {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return Err(ApiError::Validation("amount 不能为空".to_string())),
        };
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => Ok(text),
            _ => Err(ApiError::Validation(format!("无效的金额: {text}"))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    #[serde(default)]
    pub plan_id: Option<String>,
}

// ============================================
// 数据流水线
// ============================================

fn default_generate_rows() -> usize {
    DEFAULT_GENERATE_ROWS
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub fields: Vec<FieldSpec>,
    #[serde(default = "default_generate_rows")]
    pub rows: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// 导出/预览共用的数据载荷；未提供列时以第一行的键为列
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetPayload {
    #[serde(default)]
    pub columns: Option<Vec<Column>>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl DatasetPayload {
    pub fn into_dataset(self) -> Dataset {
        match self.columns {
            Some(columns) if !columns.is_empty() => Dataset::new(columns, self.rows),
            _ => Dataset::from_rows(self.rows),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(flatten)]
    pub data: DatasetPayload,
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default)]
    pub options: ExportOptions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    #[serde(flatten)]
    pub data: DatasetPayload,
    #[serde(default)]
    pub settings: PreviewSettings,
}
