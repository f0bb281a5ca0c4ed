//! REST 服务错误类型定义
//!
//! 所有处理器返回 `ApiError`，统一转换为 `{success, code, message, data}` 响应体。

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use datagen_pipeline::PipelineError;
use datagen_pipeline::export::ExportError;
use datagen_pipeline::import::ImportError;
use serde_json::json;

use crate::payment::PaymentError;

const GENERIC_SERVER_ERROR: &str = "服务内部错误，请稍后重试";

/// REST 服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 认证错误
    #[error("未授权: {0}")]
    Unauthorized(String),
    #[error("用户名或密码错误")]
    InvalidCredentials,
    #[error("用户名已被占用")]
    UsernameTaken,

    // 验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),
    #[error("无效的 ID: {0}")]
    InvalidId(String),

    // 数据流水线
    #[error("不支持的文件: {0}")]
    UnsupportedFile(String),
    #[error("文件处理失败: {0}")]
    ImportFailed(String),

    // 支付
    #[error("支付服务未配置")]
    PaymentNotConfigured,
    #[error("支付请求失败: {0}")]
    Payment(String),

    // 系统错误
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("内部错误: {0}")]
    Internal(String),
}

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::UsernameTaken => StatusCode::CONFLICT,
            Self::Validation(_) | Self::InvalidId(_) | Self::UnsupportedFile(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::ImportFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Payment(_)
            | Self::PaymentNotConfigured
            | Self::Database(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidId(_) => "INVALID_ID",
            Self::UnsupportedFile(_) => "UNSUPPORTED_FILE",
            Self::ImportFailed(_) => "IMPORT_FAILED",
            Self::PaymentNotConfigured => "PAYMENT_NOT_CONFIGURED",
            Self::Payment(_) => "PAYMENT_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "Database operation failed");
                GENERIC_SERVER_ERROR.to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                GENERIC_SERVER_ERROR.to_string()
            }
            Self::Payment(e) => {
                tracing::error!(error = %e, "Payment provider request failed");
                "支付请求失败，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::Validation(format!("multipart 解析失败: {}", err.body_text()))
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::UnsupportedFileType(_) => Self::UnsupportedFile(err.to_string()),
            other => Self::ImportFailed(other.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Serialize { .. } => Self::Internal(err.to_string()),
            other => Self::Validation(other.to_string()),
        }
    }
}

/// 套餐限制在处理器中转换为 `upsell` 字段，走到这里说明调用方没有处理
impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Import(e) => e.into(),
            PipelineError::Export(e) => e.into(),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::NotConfigured => Self::PaymentNotConfigured,
            PaymentError::MissingPlanId => Self::Validation(err.to_string()),
            other => Self::Payment(other.to_string()),
        }
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, ApiError>;
