//! 流水线错误类型定义
//!
//! 各子模块定义自己的错误枚举，这里汇总为统一的 `PipelineError`，
//! 便于 CLI 和 HTTP 层只处理一种错误类型。

use thiserror::Error;

use crate::export::ExportError;
use crate::field::FieldError;
use crate::import::ImportError;
use crate::plan::UpsellSignal;

/// 流水线统一错误类型
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Export(#[from] ExportError),

    /// 套餐限制：操作被拒绝，数据保持不变
    #[error("{0}")]
    Upsell(UpsellSignal),

    #[error("行索引越界: {index}（共 {len} 行）")]
    RowOutOfRange { index: usize, len: usize },

    #[error("列不存在: {0}")]
    UnknownColumn(String),
}

impl PipelineError {
    /// 是否为套餐限制（非致命，应引导用户升级）
    pub fn is_upsell(&self) -> bool {
        matches!(self, Self::Upsell(_))
    }
}

/// 流水线 Result 类型别名
pub type Result<T> = std::result::Result<T, PipelineError>;
