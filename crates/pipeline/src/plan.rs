//! 套餐等级
//!
//! 套餐只用于限制生成行数和导入行数，超限时返回升级提示而不是错误。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 套餐等级
///
/// - Free: 最多 500 行，导入最多 3 行
/// - Paid: 最多 1000 行，导入最多 10 行
/// - Sub: 订阅用户，不限行数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Free,
    Paid,
    #[serde(alias = "subscription")]
    Sub,
}

impl PlanTier {
    /// 可持有的最大行数，`None` 表示不限
    pub fn row_limit(&self) -> Option<usize> {
        match self {
            Self::Free => Some(500),
            Self::Paid => Some(1000),
            Self::Sub => None,
        }
    }

    /// 单次导入保留的最大行数，`None` 表示不限
    pub fn import_limit(&self) -> Option<usize> {
        match self {
            Self::Free => Some(3),
            Self::Paid => Some(10),
            Self::Sub => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Paid => "paid",
            Self::Sub => "sub",
        }
    }

    /// 检查行数增长是否超出套餐上限
    ///
    /// 超限时返回升级提示，调用方不应修改任何数据。
    pub fn check_row_growth(&self, current: usize, additional: usize) -> Option<UpsellSignal> {
        let limit = self.row_limit()?;
        let requested = current.saturating_add(additional);
        (requested > limit).then_some(UpsellSignal {
            reason: UpsellReason::RowLimit,
            plan: *self,
            limit,
            requested,
        })
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "paid" => Ok(Self::Paid),
            "sub" | "subscription" => Ok(Self::Sub),
            other => Err(format!("未知的套餐等级: {other}")),
        }
    }
}

/// 升级提示的触发原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpsellReason {
    /// 生成/追加行数超过套餐上限
    RowLimit,
    /// 导入行数超过套餐上限，结果已截断
    ImportLimit,
}

/// 升级提示
///
/// 非致命信号：操作被拒绝（行数上限）或被截断（导入上限）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsellSignal {
    pub reason: UpsellReason,
    pub plan: PlanTier,
    pub limit: usize,
    pub requested: usize,
}

impl fmt::Display for UpsellSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            UpsellReason::RowLimit => write!(
                f,
                "{} 套餐最多 {} 行（请求 {} 行），升级后可解锁更多行数",
                self.plan, self.limit, self.requested
            ),
            UpsellReason::ImportLimit => write!(
                f,
                "{} 套餐最多导入 {} 行（文件共 {} 行），升级后可导入更多数据",
                self.plan, self.limit, self.requested
            ),
        }
    }
}
