//! 导入流水线
//!
//! 将上传文件（CSV / JSON / XLSX / XML / YAML）解析为表格数据。
//!
//! 流程：按扩展名选择解析器 → 得到原始记录 → 逐条扁平化为单层行 →
//! 推断列 → 按套餐截断。整个过程是纯函数，持有状态的调用方在失败时
//! 应保持已有数据不变。

mod delimited;
mod spreadsheet;
mod structured;
mod xml_tree;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::dataset::{Column, Dataset, Row, flatten_value};
use crate::plan::{PlanTier, UpsellReason, UpsellSignal};

/// 导入错误
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("不支持的文件类型: {0}")]
    UnsupportedFileType(String),

    #[error("文件解析失败 ({format}): {message}")]
    Parse {
        format: ImportFormat,
        message: String,
    },

    #[error("文件中没有数据行")]
    NoRows,

    #[error("第 {index} 条记录不是对象，无法转换为表格行")]
    NotTabular { index: usize },
}

impl ImportError {
    pub(crate) fn parse(format: ImportFormat, err: impl fmt::Display) -> Self {
        Self::Parse {
            format,
            message: err.to_string(),
        }
    }
}

/// 支持导入的文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    Csv,
    Json,
    /// xlsx / xls / xlsm / xlsb / ods
    Spreadsheet,
    Xml,
    Yaml,
}

impl ImportFormat {
    /// 可识别的扩展名
    pub const EXTENSIONS: [&'static str; 10] = [
        "csv", "json", "xlsx", "xls", "xlsm", "xlsb", "ods", "xml", "yaml", "yml",
    ];

    /// 由文件名或扩展名推断格式（取最后一个 `.` 之后的部分，不区分大小写）
    pub fn from_file_name(name: &str) -> Result<Self, ImportError> {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or(name)
            .trim()
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Ok(Self::Spreadsheet),
            "xml" => Ok(Self::Xml),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ImportError::UnsupportedFileType(name.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Spreadsheet => "spreadsheet",
            Self::Xml => "xml",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 导入被套餐截断的情况
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Truncation {
    /// 文件中的总行数
    pub total: usize,
    /// 保留的行数
    pub kept: usize,
    pub limit: usize,
    pub plan: PlanTier,
}

impl Truncation {
    pub fn upsell(&self) -> UpsellSignal {
        UpsellSignal {
            reason: UpsellReason::ImportLimit,
            plan: self.plan,
            limit: self.limit,
            requested: self.total,
        }
    }
}

/// 导入结果
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub format: ImportFormat,
    pub dataset: Dataset,
    pub truncation: Option<Truncation>,
}

/// 解析器的中间结果：可选表头 + 原始记录
pub(crate) struct RawRecords {
    pub header: Option<Vec<String>>,
    pub records: Vec<Value>,
}

/// 导入文件内容
///
/// `file_name` 可以是完整文件名，也可以只是扩展名。
pub fn import_bytes(
    bytes: &[u8],
    file_name: &str,
    plan: PlanTier,
) -> Result<ImportOutcome, ImportError> {
    let format = match ImportFormat::from_file_name(file_name) {
        Ok(format) => format,
        Err(e) => {
            warn!(file_name, "Unsupported import file type");
            metrics::counter!("datagen_imports_total", "format" => "unknown", "outcome" => "unsupported")
                .increment(1);
            return Err(e);
        }
    };

    let result = import_with_format(bytes, format, plan);
    let outcome = match &result {
        Ok(o) if o.truncation.is_some() => "truncated",
        Ok(_) => "ok",
        Err(_) => "error",
    };
    metrics::counter!("datagen_imports_total", "format" => format.as_str(), "outcome" => outcome)
        .increment(1);

    match &result {
        Ok(o) => info!(
            file_name,
            format = %format,
            rows = o.dataset.len(),
            columns = o.dataset.columns.len(),
            truncated = o.truncation.is_some(),
            "File imported"
        ),
        Err(e) => warn!(file_name, format = %format, error = %e, "Import failed"),
    }
    result
}

/// 按已知格式导入
pub fn import_with_format(
    bytes: &[u8],
    format: ImportFormat,
    plan: PlanTier,
) -> Result<ImportOutcome, ImportError> {
    let raw = match format {
        ImportFormat::Csv => delimited::parse(bytes)?,
        ImportFormat::Json => structured::parse_json(bytes)?,
        ImportFormat::Yaml => structured::parse_yaml(bytes)?,
        ImportFormat::Xml => xml_tree::parse(bytes)?,
        ImportFormat::Spreadsheet => spreadsheet::parse(bytes)?,
    };
    debug!(format = %format, records = raw.records.len(), "Records parsed");

    let mut rows = flatten_records(raw.records)?;
    if rows.is_empty() {
        return Err(ImportError::NoRows);
    }

    let keys = match raw.header {
        Some(header) => header,
        None => rows[0].keys().cloned().collect(),
    };
    let columns = dedup(keys).into_iter().map(Column::new).collect();

    let total = rows.len();
    let truncation = match plan.import_limit() {
        Some(limit) if total > limit => {
            rows.truncate(limit);
            Some(Truncation {
                total,
                kept: limit,
                limit,
                plan,
            })
        }
        _ => None,
    };

    Ok(ImportOutcome {
        format,
        dataset: Dataset::new(columns, rows),
        truncation,
    })
}

fn flatten_records(records: Vec<Value>) -> Result<Vec<Row>, ImportError> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| flatten_value(record).ok_or(ImportError::NotTabular { index: i + 1 }))
        .collect()
}

fn dedup(keys: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    keys.into_iter()
        .filter(|k| seen.insert(k.clone()))
        .collect()
}
