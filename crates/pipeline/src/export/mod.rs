//! 导出流水线
//!
//! 将行数据按列顺序序列化为目标格式文本。每种格式是一个 [`Exporter`]
//! 策略，统一通过 [`exporter_for`] 选择。
//!
//! 公共约定：
//! - 行为空时所有格式都输出空字符串
//! - 未提供列时使用第一行的键
//! - 行号与转置属于预览，不属于格式本身

mod code;
mod delimited;
mod json;
mod markup;
mod options;
mod sql;
mod yaml;

pub use options::{ExportOptions, LineEnding, SqlDialect};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::dataset::{Dataset, Row};

/// 导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("未知的导出格式: {0}")]
    UnknownFormat(String),

    #[error("导出选项 {option} 无效: {message}")]
    InvalidOption {
        option: &'static str,
        message: String,
    },

    #[error("序列化失败 ({format}): {message}")]
    Serialize {
        format: ExportFormat,
        message: String,
    },
}

impl ExportError {
    pub(crate) fn serialize(format: ExportFormat, err: impl fmt::Display) -> Self {
        Self::Serialize {
            format,
            message: err.to_string(),
        }
    }
}

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
    Tsv,
    Json,
    Sql,
    Xml,
    #[serde(alias = "yml")]
    Yaml,
    Html,
    #[serde(alias = "js")]
    Javascript,
    #[serde(alias = "ts")]
    Typescript,
    #[serde(alias = "py")]
    Python,
    Php,
    #[serde(alias = "rb")]
    Ruby,
    #[serde(rename = "c#", alias = "csharp", alias = "cs")]
    Csharp,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 14] = [
        Self::Csv,
        Self::Excel,
        Self::Tsv,
        Self::Json,
        Self::Sql,
        Self::Xml,
        Self::Yaml,
        Self::Html,
        Self::Javascript,
        Self::Typescript,
        Self::Python,
        Self::Php,
        Self::Ruby,
        Self::Csharp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "excel",
            Self::Tsv => "tsv",
            Self::Json => "json",
            Self::Sql => "sql",
            Self::Xml => "xml",
            Self::Yaml => "yaml",
            Self::Html => "html",
            Self::Javascript => "javascript",
            Self::Typescript => "typescript",
            Self::Python => "python",
            Self::Php => "php",
            Self::Ruby => "ruby",
            Self::Csharp => "c#",
        }
    }

    /// 下载文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel | Self::Tsv => "tsv",
            Self::Json => "json",
            Self::Sql => "sql",
            Self::Xml => "xml",
            Self::Yaml => "yaml",
            Self::Html => "html",
            Self::Javascript => "js",
            Self::Typescript => "ts",
            Self::Python => "py",
            Self::Php => "php",
            Self::Ruby => "rb",
            Self::Csharp => "cs",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Excel | Self::Tsv => "text/tab-separated-values; charset=utf-8",
            Self::Json => "application/json; charset=utf-8",
            Self::Sql => "application/sql; charset=utf-8",
            Self::Xml => "application/xml; charset=utf-8",
            Self::Yaml => "application/yaml; charset=utf-8",
            Self::Html => "text/html; charset=utf-8",
            Self::Javascript => "text/javascript; charset=utf-8",
            _ => "text/plain; charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        let format = match tag.as_str() {
            "csharp" | "cs" => Self::Csharp,
            "js" => Self::Javascript,
            "ts" => Self::Typescript,
            "py" => Self::Python,
            "rb" => Self::Ruby,
            "yml" => Self::Yaml,
            other => Self::ALL
                .into_iter()
                .find(|f| f.as_str() == other)
                .ok_or_else(|| ExportError::UnknownFormat(s.to_string()))?,
        };
        Ok(format)
    }
}

/// 格式策略
pub trait Exporter: Send + Sync {
    /// `rows` 非空，`keys` 为最终的列顺序
    fn export(
        &self,
        rows: &[Row],
        keys: &[String],
        options: &ExportOptions,
    ) -> Result<String, ExportError>;
}

/// 格式 → 策略
pub fn exporter_for(format: ExportFormat) -> &'static dyn Exporter {
    match format {
        ExportFormat::Csv => &delimited::CsvExporter,
        ExportFormat::Excel | ExportFormat::Tsv => &delimited::TsvExporter,
        ExportFormat::Json => &json::JsonExporter,
        ExportFormat::Javascript => &json::JavascriptExporter,
        ExportFormat::Php => &json::PhpExporter,
        ExportFormat::Sql => &sql::SqlExporter,
        ExportFormat::Xml => &markup::XmlExporter,
        ExportFormat::Html => &markup::HtmlExporter,
        ExportFormat::Yaml => &yaml::YamlExporter,
        ExportFormat::Typescript => &code::TypescriptExporter,
        ExportFormat::Python => &code::PythonExporter,
        ExportFormat::Ruby => &code::RubyExporter,
        ExportFormat::Csharp => &code::CsharpExporter,
    }
}

/// 导出行数据
///
/// `keys` 为空时使用第一行的键。
pub fn export_rows(
    rows: &[Row],
    keys: &[String],
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<String, ExportError> {
    let Some(first) = rows.first() else {
        return Ok(String::new());
    };

    let inferred;
    let keys = if keys.is_empty() {
        inferred = first.keys().cloned().collect::<Vec<_>>();
        inferred.as_slice()
    } else {
        keys
    };

    let output = exporter_for(format).export(rows, keys, options)?;

    metrics::counter!("datagen_exports_total", "format" => format.as_str()).increment(1);
    debug!(format = %format, rows = rows.len(), columns = keys.len(), bytes = output.len(), "Rows exported");
    Ok(output)
}

/// 按数据集的列导出
pub fn export_dataset(
    dataset: &Dataset,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<String, ExportError> {
    export_rows(&dataset.rows, &dataset.column_keys(), format, options)
}

/// 按列顺序取出行的值，缺失为 null
pub(crate) fn project(rows: &[Row], keys: &[String]) -> Vec<Value> {
    rows.iter()
        .map(|row| Value::Object(project_row(row, keys)))
        .collect()
}

pub(crate) fn project_row(row: &Row, keys: &[String]) -> Row {
    keys.iter()
        .map(|key| (key.clone(), row.get(key).cloned().unwrap_or(Value::Null)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<Row> {
        vec![
            json!({"name": "Ann", "age": 30}).as_object().cloned().unwrap(),
            json!({"name": "Bob", "age": 41}).as_object().cloned().unwrap(),
        ]
    }

    #[test]
    fn test_empty_rows_produce_empty_output_for_every_format() {
        for format in ExportFormat::ALL {
            let out = export_rows(&[], &[], format, &ExportOptions::default()).unwrap();
            assert_eq!(out, "", "{format}");
        }
    }

    #[test]
    fn test_format_tags_roundtrip() {
        for format in ExportFormat::ALL {
            assert_eq!(format.as_str().parse::<ExportFormat>().unwrap(), format);
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{}\"", format.as_str()));
        }
        assert_eq!("CSharp".parse::<ExportFormat>().unwrap(), ExportFormat::Csharp);
        assert_eq!("yml".parse::<ExportFormat>().unwrap(), ExportFormat::Yaml);
        let f: ExportFormat = serde_json::from_str("\"ts\"").unwrap();
        assert_eq!(f, ExportFormat::Typescript);
        assert!(matches!(
            "pdf".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_keys_inferred_from_first_row() {
        let out = export_rows(&rows(), &[], ExportFormat::Csv, &ExportOptions::default()).unwrap();
        assert_eq!(out, "name,age\nAnn,30\nBob,41");
    }

    #[test]
    fn test_every_format_renders_values() {
        for format in ExportFormat::ALL {
            let out = export_rows(&rows(), &[], format, &ExportOptions::default()).unwrap();
            assert!(out.contains("Ann"), "{format}: {out}");
            assert!(out.contains("41"), "{format}: {out}");
        }
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ExportFormat::Excel.extension(), "tsv");
        assert_eq!(ExportFormat::Csharp.extension(), "cs");
        assert!(ExportFormat::Json.content_type().starts_with("application/json"));
    }
}
