//! 导出选项
//!
//! 每种格式只读取与自己相关的字段，其余忽略。

use serde::{Deserialize, Serialize};

use super::ExportError;

/// JSON 缩进上限
pub const MAX_JSON_INDENT: usize = 16;

/// 换行符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Unix,
    Windows,
    Mac,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unix => "\n",
            Self::Windows => "\r\n",
            Self::Mac => "\r",
        }
    }
}

/// SQL 方言，决定标识符引号和建表语句中的列类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    Mysql,
    #[serde(alias = "postgresql")]
    Postgres,
    Sqlite,
}

/// 导出选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    /// CSV 分隔符，必须是单个 ASCII 字符
    pub delimiter: String,
    pub eol: LineEnding,
    /// JSON 缩进空格数，0 表示紧凑输出，最大 [`MAX_JSON_INDENT`]
    ///
    /// 对 json、javascript、php、typescript 四种格式都生效。
    pub json_indent: usize,

    pub table_name: String,
    pub db_type: SqlDialect,
    pub enclose_names: bool,
    pub drop_table: bool,
    pub include_create: bool,
    pub add_primary_key: bool,

    pub html_header: bool,
    pub html_border: Option<u32>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            eol: LineEnding::Unix,
            json_indent: 2,
            table_name: "my_table".to_string(),
            db_type: SqlDialect::Mysql,
            enclose_names: false,
            drop_table: false,
            include_create: false,
            add_primary_key: false,
            html_header: false,
            html_border: None,
        }
    }
}

impl ExportOptions {
    pub fn delimiter_byte(&self) -> Result<u8, ExportError> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => Ok(*b),
            _ => Err(ExportError::InvalidOption {
                option: "delimiter",
                message: format!("分隔符必须是单个 ASCII 字符: {:?}", self.delimiter),
            }),
        }
    }

    /// 校验后的 JSON 缩进
    pub fn json_indent(&self) -> Result<usize, ExportError> {
        if self.json_indent > MAX_JSON_INDENT {
            return Err(ExportError::InvalidOption {
                option: "jsonIndent",
                message: format!(
                    "缩进必须在 0 到 {MAX_JSON_INDENT} 之间: {}",
                    self.json_indent
                ),
            });
        }
        Ok(self.json_indent)
    }

    /// 表名为空时回退到默认值
    pub fn table_name(&self) -> &str {
        let name = self.table_name.trim();
        if name.is_empty() { "my_table" } else { name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_partial_json() {
        let options: ExportOptions =
            serde_json::from_str(r#"{"delimiter": ";", "dbType": "postgres"}"#).unwrap();

        assert_eq!(options.delimiter_byte().unwrap(), b';');
        assert_eq!(options.db_type, SqlDialect::Postgres);
        assert_eq!(options.json_indent, 2);
        assert_eq!(options.table_name(), "my_table");
        assert!(!options.include_create);
    }

    #[test]
    fn test_json_indent_bounds() {
        let ok = ExportOptions {
            json_indent: MAX_JSON_INDENT,
            ..Default::default()
        };
        assert_eq!(ok.json_indent().unwrap(), MAX_JSON_INDENT);

        for bad in [MAX_JSON_INDENT + 1, usize::MAX / 2] {
            let options = ExportOptions {
                json_indent: bad,
                ..Default::default()
            };
            let err = options.json_indent().unwrap_err();
            assert!(matches!(err, ExportError::InvalidOption { option: "jsonIndent", .. }));
        }
    }

    #[test]
    fn test_invalid_delimiter() {
        for bad in ["", ";;", "é", "\""] {
            let options = ExportOptions {
                delimiter: bad.to_string(),
                ..Default::default()
            };
            assert!(options.delimiter_byte().is_err(), "{bad:?}");
        }
    }
}
