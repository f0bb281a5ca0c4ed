//! JSON / YAML 解析
//!
//! 根为数组时每个元素是一行；根为对象时视为单行。

use serde_json::Value;

use super::{ImportError, ImportFormat, RawRecords};

pub(crate) fn parse_json(bytes: &[u8]) -> Result<RawRecords, ImportError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| ImportError::parse(ImportFormat::Json, e))?;
    wrap_root(value)
}

pub(crate) fn parse_yaml(bytes: &[u8]) -> Result<RawRecords, ImportError> {
    let value: Value =
        serde_yaml::from_slice(bytes).map_err(|e| ImportError::parse(ImportFormat::Yaml, e))?;
    wrap_root(value)
}

fn wrap_root(value: Value) -> Result<RawRecords, ImportError> {
    let records = match value {
        Value::Array(items) => items,
        Value::Object(_) => vec![value],
        Value::Null => Vec::new(),
        _ => return Err(ImportError::NotTabular { index: 1 }),
    };
    Ok(RawRecords {
        header: None,
        records,
    })
}
