//! CSV 解析
//!
//! 首行为表头；记录长度允许不一致，短记录缺失的尾部列不出现在行中，
//! 多出的字段忽略；空行跳过。

use serde_json::{Map, Value};

use super::{ImportError, ImportFormat, RawRecords};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub(crate) fn parse(bytes: &[u8]) -> Result<RawRecords, ImportError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| ImportError::parse(ImportFormat::Csv, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ImportError::parse(ImportFormat::Csv, e))?;
        let row: Map<String, Value> = header
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.clone(), Value::String(value.to_string())))
            .collect();
        records.push(Value::Object(row));
    }

    Ok(RawRecords {
        header: Some(header),
        records,
    })
}
