//! JSON 及以 JSON 字面量为主体的格式（JavaScript、PHP）

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::{ExportError, ExportFormat, ExportOptions, Exporter, project};
use crate::dataset::Row;

pub struct JsonExporter;
pub struct JavascriptExporter;
pub struct PhpExporter;

/// 按缩进序列化，`indent == 0` 时输出紧凑格式
pub(crate) fn to_json(
    value: &Value,
    indent: usize,
    format: ExportFormat,
) -> Result<String, ExportError> {
    if indent == 0 {
        return serde_json::to_string(value).map_err(|e| ExportError::serialize(format, e));
    }

    let spaces = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(spaces.as_bytes());
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| ExportError::serialize(format, e))?;
    String::from_utf8(buf).map_err(|e| ExportError::serialize(format, e))
}

impl Exporter for JsonExporter {
    fn export(
        &self,
        rows: &[Row],
        keys: &[String],
        options: &ExportOptions,
    ) -> Result<String, ExportError> {
        to_json(&Value::Array(project(rows, keys)), options.json_indent()?, ExportFormat::Json)
    }
}

impl Exporter for JavascriptExporter {
    fn export(
        &self,
        rows: &[Row],
        keys: &[String],
        options: &ExportOptions,
    ) -> Result<String, ExportError> {
        let data = Value::Array(project(rows, keys));
        let body = to_json(&data, options.json_indent()?, ExportFormat::Javascript)?;
        Ok(format!("const data = {body};"))
    }
}

impl Exporter for PhpExporter {
    fn export(
        &self,
        rows: &[Row],
        keys: &[String],
        options: &ExportOptions,
    ) -> Result<String, ExportError> {
        let data = Value::Array(project(rows, keys));
        let body = to_json(&data, options.json_indent()?, ExportFormat::Php)?;
        Ok(format!("<?php\n$data = {body};\n?>"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> (Vec<Row>, Vec<String>) {
        let rows = vec![json!({"b": 2, "a": "x", "extra": 1}).as_object().cloned().unwrap()];
        (rows, vec!["a".to_string(), "b".to_string()])
    }

    #[test]
    fn test_json_only_emits_column_keys_in_order() {
        let (rows, keys) = sample();
        let out = JsonExporter.export(&rows, &keys, &ExportOptions::default()).unwrap();
        assert_eq!(out, "[\n  {\n    \"a\": \"x\",\n    \"b\": 2\n  }\n]");

        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, json!([{"a": "x", "b": 2}]));
    }

    #[test]
    fn test_json_indent_option() {
        let (rows, keys) = sample();
        let compact = ExportOptions {
            json_indent: 0,
            ..Default::default()
        };
        assert_eq!(
            JsonExporter.export(&rows, &keys, &compact).unwrap(),
            r#"[{"a":"x","b":2}]"#
        );

        let four = ExportOptions {
            json_indent: 4,
            ..Default::default()
        };
        assert!(JsonExporter.export(&rows, &keys, &four).unwrap().contains("\n        \"a\""));
    }

    #[test]
    fn test_javascript_and_php_wrappers() {
        let (rows, keys) = sample();
        let compact = ExportOptions {
            json_indent: 0,
            ..Default::default()
        };
        assert_eq!(
            JavascriptExporter.export(&rows, &keys, &compact).unwrap(),
            r#"const data = [{"a":"x","b":2}];"#
        );
        assert_eq!(
            PhpExporter.export(&rows, &keys, &compact).unwrap(),
            "<?php\n$data = [{\"a\":\"x\",\"b\":2}];\n?>"
        );
    }

    #[test]
    fn test_oversized_indent_is_rejected() {
        let (rows, keys) = sample();
        let options = ExportOptions {
            json_indent: usize::MAX / 2,
            ..Default::default()
        };
        let exporters: [&dyn Exporter; 3] = [&JsonExporter, &JavascriptExporter, &PhpExporter];
        for exporter in exporters {
            let err = exporter.export(&rows, &keys, &options).unwrap_err();
            assert!(matches!(err, ExportError::InvalidOption { option: "jsonIndent", .. }));
        }
    }
}
