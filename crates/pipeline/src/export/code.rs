//! 代码字面量格式：TypeScript、Python、Ruby、C#
//!
//! Python / Ruby / C# 逐个遍历值树生成目标语言的字面量，
//! 不对 JSON 文本做字符串替换。

use serde_json::Value;

use super::json::to_json;
use super::{ExportError, ExportFormat, ExportOptions, Exporter, project, project_row};
use crate::dataset::Row;

pub struct TypescriptExporter;
pub struct PythonExporter;
pub struct RubyExporter;
pub struct CsharpExporter;

// ============================================================================
// TypeScript
// ============================================================================

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn ts_type(value: &Value) -> &'static str {
    match value {
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::String(_) => "string",
        Value::Null => "string | null",
        _ => "unknown",
    }
}

impl Exporter for TypescriptExporter {
    fn export(
        &self,
        rows: &[Row],
        keys: &[String],
        options: &ExportOptions,
    ) -> Result<String, ExportError> {
        let first = rows
            .first()
            .map(|row| project_row(row, keys))
            .unwrap_or_default();
        let mut out = String::from("type Row = {\n");
        for (key, value) in &first {
            let name = if is_identifier(key) {
                key.clone()
            } else {
                json_string(key)
            };
            out.push_str(&format!("  {name}: {};\n", ts_type(value)));
        }
        out.push_str("};\n\n");

        let body = to_json(
            &Value::Array(project(rows, keys)),
            options.json_indent()?,
            ExportFormat::Typescript,
        )?;
        out.push_str(&format!("const data: Row[] = {body};"));
        Ok(out)
    }
}

// ============================================================================
// Python
// ============================================================================

fn json_string(s: &str) -> String {
    // JSON 字符串转义是 Python / TypeScript 字符串字面量的子集
    Value::String(s.to_string()).to_string()
}

fn python_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => json_string(s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(python_literal).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", json_string(k), python_literal(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
    }
}

impl Exporter for PythonExporter {
    fn export(
        &self,
        rows: &[Row],
        keys: &[String],
        _options: &ExportOptions,
    ) -> Result<String, ExportError> {
        let lines: Vec<String> = project(rows, keys)
            .iter()
            .map(|row| format!("    {},", python_literal(row)))
            .collect();
        Ok(format!("data = [\n{}\n]", lines.join("\n")))
    }
}

// ============================================================================
// Ruby
// ============================================================================

fn ruby_string(s: &str) -> String {
    // 双引号字符串中 `#` 会触发插值
    json_string(s).replace('#', "\\#")
}

fn ruby_literal(value: &Value) -> String {
    match value {
        Value::Null => "nil".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => ruby_string(s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(ruby_literal).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{} => {}", ruby_string(k), ruby_literal(v)))
                .collect();
            format!("{{ {} }}", inner.join(", "))
        }
    }
}

impl Exporter for RubyExporter {
    fn export(
        &self,
        rows: &[Row],
        keys: &[String],
        _options: &ExportOptions,
    ) -> Result<String, ExportError> {
        let lines: Vec<String> = project(rows, keys)
            .iter()
            .map(|row| format!("  {},", ruby_literal(row)))
            .collect();
        Ok(format!("data = [\n{}\n]", lines.join("\n")))
    }
}

// ============================================================================
// C#
// ============================================================================

/// 逐字字符串 `@"..."`，内部 `"` 加倍
fn csharp_string(s: &str) -> String {
    format!("@\"{}\"", s.replace('"', "\"\""))
}

fn csharp_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => csharp_string(s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(csharp_literal).collect();
            format!("new object[] {{ {} }}", inner.join(", "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("[{}] = {}", csharp_string(k), csharp_literal(v)))
                .collect();
            format!("new Dictionary<string, object> {{ {} }}", inner.join(", "))
        }
    }
}

impl Exporter for CsharpExporter {
    fn export(
        &self,
        rows: &[Row],
        keys: &[String],
        _options: &ExportOptions,
    ) -> Result<String, ExportError> {
        let lines: Vec<String> = project(rows, keys)
            .iter()
            .map(|row| format!("    {},", csharp_literal(row)))
            .collect();
        Ok(format!(
            "var data = new List<Dictionary<string, object>>\n{{\n{}\n}};",
            lines.join("\n")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<Row> {
        vec![
            json!({"note": "true: null", "n": 1.5, "ok": false, "gone": null})
                .as_object()
                .cloned()
                .unwrap(),
        ]
    }

    fn keys() -> Vec<String> {
        rows()[0].keys().cloned().collect()
    }

    #[test]
    fn test_typescript_type_alias() {
        let rows = vec![
            json!({"id": 1, "first name": "Ann", "active": true})
                .as_object()
                .cloned()
                .unwrap(),
        ];
        let keys: Vec<String> = rows[0].keys().cloned().collect();
        let out = TypescriptExporter
            .export(&rows, &keys, &ExportOptions::default())
            .unwrap();

        assert!(out.starts_with(
            "type Row = {\n  id: number;\n  \"first name\": string;\n  active: boolean;\n};\n\n"
        ));
        assert!(out.contains("const data: Row[] = [\n  {\n    \"id\": 1,"));
        assert!(out.ends_with("];"));

        let compact = ExportOptions {
            json_indent: 0,
            ..Default::default()
        };
        let out = TypescriptExporter.export(&rows, &keys, &compact).unwrap();
        assert!(out.ends_with(r#"const data: Row[] = [{"id":1,"first name":"Ann","active":true}];"#));
    }

    #[test]
    fn test_python_walks_values() {
        let out = PythonExporter
            .export(&rows(), &keys(), &ExportOptions::default())
            .unwrap();
        assert_eq!(
            out,
            "data = [\n    {\"note\": \"true: null\", \"n\": 1.5, \"ok\": False, \"gone\": None},\n]"
        );
    }

    #[test]
    fn test_ruby_walks_values() {
        let out = RubyExporter
            .export(&rows(), &keys(), &ExportOptions::default())
            .unwrap();
        assert_eq!(
            out,
            "data = [\n  { \"note\" => \"true: null\", \"n\" => 1.5, \"ok\" => false, \"gone\" => nil },\n]"
        );
        assert_eq!(ruby_string("#{x}"), "\"\\#{x}\"");
    }

    #[test]
    fn test_csharp_collection_initializer() {
        let out = CsharpExporter
            .export(&rows(), &keys(), &ExportOptions::default())
            .unwrap();
        assert!(out.starts_with("var data = new List<Dictionary<string, object>>\n{\n"));
        assert!(out.contains(
            "new Dictionary<string, object> { [@\"note\"] = @\"true: null\", [@\"n\"] = 1.5, [@\"ok\"] = false, [@\"gone\"] = null },"
        ));
        assert!(out.ends_with("\n};"));
        assert_eq!(csharp_string("say \"hi\""), "@\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_nested_values() {
        let value = json!({"tags": ["a", 1], "meta": {"k": null}});
        assert_eq!(
            python_literal(&value),
            "{\"tags\": [\"a\", 1], \"meta\": {\"k\": None}}"
        );
        assert_eq!(
            csharp_literal(&json!([true])),
            "new object[] { true }"
        );
    }
}
