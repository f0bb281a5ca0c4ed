//! 表格数据模型
//!
//! 行是保持插入顺序的 `别名 → 标量值` 映射，列描述导出键与显示名。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 单行数据，键顺序即列顺序
pub type Row = Map<String, Value>;

/// 转置视图中字段名所在列的键
pub const TRANSPOSED_FIELD_KEY: &str = "field";

/// 列定义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    #[serde(default)]
    pub alias: String,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            alias: name.clone(),
            name,
        }
    }

    pub fn key(&self) -> &str {
        if self.alias.is_empty() {
            &self.name
        } else {
            &self.alias
        }
    }
}

/// 列 + 行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// 以第一行的键作为列
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let columns = rows
            .first()
            .map(|row| row.keys().map(Column::new).collect())
            .unwrap_or_default();
        Self { columns, rows }
    }

    pub fn column_keys(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.key().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 使每一行恰好包含数据集的列：缺失补空字符串，多余的键丢弃
    pub fn normalize(&mut self) {
        let keys = self.column_keys();
        for row in &mut self.rows {
            *row = normalize_row(row, &keys);
        }
    }

    /// 列优先视图
    ///
    /// 每个字段一行：`field` 列为字段键，`row_1 .. row_n` 为各行的值。
    pub fn transpose(&self) -> Dataset {
        if self.rows.is_empty() {
            return Dataset::default();
        }

        let mut columns = vec![Column::new(TRANSPOSED_FIELD_KEY)];
        columns.extend((1..=self.rows.len()).map(|i| Column::new(format!("row_{i}"))));

        let rows = self
            .column_keys()
            .into_iter()
            .map(|key| {
                let mut out = Row::new();
                out.insert(TRANSPOSED_FIELD_KEY.to_string(), Value::String(key.clone()));
                for (i, row) in self.rows.iter().enumerate() {
                    let value = row.get(&key).cloned().unwrap_or_else(empty_cell);
                    out.insert(format!("row_{}", i + 1), value);
                }
                out
            })
            .collect();

        Dataset { columns, rows }
    }
}

/// 按给定列重建一行
pub fn normalize_row(row: &Row, keys: &[String]) -> Row {
    keys.iter()
        .map(|key| {
            let value = row.get(key).cloned().unwrap_or_else(empty_cell);
            (key.clone(), value)
        })
        .collect()
}

/// 空单元格
pub fn empty_cell() -> Value {
    Value::String(String::new())
}

/// 单元格文本：字符串原样输出，null 为空，其余使用 JSON 文本
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 将对象扁平化为单层行
///
/// 嵌套对象使用点号连接键（`{a:{b:1}}` → `{"a.b":1}`），数组使用下标段（`tags.0`）。
/// 值不是对象时返回 `None`。
pub fn flatten_value(value: &Value) -> Option<Row> {
    let Value::Object(map) = value else {
        return None;
    };
    let mut out = Row::new();
    for (key, child) in map {
        flatten_into(&mut out, key, child);
    }
    Some(out)
}

fn flatten_into(out: &mut Row, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(out, &format!("{prefix}.{key}"), child);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                flatten_into(out, &format!("{prefix}.{i}"), child);
            }
        }
        scalar => {
            out.insert(prefix.to_string(), scalar.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_flatten_nested_objects_and_arrays() {
        let flat = flatten_value(&json!({
            "a": {"b": 1, "c": 2},
            "tags": ["x", "y"],
            "n": null
        }))
        .unwrap();

        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a.b", "a.c", "tags.0", "tags.1", "n"]);
        assert_eq!(flat["a.b"], json!(1));
        assert_eq!(flat["tags.1"], json!("y"));
        assert_eq!(flat["n"], Value::Null);
    }

    #[test]
    fn test_flatten_rejects_non_objects() {
        assert!(flatten_value(&json!(42)).is_none());
        assert!(flatten_value(&json!(["a"])).is_none());
    }

    #[test]
    fn test_normalize_fills_and_drops() {
        let mut dataset = Dataset::new(
            vec![Column::new("a"), Column::new("b")],
            vec![row(json!({"b": 2, "extra": true}))],
        );
        dataset.normalize();

        assert_eq!(dataset.rows[0], row(json!({"a": "", "b": 2})));
        let keys: Vec<&String> = dataset.rows[0].keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_transpose() {
        let dataset = Dataset::from_rows(vec![
            row(json!({"name": "Ann", "age": 30})),
            row(json!({"name": "Bob"})),
        ]);
        let t = dataset.transpose();

        assert_eq!(t.column_keys(), vec!["field", "row_1", "row_2"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0], row(json!({"field": "name", "row_1": "Ann", "row_2": "Bob"})));
        assert_eq!(t.rows[1], row(json!({"field": "age", "row_1": 30, "row_2": ""})));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!("x")), "x");
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&json!(1.5)), "1.5");
        assert_eq!(cell_text(&json!(false)), "false");
    }

    #[test]
    fn test_column_alias_fallback() {
        let column: Column = serde_json::from_str(r#"{"name": "email"}"#).unwrap();
        assert_eq!(column.key(), "email");
    }
}
