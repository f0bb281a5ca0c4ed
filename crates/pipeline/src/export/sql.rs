//! SQL INSERT 语句
//!
//! 每行一条 `INSERT`。字符串用单引号包裹并将 `'` 加倍，数值与布尔按字面量
//! 输出，null 为 `NULL`。可选输出 `DROP TABLE` / `CREATE TABLE`，建表列类型
//! 由第一行的值推断。

use serde_json::Value;

use super::{ExportError, ExportOptions, Exporter, SqlDialect};
use crate::dataset::Row;

pub struct SqlExporter;

impl Exporter for SqlExporter {
    fn export(
        &self,
        rows: &[Row],
        keys: &[String],
        options: &ExportOptions,
    ) -> Result<String, ExportError> {
        let dialect = options.db_type;
        let ident = |name: &str| quote_ident(name, dialect, options.enclose_names);
        let table = ident(options.table_name());
        let columns = keys.iter().map(|k| ident(k)).collect::<Vec<_>>().join(", ");

        let mut statements = Vec::new();
        if options.drop_table {
            statements.push(format!("DROP TABLE IF EXISTS {table};"));
        }
        if options.include_create {
            statements.push(create_table(&table, rows, keys, options, &ident));
        }
        if !statements.is_empty() {
            statements.push(String::new());
        }

        for row in rows {
            let values = keys
                .iter()
                .map(|key| literal(row.get(key).unwrap_or(&Value::Null), dialect))
                .collect::<Vec<_>>()
                .join(", ");
            statements.push(format!("INSERT INTO {table} ({columns}) VALUES ({values});"));
        }

        Ok(statements.join("\n"))
    }
}

fn quote_ident(name: &str, dialect: SqlDialect, enclose: bool) -> String {
    if !enclose {
        return name.to_string();
    }
    match dialect {
        SqlDialect::Mysql => format!("`{}`", name.replace('`', "``")),
        SqlDialect::Postgres | SqlDialect::Sqlite => format!("\"{}\"", name.replace('"', "\"\"")),
    }
}

fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn literal(value: &Value, dialect: SqlDialect) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => {
            let text = match (dialect, b) {
                (SqlDialect::Sqlite, true) => "1",
                (SqlDialect::Sqlite, false) => "0",
                (_, true) => "TRUE",
                (_, false) => "FALSE",
            };
            text.to_string()
        }
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote_string(s),
        nested => quote_string(&nested.to_string()),
    }
}

fn column_type(value: Option<&Value>, dialect: SqlDialect) -> &'static str {
    match (value, dialect) {
        (Some(Value::Number(n)), SqlDialect::Mysql) if n.is_i64() || n.is_u64() => "INT",
        (Some(Value::Number(n)), _) if n.is_i64() || n.is_u64() => "INTEGER",
        (Some(Value::Number(_)), SqlDialect::Mysql) => "DOUBLE",
        (Some(Value::Number(_)), SqlDialect::Postgres) => "DOUBLE PRECISION",
        (Some(Value::Number(_)), SqlDialect::Sqlite) => "REAL",
        (Some(Value::Bool(_)), SqlDialect::Sqlite) => "INTEGER",
        (Some(Value::Bool(_)), _) => "BOOLEAN",
        (_, SqlDialect::Mysql) => "VARCHAR(255)",
        _ => "TEXT",
    }
}

fn create_table(
    table: &str,
    rows: &[Row],
    keys: &[String],
    options: &ExportOptions,
    ident: &dyn Fn(&str) -> String,
) -> String {
    let dialect = options.db_type;
    let first = rows.first();

    let mut defs = Vec::new();
    if options.add_primary_key {
        let id = ident("id");
        defs.push(match dialect {
            SqlDialect::Mysql => format!("{id} INT AUTO_INCREMENT PRIMARY KEY"),
            SqlDialect::Postgres => format!("{id} SERIAL PRIMARY KEY"),
            SqlDialect::Sqlite => format!("{id} INTEGER PRIMARY KEY AUTOINCREMENT"),
        });
    }
    for key in keys {
        let ty = column_type(first.and_then(|r| r.get(key)), dialect);
        defs.push(format!("{} {ty}", ident(key)));
    }

    format!("CREATE TABLE {table} (\n  {}\n);", defs.join(",\n  "))
}
