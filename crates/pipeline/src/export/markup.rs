//! XML 与 HTML 表格

use quick_xml::escape::escape;

use super::{ExportError, ExportOptions, Exporter};
use crate::dataset::{Row, cell_text};

pub struct XmlExporter;
pub struct HtmlExporter;

/// 列名转为合法的 XML 元素名
fn element_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let starts_ok = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    if !starts_ok {
        name.insert(0, '_');
    }
    name
}

fn cell(row: &Row, key: &str) -> String {
    row.get(key).map(cell_text).unwrap_or_default()
}

impl Exporter for XmlExporter {
    fn export(
        &self,
        rows: &[Row],
        keys: &[String],
        _options: &ExportOptions,
    ) -> Result<String, ExportError> {
        let tags: Vec<String> = keys.iter().map(|k| element_name(k)).collect();

        let mut out = String::from("<rows>\n");
        for row in rows {
            out.push_str("  <row>\n");
            for (key, tag) in keys.iter().zip(&tags) {
                let value = cell(row, key);
                out.push_str(&format!("    <{tag}>{}</{tag}>\n", escape(value.as_str())));
            }
            out.push_str("  </row>\n");
        }
        out.push_str("</rows>");
        Ok(out)
    }
}

impl Exporter for HtmlExporter {
    fn export(
        &self,
        rows: &[Row],
        keys: &[String],
        options: &ExportOptions,
    ) -> Result<String, ExportError> {
        let mut lines = Vec::with_capacity(rows.len() + 3);
        lines.push(match options.html_border {
            Some(border) => format!("<table border=\"{border}\">"),
            None => "<table>".to_string(),
        });

        if options.html_header {
            let cells: String = keys
                .iter()
                .map(|k| format!("<th>{}</th>", escape(k.as_str())))
                .collect();
            lines.push(format!("<tr>{cells}</tr>"));
        }
        for row in rows {
            let cells: String = keys
                .iter()
                .map(|k| format!("<td>{}</td>", escape(cell(row, k).as_str())))
                .collect();
            lines.push(format!("<tr>{cells}</tr>"));
        }

        lines.push("</table>".to_string());
        Ok(lines.join("\n"))
    }
}
