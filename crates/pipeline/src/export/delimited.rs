//! CSV / TSV
//!
//! 引号策略：仅在字段包含分隔符、引号或换行时加引号，内部引号加倍。
//! 输出末尾不带换行符。

use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::{ExportError, ExportFormat, ExportOptions, Exporter, LineEnding};
use crate::dataset::{Row, cell_text};

pub struct CsvExporter;
pub struct TsvExporter;

impl Exporter for CsvExporter {
    fn export(
        &self,
        rows: &[Row],
        keys: &[String],
        options: &ExportOptions,
    ) -> Result<String, ExportError> {
        let delimiter = options.delimiter_byte()?;
        write_delimited(rows, keys, delimiter, options.eol, ExportFormat::Csv)
    }
}

impl Exporter for TsvExporter {
    fn export(
        &self,
        rows: &[Row],
        keys: &[String],
        options: &ExportOptions,
    ) -> Result<String, ExportError> {
        write_delimited(rows, keys, b'\t', options.eol, ExportFormat::Tsv)
    }
}

fn write_delimited(
    rows: &[Row],
    keys: &[String],
    delimiter: u8,
    eol: LineEnding,
    format: ExportFormat,
) -> Result<String, ExportError> {
    let terminator = match eol {
        LineEnding::Unix => Terminator::Any(b'\n'),
        LineEnding::Windows => Terminator::CRLF,
        LineEnding::Mac => Terminator::Any(b'\r'),
    };

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(terminator)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer
        .write_record(keys)
        .map_err(|e| ExportError::serialize(format, e))?;
    for row in rows {
        let record = keys
            .iter()
            .map(|key| row.get(key).map(cell_text).unwrap_or_default());
        writer
            .write_record(record)
            .map_err(|e| ExportError::serialize(format, e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::serialize(format, e))?;
    let text = String::from_utf8(bytes).map_err(|e| ExportError::serialize(format, e))?;

    Ok(text
        .strip_suffix(eol.as_str())
        .map(str::to_string)
        .unwrap_or(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_quote_only_when_necessary() {
        let rows = vec![row(json!({"name": "Al\"ice", "age": 30}))];
        let out = CsvExporter
            .export(&rows, &keys(&["name", "age"]), &ExportOptions::default())
            .unwrap();
        assert_eq!(out, "name,age\n\"Al\"\"ice\",30");
    }

    #[test]
    fn test_embedded_delimiter_and_newline() {
        let rows = vec![row(json!({"a": "x,y", "b": "line1\nline2", "c": null}))];
        let out = CsvExporter
            .export(&rows, &keys(&["a", "b", "c"]), &ExportOptions::default())
            .unwrap();
        assert_eq!(out, "a,b,c\n\"x,y\",\"line1\nline2\",");
    }

    #[test]
    fn test_custom_delimiter_and_eol() {
        let rows = vec![row(json!({"a": 1, "b": 2})), row(json!({"a": 3, "b": 4}))];
        let options = ExportOptions {
            delimiter: ";".into(),
            eol: LineEnding::Windows,
            ..Default::default()
        };
        let out = CsvExporter.export(&rows, &keys(&["a", "b"]), &options).unwrap();
        assert_eq!(out, "a;b\r\n1;2\r\n3;4");
    }

    #[test]
    fn test_tsv() {
        let rows = vec![row(json!({"a": "one two", "b": true}))];
        let out = TsvExporter
            .export(&rows, &keys(&["a", "b"]), &ExportOptions::default())
            .unwrap();
        assert_eq!(out, "a\tb\none two\ttrue");
    }
}
