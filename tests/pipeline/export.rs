//! 导出行为：空数据、JSON 往返、CSV 引号

use datagen_pipeline::export::{ExportFormat, ExportOptions, export_rows};
use datagen_pipeline::{PlanTier, Row, RowGenerator, import_bytes};
use serde_json::json;

use crate::helpers::{all_type_fields, keys};

fn row(value: serde_json::Value) -> Row {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_empty_rows_export_to_empty_string_in_every_format() {
    let options = ExportOptions::default();
    for format in ExportFormat::ALL {
        let out = export_rows(&[], &[], format, &options).unwrap();
        assert_eq!(out, "", "format={format}");

        let out = export_rows(&[], &["a".to_string()], format, &options).unwrap();
        assert_eq!(out, "", "format={format} with keys");
    }
}

#[test]
fn test_json_export_then_import_yields_equal_rows() {
    let fields = all_type_fields();
    let rows = RowGenerator::seeded(2024).generate_rows(&fields, 40);

    let json = export_rows(&rows, &keys(&fields), ExportFormat::Json, &ExportOptions::default())
        .unwrap();
    let outcome = import_bytes(json.as_bytes(), "data.json", PlanTier::Sub).unwrap();

    assert_eq!(outcome.dataset.rows, rows);
    assert_eq!(outcome.dataset.column_keys(), keys(&fields));
}

#[test]
fn test_csv_quotes_only_when_necessary() {
    let rows = vec![
        row(json!({"plain": "abc", "comma": "a,b", "quote": "say \"hi\"", "newline": "x\ny"})),
    ];
    let out = export_rows(&rows, &[], ExportFormat::Csv, &ExportOptions::default()).unwrap();

    assert_eq!(
        out,
        "plain,comma,quote,newline\nabc,\"a,b\",\"say \"\"hi\"\"\",\"x\ny\""
    );
}

#[test]
fn test_every_format_renders_non_empty_rows() {
    let rows = vec![row(json!({"name": "Ann", "age": 30})), row(json!({"name": "Bob", "age": null}))];
    for format in ExportFormat::ALL {
        let out = export_rows(&rows, &[], format, &ExportOptions::default()).unwrap();
        assert!(out.contains("Ann"), "format={format}: {out}");
        assert!(out.contains("Bob"), "format={format}: {out}");
    }
}

#[test]
fn test_yaml_export_keeps_multiline_strings() {
    let rows = vec![
        row(json!({"id": "1", "note": "single"})),
        row(json!({"id": "2", "note": "line1\nline2\n"})),
    ];
    let yaml = export_rows(&rows, &[], ExportFormat::Yaml, &ExportOptions::default()).unwrap();
    let outcome = import_bytes(yaml.as_bytes(), "data.yaml", PlanTier::Sub).unwrap();

    assert_eq!(outcome.dataset.rows, rows);
}

#[test]
fn test_oversized_json_indent_is_an_option_error() {
    use datagen_pipeline::export::ExportError;

    let rows = vec![row(json!({"a": 1}))];
    let options = ExportOptions {
        json_indent: usize::MAX / 2,
        ..Default::default()
    };
    for format in [
        ExportFormat::Json,
        ExportFormat::Javascript,
        ExportFormat::Php,
        ExportFormat::Typescript,
    ] {
        let err = export_rows(&rows, &[], format, &options).unwrap_err();
        assert!(
            matches!(err, ExportError::InvalidOption { option: "jsonIndent", .. }),
            "format={format}"
        );
    }
}
