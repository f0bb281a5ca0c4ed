//! 导入行为：套餐截断、扁平化、格式识别

use datagen_pipeline::import::{ImportError, ImportFormat};
use datagen_pipeline::{PlanTier, import_bytes};
use serde_json::json;

#[test]
fn test_csv_under_free_limit_is_not_truncated() {
    let outcome = import_bytes(b"a,b,c\n1,2,3\n4,5,6\n", "data.csv", PlanTier::Free).unwrap();

    assert_eq!(outcome.format, ImportFormat::Csv);
    assert_eq!(outcome.dataset.column_keys(), vec!["a", "b", "c"]);
    assert_eq!(outcome.dataset.len(), 2);
    assert!(outcome.truncation.is_none());
}

#[test]
fn test_json_over_free_limit_is_truncated() {
    let body = json!([
        {"id": 1}, {"id": 2}, {"id": 3}, {"id": 4}, {"id": 5}
    ]);
    let bytes = serde_json::to_vec(&body).unwrap();

    let outcome = import_bytes(&bytes, "rows.json", PlanTier::Free).unwrap();
    assert_eq!(outcome.dataset.len(), 3);

    let truncation = outcome.truncation.expect("应提示截断");
    assert_eq!(truncation.total, 5);
    assert_eq!(truncation.kept, 3);
    assert_eq!(truncation.upsell().requested, 5);
}

#[test]
fn test_paid_and_sub_limits() {
    let rows: Vec<_> = (0..25).map(|i| json!({"n": i})).collect();
    let bytes = serde_json::to_vec(&rows).unwrap();

    let paid = import_bytes(&bytes, "rows.json", PlanTier::Paid).unwrap();
    assert_eq!(paid.dataset.len(), 10);

    let sub = import_bytes(&bytes, "rows.json", PlanTier::Sub).unwrap();
    assert_eq!(sub.dataset.len(), 25);
    assert!(sub.truncation.is_none());
}

#[test]
fn test_nested_json_is_flattened() {
    let body = json!([{"user": {"name": "Ann", "tags": ["a", "b"]}, "active": true}]);
    let bytes = serde_json::to_vec(&body).unwrap();

    let outcome = import_bytes(&bytes, "nested.json", PlanTier::Sub).unwrap();
    assert_eq!(
        outcome.dataset.column_keys(),
        vec!["user.name", "user.tags.0", "user.tags.1", "active"]
    );
    assert_eq!(outcome.dataset.rows[0]["user.tags.1"], "b");
}

#[test]
fn test_yaml_and_xml_imports() {
    let yaml = "- name: Ann\n  age: 30\n- name: Bob\n  age: 41\n";
    let outcome = import_bytes(yaml.as_bytes(), "people.yml", PlanTier::Sub).unwrap();
    assert_eq!(outcome.dataset.len(), 2);
    assert_eq!(outcome.dataset.rows[1]["age"], 41);

    let xml = "<rows><row><name>Ann</name></row><row><name>Bob</name></row></rows>";
    let outcome = import_bytes(xml.as_bytes(), "people.xml", PlanTier::Sub).unwrap();
    assert_eq!(outcome.dataset.column_keys(), vec!["name"]);
    assert_eq!(outcome.dataset.rows[1]["name"], "Bob");
}

#[test]
fn test_unsupported_and_malformed_files() {
    let err = import_bytes(b"%PDF", "doc.pdf", PlanTier::Free).unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFileType(_)));

    let err = import_bytes(b"{not json", "bad.json", PlanTier::Free).unwrap_err();
    assert!(matches!(err, ImportError::Parse { .. }));

    let err = import_bytes(b"[]", "empty.json", PlanTier::Free).unwrap_err();
    assert!(matches!(err, ImportError::NoRows));
}
