//! 工作台：套餐行数上限与升级提示

use datagen_pipeline::field::{FieldSpec, FieldType};
use datagen_pipeline::{PipelineError, PlanTier, UpsellReason, Workbench};

fn fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("id", FieldType::AutoIncrement),
        FieldSpec::new("name", FieldType::String),
    ]
}

#[test]
fn test_row_limit_upsell_leaves_rows_untouched() {
    let mut workbench = Workbench::with_seed(PlanTier::Free, 1);
    workbench.set_fields(fields()).unwrap();
    workbench.add_generated_rows(500).unwrap();
    let before = workbench.dataset().clone();

    let err = workbench.add_generated_rows(1).unwrap_err();
    match err {
        PipelineError::Upsell(signal) => {
            assert_eq!(signal.reason, UpsellReason::RowLimit);
            assert_eq!(signal.limit, 500);
            assert_eq!(signal.requested, 501);
        }
        other => panic!("期望升级提示，实际: {other:?}"),
    }
    assert_eq!(workbench.dataset(), &before);

    assert!(workbench.add_blank_rows(1).unwrap_err().is_upsell());
    assert_eq!(workbench.dataset().len(), 500);
}

#[test]
fn test_upgrade_unlocks_more_rows() {
    let mut workbench = Workbench::with_seed(PlanTier::Free, 2);
    workbench.set_fields(fields()).unwrap();
    workbench.add_generated_rows(500).unwrap();

    workbench.set_plan(PlanTier::Paid);
    assert_eq!(workbench.add_generated_rows(500).unwrap(), 1000);
    assert!(workbench.add_generated_rows(1).is_err());

    workbench.set_plan(PlanTier::Sub);
    assert_eq!(workbench.add_generated_rows(5000).unwrap(), 6000);
}

#[test]
fn test_failed_import_preserves_existing_rows() {
    let mut workbench = Workbench::with_seed(PlanTier::Free, 3);
    workbench.set_fields(fields()).unwrap();
    workbench.add_generated_rows(5).unwrap();
    let before = workbench.dataset().clone();

    assert!(workbench.import(b"{broken", "data.json").is_err());
    assert_eq!(workbench.dataset(), &before);
}

#[test]
fn test_download_uses_format_extension() {
    let mut workbench = Workbench::with_seed(PlanTier::Free, 4);
    workbench.set_fields(fields()).unwrap();
    workbench.add_generated_rows(2).unwrap();

    let download = workbench
        .download(datagen_pipeline::ExportFormat::Csharp)
        .unwrap();
    assert_eq!(download.file_name, "data.cs");
    assert!(download.content.contains("new Dictionary<string, object>"));
}
