//! 工作台
//!
//! 会话级的数据状态容器：持有套餐、字段集合、数据集与预览设置。
//! 所有会改变行数的操作都先检查套餐上限，超限时返回升级提示且不修改数据；
//! 导入失败时已有数据保持不变。

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::dataset::{Column, Dataset, Row, empty_cell, normalize_row};
use crate::error::{PipelineError, Result};
use crate::export::{ExportFormat, export_dataset};
use crate::field::{FieldSet, FieldSpec};
use crate::generator::RowGenerator;
use crate::import::import_bytes;
use crate::plan::{PlanTier, UpsellSignal};
use crate::preview::{PreviewOutput, PreviewSettings, render_preview};

/// 下载内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Download {
    pub file_name: String,
    pub content_type: String,
    pub content: String,
}

pub struct Workbench {
    plan: PlanTier,
    fields: FieldSet,
    dataset: Dataset,
    settings: PreviewSettings,
    generator: RowGenerator<StdRng>,
}

impl Workbench {
    pub fn new(plan: PlanTier) -> Self {
        Self::with_seed(plan, rand::random())
    }

    /// 固定随机种子，生成结果可复现
    pub fn with_seed(plan: PlanTier, seed: u64) -> Self {
        Self {
            plan,
            fields: FieldSet::new(),
            dataset: Dataset::default(),
            settings: PreviewSettings::default(),
            generator: RowGenerator::seeded(seed),
        }
    }

    pub fn plan(&self) -> PlanTier {
        self.plan
    }

    /// 切换套餐；已有数据不截断，只影响后续操作
    pub fn set_plan(&mut self, plan: PlanTier) {
        self.plan = plan;
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn settings(&self) -> &PreviewSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: PreviewSettings) {
        self.settings = settings;
    }

    // ========================================================================
    // 字段
    // ========================================================================

    /// 整体替换字段集合
    pub fn set_fields(&mut self, fields: Vec<FieldSpec>) -> Result<()> {
        self.fields = FieldSet::try_from_fields(fields)?;
        self.sync_columns();
        debug!(fields = self.fields.len(), "Fields replaced");
        Ok(())
    }

    /// 新增或替换字段；别名变化时已有行的值随之迁移
    pub fn upsert_field(&mut self, field: FieldSpec) -> Result<()> {
        let mut next = self.fields.clone();
        let previous_key = next.get(&field.name).map(|f| f.key().to_string());
        let new_key = field.key().to_string();
        next.add_or_replace(field);
        next.validate()?;

        if let Some(old) = previous_key.filter(|old| *old != new_key) {
            for row in &mut self.dataset.rows {
                if let Some(value) = row.remove(&old) {
                    row.insert(new_key.clone(), value);
                }
            }
        }

        self.fields = next;
        self.sync_columns();
        Ok(())
    }

    pub fn remove_field(&mut self, name: &str) -> Option<FieldSpec> {
        let removed = self.fields.remove(name)?;
        self.sync_columns();
        Some(removed)
    }

    /// 数据集的列跟随字段别名，行随之规整
    fn sync_columns(&mut self) {
        self.dataset.columns = self
            .fields
            .iter()
            .map(|f| Column {
                name: f.name.clone(),
                alias: f.key().to_string(),
            })
            .collect();
        self.dataset.normalize();
    }

    // ========================================================================
    // 行
    // ========================================================================

    fn check_growth(&self, additional: usize) -> Result<()> {
        match self.plan.check_row_growth(self.dataset.len(), additional) {
            Some(signal) => {
                info!(
                    plan = %self.plan,
                    current = self.dataset.len(),
                    additional,
                    "Row limit reached"
                );
                Err(PipelineError::Upsell(signal))
            }
            None => Ok(()),
        }
    }

    /// 按字段生成 `count` 行并追加，序号延续已有行
    pub fn add_generated_rows(&mut self, count: usize) -> Result<usize> {
        self.check_growth(count)?;
        if self.dataset.is_empty() {
            self.sync_columns();
        }

        let start = self.dataset.len();
        let keys = self.dataset.column_keys();
        let rows = self
            .generator
            .generate_rows_from(self.fields.as_slice(), start, count);
        self.dataset
            .rows
            .extend(rows.iter().map(|row| normalize_row(row, &keys)));

        debug!(added = count, total = self.dataset.len(), "Generated rows appended");
        Ok(self.dataset.len())
    }

    /// 追加空行
    pub fn add_blank_rows(&mut self, count: usize) -> Result<usize> {
        self.check_growth(count)?;
        if self.dataset.is_empty() && self.dataset.columns.is_empty() {
            self.sync_columns();
        }

        let blank: Row = self
            .dataset
            .column_keys()
            .into_iter()
            .map(|key| (key, empty_cell()))
            .collect();
        self.dataset
            .rows
            .extend(std::iter::repeat_n(blank, count));
        Ok(self.dataset.len())
    }

    pub fn set_cell(&mut self, row: usize, column: &str, value: Value) -> Result<()> {
        if !self.dataset.columns.iter().any(|c| c.key() == column) {
            return Err(PipelineError::UnknownColumn(column.to_string()));
        }
        let len = self.dataset.len();
        let target = self
            .dataset
            .rows
            .get_mut(row)
            .ok_or(PipelineError::RowOutOfRange { index: row, len })?;
        target.insert(column.to_string(), value);
        Ok(())
    }

    pub fn delete_row(&mut self, row: usize) -> Result<Row> {
        let len = self.dataset.len();
        if row >= len {
            return Err(PipelineError::RowOutOfRange { index: row, len });
        }
        Ok(self.dataset.rows.remove(row))
    }

    /// 清空所有行，保留列
    pub fn clear(&mut self) {
        self.dataset.rows.clear();
    }

    // ========================================================================
    // 导入 / 导出
    // ========================================================================

    /// 导入文件并替换当前数据集
    ///
    /// 被套餐截断时返回升级提示；失败时当前数据不变。
    pub fn import(&mut self, bytes: &[u8], file_name: &str) -> Result<Option<UpsellSignal>> {
        let outcome = import_bytes(bytes, file_name, self.plan)?;

        let mut dataset = outcome.dataset;
        dataset.normalize();
        self.dataset = dataset;

        Ok(outcome.truncation.map(|t| t.upsell()))
    }

    pub fn preview(&self) -> Result<PreviewOutput> {
        Ok(render_preview(&self.dataset, &self.settings)?)
    }

    /// 按当前设置中的导出选项序列化
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        Ok(export_dataset(&self.dataset, format, &self.settings.options)?)
    }

    pub fn download(&self, format: ExportFormat) -> Result<Download> {
        let content = self.export(format)?;
        info!(format = %format, rows = self.dataset.len(), "Download prepared");
        Ok(Download {
            file_name: format!("data.{}", format.extension()),
            content_type: format.content_type().to_string(),
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;
    use crate::import::ImportError;
    use crate::plan::UpsellReason;
    use serde_json::json;

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("id", FieldType::AutoIncrement),
            FieldSpec::new("age", FieldType::NumberRange).with_range(18, 65),
        ]
    }

    #[test]
    fn test_generate_within_limit() {
        let mut wb = Workbench::with_seed(PlanTier::Free, 1);
        wb.set_fields(fields()).unwrap();

        assert_eq!(wb.add_generated_rows(10).unwrap(), 10);
        assert_eq!(wb.add_generated_rows(5).unwrap(), 15);
        assert_eq!(wb.dataset().rows[10]["id"], json!("id_11"));
        assert_eq!(wb.dataset().column_keys(), vec!["id", "age"]);
    }

    #[test]
    fn test_row_limit_rejects_without_change() {
        let mut wb = Workbench::with_seed(PlanTier::Free, 1);
        wb.set_fields(fields()).unwrap();
        wb.add_generated_rows(499).unwrap();
        let before = wb.dataset().clone();

        let err = wb.add_generated_rows(2).unwrap_err();
        match err {
            PipelineError::Upsell(signal) => {
                assert_eq!(signal.reason, UpsellReason::RowLimit);
                assert_eq!(signal.limit, 500);
                assert_eq!(signal.requested, 501);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(wb.dataset(), &before);

        assert!(wb.add_blank_rows(2).unwrap_err().is_upsell());
        assert_eq!(wb.add_blank_rows(1).unwrap(), 500);
    }

    #[test]
    fn test_upsert_field_renames_row_keys() {
        let mut wb = Workbench::with_seed(PlanTier::Sub, 1);
        wb.set_fields(fields()).unwrap();
        wb.add_generated_rows(2).unwrap();

        wb.upsert_field(FieldSpec::new("id", FieldType::AutoIncrement).with_alias("key"))
            .unwrap();
        assert_eq!(wb.dataset().column_keys(), vec!["key", "age"]);
        assert_eq!(wb.dataset().rows[1]["key"], json!("id_2"));

        wb.upsert_field(FieldSpec::new("city", FieldType::Constant).with_value("Oslo"))
            .unwrap();
        assert_eq!(wb.dataset().rows[0]["city"], json!(""));

        assert!(wb.remove_field("age").is_some());
        assert_eq!(wb.dataset().column_keys(), vec!["key", "city"]);
        assert!(!wb.dataset().rows[0].contains_key("age"));
    }

    #[test]
    fn test_invalid_field_rejected() {
        let mut wb = Workbench::with_seed(PlanTier::Free, 1);
        let err = wb
            .upsert_field(FieldSpec::new("tier", FieldType::List))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Field(_)));
        assert!(wb.fields().is_empty());
    }

    #[test]
    fn test_import_replaces_dataset_and_failures_keep_it() {
        let mut wb = Workbench::with_seed(PlanTier::Free, 1);
        let upsell = wb
            .import(b"name,age\nA,1\nB\nC,3\nD,4\n", "people.csv")
            .unwrap();

        assert_eq!(upsell.map(|s| s.requested), Some(4));
        assert_eq!(wb.dataset().len(), 3);
        assert_eq!(wb.dataset().rows[1]["age"], json!(""));

        let before = wb.dataset().clone();
        let err = wb.import(b"{broken", "x.json").unwrap_err();
        assert!(matches!(err, PipelineError::Import(ImportError::Parse { .. })));
        assert_eq!(wb.dataset(), &before);
    }

    #[test]
    fn test_cell_edits() {
        let mut wb = Workbench::with_seed(PlanTier::Free, 1);
        wb.set_fields(fields()).unwrap();
        wb.add_blank_rows(2).unwrap();

        wb.set_cell(0, "age", json!(33)).unwrap();
        assert_eq!(wb.dataset().rows[0]["age"], json!(33));
        assert!(matches!(
            wb.set_cell(5, "age", json!(1)),
            Err(PipelineError::RowOutOfRange { index: 5, len: 2 })
        ));
        assert!(matches!(
            wb.set_cell(0, "nope", json!(1)),
            Err(PipelineError::UnknownColumn(_))
        ));

        let removed = wb.delete_row(0).unwrap();
        assert_eq!(removed["age"], json!(33));
        assert_eq!(wb.dataset().len(), 1);

        wb.clear();
        assert!(wb.dataset().is_empty());
        assert_eq!(wb.dataset().columns.len(), 2);
    }

    #[test]
    fn test_preview_and_download() {
        let mut wb = Workbench::with_seed(PlanTier::Free, 1);
        wb.set_fields(vec![FieldSpec::new("c", FieldType::Constant).with_value("x")])
            .unwrap();
        wb.add_generated_rows(2).unwrap();

        assert_eq!(wb.preview().unwrap().content, "c\nx\nx");

        let download = wb.download(ExportFormat::Json).unwrap();
        assert_eq!(download.file_name, "data.json");
        assert!(download.content_type.starts_with("application/json"));
        let parsed: Value = serde_json::from_str(&download.content).unwrap();
        assert_eq!(parsed, json!([{"c": "x"}, {"c": "x"}]));
    }
}
