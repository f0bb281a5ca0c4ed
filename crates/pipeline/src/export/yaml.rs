//! YAML（serde_yaml 序列化，可被导入流水线原样读回）

use serde_json::Value;

use super::{ExportError, ExportFormat, ExportOptions, Exporter, project};
use crate::dataset::Row;

pub struct YamlExporter;

impl Exporter for YamlExporter {
    fn export(
        &self,
        rows: &[Row],
        keys: &[String],
        _options: &ExportOptions,
    ) -> Result<String, ExportError> {
        let doc = Value::Array(project(rows, keys));
        // 保留末尾换行：块标量的换行属于最后一个值
        serde_yaml::to_string(&doc).map_err(|e| ExportError::serialize(ExportFormat::Yaml, e))
    }
}
