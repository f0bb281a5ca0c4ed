//! 命令执行器
//!
//! 将命令行参数转化为流水线调用，并负责文件读写。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::export::{ExportFormat, ExportOptions, export_rows};
use crate::field::{FieldSet, FieldSpec};
use crate::generator::RowGenerator;
use crate::import::{ImportFormat, import_bytes};
use crate::plan::PlanTier;
use crate::preview::{PreviewSettings, render_preview};

#[derive(Debug, Default)]
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }

    /// 读取字段定义文件（`.json` 按 JSON 解析，其余按 YAML）
    pub fn load_fields(&self, path: &Path) -> Result<FieldSet> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("读取字段定义失败: {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let fields: Vec<FieldSpec> = if is_json {
            serde_json::from_str(&text).context("字段定义 JSON 格式错误")?
        } else {
            serde_yaml::from_str(&text).context("字段定义 YAML 格式错误")?
        };

        Ok(FieldSet::try_from_fields(fields)?)
    }

    /// 生成数据并返回导出文本
    pub fn generate(
        &self,
        fields: &FieldSet,
        rows: usize,
        format: ExportFormat,
        plan: PlanTier,
        seed: Option<u64>,
    ) -> Result<String> {
        if let Some(signal) = plan.check_row_growth(0, rows) {
            bail!("{signal}");
        }

        let generated = match seed {
            Some(seed) => RowGenerator::seeded(seed).generate_rows(fields.as_slice(), rows),
            None => RowGenerator::new().generate_rows(fields.as_slice(), rows),
        };
        info!(rows, format = %format, plan = %plan, "Data generated");

        Ok(export_rows(
            &generated,
            &fields.aliases(),
            format,
            &ExportOptions::default(),
        )?)
    }

    /// 导入文件并转换为目标格式
    pub fn convert(
        &self,
        input: &Path,
        settings: &PreviewSettings,
        plan: PlanTier,
    ) -> Result<String> {
        let bytes = fs::read(input).with_context(|| format!("读取文件失败: {}", input.display()))?;
        let file_name = input.to_string_lossy();

        let outcome = import_bytes(&bytes, &file_name, plan)?;
        if let Some(truncation) = &outcome.truncation {
            warn!(
                total = truncation.total,
                kept = truncation.kept,
                plan = %plan,
                "{}",
                truncation.upsell()
            );
        }

        let preview = render_preview(&outcome.dataset, settings)?;
        Ok(preview.content)
    }

    /// 执行 generate 命令
    pub fn run_generate(
        &self,
        fields: &Path,
        rows: usize,
        format: ExportFormat,
        plan: PlanTier,
        seed: Option<u64>,
        output: Option<PathBuf>,
    ) -> Result<()> {
        let fields = self.load_fields(fields)?;
        let content = self.generate(&fields, rows, format, plan, seed)?;
        self.write_output(&content, output.as_deref())
    }

    /// 执行 convert 命令
    pub fn run_convert(
        &self,
        input: &Path,
        format: ExportFormat,
        plan: PlanTier,
        output: Option<PathBuf>,
        line_numbers: bool,
        transpose: bool,
    ) -> Result<()> {
        let settings = PreviewSettings {
            format,
            show_line_numbers: line_numbers,
            transposed: transpose,
            ..Default::default()
        };
        let content = self.convert(input, &settings, plan)?;
        self.write_output(&content, output.as_deref())
    }

    /// 执行 formats 命令
    pub fn run_formats(&self) -> Result<()> {
        println!("导出格式:");
        for format in ExportFormat::ALL {
            println!("  {:<12} .{}", format.as_str(), format.extension());
        }
        println!("导入扩展名:");
        println!("  {}", ImportFormat::EXTENSIONS.join(", "));
        Ok(())
    }

    // ========================================================================
    // 辅助方法
    // ========================================================================

    fn write_output(&self, content: &str, output: Option<&Path>) -> Result<()> {
        match output {
            Some(path) => {
                fs::write(path, content)
                    .with_context(|| format!("写入文件失败: {}", path.display()))?;
                info!(path = %path.display(), bytes = content.len(), "Output written");
            }
            None => println!("{content}"),
        }
        Ok(())
    }
}
