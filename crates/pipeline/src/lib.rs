//! 测试数据生成流水线
//!
//! 负责测试数据的生成、导入、导出与预览，是整个系统的数据处理核心。
//!
//! # 主要模块
//!
//! - `field`: 字段定义（列名、别名、数据类型及类型参数）
//! - `plan`: 套餐等级与行数上限
//! - `dataset`: 行/列数据模型与嵌套结构扁平化
//! - `generator`: 按字段定义生成合成数据行
//! - `import`: 解析 CSV/JSON/XLSX/XML/YAML 文件为表格数据
//! - `export`: 将表格数据序列化为各种目标格式
//! - `preview`: 预览渲染（行号、转置视图、字体设置）
//! - `workbench`: 会话级数据状态容器，负责套餐限制与升级提示
//!
//! # 使用示例
//!
//! ```rust
//! use datagen_pipeline::export::{ExportFormat, ExportOptions, export_rows};
//! use datagen_pipeline::field::{FieldSpec, FieldType};
//! use datagen_pipeline::generator::RowGenerator;
//!
//! let fields = vec![
//!     FieldSpec::new("id", FieldType::NumberRange).with_range(1, 10),
//!     FieldSpec::new("status", FieldType::List).with_options(["active", "disabled"]),
//! ];
//! let mut generator = RowGenerator::seeded(42);
//! let rows = generator.generate_rows(&fields, 3);
//! let keys: Vec<String> = fields.iter().map(|f| f.key().to_string()).collect();
//!
//! let csv = export_rows(&rows, &keys, ExportFormat::Csv, &ExportOptions::default()).unwrap();
//! assert_eq!(csv.lines().count(), 4);
//! ```

pub mod cli;
pub mod dataset;
pub mod error;
pub mod export;
pub mod field;
pub mod generator;
pub mod import;
pub mod plan;
pub mod preview;
pub mod workbench;

pub use dataset::{Column, Dataset, Row, flatten_value};
pub use error::{PipelineError, Result};
pub use export::{ExportFormat, ExportOptions, export_dataset, export_rows};
pub use field::{FieldSet, FieldSpec, FieldType};
pub use generator::RowGenerator;
pub use import::{ImportFormat, ImportOutcome, Truncation, import_bytes};
pub use plan::{PlanTier, UpsellReason, UpsellSignal};
pub use preview::{PreviewOutput, PreviewSettings, render_preview};
pub use workbench::Workbench;
