//! CLI 模块
//!
//! - `generate` - 按字段定义文件生成数据并导出
//! - `convert` - 导入文件并转换为其他格式
//! - `formats` - 列出支持的导入/导出格式
//!
//! # 使用示例
//!
//! ```bash
//! # 生成 100 行 JSON
//! datagen generate --fields fields.yaml --rows 100 --format json -o data.json
//!
//! # CSV 转 SQL，带行号预览
//! datagen convert people.csv --format sql --plan sub --line-numbers
//!
//! # 列出格式
//! datagen formats
//! ```

pub mod commands;
pub mod runner;

pub use commands::{Cli, Commands};
pub use runner::CommandRunner;
