//! CLI 命令定义
//!
//! 使用 clap derive 宏定义命令行接口结构。

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::export::ExportFormat;
use crate::plan::PlanTier;

/// 测试数据生成工具
#[derive(Parser, Debug)]
#[command(name = "datagen")]
#[command(version, about = "测试数据生成与格式转换工具")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 按字段定义生成数据
    ///
    /// 字段定义文件为 YAML 或 JSON 格式的字段列表。
    Generate {
        /// 字段定义文件
        #[arg(short, long)]
        fields: PathBuf,

        /// 生成行数
        #[arg(short, long, default_value = "10")]
        rows: usize,

        /// 导出格式
        #[arg(short = 't', long, default_value = "csv")]
        format: ExportFormat,

        /// 套餐等级 (free, paid, sub)
        #[arg(short, long, default_value = "free")]
        plan: PlanTier,

        /// 随机种子，指定后输出可复现
        #[arg(short, long)]
        seed: Option<u64>,

        /// 输出文件，缺省输出到标准输出
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 导入文件并转换格式
    Convert {
        /// 输入文件（csv / json / xlsx / xls / xml / yaml）
        input: PathBuf,

        /// 导出格式
        #[arg(short = 't', long, default_value = "csv")]
        format: ExportFormat,

        /// 套餐等级，决定导入保留的行数
        #[arg(short, long, default_value = "free")]
        plan: PlanTier,

        /// 输出文件，缺省输出到标准输出
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 输出带行号
        #[arg(short = 'n', long)]
        line_numbers: bool,

        /// 转置（每个字段一行）
        #[arg(long)]
        transpose: bool,
    },

    /// 列出支持的格式
    Formats,
}

// ============================================================================
// 单元测试
// ============================================================================
