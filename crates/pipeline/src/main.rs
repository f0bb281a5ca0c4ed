//! datagen CLI
//!
//! 测试数据生成与格式转换的命令行入口点。

use clap::Parser;
use datagen_pipeline::cli::{Cli, CommandRunner, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 优先使用环境变量 RUST_LOG，否则使用命令行参数指定的级别
    // 日志写到 stderr，stdout 只输出数据
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let runner = CommandRunner::new();

    match cli.command {
        Commands::Generate {
            fields,
            rows,
            format,
            plan,
            seed,
            output,
        } => {
            runner.run_generate(&fields, rows, format, plan, seed, output)?;
        }
        Commands::Convert {
            input,
            format,
            plan,
            output,
            line_numbers,
            transpose,
        } => {
            runner.run_convert(&input, format, plan, output, line_numbers, transpose)?;
        }
        Commands::Formats => runner.run_formats()?,
    }

    Ok(())
}
