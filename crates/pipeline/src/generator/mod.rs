//! 生成器模块
//!
//! 按字段定义批量生成合成数据行。

pub mod row_generator;

pub use row_generator::RowGenerator;
