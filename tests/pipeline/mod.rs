//! 数据流水线集成测试
//!
//! 覆盖生成、导入、导出与套餐限制的端到端行为：
//! - 生成行数与列键
//! - 取值范围与候选项
//! - JSON 导出后再导入得到相同的行
//! - 空数据在所有格式下导出为空字符串
//! - 套餐导入截断与行数上限

pub mod helpers;

mod export;
mod generator;
mod import;
mod workbench;
