//! 行生成器
//!
//! 每个字段按类型独立取值，行索引只影响占位值（`{alias}_{index+1}`）。
//! 随机源可注入：默认使用线程随机数，测试和 CLI 可使用固定种子。

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use serde_json::Value;
use tracing::debug;

use crate::dataset::Row;
use crate::field::{FieldSpec, FieldType};

const DEFAULT_COLOR: &str = "#000000";
const DEFAULT_URL: &str = "https://example.com";

/// 按字段定义生成数据行
pub struct RowGenerator<R: Rng = ThreadRng> {
    rng: R,
}

impl RowGenerator<ThreadRng> {
    /// 使用线程随机数
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RowGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl RowGenerator<StdRng> {
    /// 固定种子，输出可复现
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RowGenerator<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// 生成第 `index` 行（从 0 开始）
    pub fn generate_row(&mut self, fields: &[FieldSpec], index: usize) -> Row {
        fields
            .iter()
            .map(|field| (field.key().to_string(), self.generate_value(field, index)))
            .collect()
    }

    /// 生成 `count` 行，索引从 0 开始
    pub fn generate_rows(&mut self, fields: &[FieldSpec], count: usize) -> Vec<Row> {
        self.generate_rows_from(fields, 0, count)
    }

    /// 生成 `count` 行，索引从 `start` 开始（追加行时延续序号）
    pub fn generate_rows_from(
        &mut self,
        fields: &[FieldSpec],
        start: usize,
        count: usize,
    ) -> Vec<Row> {
        let rows: Vec<Row> = (start..start + count)
            .map(|index| self.generate_row(fields, index))
            .collect();

        metrics::counter!("datagen_rows_generated_total").increment(count as u64);
        debug!(fields = fields.len(), start, count, "Rows generated");
        rows
    }

    fn generate_value(&mut self, field: &FieldSpec, index: usize) -> Value {
        match field.field_type {
            FieldType::Constant => Value::String(field.value.clone().unwrap_or_default()),
            FieldType::NumberRange => {
                let (min, max) = field.range();
                // 绕过校验时 min > max，交换边界而不是 panic
                let (low, high) = if min <= max { (min, max) } else { (max, min) };
                Value::from(self.rng.random_range(low..=high))
            }
            FieldType::NormalDistribution => {
                let (mean, stddev) = field.distribution();
                let u: f64 = self.rng.random();
                let sample = (mean + (u - 0.5) * 2.0 * stddev + 0.5).floor();
                if sample.is_finite() {
                    Value::from(sample as i64)
                } else {
                    Value::Null
                }
            }
            FieldType::List | FieldType::WeightedList => {
                if field.options.is_empty() {
                    Value::String(String::new())
                } else {
                    let pick = self.rng.random_range(0..field.options.len());
                    Value::String(field.options[pick].clone())
                }
            }
            FieldType::Color => Value::String(non_empty_or(&field.value, DEFAULT_COLOR)),
            FieldType::Url => Value::String(non_empty_or(&field.value, DEFAULT_URL)),
            _ => Value::String(format!("{}_{}", field.key(), index + 1)),
        }
    }
}

fn non_empty_or(value: &Option<String>, fallback: &str) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}
