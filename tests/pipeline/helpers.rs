//! 测试辅助函数

use datagen_pipeline::field::{FieldSpec, FieldType};
use fake::Fake;
use fake::faker::lorem::en::Word;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// 每种类型一个字段，参数合法
pub fn all_type_fields() -> Vec<FieldSpec> {
    FieldType::ALL
        .iter()
        .enumerate()
        .map(|(i, ty)| {
            let spec = FieldSpec::new(format!("f{i}_{}", ty.as_str()), *ty)
                .with_alias(format!("col_{i}"));
            match ty {
                FieldType::List | FieldType::WeightedList => spec.with_options(["x", "y", "z"]),
                FieldType::NumberRange => spec.with_range(-5, 5),
                FieldType::NormalDistribution => spec.with_distribution(50.0, 10.0),
                FieldType::Constant => spec.with_value("fixed"),
                _ => spec,
            }
        })
        .collect()
}

/// 随机字段集合：名称唯一，类型随机
pub fn random_fields(seed: u64, count: usize) -> Vec<FieldSpec> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let ty = FieldType::ALL[rng.random_range(0..FieldType::ALL.len())];
            let word: String = Word().fake_with_rng(&mut rng);
            let spec = FieldSpec::new(format!("{word}_{i}"), ty);
            match ty {
                FieldType::List | FieldType::WeightedList => spec.with_options(["red", "green"]),
                FieldType::NumberRange => spec.with_range(0, rng.random_range(0..1000)),
                _ => spec,
            }
        })
        .collect()
}

pub fn keys(fields: &[FieldSpec]) -> Vec<String> {
    fields.iter().map(|f| f.key().to_string()).collect()
}
