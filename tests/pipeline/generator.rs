//! 生成器行为

use datagen_pipeline::RowGenerator;
use datagen_pipeline::field::{FieldSpec, FieldType};

use crate::helpers::{all_type_fields, keys, random_fields};

#[test]
fn test_generates_exact_row_count_with_every_alias() {
    for seed in 0..20u64 {
        let fields = random_fields(seed, (seed % 7 + 1) as usize);
        let expected = keys(&fields);
        let count = (seed * 13 % 50) as usize;

        let rows = RowGenerator::seeded(seed).generate_rows(&fields, count);

        assert_eq!(rows.len(), count, "seed={seed}");
        for row in &rows {
            for key in &expected {
                assert!(row.contains_key(key), "seed={seed} 缺少列 {key}");
            }
        }
    }
}

#[test]
fn test_all_types_produce_aliases() {
    let fields = all_type_fields();
    let rows = RowGenerator::seeded(3).generate_rows(&fields, 10);

    for row in &rows {
        let row_keys: Vec<&String> = row.keys().collect();
        assert_eq!(row_keys.len(), fields.len());
        for field in &fields {
            assert!(row.contains_key(field.key()));
        }
        assert_eq!(row["col_8"], "fixed");
    }
}

#[test]
fn test_number_range_within_bounds() {
    let fields = vec![FieldSpec::new("n", FieldType::NumberRange).with_range(-3, 7)];
    for row in RowGenerator::seeded(99).generate_rows(&fields, 1000) {
        let n = row["n"].as_i64().unwrap();
        assert!((-3..=7).contains(&n), "越界: {n}");
    }
}

#[test]
fn test_list_values_are_options() {
    let options = ["alpha", "beta", "gamma"];
    let fields = vec![FieldSpec::new("pick", FieldType::List).with_options(options)];
    for row in RowGenerator::seeded(5).generate_rows(&fields, 500) {
        assert!(options.contains(&row["pick"].as_str().unwrap()));
    }
}

#[test]
fn test_same_seed_is_reproducible() {
    let fields = all_type_fields();
    let a = RowGenerator::seeded(42).generate_rows(&fields, 25);
    let b = RowGenerator::seeded(42).generate_rows(&fields, 25);
    assert_eq!(a, b);
}
