//! 字段定义
//!
//! 一个字段对应输出表格中的一列：列名、别名（导出时使用的键）、
//! 数据类型以及类型相关的参数（常量值、候选列表、数值范围、分布参数）。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 数值范围默认下限
pub const DEFAULT_MIN: i64 = 0;
/// 数值范围默认上限
pub const DEFAULT_MAX: i64 = 100;
/// 分布默认均值
pub const DEFAULT_MEAN: f64 = 0.0;
/// 分布默认标准差
pub const DEFAULT_STDDEV: f64 = 1.0;

/// 字段校验错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("第 {index} 个字段缺少名称")]
    EmptyName { index: usize },

    #[error("字段名重复: {0}")]
    DuplicateName(String),

    #[error("字段 {0} 为列表类型，候选项不能为空")]
    MissingOptions(String),

    #[error("字段 {name} 的范围无效: min={min} > max={max}")]
    InvalidRange { name: String, min: i64, max: i64 },

    #[error("未知的字段类型: {0}")]
    UnknownType(String),
}

/// 字段数据类型
///
/// 序列化为 snake_case；同时兼容前端使用的空格写法（如 `"number range"`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Boolean,
    Alphanumeric,
    Date,
    #[serde(alias = "auto increment")]
    AutoIncrement,
    List,
    #[serde(alias = "weighted list")]
    WeightedList,
    Constant,
    #[serde(alias = "guid")]
    Uuid,
    #[serde(alias = "colour")]
    Color,
    Url,
    #[serde(alias = "number range")]
    NumberRange,
    #[serde(alias = "normal distribution")]
    NormalDistribution,
}

impl FieldType {
    /// 所有字段类型，按字段选择器中的顺序排列
    pub const ALL: [FieldType; 14] = [
        Self::String,
        Self::Number,
        Self::Boolean,
        Self::Alphanumeric,
        Self::Date,
        Self::AutoIncrement,
        Self::List,
        Self::WeightedList,
        Self::Constant,
        Self::Uuid,
        Self::Color,
        Self::Url,
        Self::NumberRange,
        Self::NormalDistribution,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Alphanumeric => "alphanumeric",
            Self::Date => "date",
            Self::AutoIncrement => "auto_increment",
            Self::List => "list",
            Self::WeightedList => "weighted_list",
            Self::Constant => "constant",
            Self::Uuid => "uuid",
            Self::Color => "color",
            Self::Url => "url",
            Self::NumberRange => "number_range",
            Self::NormalDistribution => "normal_distribution",
        }
    }

    /// 是否需要候选项列表
    pub fn requires_options(&self) -> bool {
        matches!(self, Self::List | Self::WeightedList)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "guid" => return Ok(Self::Uuid),
            "colour" => return Ok(Self::Color),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| FieldError::UnknownType(s.to_string()))
    }
}

/// 字段定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: String,
    /// 导出时使用的键，为空时回退到 `name`
    #[serde(default)]
    pub alias: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stddev: Option<f64>,
}

impl FieldSpec {
    /// 创建字段定义，别名默认与名称相同
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            alias: name.clone(),
            name,
            field_type,
            value: None,
            options: Vec::new(),
            min: None,
            max: None,
            mean: None,
            stddev: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_distribution(mut self, mean: f64, stddev: f64) -> Self {
        self.mean = Some(mean);
        self.stddev = Some(stddev);
        self
    }

    /// 导出键：别名非空时使用别名，否则使用名称
    pub fn key(&self) -> &str {
        if self.alias.trim().is_empty() {
            &self.name
        } else {
            &self.alias
        }
    }

    /// 数值范围 (min, max)，缺省时使用默认值
    pub fn range(&self) -> (i64, i64) {
        (
            self.min.unwrap_or(DEFAULT_MIN),
            self.max.unwrap_or(DEFAULT_MAX),
        )
    }

    /// 分布参数 (mean, stddev)，缺省时使用默认值
    pub fn distribution(&self) -> (f64, f64) {
        (
            self.mean.unwrap_or(DEFAULT_MEAN),
            self.stddev.unwrap_or(DEFAULT_STDDEV),
        )
    }

    /// 校验单个字段的类型参数
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.field_type.requires_options() && self.options.is_empty() {
            return Err(FieldError::MissingOptions(self.name.clone()));
        }
        if self.field_type == FieldType::NumberRange {
            let (min, max) = self.range();
            if min > max {
                return Err(FieldError::InvalidRange {
                    name: self.name.clone(),
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// 有序字段集合
///
/// 字段名在集合内唯一，顺序即导出列顺序。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet {
    fields: Vec<FieldSpec>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从字段列表创建并校验
    pub fn try_from_fields(fields: Vec<FieldSpec>) -> Result<Self, FieldError> {
        let set = Self { fields };
        set.validate()?;
        Ok(set)
    }

    /// 新增字段，同名字段存在时原位替换
    pub fn add_or_replace(&mut self, field: FieldSpec) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    /// 按名称移除字段
    pub fn remove(&mut self, name: &str) -> Option<FieldSpec> {
        let index = self.fields.iter().position(|f| f.name == name)?;
        Some(self.fields.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn as_slice(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 导出键列表（按字段顺序）
    pub fn aliases(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.key().to_string()).collect()
    }

    /// 校验整个集合：名称非空且唯一，各字段参数合法
    pub fn validate(&self) -> Result<(), FieldError> {
        let mut seen = std::collections::HashSet::new();
        for (index, field) in self.fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(FieldError::EmptyName { index: index + 1 });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(FieldError::DuplicateName(field.name.clone()));
            }
            field.validate()?;
        }
        Ok(())
    }
}

impl From<FieldSet> for Vec<FieldSpec> {
    fn from(set: FieldSet) -> Self {
        set.fields
    }
}
