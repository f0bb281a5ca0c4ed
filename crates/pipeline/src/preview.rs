//! 预览渲染
//!
//! 每次都从最新的数据集和设置重新计算，不做缓存。

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::export::{ExportError, ExportFormat, ExportOptions, export_dataset};

pub const MIN_FONT_SIZE: u32 = 10;
pub const MAX_FONT_SIZE: u32 = 32;
pub const DEFAULT_FONT_SIZE: u32 = 14;

/// 预览字体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontTheme {
    #[default]
    Monospace,
    Courier,
    Consolas,
    Ubuntu,
    Roboto,
    Serif,
    Sans,
}

impl FontTheme {
    /// CSS font-family
    pub fn font_family(&self) -> &'static str {
        match self {
            Self::Monospace => {
                "ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, 'Liberation Mono', 'Courier New', monospace"
            }
            Self::Courier => "'Courier New', Courier, monospace",
            Self::Consolas => "Consolas, 'Courier New', monospace",
            Self::Ubuntu => "'Ubuntu Mono', monospace",
            Self::Roboto => "'Roboto Mono', monospace",
            Self::Serif => "serif",
            Self::Sans => "sans-serif",
        }
    }
}

/// 预览设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreviewSettings {
    pub format: ExportFormat,
    pub font_size: u32,
    pub font_theme: FontTheme,
    pub show_line_numbers: bool,
    pub wrap_lines: bool,
    pub transposed: bool,
    pub options: ExportOptions,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            font_size: DEFAULT_FONT_SIZE,
            font_theme: FontTheme::Monospace,
            show_line_numbers: false,
            wrap_lines: false,
            transposed: false,
            options: ExportOptions::default(),
        }
    }
}

impl PreviewSettings {
    /// 字号限制在 [10, 32]
    pub fn font_size(&self) -> u32 {
        self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
    }
}

/// 预览结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewOutput {
    pub content: String,
    pub line_count: usize,
    pub font_family: String,
    pub font_size: u32,
    pub wrap_lines: bool,
}

/// 渲染预览
pub fn render_preview(
    dataset: &Dataset,
    settings: &PreviewSettings,
) -> Result<PreviewOutput, ExportError> {
    let content = if settings.transposed {
        export_dataset(&dataset.transpose(), settings.format, &settings.options)?
    } else {
        export_dataset(dataset, settings.format, &settings.options)?
    };

    let terminator = line_terminator(settings);
    let content = if settings.show_line_numbers {
        number_lines(&content, terminator)
    } else {
        content
    };

    Ok(PreviewOutput {
        line_count: split_lines(&content, terminator).0.len(),
        content,
        font_family: settings.font_theme.font_family().to_string(),
        font_size: settings.font_size(),
        wrap_lines: settings.wrap_lines,
    })
}

/// 分隔格式按 `eol` 选项换行，其余格式固定为 `\n`
fn line_terminator(settings: &PreviewSettings) -> &'static str {
    match settings.format {
        ExportFormat::Csv | ExportFormat::Excel | ExportFormat::Tsv => settings.options.eol.as_str(),
        _ => "\n",
    }
}

/// 按换行符切分，末尾换行不产生空行；第二项表示是否以换行结尾
fn split_lines<'a>(content: &'a str, terminator: &str) -> (Vec<&'a str>, bool) {
    if content.is_empty() {
        return (Vec::new(), false);
    }
    match content.strip_suffix(terminator) {
        Some(body) => (body.split(terminator).collect(), true),
        None => (content.split(terminator).collect(), false),
    }
}

/// 每行加上 `"{n}: "` 前缀（从 1 开始），保留原有换行符
pub fn number_lines(content: &str, terminator: &str) -> String {
    let (lines, trailing) = split_lines(content, terminator);
    let mut out = lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join(terminator);
    if trailing {
        out.push_str(terminator);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Row;
    use crate::export::LineEnding;
    use serde_json::json;

    fn dataset() -> Dataset {
        let rows: Vec<Row> = vec![
            json!({"name": "Ann", "age": 30}).as_object().cloned().unwrap(),
            json!({"name": "Bob", "age": 41}).as_object().cloned().unwrap(),
        ];
        Dataset::from_rows(rows)
    }

    #[test]
    fn test_default_preview_is_csv() {
        let out = render_preview(&dataset(), &PreviewSettings::default()).unwrap();
        assert_eq!(out.content, "name,age\nAnn,30\nBob,41");
        assert_eq!(out.line_count, 3);
        assert_eq!(out.font_size, 14);
        assert!(out.font_family.ends_with("monospace"));
    }

    #[test]
    fn test_line_numbers() {
        let settings = PreviewSettings {
            show_line_numbers: true,
            ..Default::default()
        };
        let out = render_preview(&dataset(), &settings).unwrap();
        assert_eq!(out.content, "1: name,age\n2: Ann,30\n3: Bob,41");
    }

    #[test]
    fn test_line_numbers_follow_eol() {
        for eol in [LineEnding::Mac, LineEnding::Windows] {
            let settings = PreviewSettings {
                show_line_numbers: true,
                options: ExportOptions {
                    eol,
                    ..Default::default()
                },
                ..Default::default()
            };
            let out = render_preview(&dataset(), &settings).unwrap();
            let t = eol.as_str();
            assert_eq!(out.content, format!("1: name,age{t}2: Ann,30{t}3: Bob,41"));
            assert_eq!(out.line_count, 3, "eol={eol:?}");
        }
    }

    #[test]
    fn test_trailing_newline_is_not_a_line() {
        let settings = PreviewSettings {
            format: ExportFormat::Yaml,
            show_line_numbers: true,
            ..Default::default()
        };
        let out = render_preview(&dataset(), &settings).unwrap();
        assert_eq!(out.line_count, 4);
        assert!(out.content.starts_with("1: - name: Ann\n2:   age: 30\n"));
        assert!(out.content.ends_with("4:   age: 41\n"));
    }

    #[test]
    fn test_transposed_view() {
        let settings = PreviewSettings {
            transposed: true,
            ..Default::default()
        };
        let out = render_preview(&dataset(), &settings).unwrap();
        assert_eq!(out.content, "field,row_1,row_2\nname,Ann,Bob\nage,30,41");
    }

    #[test]
    fn test_font_size_clamped_and_theme() {
        let settings: PreviewSettings =
            serde_json::from_str(r#"{"fontSize": 99, "fontTheme": "sans", "format": "json"}"#)
                .unwrap();
        let out = render_preview(&dataset(), &settings).unwrap();
        assert_eq!(out.font_size, MAX_FONT_SIZE);
        assert_eq!(out.font_family, "sans-serif");
        assert!(out.content.starts_with('['));

        let small = PreviewSettings {
            font_size: 2,
            ..Default::default()
        };
        assert_eq!(small.font_size(), MIN_FONT_SIZE);
    }

    #[test]
    fn test_empty_dataset() {
        let settings = PreviewSettings {
            show_line_numbers: true,
            ..Default::default()
        };
        let out = render_preview(&Dataset::default(), &settings).unwrap();
        assert_eq!(out.content, "");
        assert_eq!(out.line_count, 0);
    }
}
