//! 电子表格解析（xlsx / xls / xlsm / xlsb / ods）
//!
//! 只读取第一个工作表；首行为表头，之后每行按表头转为对象。
//! 空单元格不写入行，整行为空时跳过；数值与布尔保留原类型。

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use serde_json::{Map, Value};
use std::io::Cursor;

use super::{ImportError, ImportFormat, RawRecords};

fn parse_error(err: impl std::fmt::Display) -> ImportError {
    ImportError::parse(ImportFormat::Spreadsheet, err)
}

fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(Value::String(s.clone())),
        Data::Int(i) => Some(Value::from(*i)),
        Data::Float(f) => {
            // 整数值的浮点单元格按整数输出
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                Some(Value::from(*f as i64))
            } else {
                Some(Value::from(*f))
            }
        }
        Data::Bool(b) => Some(Value::Bool(*b)),
        other => Some(Value::String(other.to_string())),
    }
}

pub(crate) fn parse(bytes: &[u8]) -> Result<RawRecords, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(parse_error)?;

    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Err(ImportError::NoRows);
    };
    let range = workbook.worksheet_range(&sheet).map_err(parse_error)?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(ImportError::NoRows);
    };

    // (列下标, 表头文本)，空表头的列丢弃
    let header: Vec<(usize, String)> = header_row
        .iter()
        .enumerate()
        .filter_map(|(i, cell)| {
            let name = cell.to_string().trim().to_string();
            (!name.is_empty()).then_some((i, name))
        })
        .collect();

    let mut records = Vec::new();
    for cells in rows {
        let row: Map<String, Value> = header
            .iter()
            .filter_map(|(i, name)| {
                let value = cells.get(*i).and_then(cell_value)?;
                Some((name.clone(), value))
            })
            .collect();
        if !row.is_empty() {
            records.push(Value::Object(row));
        }
    }

    Ok(RawRecords {
        header: Some(header.into_iter().map(|(_, name)| name).collect()),
        records,
    })
}
