//! XML 解析
//!
//! 先构建元素树，再取根元素下名为 `row` 的子元素作为行（根元素本身名为
//! `row` 时整篇文档只有一行）。子元素没有下级元素时取其文本（文本与 CDATA
//! 拼接），否则转为嵌套对象；同名子元素合并为数组；属性忽略。

use quick_xml::Reader;
use quick_xml::events::Event;
use serde_json::{Map, Value};

use super::{ImportError, ImportFormat, RawRecords};

const ROW_ELEMENT: &str = "row";

#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Default::default()
        }
    }

    fn to_value(&self) -> Value {
        if self.children.is_empty() {
            return Value::String(self.text.clone());
        }
        self.children_to_object()
    }

    fn children_to_object(&self) -> Value {
        let mut map = Map::new();
        for child in &self.children {
            let value = child.to_value();
            match map.get_mut(&child.name) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(child.name.clone(), value);
                }
            }
        }
        Value::Object(map)
    }
}

fn parse_error(err: impl std::fmt::Display) -> ImportError {
    ImportError::parse(ImportFormat::Xml, err)
}

fn parse_tree(text: &str) -> Result<Option<Element>, ImportError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Start(e) => stack.push(Element::named(e.name().as_ref())),
            Event::Empty(e) => {
                let element = Element::named(e.name().as_ref());
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| parse_error("unexpected closing tag"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Text(t) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&t.unescape().map_err(parse_error)?);
                }
            }
            Event::CData(c) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(parse_error(format!("unclosed element <{}>", open.name)));
    }
    Ok(root)
}

pub(crate) fn parse(bytes: &[u8]) -> Result<RawRecords, ImportError> {
    let text = std::str::from_utf8(bytes).map_err(parse_error)?;
    let Some(root) = parse_tree(text)? else {
        return Err(ImportError::NoRows);
    };

    let records = if root.name == ROW_ELEMENT {
        vec![root.children_to_object()]
    } else {
        root.children
            .iter()
            .filter(|child| child.name == ROW_ELEMENT)
            .map(Element::children_to_object)
            .collect()
    };

    Ok(RawRecords {
        header: None,
        records,
    })
}
