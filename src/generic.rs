//! Schema-free view of an NBT tree and its JSON-style text export
//!
//! The typed tree is lowered into [`Value`], which only knows mappings,
//! sequences and scalars. Information that would otherwise be lost is kept in
//! synthetic entries:
//! - `_name` on every named compound (the root and compound children)
//! - `_list` / `_elemType` wrapping every list, so the element tag survives
//!
//! Byte arrays become base64 strings; int and long arrays become sequences.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use indexmap::IndexMap;
use std::fmt::{self, Write};

use crate::nbt::{NamedTag, Tag};

pub const NAME_KEY: &str = "_name";
pub const LIST_KEY: &str = "_list";
pub const ELEM_TYPE_KEY: &str = "_elemType";

/// Numeric payload of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f32),
    Double(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(v) => write!(f, "{}", v),
            Number::Float(v) => write!(f, "{:?}", v),
            Number::Double(v) => write!(f, "{:?}", v),
        }
    }
}

impl Number {
    fn is_finite(&self) -> bool {
        match *self {
            Number::Int(_) => true,
            Number::Float(v) => v.is_finite(),
            Number::Double(v) => v.is_finite(),
        }
    }
}

/// Generic export tree
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Mapping(IndexMap<String, Value>),
    Sequence(Vec<Value>),
}

impl Value {
    pub fn as_mapping(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Indented (2 spaces) JSON text with a trailing newline
    pub fn to_pretty_string(&self) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, 0);
        out.push('\n');
        out
    }

    /// Single-line JSON text
    pub fn to_compact_string(&self) -> String {
        let mut out = String::new();
        self.write_compact(&mut out);
        out
    }

    fn write_pretty(&self, out: &mut String, indent: usize) {
        match self {
            Value::Mapping(map) => {
                out.push_str("{\n");
                for (i, (key, value)) in map.iter().enumerate() {
                    push_indent(out, indent + 2);
                    let _ = write!(out, "\"{}\": ", escape(key));
                    value.write_pretty(out, indent + 2);
                    if i + 1 < map.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                push_indent(out, indent);
                out.push('}');
            }
            Value::Sequence(items) => {
                out.push_str("[\n");
                for (i, item) in items.iter().enumerate() {
                    push_indent(out, indent + 2);
                    item.write_pretty(out, indent + 2);
                    if i + 1 < items.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                push_indent(out, indent);
                out.push(']');
            }
            scalar => scalar.write_compact(out),
        }
    }

    fn write_compact(&self, out: &mut String) {
        match self {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => {
                let _ = write!(out, "{}", b);
            }
            Value::Number(n) if n.is_finite() => {
                let _ = write!(out, "{}", n);
            }
            Value::Number(_) => out.push_str("null"),
            Value::String(s) => {
                let _ = write!(out, "\"{}\"", escape(s));
            }
            Value::Mapping(map) => {
                out.push('{');
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    let _ = write!(out, "\"{}\":", escape(key));
                    value.write_compact(out);
                }
                out.push('}');
            }
            Value::Sequence(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_compact(out);
                }
                out.push(']');
            }
        }
    }
}

/// Lower a decoded document; the root carries its name as `_name`
pub fn to_generic(root: &NamedTag) -> Value {
    convert(&root.tag, Some(&root.name))
}

/// Lower a single tag. `name` is injected as `_name` when the tag is a compound.
pub fn convert(tag: &Tag, name: Option<&str>) -> Value {
    match tag {
        Tag::End => Value::Null,
        Tag::Byte(v) => Value::Number(Number::Int(*v as i64)),
        Tag::Short(v) => Value::Number(Number::Int(*v as i64)),
        Tag::Int(v) => Value::Number(Number::Int(*v as i64)),
        Tag::Long(v) => Value::Number(Number::Int(*v)),
        Tag::Float(v) => Value::Number(Number::Float(*v)),
        Tag::Double(v) => Value::Number(Number::Double(*v)),
        Tag::String(s) => Value::String(s.clone()),
        Tag::ByteArray(bytes) => Value::String(STANDARD.encode(bytes)),
        Tag::IntArray(values) => Value::Sequence(
            values
                .iter()
                .map(|v| Value::Number(Number::Int(*v as i64)))
                .collect(),
        ),
        Tag::LongArray(values) => Value::Sequence(
            values
                .iter()
                .map(|v| Value::Number(Number::Int(*v)))
                .collect(),
        ),
        Tag::List { elem_type, items } => {
            let mut map = IndexMap::with_capacity(2);
            map.insert(
                LIST_KEY.to_string(),
                Value::Sequence(items.iter().map(|item| convert(item, None)).collect()),
            );
            map.insert(
                ELEM_TYPE_KEY.to_string(),
                Value::Number(Number::Int(elem_type.id() as i64)),
            );
            Value::Mapping(map)
        }
        Tag::Compound(children) => {
            let mut map = IndexMap::with_capacity(children.len() + 1);
            if let Some(name) = name {
                map.insert(NAME_KEY.to_string(), Value::String(name.to_string()));
            }
            for (key, child) in children {
                map.insert(key.clone(), convert(child, Some(key)));
            }
            Value::Mapping(map)
        }
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\r', "\\r")
        .replace('\n', "\\n")
}

fn push_indent(out: &mut String, n: usize) {
    out.extend(std::iter::repeat(' ').take(n));
}
