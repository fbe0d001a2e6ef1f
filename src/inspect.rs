//! Structural dump of an encoded buffer.
//!
//! Walks tagged values without a registry, which makes it usable on save
//! files whose types are no longer known.

use std::ops::Range;

use serde_json::{json, Value};

use crate::codec::{read_primitive, Primitive};
use crate::format::{scan, Item, Kind};
use crate::graph::DEFAULT_MAX_DEPTH;
use crate::util::{Error, Result};

/// One tagged value as found in the buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: Kind,
    pub name_hash: i32,
    /// Offset of the kind byte.
    pub offset: usize,
    /// Encoded length including header and end marker.
    pub len: usize,
    pub type_names: Vec<String>,
    /// Array shape; empty for other kinds.
    pub dims: Vec<usize>,
    /// Payload of a primitive.
    pub value: Option<Primitive<'static>>,
    pub children: Vec<Node>,
}

/// Inspect every sibling tagged value in `range`.
pub fn inspect(bytes: &[u8], range: Range<usize>) -> Result<Vec<Node>> {
    inspect_level(bytes, range, 0)
}

fn inspect_level(bytes: &[u8], range: Range<usize>, depth: usize) -> Result<Vec<Node>> {
    if depth >= DEFAULT_MAX_DEPTH {
        return Err(Error::DepthLimit(DEFAULT_MAX_DEPTH));
    }
    scan(bytes, range)?
        .iter()
        .map(|item| node(bytes, item, depth))
        .collect()
}

fn node(bytes: &[u8], item: &Item, depth: usize) -> Result<Node> {
    let mut node = Node {
        kind: item.kind,
        name_hash: item.name_hash,
        offset: item.start,
        len: item.len(),
        type_names: Vec::new(),
        dims: Vec::new(),
        value: None,
        children: Vec::new(),
    };
    if item.kind.is_primitive() {
        node.value = Some(read_primitive(bytes, item.payload, item.end, item.kind)?.into_owned());
    } else {
        let header = item.header(bytes)?;
        node.type_names = header.type_names.iter().map(|s| s.to_string()).collect();
        node.dims = header.dims.sizes().to_vec();
        node.children = inspect_level(bytes, header.body, depth + 1)?;
    }
    Ok(node)
}

fn primitive_json(value: &Primitive<'_>) -> Value {
    match value {
        Primitive::Bool(v) => json!(v),
        Primitive::Byte(v) => json!(v),
        Primitive::Int(v) => json!(v),
        Primitive::UInt(v) => json!(v),
        Primitive::Float(v) => json!(v),
        Primitive::Double(v) => json!(v),
        Primitive::String(s) | Primitive::TypeRef(s) => json!(s),
        Primitive::Vector3(v) => json!([v.x, v.y, v.z]),
    }
}

impl Node {
    /// Render the node and its subtree as JSON.
    pub fn to_json(&self) -> Value {
        let mut out = json!({
            "kind": self.kind.name(),
            "name_hash": self.name_hash,
            "offset": self.offset,
            "len": self.len,
        });
        if !self.type_names.is_empty() {
            out["types"] = json!(self.type_names);
        }
        if !self.dims.is_empty() {
            out["dims"] = json!(self.dims);
        }
        if let Some(value) = &self.value {
            out["value"] = primitive_json(value);
        }
        if !self.kind.is_primitive() {
            out["children"] = Value::Array(self.children.iter().map(Node::to_json).collect());
        }
        out
    }
}
