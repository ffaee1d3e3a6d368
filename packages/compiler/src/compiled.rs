//! Compiled Message JSON
//!
//! The compact positional-array artifact. Node kinds become small integer
//! tags, argument names become indices into the leading argument-name list,
//! and a message that is pure text collapses to a bare JSON string.
//!
//! e.g. `"Hello {name}"` -> `[["name"], "Hello ", 0]`
//!
//! e.g. `"Hello world"` -> `"Hello world"`

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Node kind tag of `select` nodes.
pub const TYPE_SELECT: i64 = 1;
/// Node kind tag of `plural` nodes.
pub const TYPE_PLURAL: i64 = 2;
/// Node kind tag of `selectordinal` nodes.
pub const TYPE_SELECTORDINAL: i64 = 3;
/// Node kind tag of date/time/number function nodes.
pub const TYPE_FN: i64 = 4;
/// Node kind tag of rich-text tag nodes.
pub const TYPE_TAG: i64 = 5;

/// Sentinel encoding of `#`, distinct from every argument index.
pub const ORDINAL: i64 = -1;

/// The three case-branching node kinds share one compiled layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchKind {
    Select,
    Plural,
    Selectordinal,
}

impl BranchKind {
    pub fn tag(self) -> i64 {
        match self {
            BranchKind::Select => TYPE_SELECT,
            BranchKind::Plural => TYPE_PLURAL,
            BranchKind::Selectordinal => TYPE_SELECTORDINAL,
        }
    }

    fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            TYPE_SELECT => Some(BranchKind::Select),
            TYPE_PLURAL => Some(BranchKind::Plural),
            TYPE_SELECTORDINAL => Some(BranchKind::Selectordinal),
            _ => None,
        }
    }
}

/// Case label to compiled case body, in source order.
pub type CompiledCases = IndexMap<String, Vec<CompiledNode>>;

/// One node of the compiled sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledNode {
    /// Plain text; a bare JSON string.
    Text(String),
    /// Argument reference; a bare non-negative integer index.
    Arg(usize),
    /// `#`; the integer sentinel `-1`.
    Pound,
    /// `[kind, argIndex, {label: [nodes]}]`.
    Branch {
        kind: BranchKind,
        arg: usize,
        cases: CompiledCases,
    },
    /// `[4, argIndex, fnName]` or `[4, argIndex, fnName, style]`.
    Fn {
        arg: usize,
        name: String,
        style: Option<String>,
    },
    /// `[5, argIndex, ...childNodes]`.
    Tag {
        arg: usize,
        children: Vec<CompiledNode>,
    },
}

/// A complete compiled message.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledMessage {
    /// Pure text, stored without the array wrapper.
    Text(String),
    /// `[[argNames...], node...]`.
    Message {
        args: Vec<String>,
        nodes: Vec<CompiledNode>,
    },
}

impl Serialize for CompiledNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CompiledNode::Text(text) => serializer.serialize_str(text),
            CompiledNode::Arg(index) => serializer.serialize_u64(*index as u64),
            CompiledNode::Pound => serializer.serialize_i64(ORDINAL),
            CompiledNode::Branch { kind, arg, cases } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element(&kind.tag())?;
                seq.serialize_element(arg)?;
                seq.serialize_element(cases)?;
                seq.end()
            }
            CompiledNode::Fn { arg, name, style } => {
                let len = if style.is_some() { 4 } else { 3 };
                let mut seq = serializer.serialize_seq(Some(len))?;
                seq.serialize_element(&TYPE_FN)?;
                seq.serialize_element(arg)?;
                seq.serialize_element(name)?;
                if let Some(style) = style {
                    seq.serialize_element(style)?;
                }
                seq.end()
            }
            CompiledNode::Tag { arg, children } => {
                let mut seq = serializer.serialize_seq(Some(2 + children.len()))?;
                seq.serialize_element(&TYPE_TAG)?;
                seq.serialize_element(arg)?;
                for child in children {
                    seq.serialize_element(child)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for CompiledMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CompiledMessage::Text(text) => serializer.serialize_str(text),
            CompiledMessage::Message { args, nodes } => {
                let mut seq = serializer.serialize_seq(Some(1 + nodes.len()))?;
                seq.serialize_element(args)?;
                for node in nodes {
                    seq.serialize_element(node)?;
                }
                seq.end()
            }
        }
    }
}

/// Errors produced when decoding a compiled artifact.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("expected a string or an array at the top level")]
    InvalidMessage,
    #[error("expected the argument name list as the first array element")]
    InvalidArgumentList,
    #[error("unknown node kind tag {0}")]
    UnknownTag(i64),
    #[error("invalid compiled node: {0}")]
    InvalidNode(String),
}

impl CompiledMessage {
    /// Decode a compiled artifact from its JSON value.
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::String(text) => Ok(CompiledMessage::Text(text.clone())),
            Value::Array(items) => {
                let args = match items.first() {
                    Some(Value::Array(names)) => names
                        .iter()
                        .map(|name| match name {
                            Value::String(name) => Ok(name.clone()),
                            // the interpolation compiler indexes by number
                            Value::Number(index) => Ok(index.to_string()),
                            _ => Err(DecodeError::InvalidArgumentList),
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                    _ => return Err(DecodeError::InvalidArgumentList),
                };
                let nodes = items[1..]
                    .iter()
                    .map(node_from_value)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CompiledMessage::Message { args, nodes })
            }
            _ => Err(DecodeError::InvalidMessage),
        }
    }
}

fn node_from_value(value: &Value) -> Result<CompiledNode, DecodeError> {
    match value {
        Value::String(text) => Ok(CompiledNode::Text(text.clone())),
        Value::Number(number) => {
            let index = number
                .as_i64()
                .ok_or_else(|| DecodeError::InvalidNode(format!("bad index {}", number)))?;
            if index == ORDINAL {
                Ok(CompiledNode::Pound)
            } else if index >= 0 {
                Ok(CompiledNode::Arg(index as usize))
            } else {
                Err(DecodeError::InvalidNode(format!("bad index {}", index)))
            }
        }
        Value::Array(items) => {
            let tag = items
                .first()
                .and_then(Value::as_i64)
                .ok_or_else(|| DecodeError::InvalidNode("missing kind tag".to_string()))?;
            let arg = items
                .get(1)
                .and_then(Value::as_u64)
                .ok_or_else(|| DecodeError::InvalidNode("missing argument index".to_string()))?
                as usize;
            if let Some(kind) = BranchKind::from_tag(tag) {
                let cases = match items.get(2) {
                    Some(Value::Object(map)) => map
                        .iter()
                        .map(|(label, body)| {
                            let body = match body {
                                Value::Array(nodes) => nodes
                                    .iter()
                                    .map(node_from_value)
                                    .collect::<Result<Vec<_>, _>>()?,
                                _ => {
                                    return Err(DecodeError::InvalidNode(format!(
                                        "case `{}` is not an array",
                                        label
                                    )))
                                }
                            };
                            Ok((label.clone(), body))
                        })
                        .collect::<Result<CompiledCases, _>>()?,
                    _ => {
                        return Err(DecodeError::InvalidNode(
                            "missing case mapping".to_string(),
                        ))
                    }
                };
                return Ok(CompiledNode::Branch { kind, arg, cases });
            }
            match tag {
                TYPE_FN => {
                    let name = items
                        .get(2)
                        .and_then(Value::as_str)
                        .ok_or_else(|| {
                            DecodeError::InvalidNode("missing function name".to_string())
                        })?
                        .to_string();
                    let style = match items.get(3) {
                        None => None,
                        Some(Value::String(style)) => Some(style.clone()),
                        Some(other) => {
                            return Err(DecodeError::InvalidNode(format!(
                                "bad style {}",
                                other
                            )))
                        }
                    };
                    Ok(CompiledNode::Fn { arg, name, style })
                }
                TYPE_TAG => {
                    let children = items[2..]
                        .iter()
                        .map(node_from_value)
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(CompiledNode::Tag { arg, children })
                }
                _ => Err(DecodeError::UnknownTag(tag)),
            }
        }
        _ => Err(DecodeError::InvalidNode(value.to_string())),
    }
}

impl<'de> Deserialize<'de> for CompiledMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        CompiledMessage::from_value(&value).map_err(serde::de::Error::custom)
    }
}
