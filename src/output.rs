//! Output tree populated by a parse
//!
//! A [`Node`] is an instance of a declared shape: its fields are filled by
//! captures in the production that produced it. Sequence fields are always
//! present (possibly empty); single fields are absent until captured.

use std::fmt;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::Span;
use crate::grammar::{Cardinality, Field, FieldType};

/// A captured value
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Text(SmolStr),
    Int(i64),
    Bool(bool),
    Node(Box<Node>),
    List(Vec<Value>),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Self::Node(Box::new(node))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{:?}", text.as_str()),
            Self::Int(value) => write!(f, "{}", value),
            Self::Bool(value) => write!(f, "{}", value),
            Self::Node(node) => write!(f, "{}", node),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// An instance of a shape
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Node {
    pub shape: SmolStr,
    pub span: Span,
    pub fields: IndexMap<SmolStr, Value>,
}

impl Node {
    /// An empty node with no fields populated
    pub fn new(shape: impl Into<SmolStr>) -> Self {
        Self {
            shape: shape.into(),
            span: Span::default(),
            fields: IndexMap::new(),
        }
    }

    /// An empty node whose sequence fields start out as empty lists
    pub(crate) fn for_fields<'f>(shape: &str, fields: impl IntoIterator<Item = &'f Field>) -> Self {
        let mut node = Self::new(shape);
        for field in fields {
            if field.cardinality == Cardinality::Many {
                node.fields.insert(field.name.clone(), Value::List(Vec::new()));
            }
        }
        node
    }

    /// Write a captured value, coercing to the field's cardinality
    ///
    /// Sequence fields append. Single text fields concatenate successive
    /// captures; other single fields keep the last write.
    pub(crate) fn apply(&mut self, field: &Field, value: Value) {
        match field.cardinality {
            Cardinality::Many => {
                let slot = self
                    .fields
                    .entry(field.name.clone())
                    .or_insert_with(|| Value::List(Vec::new()));
                if let Value::List(items) = slot {
                    items.push(value);
                }
            }
            Cardinality::Single => {
                if let (FieldType::Text, Value::Text(more)) = (&field.ty, &value) {
                    if let Some(Value::Text(existing)) = self.fields.get_mut(&field.name) {
                        let mut joined = existing.to_string();
                        joined.push_str(more);
                        *existing = SmolStr::new(joined);
                        return;
                    }
                }
                self.fields.insert(field.name.clone(), value);
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_text)
    }

    pub fn int(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_int)
    }

    /// A bool field, `false` when never captured
    pub fn flag(&self, field: &str) -> bool {
        self.get(field).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn child(&self, field: &str) -> Option<&Node> {
        self.get(field).and_then(Value::as_node)
    }

    /// Elements of a sequence field, empty when absent
    pub fn list(&self, field: &str) -> &[Value] {
        self.get(field).and_then(Value::as_list).unwrap_or(&[])
    }

    pub fn texts(&self, field: &str) -> Vec<&str> {
        self.list(field).iter().filter_map(Value::as_text).collect()
    }

    pub fn children<'a>(&'a self, field: &str) -> impl Iterator<Item = &'a Node> + 'a {
        self.list(field).iter().filter_map(Value::as_node)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.shape)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {}: {}", name, value)?;
        }
        write!(f, " }}")
    }
}
