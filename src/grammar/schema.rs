//! Output shape descriptions
//!
//! A [`Shape`] names the output type a production populates and declares
//! its fields: name, semantic type and whether the field holds a single
//! value or an ordered sequence of values.

use indexmap::IndexMap;
use smol_str::SmolStr;

/// Semantic type of a field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Matched token text
    Text,
    /// Matched token text parsed as a signed integer
    Int,
    /// `true` when the capture matched
    Bool,
    /// A nested node of the named shape
    Node(SmolStr),
}

impl FieldType {
    pub fn describe(&self) -> String {
        match self {
            Self::Text => "text".to_string(),
            Self::Int => "int".to_string(),
            Self::Bool => "bool".to_string(),
            Self::Node(shape) => format!("node `{}`", shape),
        }
    }
}

/// Whether a field holds one value or a sequence of values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cardinality {
    #[default]
    Single,
    Many,
}

/// A declared field of a shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: SmolStr,
    pub ty: FieldType,
    pub cardinality: Cardinality,
}

impl Field {
    pub fn new(name: impl Into<SmolStr>, ty: FieldType, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            ty,
            cardinality,
        }
    }

    pub fn is_many(&self) -> bool {
        self.cardinality == Cardinality::Many
    }
}

/// A named output shape and its fields, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub name: SmolStr,
    pub fields: IndexMap<SmolStr, Field>,
}

impl Shape {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Declare a field; a later declaration with the same name replaces it
    pub fn field(mut self, name: impl Into<SmolStr>, ty: FieldType, cardinality: Cardinality) -> Self {
        let field = Field::new(name, ty, cardinality);
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn text(self, name: impl Into<SmolStr>) -> Self {
        self.field(name, FieldType::Text, Cardinality::Single)
    }

    pub fn texts(self, name: impl Into<SmolStr>) -> Self {
        self.field(name, FieldType::Text, Cardinality::Many)
    }

    pub fn int(self, name: impl Into<SmolStr>) -> Self {
        self.field(name, FieldType::Int, Cardinality::Single)
    }

    pub fn ints(self, name: impl Into<SmolStr>) -> Self {
        self.field(name, FieldType::Int, Cardinality::Many)
    }

    pub fn flag(self, name: impl Into<SmolStr>) -> Self {
        self.field(name, FieldType::Bool, Cardinality::Single)
    }

    pub fn node(self, name: impl Into<SmolStr>, shape: impl Into<SmolStr>) -> Self {
        self.field(name, FieldType::Node(shape.into()), Cardinality::Single)
    }

    pub fn nodes(self, name: impl Into<SmolStr>, shape: impl Into<SmolStr>) -> Self {
        self.field(name, FieldType::Node(shape.into()), Cardinality::Many)
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }
}
