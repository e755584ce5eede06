//! Compiled grammar node model
//!
//! Nodes live in one arena and refer to each other by [`NodeId`];
//! references between productions go through [`ProductionId`] indices into
//! the production table, so recursive grammars compile to a cyclic graph
//! without ownership cycles. Everything here is immutable once compiled.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use super::lookahead::Signature;
use crate::grammar::Field;
use crate::options::CustomParseFn;
use crate::token::mappers::TokenMapper;

/// Index of a node in the grammar arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a production in the production table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductionId(u32);

impl ProductionId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a shape in the shape table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(u32);

impl ShapeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a field within its shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(u32);

impl FieldId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An executable grammar node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarNode {
    Literal {
        text: SmolStr,
        kind: Option<SmolStr>,
    },
    /// Any token of a kind
    Token { kind: SmolStr },
    Reference(ProductionId),
    Sequence(Vec<NodeId>),
    Alternation {
        branches: Vec<NodeId>,
        /// Leading-token signature per branch, parallel to `branches`
        signatures: Vec<Signature>,
    },
    Repetition { child: NodeId, min: usize },
    Optional(NodeId),
    Group(NodeId),
    Capture { field: FieldId, child: NodeId },
    CustomParse { shape: ShapeId },
    Negation(NodeId),
    Lookahead { child: NodeId, negative: bool },
}

/// A shape with its fields addressable by [`FieldId`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledShape {
    pub name: SmolStr,
    pub fields: Vec<Field>,
}

impl CompiledShape {
    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.index()]
    }

    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .map(FieldId::new)
    }
}

/// A production resolved to its root node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledProduction {
    pub name: SmolStr,
    pub shape: ShapeId,
    pub root: NodeId,
}

/// Token filtering and rewriting applied before a parse
#[derive(Clone, Default)]
pub(crate) struct Preprocess {
    pub(crate) elide: FxHashSet<SmolStr>,
    pub(crate) mappers: Vec<(FxHashSet<SmolStr>, TokenMapper)>,
}

/// An immutable, executable grammar
///
/// Safe to share between threads; every parse keeps its own mutable state.
#[derive(Clone)]
pub struct CompiledGrammar {
    pub(crate) nodes: Vec<GrammarNode>,
    pub(crate) productions: Vec<CompiledProduction>,
    pub(crate) shapes: Vec<CompiledShape>,
    pub(crate) by_name: FxHashMap<SmolStr, ProductionId>,
    pub(crate) entry: ProductionId,
    pub(crate) lookahead: usize,
    pub(crate) case_insensitive: FxHashSet<SmolStr>,
    /// Custom parsers indexed by shape
    pub(crate) custom: FxHashMap<ShapeId, CustomParseFn>,
    pub(crate) preprocess: Preprocess,
}

impl CompiledGrammar {
    pub fn node(&self, id: NodeId) -> &GrammarNode {
        &self.nodes[id.index()]
    }

    pub fn production(&self, id: ProductionId) -> &CompiledProduction {
        &self.productions[id.index()]
    }

    pub fn shape(&self, id: ShapeId) -> &CompiledShape {
        &self.shapes[id.index()]
    }

    pub fn production_id(&self, name: &str) -> Option<ProductionId> {
        self.by_name.get(name).copied()
    }

    pub fn entry(&self) -> ProductionId {
        self.entry
    }

    pub fn productions(&self) -> &[CompiledProduction] {
        &self.productions
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    /// Whether literals compare case-insensitively against tokens of `kind`
    pub fn is_case_insensitive(&self, kind: &str) -> bool {
        self.case_insensitive.contains(kind)
    }
}

impl std::fmt::Debug for CompiledGrammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledGrammar")
            .field("productions", &self.productions)
            .field("nodes", &self.nodes.len())
            .field("entry", &self.entry)
            .field("lookahead", &self.lookahead)
            .finish_non_exhaustive()
    }
}
