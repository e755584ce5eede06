//! Lowering of declarative expressions into the node arena
//!
//! Resolves production references and capture fields to indices, checks
//! token kinds and literal text, and decides what each node capture runs:
//! a registered custom parser, the explicit sub-expression, or the unique
//! production bound to the field's shape.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use super::node::{CompiledShape, GrammarNode, NodeId, ProductionId, ShapeId};
use crate::errors::CompileError;
use crate::grammar::{Expr, FieldType, Production};
use crate::options::{BuildOptions, CustomParseFn};

/// Production currently being lowered
#[derive(Clone, Copy)]
struct Context<'p> {
    production: &'p SmolStr,
    shape: ShapeId,
}

pub(super) struct Lowerer<'a> {
    pub(super) nodes: Vec<GrammarNode>,
    shapes: &'a [CompiledShape],
    shape_ids: &'a FxHashMap<SmolStr, ShapeId>,
    productions: &'a [Production],
    /// Shape of each production, parallel to `productions`
    production_shapes: &'a [ShapeId],
    by_name: &'a FxHashMap<SmolStr, ProductionId>,
    custom: &'a FxHashMap<ShapeId, CustomParseFn>,
    options: &'a BuildOptions,
}

impl<'a> Lowerer<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        shapes: &'a [CompiledShape],
        shape_ids: &'a FxHashMap<SmolStr, ShapeId>,
        productions: &'a [Production],
        production_shapes: &'a [ShapeId],
        by_name: &'a FxHashMap<SmolStr, ProductionId>,
        custom: &'a FxHashMap<ShapeId, CustomParseFn>,
        options: &'a BuildOptions,
    ) -> Self {
        Self {
            nodes: Vec::new(),
            shapes,
            shape_ids,
            productions,
            production_shapes,
            by_name,
            custom,
            options,
        }
    }

    /// Lower the body of production `index`, returning its root node
    pub(super) fn production(&mut self, index: usize) -> Result<NodeId, CompileError> {
        let productions = self.productions;
        let production = &productions[index];
        let ctx = Context {
            production: &production.name,
            shape: self.production_shapes[index],
        };
        self.lower(ctx, &production.expr)
    }

    fn push(&mut self, node: GrammarNode) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn lower(&mut self, ctx: Context<'_>, expr: &Expr) -> Result<NodeId, CompileError> {
        let node = match expr {
            Expr::Literal { text, kind } => {
                if text.is_empty() {
                    return Err(CompileError::EmptyLiteral(ctx.production.clone()));
                }
                if let Some(kind) = kind {
                    self.options.check_kind(kind)?;
                }
                GrammarNode::Literal {
                    text: text.clone(),
                    kind: kind.clone(),
                }
            }
            Expr::Token(kind) => {
                self.options.check_kind(kind)?;
                GrammarNode::Token { kind: kind.clone() }
            }
            Expr::Reference(name) => match self.by_name.get(name) {
                Some(id) => GrammarNode::Reference(*id),
                None => {
                    return Err(CompileError::UnresolvedReference {
                        production: ctx.production.clone(),
                        name: name.clone(),
                    });
                }
            },
            Expr::Sequence(items) => {
                let children = items
                    .iter()
                    .map(|item| self.lower(ctx, item))
                    .collect::<Result<Vec<_>, _>>()?;
                GrammarNode::Sequence(children)
            }
            Expr::Alternation(branches) => {
                let branches = branches
                    .iter()
                    .map(|branch| self.lower(ctx, branch))
                    .collect::<Result<Vec<_>, _>>()?;
                GrammarNode::Alternation {
                    branches,
                    signatures: Vec::new(),
                }
            }
            Expr::Repetition { expr, min } => GrammarNode::Repetition {
                child: self.lower(ctx, expr)?,
                min: *min,
            },
            Expr::Optional(inner) => GrammarNode::Optional(self.lower(ctx, inner)?),
            Expr::Group(inner) => GrammarNode::Group(self.lower(ctx, inner)?),
            Expr::Negation(inner) => GrammarNode::Negation(self.lower(ctx, inner)?),
            Expr::Lookahead { expr, negative } => GrammarNode::Lookahead {
                child: self.lower(ctx, expr)?,
                negative: *negative,
            },
            Expr::Capture { field, expr } => return self.capture(ctx, field, expr.as_deref()),
        };
        Ok(self.push(node))
    }

    fn capture(
        &mut self,
        ctx: Context<'_>,
        name: &SmolStr,
        expr: Option<&Expr>,
    ) -> Result<NodeId, CompileError> {
        let shapes = self.shapes;
        let shape = &shapes[ctx.shape.index()];
        let Some(field_id) = shape.field_id(name) else {
            return Err(CompileError::UnknownField {
                production: ctx.production.clone(),
                shape: shape.name.clone(),
                field: name.clone(),
            });
        };
        let field = shape.field(field_id);

        let child = match (&field.ty, expr) {
            (FieldType::Node(target), expr) => {
                let target_id = self.shape_id(ctx, target)?;
                if self.custom.contains_key(&target_id) {
                    // A registered parser replaces whatever the grammar says
                    self.push(GrammarNode::CustomParse { shape: target_id })
                } else if let Some(expr) = expr {
                    let child = self.lower(ctx, expr)?;
                    self.check_node_capture(ctx, name, target, target_id, child)?;
                    child
                } else {
                    let production = self.node_production(ctx, name, target, target_id)?;
                    self.push(GrammarNode::Reference(production))
                }
            }
            (_, Some(expr)) => self.lower(ctx, expr)?,
            (ty, None) => {
                return Err(CompileError::CaptureTypeMismatch {
                    production: ctx.production.clone(),
                    field: name.clone(),
                    expected: ty.describe(),
                    found: "a bare node capture".to_string(),
                });
            }
        };

        Ok(self.push(GrammarNode::Capture {
            field: field_id,
            child,
        }))
    }

    fn shape_id(&self, ctx: Context<'_>, name: &SmolStr) -> Result<ShapeId, CompileError> {
        self.shape_ids
            .get(name)
            .copied()
            .ok_or_else(|| CompileError::UnknownShape {
                context: ctx.production.clone(),
                shape: name.clone(),
            })
    }

    /// The single production populating `target`
    fn node_production(
        &self,
        ctx: Context<'_>,
        field: &SmolStr,
        target: &SmolStr,
        target_id: ShapeId,
    ) -> Result<ProductionId, CompileError> {
        let candidates: Vec<usize> = self
            .production_shapes
            .iter()
            .enumerate()
            .filter(|(_, shape)| **shape == target_id)
            .map(|(i, _)| i)
            .collect();

        match candidates.as_slice() {
            [] => Err(CompileError::MissingNodeProduction {
                production: ctx.production.clone(),
                field: field.clone(),
                shape: target.clone(),
            }),
            [only] => Ok(ProductionId::new(*only)),
            many => Err(CompileError::AmbiguousNodeProduction {
                production: ctx.production.clone(),
                field: field.clone(),
                shape: target.clone(),
                candidates: many
                    .iter()
                    .map(|i| self.productions[*i].name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    /// A node capture's subtree must yield nodes of the field's shape only
    fn check_node_capture(
        &self,
        ctx: Context<'_>,
        field: &SmolStr,
        target: &SmolStr,
        target_id: ShapeId,
        child: NodeId,
    ) -> Result<(), CompileError> {
        let mut produced = FxHashSet::default();
        self.produced_shapes(child, &mut produced);

        let found = if produced.is_empty() {
            Some("tokens".to_string())
        } else {
            let mut wrong: Vec<&SmolStr> = produced
                .iter()
                .filter(|s| **s != target_id)
                .map(|s| &self.shapes[s.index()].name)
                .collect();
            wrong.sort();
            wrong.first().map(|shape| format!("node `{}`", shape))
        };

        match found {
            Some(found) => Err(CompileError::CaptureTypeMismatch {
                production: ctx.production.clone(),
                field: field.clone(),
                expected: FieldType::Node(target.clone()).describe(),
                found,
            }),
            None => Ok(()),
        }
    }

    /// Shapes of the nodes a subtree hands to an enclosing capture
    fn produced_shapes(&self, id: NodeId, out: &mut FxHashSet<ShapeId>) {
        match &self.nodes[id.index()] {
            GrammarNode::Reference(p) => {
                out.insert(self.production_shapes[p.index()]);
            }
            GrammarNode::CustomParse { shape } => {
                out.insert(*shape);
            }
            GrammarNode::Sequence(children) | GrammarNode::Alternation { branches: children, .. } => {
                for child in children {
                    self.produced_shapes(*child, out);
                }
            }
            GrammarNode::Repetition { child, .. }
            | GrammarNode::Optional(child)
            | GrammarNode::Group(child) => self.produced_shapes(*child, out),
            // Nested captures keep their own values; negation and lookahead
            // produce nothing
            GrammarNode::Capture { .. }
            | GrammarNode::Negation(_)
            | GrammarNode::Lookahead { .. }
            | GrammarNode::Literal { .. }
            | GrammarNode::Token { .. } => {}
        }
    }
}
