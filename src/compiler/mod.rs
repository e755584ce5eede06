//! Grammar compiler
//!
//! ```text
//! Grammar (shapes + productions)  +  BuildOptions
//!     ↓ resolve shapes and production names
//!     ↓ lower expressions into the node arena      (lower.rs)
//!     ↓ left recursion / base case checks          (analysis.rs)
//!     ↓ per-branch lookahead signatures            (lookahead.rs)
//! CompiledGrammar (immutable, shareable)
//! ```
//!
//! Compilation either yields a complete [`CompiledGrammar`] or the first
//! [`CompileError`] found; nothing is partially built.

mod analysis;
mod display;
mod lookahead;
mod lower;
mod node;

pub use lookahead::{Pattern, Signature};
pub use node::{
    CompiledGrammar, CompiledProduction, CompiledShape, FieldId, GrammarNode, NodeId,
    ProductionId, ShapeId,
};

pub(crate) use lookahead::literal_matches;
pub(crate) use node::Preprocess;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::errors::CompileError;
use crate::grammar::{FieldType, Grammar};
use crate::options::BuildOptions;

/// Compile and validate `grammar`
pub(crate) fn compile(
    grammar: &Grammar,
    options: BuildOptions,
) -> Result<CompiledGrammar, CompileError> {
    options.validate()?;

    if grammar.productions().is_empty() {
        return Err(CompileError::EmptyGrammar);
    }

    // Shapes: declared ones first, then implicit empty shapes for
    // productions named after an undeclared shape
    let mut shapes = Vec::new();
    let mut shape_ids: FxHashMap<SmolStr, ShapeId> = FxHashMap::default();
    for shape in grammar.shapes() {
        if shape_ids.contains_key(&shape.name) {
            return Err(CompileError::DuplicateShape(shape.name.clone()));
        }
        shape_ids.insert(shape.name.clone(), ShapeId::new(shapes.len()));
        shapes.push(CompiledShape {
            name: shape.name.clone(),
            fields: shape.fields.values().cloned().collect(),
        });
    }

    let mut production_shapes = Vec::with_capacity(grammar.productions().len());
    let mut by_name: FxHashMap<SmolStr, ProductionId> = FxHashMap::default();
    for (index, production) in grammar.productions().iter().enumerate() {
        if by_name
            .insert(production.name.clone(), ProductionId::new(index))
            .is_some()
        {
            return Err(CompileError::DuplicateProduction(production.name.clone()));
        }
        let shape = match shape_ids.get(&production.shape) {
            Some(id) => *id,
            None if production.shape == production.name => {
                let id = ShapeId::new(shapes.len());
                shape_ids.insert(production.shape.clone(), id);
                shapes.push(CompiledShape {
                    name: production.shape.clone(),
                    fields: Vec::new(),
                });
                id
            }
            None => {
                return Err(CompileError::UnknownShape {
                    context: production.name.clone(),
                    shape: production.shape.clone(),
                });
            }
        };
        production_shapes.push(shape);
    }

    for shape in &shapes {
        for field in &shape.fields {
            if let FieldType::Node(target) = &field.ty {
                if !shape_ids.contains_key(target) {
                    return Err(CompileError::UnknownShape {
                        context: SmolStr::new(format!("{}.{}", shape.name, field.name)),
                        shape: target.clone(),
                    });
                }
            }
        }
    }

    let entry_name = grammar.entry_name().unwrap_or_default();
    let entry = by_name
        .get(entry_name)
        .copied()
        .ok_or_else(|| CompileError::UnknownEntry(entry_name.into()))?;

    let mut custom = FxHashMap::default();
    for (shape, parse) in &options.custom_parsers {
        let Some(id) = shape_ids.get(shape) else {
            return Err(CompileError::UnknownShape {
                context: SmolStr::new_static("custom parser"),
                shape: shape.clone(),
            });
        };
        custom.insert(*id, parse.clone());
    }

    let mut lowerer = lower::Lowerer::new(
        &shapes,
        &shape_ids,
        grammar.productions(),
        &production_shapes,
        &by_name,
        &custom,
        &options,
    );
    let mut productions = Vec::with_capacity(grammar.productions().len());
    for (index, production) in grammar.productions().iter().enumerate() {
        let root = lowerer.production(index)?;
        productions.push(CompiledProduction {
            name: production.name.clone(),
            shape: production_shapes[index],
            root,
        });
    }
    let mut nodes = lowerer.nodes;

    let nullable = analysis::nullable_productions(&nodes, &productions);
    analysis::check_left_recursion(&nodes, &productions, &nullable)?;
    analysis::check_productive(&nodes, &productions)?;
    for production in analysis::nullable_repetitions(&nodes, &productions, &nullable) {
        tracing::warn!(
            production = %production,
            "repetition body can match empty input; iterations that consume nothing stop the loop"
        );
    }

    lookahead::compute(&mut nodes, &productions, options.lookahead);

    tracing::debug!(
        productions = productions.len(),
        shapes = shapes.len(),
        nodes = nodes.len(),
        lookahead = options.lookahead,
        "compiled grammar"
    );

    Ok(CompiledGrammar {
        nodes,
        productions,
        shapes,
        by_name,
        entry,
        lookahead: options.lookahead,
        case_insensitive: options.case_insensitive,
        custom,
        preprocess: Preprocess {
            elide: options.elide,
            mappers: options.mappers,
        },
    })
}
