//! Static checks over the compiled node graph
//!
//! - nullability: which productions can match without consuming input
//! - left recursion: a production reachable from itself without consuming
//!   input would recurse forever under recursive descent
//! - productivity: a production with no finite derivation can never match
//!
//! Custom parsers are assumed to consume input.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::node::{CompiledProduction, GrammarNode, NodeId, ProductionId};
use crate::errors::CompileError;

/// Fixed-point nullability per production
pub(super) fn nullable_productions(
    nodes: &[GrammarNode],
    productions: &[CompiledProduction],
) -> Vec<bool> {
    let mut nullable = vec![false; productions.len()];
    loop {
        let mut changed = false;
        for (i, production) in productions.iter().enumerate() {
            if !nullable[i] && is_nullable(nodes, production.root, &nullable) {
                nullable[i] = true;
                changed = true;
            }
        }
        if !changed {
            return nullable;
        }
    }
}

pub(super) fn is_nullable(nodes: &[GrammarNode], id: NodeId, productions: &[bool]) -> bool {
    match &nodes[id.index()] {
        GrammarNode::Literal { .. }
        | GrammarNode::Token { .. }
        | GrammarNode::Negation(_)
        | GrammarNode::CustomParse { .. } => false,
        GrammarNode::Reference(p) => productions[p.index()],
        GrammarNode::Sequence(children) => children.iter().all(|c| is_nullable(nodes, *c, productions)),
        GrammarNode::Alternation { branches, .. } => {
            branches.iter().any(|b| is_nullable(nodes, *b, productions))
        }
        GrammarNode::Repetition { child, min } => *min == 0 || is_nullable(nodes, *child, productions),
        GrammarNode::Optional(_) | GrammarNode::Lookahead { .. } => true,
        GrammarNode::Group(child) | GrammarNode::Capture { child, .. } => {
            is_nullable(nodes, *child, productions)
        }
    }
}

/// Collect productions reachable from `id` before any input is consumed;
/// returns whether `id` itself is nullable
fn left_references(
    nodes: &[GrammarNode],
    id: NodeId,
    nullable: &[bool],
    out: &mut Vec<ProductionId>,
) -> bool {
    match &nodes[id.index()] {
        GrammarNode::Literal { .. } | GrammarNode::Token { .. } | GrammarNode::CustomParse { .. } => {
            false
        }
        // The child is tried here before the one token is consumed
        GrammarNode::Negation(child) => {
            left_references(nodes, *child, nullable, out);
            false
        }
        GrammarNode::Reference(p) => {
            out.push(*p);
            nullable[p.index()]
        }
        GrammarNode::Sequence(children) => {
            for child in children {
                if !left_references(nodes, *child, nullable, out) {
                    return false;
                }
            }
            true
        }
        GrammarNode::Alternation { branches, .. } => {
            let mut any = false;
            for branch in branches {
                any |= left_references(nodes, *branch, nullable, out);
            }
            any
        }
        GrammarNode::Repetition { child, min } => {
            let child_nullable = left_references(nodes, *child, nullable, out);
            *min == 0 || child_nullable
        }
        GrammarNode::Optional(child) | GrammarNode::Lookahead { child, .. } => {
            left_references(nodes, *child, nullable, out);
            true
        }
        GrammarNode::Group(child) | GrammarNode::Capture { child, .. } => {
            left_references(nodes, *child, nullable, out)
        }
    }
}

/// Reject any production that can reach itself without consuming input
pub(super) fn check_left_recursion(
    nodes: &[GrammarNode],
    productions: &[CompiledProduction],
    nullable: &[bool],
) -> Result<(), CompileError> {
    let edges: Vec<Vec<ProductionId>> = productions
        .iter()
        .map(|p| {
            let mut out = Vec::new();
            left_references(nodes, p.root, nullable, &mut out);
            out
        })
        .collect();

    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        OnPath,
        Done,
    }

    fn visit(
        at: usize,
        edges: &[Vec<ProductionId>],
        marks: &mut [Mark],
        path: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        marks[at] = Mark::OnPath;
        path.push(at);
        for next in &edges[at] {
            let next = next.index();
            match marks[next] {
                Mark::OnPath => {
                    let start = path.iter().position(|p| *p == next).unwrap_or(0);
                    let mut cycle = path[start..].to_vec();
                    cycle.push(next);
                    return Some(cycle);
                }
                Mark::Unvisited => {
                    if let Some(cycle) = visit(next, edges, marks, path) {
                        return Some(cycle);
                    }
                }
                Mark::Done => {}
            }
        }
        path.pop();
        marks[at] = Mark::Done;
        None
    }

    let mut marks = vec![Mark::Unvisited; productions.len()];
    for start in 0..productions.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        let mut path = Vec::new();
        if let Some(cycle) = visit(start, &edges, &mut marks, &mut path) {
            return Err(CompileError::LeftRecursion {
                cycle: cycle
                    .into_iter()
                    .map(|i| productions[i].name.clone())
                    .collect(),
            });
        }
    }
    Ok(())
}

fn is_productive(nodes: &[GrammarNode], id: NodeId, productive: &[bool]) -> bool {
    match &nodes[id.index()] {
        GrammarNode::Literal { .. }
        | GrammarNode::Token { .. }
        | GrammarNode::Negation(_)
        | GrammarNode::CustomParse { .. }
        | GrammarNode::Optional(_)
        | GrammarNode::Lookahead { .. } => true,
        GrammarNode::Reference(p) => productive[p.index()],
        GrammarNode::Sequence(children) => children.iter().all(|c| is_productive(nodes, *c, productive)),
        GrammarNode::Alternation { branches, .. } => {
            branches.iter().any(|b| is_productive(nodes, *b, productive))
        }
        GrammarNode::Repetition { child, min } => *min == 0 || is_productive(nodes, *child, productive),
        GrammarNode::Group(child) | GrammarNode::Capture { child, .. } => {
            is_productive(nodes, *child, productive)
        }
    }
}

/// Reject productions that can never finish matching
pub(super) fn check_productive(
    nodes: &[GrammarNode],
    productions: &[CompiledProduction],
) -> Result<(), CompileError> {
    let mut productive = vec![false; productions.len()];
    loop {
        let mut changed = false;
        for (i, production) in productions.iter().enumerate() {
            if !productive[i] && is_productive(nodes, production.root, &productive) {
                productive[i] = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    match productive.iter().position(|ok| !ok) {
        Some(i) => Err(CompileError::NoBaseCase(productions[i].name.clone())),
        None => Ok(()),
    }
}

/// Repetitions whose body can match empty input, by owning production
pub(super) fn nullable_repetitions(
    nodes: &[GrammarNode],
    productions: &[CompiledProduction],
    nullable: &[bool],
) -> Vec<SmolStr> {
    fn walk(nodes: &[GrammarNode], id: NodeId, nullable: &[bool], seen: &mut FxHashSet<NodeId>) -> bool {
        if !seen.insert(id) {
            return false;
        }
        match &nodes[id.index()] {
            GrammarNode::Repetition { child, .. } => {
                is_nullable(nodes, *child, nullable) || walk(nodes, *child, nullable, seen)
            }
            GrammarNode::Sequence(children) | GrammarNode::Alternation { branches: children, .. } => {
                children.iter().any(|c| walk(nodes, *c, nullable, seen))
            }
            GrammarNode::Optional(child)
            | GrammarNode::Group(child)
            | GrammarNode::Negation(child)
            | GrammarNode::Capture { child, .. }
            | GrammarNode::Lookahead { child, .. } => walk(nodes, *child, nullable, seen),
            GrammarNode::Literal { .. }
            | GrammarNode::Token { .. }
            | GrammarNode::Reference(_)
            | GrammarNode::CustomParse { .. } => false,
        }
    }

    let mut seen = FxHashSet::default();
    productions
        .iter()
        .filter(|p| walk(nodes, p.root, nullable, &mut seen))
        .map(|p| p.name.clone())
        .collect()
}
