//! Lookahead signatures for alternation branches
//!
//! A signature over-approximates the token sequences a node can start with,
//! truncated to the lookahead depth `k`. A prefix shorter than `k` means the
//! node can finish after exactly those tokens. The engine uses signatures
//! only to reject branches that cannot start at the current position, so an
//! over-approximation is always safe; [`Signature::Any`] disables filtering.
//!
//! Production signatures are computed as a least fixed point over the
//! production table, which handles mutual recursion.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::node::{CompiledProduction, GrammarNode, NodeId};
use crate::token::{Token, TokenStream};

/// Prefix sets larger than this degrade to [`Signature::Any`]
const MAX_PREFIXES: usize = 256;

/// Upper bound on fixed-point rounds over the production table
const MAX_ROUNDS: usize = 256;

/// One leading-token pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pattern {
    Literal { text: SmolStr, kind: Option<SmolStr> },
    Kind(SmolStr),
    AnyToken,
}

impl Pattern {
    pub fn matches(&self, token: &Token, case_insensitive: &FxHashSet<SmolStr>) -> bool {
        match self {
            Self::Literal { text, kind } => {
                literal_matches(text, kind.as_deref(), token, case_insensitive)
            }
            Self::Kind(kind) => token.kind == *kind,
            Self::AnyToken => true,
        }
    }

    /// Human-readable form used in "expected ..." messages
    pub fn describe(&self) -> SmolStr {
        match self {
            Self::Literal { text, .. } => SmolStr::new(format!("{:?}", text.as_str())),
            Self::Kind(kind) => SmolStr::new(format!("<{}>", kind)),
            Self::AnyToken => SmolStr::new_static("any token"),
        }
    }
}

/// Literal comparison shared by the engine and the signature filter
///
/// The kind constraint is exact; text comparison is relaxed only for token
/// kinds configured as case-insensitive.
pub(crate) fn literal_matches(
    text: &str,
    kind: Option<&str>,
    token: &Token,
    case_insensitive: &FxHashSet<SmolStr>,
) -> bool {
    if kind.is_some_and(|kind| token.kind != kind) {
        return false;
    }
    if case_insensitive.contains(&token.kind) {
        caseless_eq(text, &token.text)
    } else {
        token.text == text
    }
}

fn caseless_eq(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// The set of leading-token prefixes of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    /// Could start with anything; never filters
    Any,
    Prefixes(BTreeSet<Vec<Pattern>>),
}

impl Signature {
    /// Matches only the empty sequence
    pub fn empty() -> Self {
        Self::Prefixes(BTreeSet::from([Vec::new()]))
    }

    /// Matches nothing at all
    pub fn never() -> Self {
        Self::Prefixes(BTreeSet::new())
    }

    pub fn token(pattern: Pattern) -> Self {
        Self::Prefixes(BTreeSet::from([vec![pattern]]))
    }

    fn capped(prefixes: BTreeSet<Vec<Pattern>>) -> Self {
        if prefixes.len() > MAX_PREFIXES {
            Self::Any
        } else {
            Self::Prefixes(prefixes)
        }
    }

    pub fn union(&self, other: &Signature) -> Signature {
        match (self, other) {
            (Self::Prefixes(a), Self::Prefixes(b)) => Self::capped(a.union(b).cloned().collect()),
            _ => Self::Any,
        }
    }

    /// Prefixes of `self` followed by `other`, truncated to `k`
    pub fn concat(&self, other: &Signature, k: usize) -> Signature {
        let Self::Prefixes(heads) = self else {
            return Self::Any;
        };
        let mut out = BTreeSet::new();
        for head in heads {
            if head.len() >= k {
                out.insert(head.clone());
                continue;
            }
            let Self::Prefixes(tails) = other else {
                return Self::Any;
            };
            for tail in tails {
                let mut joined = head.clone();
                joined.extend(tail.iter().take(k - head.len()).cloned());
                out.insert(joined);
            }
            if out.len() > MAX_PREFIXES {
                return Self::Any;
            }
        }
        Self::capped(out)
    }

    /// Whether the upcoming tokens could start a match
    pub fn admits<S: TokenStream + ?Sized>(
        &self,
        stream: &S,
        case_insensitive: &FxHashSet<SmolStr>,
    ) -> bool {
        match self {
            Self::Any => true,
            Self::Prefixes(prefixes) => prefixes.iter().any(|prefix| {
                prefix.iter().enumerate().all(|(i, pattern)| {
                    stream
                        .peek(i)
                        .is_some_and(|token| pattern.matches(token, case_insensitive))
                })
            }),
        }
    }

    /// Descriptions of the possible first tokens, for error messages
    pub fn first_descriptions(&self) -> Vec<SmolStr> {
        let Self::Prefixes(prefixes) = self else {
            return Vec::new();
        };
        let firsts: BTreeSet<&Pattern> = prefixes.iter().filter_map(|p| p.first()).collect();
        firsts.into_iter().map(Pattern::describe).collect()
    }

    /// Why the upcoming tokens were not admitted: the offset of the first
    /// token no prefix accepts, with the patterns that would have been
    /// accepted there
    pub fn explain<S: TokenStream + ?Sized>(
        &self,
        stream: &S,
        case_insensitive: &FxHashSet<SmolStr>,
    ) -> (usize, Vec<SmolStr>) {
        let Self::Prefixes(prefixes) = self else {
            return (0, Vec::new());
        };
        let matched_len = |prefix: &Vec<Pattern>| {
            prefix
                .iter()
                .enumerate()
                .take_while(|(i, pattern)| {
                    stream
                        .peek(*i)
                        .is_some_and(|token| pattern.matches(token, case_insensitive))
                })
                .count()
        };
        let furthest = prefixes.iter().map(matched_len).max().unwrap_or(0);
        let expected: BTreeSet<&Pattern> = prefixes
            .iter()
            .filter(|prefix| matched_len(*prefix) == furthest)
            .filter_map(|prefix| prefix.get(furthest))
            .collect();
        (furthest, expected.into_iter().map(Pattern::describe).collect())
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

/// Compute production signatures, then fill in every alternation's
/// per-branch signatures
pub(super) fn compute(
    nodes: &mut [GrammarNode],
    productions: &[CompiledProduction],
    k: usize,
) {
    let mut sigs = vec![Signature::never(); productions.len()];
    let mut converged = false;
    for _ in 0..MAX_ROUNDS {
        let mut changed = false;
        for (i, production) in productions.iter().enumerate() {
            let sig = signature_of(nodes, production.root, &sigs, k);
            if sig != sigs[i] {
                sigs[i] = sig;
                changed = true;
            }
        }
        if !changed {
            converged = true;
            break;
        }
    }
    if !converged {
        tracing::warn!("lookahead signatures did not converge; branch filtering disabled");
        sigs.fill(Signature::Any);
    }

    for index in 0..nodes.len() {
        let GrammarNode::Alternation { branches, .. } = &nodes[index] else {
            continue;
        };
        let branch_sigs: Vec<Signature> = branches
            .iter()
            .map(|branch| signature_of(nodes, *branch, &sigs, k))
            .collect();
        if let GrammarNode::Alternation { signatures, .. } = &mut nodes[index] {
            *signatures = branch_sigs;
        }
    }
}

fn signature_of(nodes: &[GrammarNode], id: NodeId, productions: &[Signature], k: usize) -> Signature {
    match &nodes[id.index()] {
        GrammarNode::Literal { text, kind } => Signature::token(Pattern::Literal {
            text: text.clone(),
            kind: kind.clone(),
        }),
        GrammarNode::Token { kind } => Signature::token(Pattern::Kind(kind.clone())),
        GrammarNode::Reference(production) => productions[production.index()].clone(),
        GrammarNode::Sequence(children) => children.iter().fold(Signature::empty(), |acc, child| {
            acc.concat(&signature_of(nodes, *child, productions, k), k)
        }),
        GrammarNode::Alternation { branches, .. } => {
            branches.iter().fold(Signature::never(), |acc, branch| {
                acc.union(&signature_of(nodes, *branch, productions, k))
            })
        }
        GrammarNode::Repetition { child, min } => {
            let body = signature_of(nodes, *child, productions, k);
            // tail = {ε} ∪ body·tail, stable after at most k+1 rounds
            let mut tail = Signature::empty();
            let mut stable = false;
            for _ in 0..=k + 1 {
                let next = Signature::empty().union(&body.concat(&tail, k));
                if next == tail {
                    stable = true;
                    break;
                }
                tail = next;
            }
            if !stable {
                return Signature::Any;
            }
            // Fewer mandatory copies only widens the set
            for _ in 0..(*min).min(k) {
                tail = body.concat(&tail, k);
            }
            tail
        }
        GrammarNode::Optional(child) => {
            Signature::empty().union(&signature_of(nodes, *child, productions, k))
        }
        GrammarNode::Group(child) | GrammarNode::Capture { child, .. } => {
            signature_of(nodes, *child, productions, k)
        }
        GrammarNode::CustomParse { .. } => Signature::Any,
        GrammarNode::Negation(_) => Signature::token(Pattern::AnyToken),
        GrammarNode::Lookahead { .. } => Signature::empty(),
    }
}
