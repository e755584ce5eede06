//! Parser construction and invocation options
//!
//! [`BuildOptions`] is consumed by `Grammar::build` and fixed for the life
//! of the compiled grammar. [`ParseOptions`] applies to a single parse.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::errors::{CompileError, CustomParseError};
use crate::output::Value;
use crate::token::mappers::TokenMapper;
use crate::token::{Token, TokenKind, TokenStream};

/// Lookahead depth used when none is configured
pub const DEFAULT_LOOKAHEAD: usize = 1;

/// Largest accepted lookahead depth
pub const MAX_LOOKAHEAD: usize = 32;

/// A caller-supplied parser for one shape
///
/// Receives the stream positioned at the capture site, consumes what it
/// needs and returns the produced value. On failure the engine rewinds
/// whatever it consumed.
pub type CustomParseFn =
    Arc<dyn Fn(&mut dyn TokenStream) -> Result<Value, CustomParseError> + Send + Sync>;

/// Options fixed at grammar construction time
#[derive(Clone)]
pub struct BuildOptions {
    pub(crate) lookahead: usize,
    pub(crate) case_insensitive: FxHashSet<SmolStr>,
    pub(crate) custom_parsers: IndexMap<SmolStr, CustomParseFn>,
    pub(crate) elide: FxHashSet<SmolStr>,
    pub(crate) mappers: Vec<(FxHashSet<SmolStr>, TokenMapper)>,
    pub(crate) known_kinds: Option<FxHashSet<SmolStr>>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            case_insensitive: FxHashSet::default(),
            custom_parsers: IndexMap::new(),
            elide: FxHashSet::default(),
            mappers: Vec::new(),
            known_kinds: None,
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for the built-in lexer: its kinds are the only valid kind
    /// names and comments are elided
    pub fn for_default_lexer() -> Self {
        Self::new()
            .token_kinds(TokenKind::names())
            .elide([TokenKind::Comment.as_str()])
    }

    /// Alternation lookahead depth
    ///
    /// Larger depths reject non-viable branches more precisely at some cost
    /// to speed and to the specificity of error positions.
    pub fn lookahead(mut self, depth: usize) -> Self {
        self.lookahead = depth;
        self
    }

    /// Compare literals case-insensitively against tokens of these kinds
    ///
    /// The tokenizer must already treat those kinds case-insensitively;
    /// only the comparison is relaxed.
    pub fn case_insensitive<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.case_insensitive.extend(kinds.into_iter().map(Into::into));
        self
    }

    /// Register a custom parser for captures of node shape `shape`
    pub fn custom_parse<F>(mut self, shape: impl Into<SmolStr>, parse: F) -> Self
    where
        F: Fn(&mut dyn TokenStream) -> Result<Value, CustomParseError> + Send + Sync + 'static,
    {
        self.custom_parsers.insert(shape.into(), Arc::new(parse));
        self
    }

    /// Drop tokens of these kinds before parsing
    pub fn elide<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.elide.extend(kinds.into_iter().map(Into::into));
        self
    }

    /// Rewrite tokens of these kinds (all kinds when empty) before parsing
    pub fn map<I, S, F>(mut self, kinds: I, mapper: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
        F: Fn(Token) -> Token + Send + Sync + 'static,
    {
        let kinds = kinds.into_iter().map(Into::into).collect();
        self.mappers.push((kinds, Arc::new(mapper)));
        self
    }

    /// Declare the complete set of kind names the tokenizer produces
    ///
    /// When set, every kind named by the grammar or these options must be
    /// one of them.
    pub fn token_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.known_kinds = Some(kinds.into_iter().map(Into::into).collect());
        self
    }

    pub fn lookahead_depth(&self) -> usize {
        self.lookahead
    }

    /// Check the options on their own, before any grammar is lowered
    pub(crate) fn validate(&self) -> Result<(), CompileError> {
        if self.lookahead == 0 || self.lookahead > MAX_LOOKAHEAD {
            return Err(CompileError::InvalidLookahead {
                depth: self.lookahead,
                max: MAX_LOOKAHEAD,
            });
        }
        let mut named: Vec<&SmolStr> = self
            .case_insensitive
            .iter()
            .chain(self.elide.iter())
            .chain(self.mappers.iter().flat_map(|(kinds, _)| kinds.iter()))
            .collect();
        // Deterministic error reporting regardless of hash order
        named.sort();
        for kind in named {
            self.check_kind(kind)?;
        }
        Ok(())
    }

    /// A kind name must be an identifier and, if kinds are declared, known
    pub(crate) fn check_kind(&self, kind: &str) -> Result<(), CompileError> {
        let well_formed = is_identifier(kind);
        let known = self
            .known_kinds
            .as_ref()
            .is_none_or(|known| known.contains(kind));
        if well_formed && known {
            Ok(())
        } else {
            Err(CompileError::InvalidTokenKind(kind.into()))
        }
    }
}

impl fmt::Debug for BuildOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildOptions")
            .field("lookahead", &self.lookahead)
            .field("case_insensitive", &self.case_insensitive)
            .field("custom_parsers", &self.custom_parsers.keys().collect::<Vec<_>>())
            .field("elide", &self.elide)
            .field("mappers", &self.mappers.len())
            .field("known_kinds", &self.known_kinds)
            .finish()
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || unicode_ident::is_xid_start(first) => {
            chars.all(unicode_ident::is_xid_continue)
        }
        _ => false,
    }
}

/// Options for a single parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub(crate) allow_trailing: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tolerate unconsumed tokens after the entry production matches
    pub fn allow_trailing(mut self, ok: bool) -> Self {
        self.allow_trailing = ok;
        self
    }

    pub fn allows_trailing(&self) -> bool {
        self.allow_trailing
    }
}
