//! Grammar expressions and their constructors
//!
//! ```ignore
//! use grammatic::grammar::expr::*;
//!
//! // Expr = @terms:Term { @ops:("+" | "-") @terms:Term }
//! let expr = seq([
//!     capture_node("terms"),
//!     many(seq([capture("ops", alt([lit("+"), lit("-")])), capture_node("terms")])),
//! ]);
//! ```

use smol_str::SmolStr;

/// A grammar fragment in a production body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Token text equal to `text`, optionally of a given kind
    Literal { text: SmolStr, kind: Option<SmolStr> },
    /// Any token of a kind
    Token(SmolStr),
    /// Another production by name
    Reference(SmolStr),
    Sequence(Vec<Expr>),
    /// Ordered choice; the first branch that matches wins
    Alternation(Vec<Expr>),
    /// `expr` repeated at least `min` times, greedily
    Repetition { expr: Box<Expr>, min: usize },
    Optional(Box<Expr>),
    Group(Box<Expr>),
    /// Bind a match to a field of the production's shape; `None` uses the
    /// production bound to the field's node shape
    Capture {
        field: SmolStr,
        expr: Option<Box<Expr>>,
    },
    /// One token, provided `expr` does not match here
    Negation(Box<Expr>),
    /// Zero-width check that `expr` does (or does not) match here
    Lookahead { expr: Box<Expr>, negative: bool },
}

impl Expr {
    /// Shorthand for `many(self)`
    pub fn many(self) -> Expr {
        many(self)
    }

    /// Shorthand for `opt(self)`
    pub fn opt(self) -> Expr {
        opt(self)
    }
}

pub fn lit(text: impl Into<SmolStr>) -> Expr {
    Expr::Literal {
        text: text.into(),
        kind: None,
    }
}

/// Literal constrained to a token kind, `"text":Kind`
pub fn lit_of(text: impl Into<SmolStr>, kind: impl Into<SmolStr>) -> Expr {
    Expr::Literal {
        text: text.into(),
        kind: Some(kind.into()),
    }
}

pub fn token(kind: impl Into<SmolStr>) -> Expr {
    Expr::Token(kind.into())
}

pub fn reference(production: impl Into<SmolStr>) -> Expr {
    Expr::Reference(production.into())
}

pub fn seq(items: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Sequence(items.into_iter().collect())
}

pub fn alt(branches: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Alternation(branches.into_iter().collect())
}

/// Zero or more
pub fn many(expr: Expr) -> Expr {
    Expr::Repetition {
        expr: Box::new(expr),
        min: 0,
    }
}

/// One or more
pub fn some(expr: Expr) -> Expr {
    Expr::Repetition {
        expr: Box::new(expr),
        min: 1,
    }
}

pub fn at_least(min: usize, expr: Expr) -> Expr {
    Expr::Repetition {
        expr: Box::new(expr),
        min,
    }
}

pub fn opt(expr: Expr) -> Expr {
    Expr::Optional(Box::new(expr))
}

pub fn group(expr: Expr) -> Expr {
    Expr::Group(Box::new(expr))
}

pub fn capture(field: impl Into<SmolStr>, expr: Expr) -> Expr {
    Expr::Capture {
        field: field.into(),
        expr: Some(Box::new(expr)),
    }
}

/// Capture a node field using its shape's own production
pub fn capture_node(field: impl Into<SmolStr>) -> Expr {
    Expr::Capture {
        field: field.into(),
        expr: None,
    }
}

pub fn not(expr: Expr) -> Expr {
    Expr::Negation(Box::new(expr))
}

/// Positive lookahead, `(?= expr)`
pub fn peek(expr: Expr) -> Expr {
    Expr::Lookahead {
        expr: Box::new(expr),
        negative: false,
    }
}

/// Negative lookahead, `(?! expr)`
pub fn peek_not(expr: Expr) -> Expr {
    Expr::Lookahead {
        expr: Box::new(expr),
        negative: true,
    }
}
