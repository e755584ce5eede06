//! Declarative grammar description
//!
//! A [`Grammar`] is a set of output [`Shape`]s plus named productions. Each
//! production binds a shape to an [`Expr`] whose captures write into that
//! shape's fields. Nothing here is validated; [`Grammar::build`] compiles
//! and checks the whole description at once.

pub mod expr;
mod schema;

pub use expr::Expr;
pub use schema::{Cardinality, Field, FieldType, Shape};

use smol_str::SmolStr;

use crate::compiler::{self, CompiledGrammar};
use crate::errors::CompileError;
use crate::options::BuildOptions;

/// A named rule and the shape it populates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub name: SmolStr,
    pub shape: SmolStr,
    pub expr: Expr,
}

/// A declarative grammar: shapes, productions and an entry point
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grammar {
    shapes: Vec<Shape>,
    productions: Vec<Production>,
    entry: Option<SmolStr>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Add a production populating the shape of the same name
    ///
    /// If no shape with that name is declared, the production populates an
    /// empty shape and may not capture anything.
    pub fn production(self, name: impl Into<SmolStr>, expr: Expr) -> Self {
        let name = name.into();
        self.production_of(name.clone(), name, expr)
    }

    /// Add a production populating an explicitly named shape
    pub fn production_of(
        mut self,
        name: impl Into<SmolStr>,
        shape: impl Into<SmolStr>,
        expr: Expr,
    ) -> Self {
        self.productions.push(Production {
            name: name.into(),
            shape: shape.into(),
            expr,
        });
        self
    }

    /// Select the entry production; defaults to the first declared
    pub fn entry(mut self, name: impl Into<SmolStr>) -> Self {
        self.entry = Some(name.into());
        self
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn entry_name(&self) -> Option<&str> {
        self.entry
            .as_deref()
            .or_else(|| self.productions.first().map(|p| p.name.as_str()))
    }

    /// Compile this grammar into an executable parser
    pub fn build(&self, options: BuildOptions) -> Result<CompiledGrammar, CompileError> {
        compiler::compile(self, options)
    }
}
