//! Speculative interpreter over the compiled node graph
//!
//! Every node either succeeds, leaving its captures in the journal and the
//! stream advanced past what it matched, or fails, leaving both exactly as
//! they were on entry. That single rule is enforced in [`Interpreter::run`]
//! so individual node kinds only decide success or failure.

use smol_str::SmolStr;

use super::failure::{Failure, FailureKind, FailureTracker};
use super::input::Input;
use super::journal::Journal;
use crate::base::Span;
use crate::compiler::{
    CompiledGrammar, FieldId, GrammarNode, NodeId, ProductionId, Signature, literal_matches,
};
use crate::grammar::FieldType;
use crate::output::{Node, Value};
use crate::token::{Cursor, TokenStream};

/// Marker for a failed node; details live in the [`FailureTracker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Failed;

type Step = Result<(), Failed>;

pub(crate) struct Interpreter<'g, 's, S: TokenStream + ?Sized> {
    grammar: &'g CompiledGrammar,
    pub(crate) input: Input<'s, S>,
    journal: Journal,
    pub(crate) failures: FailureTracker,
    current: Option<ProductionId>,
}

impl<'g, 's, S: TokenStream + ?Sized> Interpreter<'g, 's, S> {
    pub(crate) fn new(grammar: &'g CompiledGrammar, stream: &'s mut S) -> Self {
        Self {
            grammar,
            input: Input::new(stream),
            journal: Journal::default(),
            failures: FailureTracker::default(),
            current: None,
        }
    }

    /// Match production `id` and assemble its output node
    pub(crate) fn production(&mut self, id: ProductionId) -> Result<Node, Failed> {
        let grammar = self.grammar;
        let production = grammar.production(id);
        let outer = self.current.replace(id);
        let mark = self.journal.mark();
        let log = self.input.consumed_len();
        let start = self.input.position();

        let result = self.run(production.root);
        self.current = outer;
        result?;

        let shape = grammar.shape(production.shape);
        let mut node = Node::for_fields(&shape.name, &shape.fields);
        for entry in self.journal.drain(mark) {
            if let Some(field) = entry.field {
                node.apply(shape.field(field), entry.value);
            }
        }
        let end = self.input.end_since(log).unwrap_or(start);
        node.span = Span::new(start, end);
        Ok(node)
    }

    /// Run one node, rolling back the stream and journal if it fails
    fn run(&mut self, id: NodeId) -> Step {
        let cursor = self.input.snapshot();
        let mark = self.journal.mark();
        let result = self.step(id);
        if result.is_err() {
            self.input.restore(cursor);
            self.journal.truncate(mark);
        }
        result
    }

    fn step(&mut self, id: NodeId) -> Step {
        let grammar = self.grammar;
        match grammar.node(id) {
            GrammarNode::Literal { text, kind } => {
                let matched = self.input.peek(0).is_some_and(|token| {
                    literal_matches(text, kind.as_deref(), token, &grammar.case_insensitive)
                });
                if matched {
                    self.input.next();
                    Ok(())
                } else {
                    self.fail_here([SmolStr::new(format!("{:?}", text.as_str()))])
                }
            }
            GrammarNode::Token { kind } => {
                if self.input.peek(0).is_some_and(|token| token.is(kind)) {
                    self.input.next();
                    Ok(())
                } else {
                    self.fail_here([SmolStr::new(format!("<{}>", kind))])
                }
            }
            GrammarNode::Reference(production) => {
                let node = self.production(*production)?;
                self.journal.push_anonymous(node.into());
                Ok(())
            }
            GrammarNode::Sequence(children) => {
                for child in children {
                    self.run(*child)?;
                }
                Ok(())
            }
            GrammarNode::Alternation {
                branches,
                signatures,
            } => self.alternation(branches, signatures),
            GrammarNode::Repetition { child, min } => self.repetition(*child, *min),
            GrammarNode::Optional(child) => {
                let _ = self.run(*child);
                Ok(())
            }
            GrammarNode::Group(child) => self.run(*child),
            GrammarNode::Capture { field, child } => self.capture(*field, *child),
            GrammarNode::CustomParse { shape } => {
                let cursor = self.input.snapshot();
                let position = self.input.position();
                let found = self.input.found(0);
                let Some(parse) = grammar.custom.get(shape) else {
                    let failure = Failure::mismatch(cursor, position, found)
                        .with_kind(FailureKind::Custom)
                        .with_message(format!(
                            "no parser registered for `{}`",
                            grammar.shape(*shape).name
                        ));
                    return self.fail(failure);
                };
                match parse(&mut self.input) {
                    Ok(value) => {
                        self.journal.push_anonymous(value);
                        Ok(())
                    }
                    Err(err) => {
                        self.input.restore(cursor);
                        let failure = Failure::mismatch(cursor, position, found)
                            .with_kind(FailureKind::Custom)
                            .with_message(err.message);
                        self.fail(failure)
                    }
                }
            }
            GrammarNode::Negation(child) => {
                if self.probe(*child) {
                    let failure = Failure::mismatch(
                        self.input.snapshot(),
                        self.input.position(),
                        self.input.found(0),
                    );
                    return self.fail(failure);
                }
                if self.input.next().is_some() {
                    Ok(())
                } else {
                    self.fail_here([SmolStr::new_static("any token")])
                }
            }
            GrammarNode::Lookahead { child, negative } => {
                if self.probe(*child) != *negative {
                    Ok(())
                } else {
                    let failure = Failure::mismatch(
                        self.input.snapshot(),
                        self.input.position(),
                        self.input.found(0),
                    )
                    .with_message(if *negative {
                        "negative lookahead matched"
                    } else {
                        "lookahead did not match"
                    });
                    self.fail(failure)
                }
            }
        }
    }

    fn alternation(&mut self, branches: &[NodeId], signatures: &[Signature]) -> Step {
        let grammar = self.grammar;
        for (index, branch) in branches.iter().enumerate() {
            if let Some(signature) = signatures.get(index) {
                if !signature.admits(&self.input, &grammar.case_insensitive) {
                    self.reject(signature);
                    tracing::trace!(branch = index, "alternation branch rejected by lookahead");
                    continue;
                }
            }
            if self.run(*branch).is_ok() {
                tracing::trace!(
                    production = %self.production_name().unwrap_or_default(),
                    branch = index,
                    "alternation branch committed"
                );
                return Ok(());
            }
            tracing::trace!(branch = index, "alternation branch rolled back");
        }
        Err(Failed)
    }

    /// Record why a lookahead signature turned a branch away
    fn reject(&mut self, signature: &Signature) {
        let (offset, expected) = signature.explain(&self.input, &self.grammar.case_insensitive);
        let position = match (self.input.peek(offset), offset) {
            (Some(token), _) => token.pos,
            (None, 0) => self.input.position(),
            (None, _) => self
                .input
                .peek(offset - 1)
                .map(|token| token.end())
                .unwrap_or_else(|| self.input.position()),
        };
        // The signature matched `offset` tokens before diverging
        let depth = Cursor::new(self.input.snapshot().index() + offset);
        let failure =
            Failure::mismatch(depth, position, self.input.found(offset)).expecting(expected);
        self.record(failure);
    }

    fn repetition(&mut self, child: NodeId, min: usize) -> Step {
        let mut count = 0;
        loop {
            let before = self.input.snapshot();
            if self.run(child).is_err() {
                break;
            }
            count += 1;
            // An iteration that consumed nothing would repeat forever
            if self.input.snapshot() == before {
                return Ok(());
            }
        }
        if count >= min { Ok(()) } else { Err(Failed) }
    }

    fn capture(&mut self, field_id: FieldId, child: NodeId) -> Step {
        let grammar = self.grammar;
        let Some(production) = self.current else {
            return Err(Failed);
        };
        let field = grammar.shape(grammar.production(production).shape).field(field_id);
        let mark = self.journal.mark();
        let log = self.input.consumed_len();
        let cursor = self.input.snapshot();
        let position = self.input.position();

        self.run(child)?;

        if let FieldType::Node(_) = field.ty {
            for value in self.journal.take_anonymous(mark) {
                self.journal.push_field(field_id, value);
            }
            return Ok(());
        }

        self.journal.take_anonymous(mark);
        let texts: Vec<SmolStr> = self
            .input
            .consumed_since(log)
            .map(|token| token.text.clone())
            .collect();
        let values: Vec<Value> = match (&field.ty, field.is_many()) {
            (FieldType::Bool, _) => vec![Value::Bool(true)],
            (FieldType::Text, true) => texts.into_iter().map(Value::Text).collect(),
            (FieldType::Text, false) if texts.is_empty() => Vec::new(),
            (FieldType::Text, false) => vec![Value::Text(concat(&texts))],
            (FieldType::Int, many) => {
                let pieces = if many {
                    texts
                } else if texts.is_empty() {
                    Vec::new()
                } else {
                    vec![concat(&texts)]
                };
                let mut ints = Vec::with_capacity(pieces.len());
                for piece in pieces {
                    match piece.parse::<i64>() {
                        Ok(value) => ints.push(Value::Int(value)),
                        Err(err) => {
                            let failure = Failure::mismatch(cursor, position, Some(piece.clone()))
                                .with_kind(FailureKind::Conversion)
                                .with_message(format!(
                                    "cannot capture {:?} into integer field `{}`: {}",
                                    piece.as_str(),
                                    field.name,
                                    err
                                ));
                            return self.fail(failure);
                        }
                    }
                }
                ints
            }
            (FieldType::Node(_), _) => Vec::new(),
        };
        for value in values {
            self.journal.push_field(field_id, value);
        }
        Ok(())
    }

    /// Whether `child` would match here, without consuming, capturing or
    /// leaving failures behind
    fn probe(&mut self, child: NodeId) -> bool {
        let cursor = self.input.snapshot();
        let mark = self.journal.mark();
        let failures = self.failures.clone();
        let matched = self.run(child).is_ok();
        self.input.restore(cursor);
        self.journal.truncate(mark);
        self.failures = failures;
        matched
    }

    fn production_name(&self) -> Option<SmolStr> {
        self.current
            .map(|id| self.grammar.production(id).name.clone())
    }

    fn record(&mut self, failure: Failure) {
        let failure = failure.in_production(self.production_name());
        self.failures.record(failure);
    }

    fn fail(&mut self, failure: Failure) -> Step {
        self.record(failure);
        Err(Failed)
    }

    /// Mismatch at the next token
    fn fail_here<const N: usize>(&mut self, expected: [SmolStr; N]) -> Step {
        let failure = Failure::mismatch(
            self.input.snapshot(),
            self.input.position(),
            self.input.found(0),
        )
        .expecting(expected);
        self.fail(failure)
    }
}

fn concat(texts: &[SmolStr]) -> SmolStr {
    SmolStr::from_iter(texts.iter().map(SmolStr::as_str))
}
