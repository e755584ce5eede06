//! EBNF rendering of a compiled grammar
//!
//! One line per production, `Name = expr .`, using the notation:
//!
//! | Node                | Rendering          |
//! |---------------------|--------------------|
//! | literal             | `"+"`, `"+":Punct` |
//! | any token of a kind | `<Int>`            |
//! | zero or more        | `{ x }`            |
//! | one or more         | `( x )+`           |
//! | at least n          | `( x ){n,}`        |
//! | optional            | `[ x ]`            |
//! | capture             | `@field=x`         |
//! | custom parser       | `<custom Shape>`   |
//! | negation            | `!x`               |
//! | lookahead           | `(?= x )`, `(?! x )` |

use std::fmt::{self, Display, Formatter};

use super::node::{CompiledGrammar, GrammarNode, NodeId, ShapeId};

/// Binding strength, loosest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Alternation,
    Sequence,
    Atom,
}

impl CompiledGrammar {
    fn fmt_node(&self, f: &mut Formatter<'_>, id: NodeId, shape: ShapeId, outer: Prec) -> fmt::Result {
        let node = self.node(id);
        let prec = match node {
            GrammarNode::Alternation { .. } => Prec::Alternation,
            GrammarNode::Sequence(children) if children.len() > 1 => Prec::Sequence,
            _ => Prec::Atom,
        };
        if prec < outer {
            write!(f, "( ")?;
            self.fmt_bare(f, id, shape)?;
            return write!(f, " )");
        }
        self.fmt_bare(f, id, shape)
    }

    fn fmt_bare(&self, f: &mut Formatter<'_>, id: NodeId, shape: ShapeId) -> fmt::Result {
        match self.node(id) {
            GrammarNode::Literal { text, kind } => {
                write!(f, "{:?}", text.as_str())?;
                if let Some(kind) = kind {
                    write!(f, ":{}", kind)?;
                }
                Ok(())
            }
            GrammarNode::Token { kind } => write!(f, "<{}>", kind),
            GrammarNode::Reference(p) => write!(f, "{}", self.production(*p).name),
            GrammarNode::Sequence(children) => match children.as_slice() {
                [] => write!(f, "( )"),
                [only] => self.fmt_node(f, *only, shape, Prec::Atom),
                _ => {
                    for (i, child) in children.iter().enumerate() {
                        if i > 0 {
                            write!(f, " ")?;
                        }
                        self.fmt_node(f, *child, shape, Prec::Atom)?;
                    }
                    Ok(())
                }
            },
            GrammarNode::Alternation { branches, .. } => {
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    self.fmt_node(f, *branch, shape, Prec::Sequence)?;
                }
                Ok(())
            }
            GrammarNode::Repetition { child, min } => {
                let open = if *min == 0 { "{ " } else { "( " };
                write!(f, "{}", open)?;
                self.fmt_node(f, *child, shape, Prec::Alternation)?;
                match min {
                    0 => write!(f, " }}"),
                    1 => write!(f, " )+"),
                    n => write!(f, " ){{{},}}", n),
                }
            }
            GrammarNode::Optional(child) => {
                write!(f, "[ ")?;
                self.fmt_node(f, *child, shape, Prec::Alternation)?;
                write!(f, " ]")
            }
            GrammarNode::Group(child) => {
                write!(f, "( ")?;
                self.fmt_node(f, *child, shape, Prec::Alternation)?;
                write!(f, " )")
            }
            GrammarNode::Capture { field, child } => {
                write!(f, "@{}=", self.shape(shape).field(*field).name)?;
                self.fmt_node(f, *child, shape, Prec::Atom)
            }
            GrammarNode::CustomParse { shape } => {
                write!(f, "<custom {}>", self.shape(*shape).name)
            }
            GrammarNode::Negation(child) => {
                write!(f, "!")?;
                self.fmt_node(f, *child, shape, Prec::Atom)
            }
            GrammarNode::Lookahead { child, negative } => {
                write!(f, "{}", if *negative { "(?! " } else { "(?= " })?;
                self.fmt_node(f, *child, shape, Prec::Alternation)?;
                write!(f, " )")
            }
        }
    }
}

impl Display for CompiledGrammar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, production) in self.productions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} = ", production.name)?;
            self.fmt_node(f, production.root, production.shape, Prec::Alternation)?;
            write!(f, " .")?;
        }
        Ok(())
    }
}
