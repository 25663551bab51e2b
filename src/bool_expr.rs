//! Human-oriented AND/OR trees.
//!
//! Downstream of solving, requirements are rendered as small expression
//! trees over named items. These trees are built fresh for each tooltip
//! request and discarded after rendering; they are never fed back into the
//! solver.

use itertools::Itertools;
use std::fmt;

/// Operators of a presentation tree
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Op {
    /// All children need to hold
    And,
    /// At least one child needs to hold
    Or,
}

/// A child of a presentation tree: a named leaf or a nested expression
#[derive(Clone, PartialEq, Debug)]
pub enum Term {
    Item(String),
    Expr(BooleanExpression),
}

/// An AND/OR tree over named items.
///
/// Unlike [LogicalExpression](crate::LogicalExpression), which is kept flat
/// for solving, this tree nests freely so shared sub-terms can be factored
/// out for readability.
#[derive(Clone, PartialEq, Debug)]
pub struct BooleanExpression {
    op: Op,
    terms: Vec<Term>,
}

impl Term {
    /// Number of leaves below this term
    pub fn count_leaves(&self) -> usize {
        match self {
            Term::Item(_) => 1,
            Term::Expr(e) => e.count_leaves(),
        }
    }

    pub fn item(text: impl Into<String>) -> Self {
        Term::Item(text.into())
    }
}

impl BooleanExpression {
    pub fn new(op: Op, terms: Vec<Term>) -> Self {
        Self { op, terms }
    }

    pub fn and(terms: Vec<Term>) -> Self {
        Self::new(Op::And, terms)
    }

    pub fn or(terms: Vec<Term>) -> Self {
        Self::new(Op::Or, terms)
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn into_terms(self) -> Vec<Term> {
        self.terms
    }

    pub fn count_leaves(&self) -> usize {
        self.terms.iter().map(Term::count_leaves).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Fold children with the same operator into this node.
    ///
    /// A singleton child expression is also unwrapped, whatever its operator:
    /// `and(or(X))` reads as `X`.
    pub fn flatten(self) -> Self {
        let op = self.op;
        let mut terms = Vec::with_capacity(self.terms.len());
        for term in self.terms {
            match term {
                Term::Expr(e) => {
                    let e = e.flatten();
                    if e.op == op || e.terms.len() == 1 {
                        terms.extend(e.terms);
                    } else {
                        terms.push(Term::Expr(e));
                    }
                }
                leaf => terms.push(leaf),
            }
        }
        Self { op, terms }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Op::And => write!(f, "&"),
            Op::Or => write!(f, "|"),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Item(text) => write!(f, "{}", text),
            Term::Expr(e) => write!(f, "({})", e),
        }
    }
}

impl fmt::Display for BooleanExpression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sep = format!(" {} ", self.op);
        write!(f, "{}", self.terms.iter().format(&sep))
    }
}
