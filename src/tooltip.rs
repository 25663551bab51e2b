//! Tooltip trees and their pre-simplified computation context.
//!
//! Simplifying a requirement for display is much more expensive than the
//! interactive reachability pass, so it runs against a [TooltipComputer]: a
//! context holding its own copy of the compiled table, pre-simplified once
//! when the settings snapshot changes, then queried cheaply per check. The
//! context is exclusively owned; replacing a snapshot means building a fresh
//! one (see [worker](crate::worker) for the message-based wrapper).

use crate::bool_expr::{BooleanExpression, Op, Term};
use crate::*;

use std::collections::HashMap;
use std::time::Instant;

pub const SENTINEL_NOTHING: &str = "Nothing";
pub const SENTINEL_IMPOSSIBLE: &str = "Impossible (discover an entrance first)";

/// A leaf or nested expression of a rendered tooltip
#[derive(Clone, PartialEq, Debug)]
pub enum TooltipTerm {
    Item {
        text: String,
        state: LogicalState,
    },
    Expr(TooltipExpression),
}

/// A readable requirement tree with per-leaf logical states.
///
/// The root is always an `and` node: callers rely on the uniform shape, so a
/// natural OR result is wrapped into a singleton AND by [simplify].
#[derive(Clone, PartialEq, Debug)]
pub struct TooltipExpression {
    op: Op,
    terms: Vec<TooltipTerm>,
}

impl TooltipTerm {
    /// Leaves sort before compound terms, compound terms by leaf count
    fn length(&self) -> isize {
        match self {
            TooltipTerm::Item { .. } => -1,
            TooltipTerm::Expr(e) => e.count_leaves() as isize,
        }
    }

    fn name(&self) -> &str {
        match self {
            TooltipTerm::Item { text, .. } => text,
            TooltipTerm::Expr(_) => "",
        }
    }
}

impl TooltipExpression {
    pub fn op(&self) -> Op {
        self.op
    }

    pub fn terms(&self) -> &[TooltipTerm] {
        &self.terms
    }

    pub fn count_leaves(&self) -> usize {
        self.terms
            .iter()
            .map(|t| match t {
                TooltipTerm::Item { .. } => 1,
                TooltipTerm::Expr(e) => e.count_leaves(),
            })
            .sum()
    }

    fn sentinel(text: &str, state: LogicalState) -> Self {
        Self {
            op: Op::And,
            terms: vec![TooltipTerm::Item {
                text: text.to_string(),
                state,
            }],
        }
    }
}

/// Simplify a per-check DNF into its display tree.
///
/// The full pipeline of one tooltip query: dominance elimination and
/// factoring ([dnf_to_expr]), then display conversion ([to_tooltip_expr]).
pub fn simplify<F>(
    space: &LogicSpace,
    conjunctions: &[BitVector],
    classifier: &F,
) -> Result<TooltipExpression, TrackError>
where
    F: Fn(&str) -> LogicalState,
{
    let expr = dnf_to_expr(space, conjunctions)?;
    Ok(to_tooltip_expr(space, &expr, classifier))
}

/// Convert a simplified tree into its display form.
///
/// Leaves are resolved through the space's pretty-name tables and colored by
/// the classifier (which receives raw identifiers). Children are sorted by
/// size then name so the output is deterministic for identical logical
/// content. Degenerate results collapse to a sentinel leaf: an empty AND is
/// trivially satisfied ("Nothing"), an empty OR has no alternative at all.
pub fn to_tooltip_expr<F>(
    space: &LogicSpace,
    expr: &BooleanExpression,
    classifier: &F,
) -> TooltipExpression
where
    F: Fn(&str) -> LogicalState,
{
    let converted = convert(space, expr, classifier);
    if converted.terms.is_empty() {
        return match converted.op {
            Op::And => TooltipExpression::sentinel(SENTINEL_NOTHING, LogicalState::InLogic),
            Op::Or => TooltipExpression::sentinel(SENTINEL_IMPOSSIBLE, LogicalState::OutLogic),
        };
    }
    match converted.op {
        Op::And => converted,
        Op::Or => TooltipExpression {
            op: Op::And,
            terms: vec![TooltipTerm::Expr(converted)],
        },
    }
}

fn convert<F>(space: &LogicSpace, expr: &BooleanExpression, classifier: &F) -> TooltipExpression
where
    F: Fn(&str) -> LogicalState,
{
    let mut terms: Vec<TooltipTerm> = expr
        .terms()
        .iter()
        .map(|term| match term {
            Term::Item(raw) => TooltipTerm::Item {
                text: space.readable_name(raw),
                state: classifier(raw),
            },
            Term::Expr(e) => TooltipTerm::Expr(convert(space, e, classifier)),
        })
        .collect();
    terms.sort_by(|a, b| {
        a.length()
            .cmp(&b.length())
            .then_with(|| a.name().cmp(b.name()))
    });
    TooltipExpression {
        op: expr.op(),
        terms,
    }
}

/// Pre-simplified requirement snapshot serving per-check tooltip queries.
///
/// Construction runs the expensive one-time pipeline: duplicate removal and
/// shallow simplification to their fixed point, then the bottom-up
/// propagation that makes every requirement self-contained. Individual
/// queries then only pay for their own dominance elimination and factoring,
/// and results are cached per bit.
pub struct TooltipComputer {
    space: LogicSpace,
    requirements: Vec<LogicalExpression>,
    analyzed: HashMap<usize, BooleanExpression>,
}

impl TooltipComputer {
    pub fn new(space: LogicSpace, opaque_bits: BitVector, requirements: Requirements) -> Self {
        let start = Instant::now();
        let mut exprs = requirements.into_exprs();
        unify_requirements(&opaque_bits, &mut exprs);
        log::debug!("tooltip pre-simplification took {:?}", start.elapsed());

        let start = Instant::now();
        bottom_up_tooltip_propagation(&opaque_bits, &mut exprs);
        log::debug!("tooltip fixpoint propagation took {:?}", start.elapsed());

        Self {
            space,
            requirements: exprs,
            analyzed: HashMap::new(),
        }
    }

    pub fn space(&self) -> &LogicSpace {
        &self.space
    }

    /// Build (or fetch) the simplified structural tree for a check bit
    pub fn analyze_bit(&mut self, bit: usize) -> Result<&BooleanExpression, TrackError> {
        if bit >= self.requirements.len() {
            return Err(TrackError::UnknownBit(bit));
        }
        if !self.analyzed.contains_key(&bit) {
            let start = Instant::now();
            let deduped = self.requirements[bit].remove_duplicates();
            let expr = dnf_to_expr(&self.space, deduped.conjunctions())?;
            log::debug!("simplifying bit {} took {:?}", bit, start.elapsed());
            self.analyzed.insert(bit, expr);
        }
        Ok(&self.analyzed[&bit])
    }

    /// Build (or fetch) the simplified structural tree for a check identifier
    pub fn analyze_check(&mut self, check_id: &str) -> Result<&BooleanExpression, TrackError> {
        let bit = self.space.bit(check_id)?;
        self.analyze_bit(bit)
    }

    /// Analyze a check by identifier and render its display tree
    pub fn analyze<F>(
        &mut self,
        check_id: &str,
        classifier: &F,
    ) -> Result<TooltipExpression, TrackError>
    where
        F: Fn(&str) -> LogicalState,
    {
        let bit = self.space.bit(check_id)?;
        let expr = self.analyze_bit(bit)?.clone();
        Ok(to_tooltip_expr(&self.space, &expr, classifier))
    }
}

#[cfg(test)]
mod tests {
    use crate::bool_expr::*;
    use crate::tooltip::*;
    use crate::*;
    use std::iter::FromIterator;

    fn in_logic(_: &str) -> LogicalState {
        LogicalState::InLogic
    }

    #[test]
    fn root_is_always_an_and() {
        let mut space = LogicSpace::default();
        space.add("Slingshot");
        space.add("Beetle");

        // a natural OR gets wrapped into a singleton AND
        let or_expr = BooleanExpression::or(vec![Term::item("Slingshot"), Term::item("Beetle")]);
        let tip = to_tooltip_expr(&space, &or_expr, &in_logic);
        assert_eq!(tip.op(), Op::And);
        assert_eq!(tip.terms().len(), 1);
        assert!(matches!(tip.terms()[0], TooltipTerm::Expr(_)));
    }

    #[test]
    fn duplicate_singletons_render_one_leaf() {
        let mut space = LogicSpace::default();
        let sword = space.add("Sword");

        let conjs = vec![BitVector::from_iter([sword]), BitVector::from_iter([sword])];
        let tip = simplify(&space, &conjs, &in_logic).unwrap();

        assert_eq!(tip.op(), Op::And);
        assert_eq!(
            tip.terms(),
            &[TooltipTerm::Item {
                text: "Sword".to_string(),
                state: LogicalState::InLogic,
            }]
        );
    }

    #[test]
    fn sentinels() {
        let space = LogicSpace::default();

        let nothing = to_tooltip_expr(&space, &BooleanExpression::and(Vec::new()), &in_logic);
        assert_eq!(
            nothing.terms(),
            &[TooltipTerm::Item {
                text: SENTINEL_NOTHING.to_string(),
                state: LogicalState::InLogic,
            }]
        );

        let impossible = to_tooltip_expr(&space, &BooleanExpression::or(Vec::new()), &in_logic);
        assert_eq!(
            impossible.terms(),
            &[TooltipTerm::Item {
                text: SENTINEL_IMPOSSIBLE.to_string(),
                state: LogicalState::OutLogic,
            }]
        );
    }

    #[test]
    fn children_are_sorted_leaves_first() {
        let mut space = LogicSpace::default();
        for id in ["Whip", "Beetle", "Bomb Bag", "Clawshots"] {
            space.add(id);
        }
        let expr = BooleanExpression::and(vec![
            Term::Expr(BooleanExpression::or(vec![
                Term::item("Bomb Bag"),
                Term::item("Clawshots"),
            ])),
            Term::item("Whip"),
            Term::item("Beetle"),
        ]);
        let tip = to_tooltip_expr(&space, &expr, &in_logic);

        let names: Vec<&str> = tip.terms().iter().map(|t| t.name()).collect();
        // leaves first (alphabetical), compound terms last
        assert_eq!(names, vec!["Beetle", "Whip", ""]);
    }

    #[test]
    fn analyze_end_to_end() -> Result<(), TrackError> {
        let mut space = LogicSpace::default();
        let table = compile_requirements(
            &mut space,
            &[
                ("Deep Woods", "Faron Woods & (Slingshot | Beetle)"),
                ("Faron Woods", "Practice Sword"),
            ],
        )?;

        // items are opaque atoms, area bits get substituted away
        let mut opaque = BitVector::new();
        for id in ["Practice Sword", "Slingshot", "Beetle"] {
            opaque.set_bit(space.bit(id)?);
        }

        let mut computer = TooltipComputer::new(space, opaque, table);
        let tip = computer.analyze("Deep Woods", &in_logic)?;

        assert_eq!(tip.op(), Op::And);
        // Practice Sword was hoisted out of both alternatives
        let names: Vec<&str> = tip.terms().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Practice Sword", ""]);

        // querying twice hits the cache and stays identical
        let again = computer.analyze("Deep Woods", &in_logic)?;
        assert_eq!(tip, again);
        Ok(())
    }

    #[test]
    fn analyze_unknown_check_fails() {
        let space = LogicSpace::default();
        let mut computer =
            TooltipComputer::new(space, BitVector::new(), Requirements::with_bits(0));
        assert!(matches!(
            computer.analyze("Temple of Time", &in_logic),
            Err(TrackError::UnknownCheck(_))
        ));
    }
}
