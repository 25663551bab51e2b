//! Turn a per-check DNF back into a compact, readable tree.
//!
//! The solver's flat conjunction lists are too noisy to show to a player:
//! alternatives that are strictly harder than another alternative add
//! nothing, and items shared by every alternative deserve to be written
//! once. This module performs that structural cleanup; display names,
//! logical-state coloring and the uniform root shape are layered on top in
//! [tooltip](crate::tooltip).

use crate::bool_expr::{BooleanExpression, Term};
use crate::*;

/// Drop dominated conjunctions.
///
/// If conjunction `a` is a superset of conjunction `b`, then `a` is strictly
/// harder to satisfy and offers no additional alternative: any reachability
/// set satisfying `a` already satisfies `b`. Equal conjunctions keep their
/// first occurrence. This is a subset test on bit sets, not a numeric
/// comparison.
pub fn remove_dominated(conjunctions: &[BitVector]) -> Vec<BitVector> {
    let mut kept: Vec<BitVector> = Vec::new();
    for conj in conjunctions {
        if kept.iter().any(|k| conj.is_superset_of(k)) {
            continue;
        }
        kept.retain(|k| !k.is_superset_of(conj));
        kept.push(conj.clone());
    }
    kept
}

/// Bits present in every conjunction (empty when there is none)
fn shared_bits(conjunctions: &[BitVector]) -> Vec<usize> {
    match conjunctions.split_first() {
        None => Vec::new(),
        Some((first, rest)) => first
            .iter()
            .filter(|&bit| rest.iter().all(|c| c.test(bit)))
            .collect(),
    }
}

/// Build the readable tree for a per-check DNF.
///
/// Dominated alternatives are dropped first; bits appearing in every
/// remaining alternative are hoisted outside the OR as a shared AND prefix.
/// Leaves carry the raw identifiers from the space; an unknown bit is a
/// fatal lookup error. Degenerate inputs keep their logical meaning: no
/// conjunction at all yields an empty OR (impossible), a lone empty
/// conjunction yields an empty AND (trivially satisfied).
pub fn dnf_to_expr(
    space: &LogicSpace,
    conjunctions: &[BitVector],
) -> Result<BooleanExpression, TrackError> {
    let kept = remove_dominated(conjunctions);
    if kept.is_empty() {
        return Ok(BooleanExpression::or(Vec::new()));
    }

    if let [only] = kept.as_slice() {
        return Ok(BooleanExpression::and(leaves(space, only.iter())?));
    }

    let shared = shared_bits(&kept);
    let mut branches = Vec::with_capacity(kept.len());
    for conj in &kept {
        let remainder: Vec<usize> = conj.iter().filter(|b| !shared.contains(b)).collect();
        let mut items = leaves(space, remainder.into_iter())?;
        match items.len() {
            1 => branches.push(items.pop().unwrap()),
            _ => branches.push(Term::Expr(BooleanExpression::and(items))),
        }
    }
    let alternatives = BooleanExpression::or(branches);

    if shared.is_empty() {
        return Ok(alternatives);
    }
    let mut terms = leaves(space, shared.into_iter())?;
    terms.push(Term::Expr(alternatives));
    Ok(BooleanExpression::and(terms).flatten())
}

fn leaves(
    space: &LogicSpace,
    bits: impl Iterator<Item = usize>,
) -> Result<Vec<Term>, TrackError> {
    bits.map(|bit| Ok(Term::item(space.id(bit)?)))
        .collect()
}
