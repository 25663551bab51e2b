//! Requirement tables and the reachability fixed point.
//!
//! A [Requirements] table maps every bit of the index space to the
//! [LogicalExpression] that must be satisfied for the bit to become true.
//! Tables from several sources (the immutable compiled rules, settings
//! overrides, inventory state, completed checks) are merged with
//! [merge_requirements] and fed to [compute_least_fixed_point], which derives
//! the set of currently reachable bits by forward chaining.
//!
//! The remaining functions are pre-solve rewrites used by the tooltip
//! pipeline: they shrink the table before any per-check query so that each
//! query only pays for its own simplification.

use crate::*;

use std::collections::HashMap;
use std::iter::FromIterator;
use std::time::Instant;

/// A dense requirement table over the bit index space.
///
/// The expression at index `i` describes what must already be reachable for
/// bit `i` to become reachable. Bits without a rule default to the impossible
/// expression, so an uncompiled bit can only enter the reachability set
/// through the seed.
#[derive(Clone, Default, Debug)]
pub struct Requirements {
    exprs: Vec<LogicalExpression>,
}

/// Sparse per-bit overrides derived from mutable state (settings, inventory,
/// completed checks). Merging never mutates the table it extends.
pub type RequirementsOverlay = HashMap<usize, LogicalExpression>;

impl Requirements {
    /// Create a table where every bit is impossible
    pub fn with_bits(num_bits: usize) -> Self {
        Self {
            exprs: vec![LogicalExpression::nothing(); num_bits],
        }
    }

    pub fn from_exprs(exprs: Vec<LogicalExpression>) -> Self {
        Self { exprs }
    }

    /// Number of bits in the index space
    pub fn num_bits(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Get the requirement for a bit, or an error for an out-of-space bit
    pub fn get(&self, bit: usize) -> Result<&LogicalExpression, TrackError> {
        self.exprs.get(bit).ok_or(TrackError::UnknownBit(bit))
    }

    /// Replace the requirement of a single bit
    pub fn set(&mut self, bit: usize, expr: LogicalExpression) {
        self.exprs[bit] = expr;
    }

    pub fn as_slice(&self) -> &[LogicalExpression] {
        &self.exprs
    }

    pub fn as_mut_slice(&mut self) -> &mut [LogicalExpression] {
        &mut self.exprs
    }

    pub fn into_exprs(self) -> Vec<LogicalExpression> {
        self.exprs
    }
}

/// Combine a static table with state-derived overlays.
///
/// Each overlay contributes additional alternatives for its bits: conjunction
/// lists are concatenated (a logical OR), so a dynamic rule can only widen
/// what the static rules allow and the static table itself stays untouched.
pub fn merge_requirements(
    statics: &Requirements,
    overlays: &[&RequirementsOverlay],
) -> Requirements {
    let mut merged = statics.clone();
    for overlay in overlays {
        for (&bit, expr) in overlay.iter() {
            if bit < merged.exprs.len() {
                merged.exprs[bit].or_expr(expr);
            }
        }
    }
    merged
}

/// Compute the unique least fixed point of a requirement table.
///
/// Starting from the seed (empty by default), repeatedly add every bit whose
/// requirement has a fully satisfied conjunction, until a pass adds nothing.
/// The result only ever grows, so termination is guaranteed by the finite
/// index space. Two conventional labels are used by trackers: "Logical state"
/// (seed = currently true facts) and "Optimistic state" (seed additionally
/// holds every obtainable item at max count).
///
/// ```
/// use reachkit::{compute_least_fixed_point, BitVector, LogicalExpression, Requirements};
/// use std::iter::FromIterator;
///
/// // bit 2 needs bits 0 and 1; bit 3 needs bit 2
/// let mut table = Requirements::with_bits(4);
/// table.set(2, LogicalExpression::from(BitVector::from_iter([0, 1])));
/// table.set(3, LogicalExpression::single_bit(2));
///
/// let seed = BitVector::from_iter([0, 1]);
/// let reach = compute_least_fixed_point("Logical state", &table, Some(&seed));
/// assert_eq!(reach, BitVector::from_iter([0, 1, 2, 3]));
/// ```
pub fn compute_least_fixed_point(
    label: &str,
    requirements: &Requirements,
    seed: Option<&BitVector>,
) -> BitVector {
    let start = Instant::now();
    let mut reach = seed.cloned().unwrap_or_default();
    let mut pending: Vec<usize> = (0..requirements.num_bits())
        .filter(|&bit| !reach.test(bit))
        .collect();

    let mut passes = 0;
    loop {
        passes += 1;
        let before = reach.len();
        pending.retain(|&bit| {
            if requirements.exprs[bit].eval(&reach) {
                reach.set_bit(bit);
                false
            } else {
                true
            }
        });
        let after = reach.len();
        debug_assert!(after >= before, "a fixpoint pass must never remove bits");
        if after == before {
            break;
        }
    }

    log::debug!(
        "{}: fixed point after {} passes, {} of {} bits reachable ({:?})",
        label,
        passes,
        reach.len(),
        requirements.num_bits(),
        start.elapsed(),
    );
    reach
}

/// Collapse duplicated conjunctions in every expression of the table
pub fn remove_duplicates(requirements: &mut [LogicalExpression]) {
    for expr in requirements.iter_mut() {
        if expr.len() > 1 {
            let deduped = expr.remove_duplicates();
            if deduped.len() < expr.len() {
                *expr = deduped;
            }
        }
    }
}

/// One cheap rewriting pass against trivially decided requirements.
///
/// Opaque bits are the atoms of the tooltip pipeline: their truth is fixed
/// for the lifetime of a computation pass and their requirements are never
/// inspected. For any other referenced bit, a trivially true requirement
/// removes the reference from its conjunction, while a trivially false one
/// removes the whole conjunction. Returns whether anything changed.
pub fn shallow_simplify(opaque: &BitVector, requirements: &mut [LogicalExpression]) -> bool {
    let mut changed = false;
    for bit in 0..requirements.len() {
        if opaque.test(bit) {
            continue;
        }
        let rewritten = shallow_simplify_expr(opaque, requirements, bit);
        if let Some(expr) = rewritten {
            requirements[bit] = expr;
            changed = true;
        }
    }
    changed
}

fn shallow_simplify_expr(
    opaque: &BitVector,
    requirements: &[LogicalExpression],
    bit: usize,
) -> Option<LogicalExpression> {
    let expr = &requirements[bit];
    let mut touched = false;
    let mut result = LogicalExpression::nothing();
    'conj: for conj in expr {
        let mut kept = BitVector::new();
        for b in conj {
            if opaque.test(b) || b == bit {
                kept.set_bit(b);
                continue;
            }
            if requirements[b].is_trivially_false() {
                touched = true;
                continue 'conj;
            }
            if requirements[b].is_trivially_true() {
                touched = true;
                continue;
            }
            kept.set_bit(b);
        }
        result.or_conjunction(kept);
    }
    touched.then(|| result)
}

/// Reduce the table to the fixed point of the cheap simplifications.
///
/// Alternates [remove_duplicates] and [shallow_simplify] until neither pass
/// reduces anything. This is a fixed point of the *simplification*, distinct
/// from the reachability fixed point.
pub fn unify_requirements(opaque: &BitVector, requirements: &mut [LogicalExpression]) {
    remove_duplicates(requirements);
    while shallow_simplify(opaque, requirements) {
        remove_duplicates(requirements);
    }
}

/// Substitute resolved sub-requirements into their dependents, bottom-up.
///
/// A bit is "learned" once its requirement only references opaque bits; its
/// expression is then inlined wherever the bit appears, which may make
/// further bits learnable. The pass stops when no new bit can be learned:
/// cyclic parts of the graph keep their symbolic references. The result is a
/// self-contained per-bit DNF usable for tooltip simplification without
/// re-walking the whole table on every query.
pub fn bottom_up_tooltip_propagation(opaque: &BitVector, requirements: &mut [LogicalExpression]) {
    let start = Instant::now();
    let num_bits = requirements.len();
    let mut learned = BitVector::new();

    loop {
        let mut newly_learned: Vec<usize> = Vec::new();
        for bit in 0..num_bits {
            if opaque.test(bit) || learned.test(bit) {
                continue;
            }
            let resolved = requirements[bit]
                .iter()
                .all(|conj| conj.iter().all(|b| opaque.test(b)));
            if resolved {
                newly_learned.push(bit);
            }
        }
        if newly_learned.is_empty() {
            break;
        }

        for &bit in &newly_learned {
            learned.set_bit(bit);
            let replacement = requirements[bit].clone();
            for target in 0..num_bits {
                if target == bit || opaque.test(target) {
                    continue;
                }
                if requirements[target].iter().any(|conj| conj.test(bit)) {
                    requirements[target] = substitute(&requirements[target], bit, &replacement);
                }
            }
        }
        // substituted-in expressions may now shrink again
        unify_requirements(&opaque.union(&learned), requirements);
    }

    log::debug!(
        "bottom-up propagation learned {} of {} bits ({:?})",
        learned.len(),
        num_bits,
        start.elapsed(),
    );
}

/// Replace every occurrence of a bit by the given DNF expression
fn substitute(
    expr: &LogicalExpression,
    bit: usize,
    replacement: &LogicalExpression,
) -> LogicalExpression {
    let mut result = LogicalExpression::nothing();
    for conj in expr {
        if !conj.test(bit) {
            result.or_conjunction(conj.clone());
            continue;
        }
        let rest: BitVector = conj.iter().filter(|&b| b != bit).collect();
        for alternative in replacement {
            result.or_conjunction(rest.union(alternative));
        }
    }
    result.remove_duplicates()
}

#[cfg(test)]
mod tests {
    use crate::*;
    use std::collections::HashMap;
    use std::iter::FromIterator;

    const A: usize = 0;
    const B: usize = 1;
    const C: usize = 2;
    const X: usize = 3;
    const Y: usize = 4;

    /// { X: [[A, B]], Y: [[X], [C]] }
    fn sample_table() -> Requirements {
        let mut table = Requirements::with_bits(5);
        table.set(X, LogicalExpression::from(BitVector::from_iter([A, B])));
        table.set(
            Y,
            LogicalExpression::single_bit(X) | LogicalExpression::single_bit(C),
        );
        table
    }

    #[test]
    fn full_seed_reaches_everything() {
        let seed = BitVector::from_iter([A, B, C]);
        let reach = compute_least_fixed_point("test", &sample_table(), Some(&seed));
        assert_eq!(reach, BitVector::from_iter([A, B, C, X, Y]));
    }

    #[test]
    fn partial_seed_takes_the_alternative() {
        let seed = BitVector::from_iter([C]);
        let reach = compute_least_fixed_point("test", &sample_table(), Some(&seed));
        // X never becomes true without A and B; Y is satisfied via C
        assert_eq!(reach, BitVector::from_iter([C, Y]));
    }

    #[test]
    fn result_contains_seed_and_monotone_in_seed() {
        let table = sample_table();
        let seed = BitVector::from_iter([C]);
        let reach = compute_least_fixed_point("test", &table, Some(&seed));
        assert!(reach.is_superset_of(&seed));

        let larger_seed = BitVector::from_iter([C, A]);
        let larger = compute_least_fixed_point("test", &table, Some(&larger_seed));
        assert!(larger.is_superset_of(&reach));
    }

    #[test]
    fn fixpoint_is_idempotent() {
        let table = sample_table();
        let seed = BitVector::from_iter([A, B]);
        let reach = compute_least_fixed_point("test", &table, Some(&seed));
        let again = compute_least_fixed_point("test", &table, Some(&reach));
        assert_eq!(reach, again);
    }

    #[test]
    fn empty_seed_defaults() {
        let reach = compute_least_fixed_point("test", &sample_table(), None);
        assert!(reach.is_empty());
    }

    #[test]
    fn merge_widens_without_mutating_statics() {
        let statics = sample_table();
        let mut overlay = RequirementsOverlay::new();
        overlay.insert(X, LogicalExpression::trivially_true());

        let merged = merge_requirements(&statics, &[&overlay]);
        let reach = compute_least_fixed_point("test", &merged, None);
        assert!(reach.test(X));
        assert!(reach.test(Y));

        // the static table is unchanged
        assert!(statics.get(X).unwrap().len() == 1);
        assert!(compute_least_fixed_point("test", &statics, None).is_empty());
    }

    #[test]
    fn merge_ignores_out_of_space_bits() {
        let statics = Requirements::with_bits(2);
        let mut overlay = HashMap::new();
        overlay.insert(17, LogicalExpression::trivially_true());
        let merged = merge_requirements(&statics, &[&overlay]);
        assert_eq!(merged.num_bits(), 2);
    }

    #[test]
    fn shallow_simplify_drops_decided_references() {
        // bit 2 is opaque; bit 1 is trivially true; bit 0 is impossible
        let opaque = BitVector::from_iter([2]);
        let mut reqs = vec![
            LogicalExpression::nothing(),
            LogicalExpression::trivially_true(),
            LogicalExpression::nothing(),
            // bit 3: (0 & 2) | (1 & 2)
            LogicalExpression::from_iter([
                BitVector::from_iter([0, 2]),
                BitVector::from_iter([1, 2]),
            ]),
        ];

        assert!(shallow_simplify(&opaque, &mut reqs));
        // the conjunction through bit 0 is gone, bit 1 is collapsed away
        assert_eq!(reqs[3], LogicalExpression::single_bit(2));
        assert!(!shallow_simplify(&opaque, &mut reqs));
    }

    #[test]
    fn unify_reaches_a_simplification_fixpoint() {
        let opaque = BitVector::from_iter([0]);
        let mut reqs = vec![
            LogicalExpression::nothing(),
            LogicalExpression::trivially_true(),
            // (0 & 1) | (0 & 1): duplicate, then bit 1 collapses away
            LogicalExpression::from_iter([
                BitVector::from_iter([0, 1]),
                BitVector::from_iter([0, 1]),
            ]),
        ];
        unify_requirements(&opaque, &mut reqs);
        assert_eq!(reqs[2], LogicalExpression::single_bit(0));
    }

    #[test]
    fn bottom_up_substitutes_chains() {
        // opaque: 0, 1; bit 2 = 0 & 1; bit 3 = 2 | 1
        let opaque = BitVector::from_iter([0, 1]);
        let mut reqs = vec![
            LogicalExpression::nothing(),
            LogicalExpression::nothing(),
            LogicalExpression::from(BitVector::from_iter([0, 1])),
            LogicalExpression::single_bit(2) | LogicalExpression::single_bit(1),
        ];
        bottom_up_tooltip_propagation(&opaque, &mut reqs);

        // bit 3 is now self-contained: (0 & 1) | 1, which the simplifier can
        // later reduce; no reference to bit 2 remains
        assert!(reqs[3].iter().all(|conj| !conj.test(2)));
        assert!(reqs[3].eval(&BitVector::from_iter([1])));
    }

    #[test]
    fn bottom_up_leaves_cycles_symbolic() {
        // bits 1 and 2 require each other, both also reachable via opaque 0
        let opaque = BitVector::from_iter([0]);
        let mut reqs = vec![
            LogicalExpression::nothing(),
            LogicalExpression::single_bit(2) | LogicalExpression::single_bit(0),
            LogicalExpression::single_bit(1) | LogicalExpression::single_bit(0),
        ];
        bottom_up_tooltip_propagation(&opaque, &mut reqs);

        // the cyclic references survive, nothing was lost
        assert!(reqs[1].eval(&BitVector::from_iter([0])));
        assert!(reqs[2].eval(&BitVector::from_iter([0])));
    }
}
