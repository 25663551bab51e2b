//! Requirements in disjunctive normal form

use crate::*;

use core::ops::{BitAnd, BitOr};
use itertools::Itertools;
use std::fmt;
use std::iter::FromIterator;
use std::slice::Iter;

/// A requirement represented as a disjunction of conjunctions.
///
/// Each conjunction is a [BitVector]: it is satisfied when every bit it names
/// is already present in the current reachability set. The expression as a
/// whole is satisfied when at least one of its conjunctions is.
///
/// Two special forms exist: an expression with no conjunction at all is
/// impossible (never satisfied), while an expression holding a single empty
/// conjunction is trivially true.
///
/// The conjunction list may hold duplicated or dominated (superset) entries
/// during intermediate computations; [LogicalExpression::remove_duplicates]
/// and the simplification passes in [bitlogic](crate::bitlogic) reduce them.
///
/// ```
/// use reachkit::{BitVector, LogicalExpression};
/// use std::iter::FromIterator;
///
/// // (0 & 1) | 2
/// let expr = LogicalExpression::from_iter([
///     BitVector::from_iter([0, 1]),
///     BitVector::from_iter([2]),
/// ]);
///
/// assert!(expr.eval(&BitVector::from_iter([0, 1])));
/// assert!(expr.eval(&BitVector::from_iter([2, 5])));
/// assert!(!expr.eval(&BitVector::from_iter([0, 5])));
/// ```
#[derive(Clone, PartialEq, Default, Debug)]
pub struct LogicalExpression {
    conjunctions: Vec<BitVector>,
}

impl LogicalExpression {
    pub fn new(conjunctions: Vec<BitVector>) -> Self {
        Self { conjunctions }
    }

    /// The impossible requirement: no conjunction can ever be satisfied
    pub fn nothing() -> Self {
        Self::default()
    }

    /// The requirement satisfied by any reachability set
    pub fn trivially_true() -> Self {
        Self::new(vec![BitVector::default()])
    }

    /// A requirement satisfied by a single bit
    pub fn single_bit(bit: usize) -> Self {
        Self::new(vec![BitVector::from_iter([bit])])
    }

    pub fn conjunctions(&self) -> &[BitVector] {
        &self.conjunctions
    }

    pub fn iter(&self) -> Iter<'_, BitVector> {
        self.conjunctions.iter()
    }

    /// Get the number of conjunctions (alternatives) in this expression
    pub fn len(&self) -> usize {
        self.conjunctions.len()
    }

    /// Return whether this is the impossible expression
    pub fn is_empty(&self) -> bool {
        self.conjunctions.is_empty()
    }

    /// An expression without any conjunction can never be satisfied
    pub fn is_trivially_false(&self) -> bool {
        self.conjunctions.is_empty()
    }

    /// An expression holding an empty conjunction is always satisfied
    pub fn is_trivially_true(&self) -> bool {
        self.conjunctions.iter().any(|c| c.is_empty())
    }

    /// Test if at least one conjunction is fully covered by the given set
    pub fn eval(&self, reach: &BitVector) -> bool {
        self.conjunctions.iter().any(|c| reach.is_superset_of(c))
    }

    /// Add an alternative way to satisfy this requirement
    pub fn or_conjunction(&mut self, conj: BitVector) {
        self.conjunctions.push(conj);
    }

    /// Add a single-bit alternative
    pub fn or_bit(&mut self, bit: usize) {
        self.or_conjunction(BitVector::from_iter([bit]));
    }

    /// Merge all alternatives of the other expression into this one.
    ///
    /// This is the table-merge primitive: rules from several sources (static
    /// rules, settings, inventory) combine by concatenating their alternatives.
    pub fn or_expr(&mut self, other: &Self) {
        self.conjunctions.extend(other.conjunctions.iter().cloned());
    }

    /// Conjunction of two DNF expressions (the cross product of their terms).
    ///
    /// Used by the bottom-up tooltip propagation to substitute a resolved
    /// requirement into a dependent conjunction. Structurally duplicated
    /// products are skipped on the fly, dominated ones may remain.
    pub fn and_expr(&self, other: &Self) -> Self {
        let mut result = Self::nothing();
        for a in &self.conjunctions {
            for b in &other.conjunctions {
                let product = a.union(b);
                if !result.conjunctions.contains(&product) {
                    result.conjunctions.push(product);
                }
            }
        }
        result
    }

    /// Collapse structurally identical conjunctions.
    ///
    /// Equality of conjunctions is [BitVector] equality; the first occurrence
    /// is kept and order is otherwise preserved. Dominated (superset)
    /// conjunctions are left in place, the tooltip simplifier deals with them.
    pub fn remove_duplicates(&self) -> Self {
        let mut seen: Vec<BitVector> = Vec::with_capacity(self.conjunctions.len());
        for conj in &self.conjunctions {
            if !seen.contains(conj) {
                seen.push(conj.clone());
            }
        }
        Self::new(seen)
    }

    /// Count all bit references across conjunctions (a cost estimate)
    pub fn total_size(&self) -> usize {
        self.conjunctions.iter().map(|c| c.len()).sum()
    }
}

impl From<BitVector> for LogicalExpression {
    fn from(conj: BitVector) -> Self {
        Self::new(vec![conj])
    }
}

impl FromIterator<BitVector> for LogicalExpression {
    fn from_iter<I: IntoIterator<Item = BitVector>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LogicalExpression {
    type Item = &'a BitVector;
    type IntoIter = Iter<'a, BitVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.conjunctions.iter()
    }
}

impl BitOr for LogicalExpression {
    type Output = LogicalExpression;
    fn bitor(mut self, rhs: Self) -> Self::Output {
        self.or_expr(&rhs);
        self
    }
}

impl BitOr<&LogicalExpression> for LogicalExpression {
    type Output = LogicalExpression;
    fn bitor(mut self, rhs: &LogicalExpression) -> Self::Output {
        self.or_expr(rhs);
        self
    }
}

impl BitAnd for &LogicalExpression {
    type Output = LogicalExpression;
    fn bitand(self, rhs: Self) -> Self::Output {
        self.and_expr(rhs)
    }
}

impl fmt::Display for LogicalExpression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_trivially_false() {
            return write!(f, "<impossible>");
        }
        write!(f, "{}", self.conjunctions.iter().format(" | "))
    }
}

#[cfg(test)]
mod tests {
    use crate::*;
    use std::iter::FromIterator;

    #[test]
    fn special_forms() {
        assert!(LogicalExpression::nothing().is_trivially_false());
        assert!(!LogicalExpression::nothing().eval(&BitVector::from_iter([0, 1, 2])));

        assert!(LogicalExpression::trivially_true().is_trivially_true());
        assert!(LogicalExpression::trivially_true().eval(&BitVector::default()));
    }

    #[test]
    fn eval_alternatives() {
        let mut expr = LogicalExpression::from(BitVector::from_iter([0, 1]));
        expr.or_bit(4);

        assert!(expr.eval(&BitVector::from_iter([0, 1, 2])));
        assert!(expr.eval(&BitVector::from_iter([4])));
        assert!(!expr.eval(&BitVector::from_iter([0, 2])));
    }

    #[test]
    fn merge_concatenates() {
        let mut base = LogicalExpression::single_bit(0);
        let override_expr = LogicalExpression::single_bit(7);
        base.or_expr(&override_expr);

        assert_eq!(base.len(), 2);
        assert!(base.eval(&BitVector::from_iter([7])));
        assert!(base.eval(&BitVector::from_iter([0])));
    }

    #[test]
    fn dedup_is_idempotent() {
        let dup = BitVector::from_iter([1, 2]);
        let expr = LogicalExpression::from_iter([
            dup.clone(),
            BitVector::from_iter([3]),
            dup.clone(),
            dup,
        ]);

        let once = expr.remove_duplicates();
        assert_eq!(once.len(), 2);

        let twice = once.remove_duplicates();
        assert_eq!(once, twice);
    }

    #[test]
    fn product_of_alternatives() {
        // (0 | 1) & (2 | 3)
        let left = LogicalExpression::single_bit(0) | LogicalExpression::single_bit(1);
        let right = LogicalExpression::single_bit(2) | LogicalExpression::single_bit(3);
        let product = &left & &right;

        assert_eq!(product.len(), 4);
        assert!(product.eval(&BitVector::from_iter([1, 2])));
        assert!(!product.eval(&BitVector::from_iter([0, 1])));
    }
}
