//! Bit-indexed sets of requirement facts

use crate::*;

use bit_set::BitSet;
use delegate::delegate;
use std::fmt;
use std::iter::FromIterator;

/// A set of requirement bits with efficient bitwise operations.
///
/// Every fact tracked by the logic engine (an inventory item state, a location
/// check, an entrance) is identified by a non-negative integer index assigned
/// once per loaded ruleset. A BitVector is an abstraction over [BitSet]
/// collecting such indices: it backs both the conjunctions of a
/// [LogicalExpression] and the reachability sets produced by the solver.
///
/// Equality is set equality, regardless of the backing capacity. Iteration
/// yields indices in ascending order and can be restarted freely. There is no
/// unset operation: reachability only ever grows, a fresh vector is built when
/// a computation starts over.
///
/// ```
/// use reachkit::BitVector;
/// use std::iter::FromIterator;
///
/// let mut reach = BitVector::default();
/// reach.set_bit(1);
/// reach.set_bit(4);
///
/// let other = BitVector::from_iter([1, 4]);
/// assert_eq!(reach, other);
/// assert!(reach.test(4));
/// assert!(!reach.test(3));
/// ```
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct BitVector {
    bits: BitSet,
}

impl BitVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the given bit as present (idempotent)
    pub fn set_bit(&mut self, bit: usize) {
        self.bits.insert(bit);
    }

    /// Test if a specific bit is present
    pub fn test(&self, bit: usize) -> bool {
        self.bits.contains(bit)
    }

    /// Add all bits from the other vector
    pub fn union_with(&mut self, other: &Self) {
        self.bits.union_with(&other.bits);
    }

    /// Return the union of this vector and the other one
    pub fn union(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.union_with(other);
        result
    }

    /// Return true if this vector contains all bits of the other one
    pub fn is_superset_of(&self, other: &Self) -> bool {
        self.bits.is_superset(&other.bits)
    }

    /// Return true if the two vectors have no common bit
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.bits.is_disjoint(&other.bits)
    }

    /// Create an iterator over the contained bits, in ascending order
    pub fn iter(&self) -> Iter {
        self.into_iter()
    }

    delegate! {
        to self.bits {
            /// Return the number of bits in this vector
            pub fn len(&self) -> usize;
            /// Return whether no bit is set
            pub fn is_empty(&self) -> bool;
        }
    }
}

impl From<BitSet> for BitVector {
    fn from(bits: BitSet) -> Self {
        Self { bits }
    }
}

impl FromIterator<usize> for BitVector {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut vec = BitVector::default();
        for bit in iter {
            vec.set_bit(bit);
        }
        vec
    }
}

impl Extend<usize> for BitVector {
    fn extend<T: IntoIterator<Item = usize>>(&mut self, iter: T) {
        for bit in iter {
            self.set_bit(bit);
        }
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, bit) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", bit)?;
        }
        write!(f, "}}")
    }
}

/// Iterate over bits in a [BitVector]
pub struct Iter<'a>(bit_set::Iter<'a, u32>);

impl Iterator for Iter<'_> {
    type Item = usize;
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

impl<'a> IntoIterator for &'a BitVector {
    type Item = usize;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter(self.bits.iter())
    }
}
