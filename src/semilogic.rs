//! Relaxed reachability passes for tricks and sequence breaks.
//!
//! On top of the strict in-logic result, trackers show two weaker
//! classifications: checks reachable through alternate non-strict rule paths
//! (semi-logic) and checks reachable only when a specific user-enabled trick
//! is assumed (trick logic). Both are ordinary fixed points over the same
//! merged table, seeded with progressively more assumed bits.

use crate::*;

use std::fmt;

/// How reachable a bit currently is, in display precedence order.
///
/// The derived ordering is the precedence: a strictly reachable check is
/// never reported as semi-logic or trick-logic even when a relaxed pass would
/// also satisfy it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum LogicalState {
    /// Reachable under the strict rules
    InLogic,
    /// Reachable when non-strict alternate paths are assumed
    SemiLogic,
    /// Reachable only with an enabled trick
    TrickLogic,
    /// Not reachable at all
    OutLogic,
}

impl LogicalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalState::InLogic => "inLogic",
            LogicalState::SemiLogic => "semiLogic",
            LogicalState::TrickLogic => "trickLogic",
            LogicalState::OutLogic => "outLogic",
        }
    }
}

impl fmt::Display for LogicalState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bits granted for free in the relaxed passes.
///
/// `assumed_bits` covers non-strict relaxations that need no explicit trick
/// toggle (e.g. treating a difficult skip as doable); `trick_bits` covers the
/// tricks the user opted into.
#[derive(Clone, Default, Debug)]
pub struct SemiLogicOverlay {
    pub assumed_bits: BitVector,
    pub trick_bits: BitVector,
}

/// The two relaxed reachability sets layered over the strict result
#[derive(Clone, Debug)]
pub struct SemiLogicBits {
    semi: BitVector,
    trick: BitVector,
}

/// Run the relaxed passes on top of the strict in-logic set.
///
/// Pass one re-seeds the fixed point with the strict result plus the assumed
/// bits; pass two additionally grants the enabled tricks. Each result
/// contains the previous one (the seeds only grow), so classification is a
/// simple containment cascade.
pub fn compute_semi_logic(
    merged: &Requirements,
    in_logic: &BitVector,
    overlay: &SemiLogicOverlay,
) -> SemiLogicBits {
    let semi_seed = in_logic.union(&overlay.assumed_bits);
    let semi = compute_least_fixed_point("Semi-logic state", merged, Some(&semi_seed));

    let trick_seed = semi.union(&overlay.trick_bits);
    let trick = compute_least_fixed_point("Trick-logic state", merged, Some(&trick_seed));

    SemiLogicBits { semi, trick }
}

impl SemiLogicBits {
    /// Classify a bit with the precedence inLogic > semiLogic > trickLogic > outLogic
    pub fn classify(&self, bit: usize, in_logic: &BitVector) -> LogicalState {
        if in_logic.test(bit) {
            LogicalState::InLogic
        } else if self.semi.test(bit) {
            LogicalState::SemiLogic
        } else if self.trick.test(bit) {
            LogicalState::TrickLogic
        } else {
            LogicalState::OutLogic
        }
    }

    pub fn semi_logic_bits(&self) -> &BitVector {
        &self.semi
    }

    pub fn trick_logic_bits(&self) -> &BitVector {
        &self.trick
    }
}
