//! Reachability analysis for requirement graphs over named boolean checks.
//!
//! Checks are interned into a [LogicSpace] and identified by an integer bit.
//! Each check carries a requirement in disjunctive normal form: a
//! [LogicalExpression] is an OR of conjunctions, and each conjunction is a
//! [BitVector] of the bits that must all be reachable. The requirements of a
//! whole space form a [Requirements] table, on which a least fixed point
//! yields the set of reachable bits.
//!
//! ```
//! use reachkit::{compile_requirements, compute_least_fixed_point, BitVector, LogicSpace};
//! # use reachkit::TrackError;
//! # fn main() -> Result<(), TrackError> {
//!
//! let mut space = LogicSpace::new();
//! let requirements = compile_requirements(
//!     &mut space,
//!     &[("Cave", "Sword | Bomb"), ("Chest", "Cave & Bomb")],
//! )?;
//!
//! // Seed the solver with the bits granted from outside the table
//! let mut inventory = BitVector::new();
//! inventory.set_bit(space.bit("Bomb")?);
//!
//! let reach = compute_least_fixed_point("docs", &requirements, Some(&inventory));
//! assert!(reach.test(space.bit("Cave")?));
//! assert!(reach.test(space.bit("Chest")?));
//! assert!(!reach.test(space.bit("Sword")?));
//! # Ok(())
//! # }
//! ```
//!
//! # Tooltips
//!
//! The raw requirement of a check is rarely fit for display. The tooltip
//! pipeline drops dominated conjunctions, factors shared prefixes and
//! renders the result as an AND/OR tree whose leaves carry a
//! [LogicalState] telling the consumer how to color them.
//!
//! ```
//! use reachkit::{compile_requirements, simplify, LogicSpace, LogicalState, Op};
//! # use reachkit::TrackError;
//! # fn main() -> Result<(), TrackError> {
//!
//! let mut space = LogicSpace::new();
//! let requirements = compile_requirements(
//!     &mut space,
//!     &[("Chest", "Sword & Slingshot | Sword & Beetle")],
//! )?;
//!
//! let conjs = requirements.get(space.bit("Chest")?)?.conjunctions();
//! let tip = simplify(&space, conjs, &|_id| LogicalState::OutLogic)?;
//!
//! // The shared "Sword" was factored out of both branches
//! assert_eq!(tip.op(), Op::And);
//! assert_eq!(tip.count_leaves(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! Interactive consumers keep the table on a background thread instead: a
//! [TooltipWorker] owns a pre-analyzed copy of the requirements and answers
//! per-check queries over channels.
//!
//! # Exploration
//!
//! Checks gate the edges of an [AreaGraph]. Given a reachability result,
//! [explore_area_graph] discovers every area a player can walk to and
//! records the first path found to each, including paths through randomized
//! exits resolved by an [ExitMappings] table.
//!
//! # Semi-logic
//!
//! Beyond the strict result, [compute_semi_logic] re-runs the solver with
//! assumed bits and trick bits granted, classifying every check into one of
//! four [LogicalState]s from in-logic to out-of-logic.

mod bitlogic;
mod bits;
mod bool_expr;
mod error;
mod expr;
mod memo;
mod parse;
mod pathfind;
mod semilogic;
mod simplify;
mod space;
mod tooltip;
mod worker;

#[macro_use]
extern crate pest_derive;

// Export public structures and API
pub use bitlogic::{
    bottom_up_tooltip_propagation, compute_least_fixed_point, merge_requirements,
    remove_duplicates, shallow_simplify, unify_requirements, Requirements, RequirementsOverlay,
};
pub use bits::BitVector;
pub use bool_expr::{BooleanExpression, Op, Term};
pub use error::TrackError;
pub use expr::LogicalExpression;
pub use memo::Memo;
pub use parse::{compile_requirements, parse_requirement};
pub use pathfind::{
    explore_area_graph, AreaGraph, ExitMappings, ExplorationNode, ExplorationTree, NodeId,
};
pub use semilogic::{compute_semi_logic, LogicalState, SemiLogicBits, SemiLogicOverlay};
pub use simplify::{dnf_to_expr, remove_dominated};
pub use space::LogicSpace;
pub use tooltip::{
    simplify, to_tooltip_expr, TooltipComputer, TooltipExpression, TooltipTerm,
    SENTINEL_IMPOSSIBLE, SENTINEL_NOTHING,
};
pub use worker::{TooltipWorker, WorkerResponse};
