//! Compile textual requirement rules into DNF expressions.
//!
//! Rule dumps ship requirements as plain text, one rule per check or area,
//! e.g. `"Goddess Sword & (Slingshot | Beetle)"`. This module interns the
//! referenced names into a [LogicSpace] and lowers each rule to a
//! [LogicalExpression], distributing conjunctions over disjunctions along the
//! way. Tracker logic is monotone: there is no negation.

use crate::*;

use pest::{iterators::Pair, Parser};

#[derive(Parser)]
#[grammar_inline = r####"
rule  = _{ SOI ~ disj ~ EOI }
disj  =  { conj ~ ( "|" ~ conj )* }
conj  =  { term ~ ( "&" ~ term )* }
term  = _{ bt | bf | grp | name }
grp   = _{ "(" ~ disj ~ ")" }
bt    =  { "Nothing" | "True" }
bf    =  { "Impossible" | "False" }
name  = @{ (ASCII_ALPHANUMERIC | "_" | "'" | "-" | "." | ":" | "\\" | " ")+ }

WHITESPACE = _{ " " | "\t" }
"####]
struct RequirementParser;

/// Parse a single requirement rule, interning names into the space.
///
/// ```
/// use reachkit::{parse_requirement, BitVector, LogicSpace};
/// use std::iter::FromIterator;
///
/// let mut space = LogicSpace::default();
/// let expr = parse_requirement(&mut space, "Sword & (Slingshot | Beetle)")?;
///
/// let sword = space.bit("Sword")?;
/// let beetle = space.bit("Beetle")?;
/// assert!(expr.eval(&BitVector::from_iter([sword, beetle])));
/// assert!(!expr.eval(&BitVector::from_iter([sword])));
/// # Ok::<(), reachkit::TrackError>(())
/// ```
pub fn parse_requirement(
    space: &mut LogicSpace,
    text: &str,
) -> Result<LogicalExpression, TrackError> {
    let mut parsed = RequirementParser::parse(Rule::rule, text)
        .map_err(|_| TrackError::InvalidRule(text.to_string()))?;
    load_expr(space, parsed.next().unwrap())
}

fn load_expr(space: &mut LogicSpace, pair: Pair<Rule>) -> Result<LogicalExpression, TrackError> {
    match pair.as_rule() {
        Rule::bt => Ok(LogicalExpression::trivially_true()),
        Rule::bf => Ok(LogicalExpression::nothing()),
        Rule::name => {
            let id = pair.as_str().trim();
            if id.is_empty() {
                return Err(TrackError::InvalidName(pair.as_str().to_string()));
            }
            Ok(LogicalExpression::single_bit(space.add(id)))
        }
        Rule::disj => {
            let mut expr = LogicalExpression::nothing();
            for inner in pair.into_inner() {
                expr.or_expr(&load_expr(space, inner)?);
            }
            Ok(expr)
        }
        Rule::conj => {
            let mut expr = LogicalExpression::trivially_true();
            for inner in pair.into_inner() {
                expr = expr.and_expr(&load_expr(space, inner)?);
            }
            Ok(expr)
        }
        _ => Err(TrackError::InvalidRule(pair.as_str().to_string())),
    }
}

/// Compile a batch of `(id, rule text)` pairs into a requirement table.
///
/// Every rule target is interned before parsing so bit assignment does not
/// depend on reference order inside the rules; names first seen inside a rule
/// body get the following bits. Identifiers without a rule of their own keep
/// the impossible requirement and can only become true through the seed.
pub fn compile_requirements(
    space: &mut LogicSpace,
    rules: &[(&str, &str)],
) -> Result<Requirements, TrackError> {
    for (id, _) in rules {
        space.add(id);
    }
    let mut parsed = Vec::with_capacity(rules.len());
    for (id, text) in rules {
        let bit = space.add(id);
        parsed.push((bit, parse_requirement(space, text)?));
    }
    let mut table = Requirements::with_bits(space.num_bits());
    for (bit, expr) in parsed {
        table.set(bit, expr);
    }
    Ok(table)
}
