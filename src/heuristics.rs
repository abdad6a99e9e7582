//! Heuristic functions estimating the remaining work in a puzzle state.
//!
//! Both heuristics are pure functions of the state: the same state always
//! yields the same value, with no dependency on search history. They feed the
//! greedy and A* strategies in the `search` module.
use crate::engine::PuzzleState;

/// Heuristic 1: the number of bottles that are not uniform.
///
/// Every non-uniform bottle needs at least one pour before the goal. No
/// admissibility claim is made for the count under the per-layer cost model;
/// it is treated as a cheap, effective ordering signal for greedy search and
/// offered for A* with that caveat.
///
/// # Examples
/// ```
/// use watersort_solver::heuristics::non_uniform_bottles;
/// use watersort_solver::utils::state_from_str;
/// let state = state_from_str("3;2;r,g;g,r;e,e;").unwrap();
/// assert_eq!(non_uniform_bottles(&state), 2);
/// ```
pub fn non_uniform_bottles(state: &PuzzleState) -> u32 {
    state.bottles().iter().filter(|b| !b.is_uniform()).count() as u32
}

/// Heuristic 2: the total number of mismatched layers across all bottles.
///
/// A layer counts as mismatched when its color differs from its bottle's top
/// color. The count can overestimate the true remaining cost: pouring off a
/// lone top layer may leave the bottle uniform without any of its mismatched
/// layers moving. Like heuristic 1 it is inadmissible, but strictly more
/// informative: whenever a bottle is non-uniform it contributes at least one
/// mismatched layer, so `mismatched_layers >= non_uniform_bottles` always.
pub fn mismatched_layers(state: &PuzzleState) -> u32 {
    state.bottles().iter().map(|b| b.mismatch_count()).sum()
}
