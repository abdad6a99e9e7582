//! # Water Sort Solver Library
//!
//! This library provides the state model for the water sort puzzle and a
//! generic search engine that solves it under a closed set of strategies:
//! breadth-first, depth-first, iterative deepening, uniform-cost, greedy
//! best-first and A* (the informed strategies in two heuristic flavors).
//!
//! It is used by two binaries:
//! - `solver`: Reads a puzzle file, runs one strategy, and prints the
//!   `plan;cost;expanded` report (optionally replaying the plan state by
//!   state).
//! - `generator`: Emits random puzzle instances in the same text format,
//!   deterministically per seed.
//!
//! ## Modules
//! - `engine`: The puzzle representation (`Bottle`, `PuzzleState`), colors,
//!   pour actions, the transition function and the goal test.
//! - `heuristics`: The two pure estimates of remaining work used by the
//!   informed strategies.
//! - `search`: The strategy enum, the frontier, the node arena and the
//!   driver loop producing a `SearchResult`.
//! - `utils`: The text-format parser and the report formatter.

pub mod engine;
pub mod heuristics;
pub mod search;
pub mod utils;
