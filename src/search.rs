//! Strategy-parameterized search over the puzzle state space.
//!
//! One driver loop serves all strategies: it pops from a frontier whose
//! ordering is fixed once at construction, tests the goal, and inserts
//! deduplicated successors. Iterative deepening wraps the same loop with a
//! growing depth bound.
//!
//! Memory grows with the generated state space: the arena and frontier are
//! never pruned, so pathological instances can exhaust memory before the
//! search terminates. That is an operational limit, not a correctness bug.
use crate::engine::{GoalPolicy, PourAction, PuzzleState};
use crate::heuristics::{mismatched_layers, non_uniform_bottles};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

/// The closed set of supported search strategies.
///
/// Parsed from the textual tags `BF`, `DF`, `ID`, `UC`, `GR1`, `GR2`, `AS1`
/// and `AS2`; an unknown tag is rejected before any search state is allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Breadth-first search: FIFO frontier, shallowest nodes first.
    BreadthFirst,
    /// Depth-first search: LIFO frontier, no optimality guarantee.
    DepthFirst,
    /// Iterative deepening: depth-bounded depth-first with a growing bound.
    IterativeDeepening,
    /// Uniform-cost search: frontier ordered by accumulated path cost.
    UniformCost,
    /// Greedy best-first on the non-uniform-bottle count.
    GreedyH1,
    /// Greedy best-first on the mismatched-layer count.
    GreedyH2,
    /// A* on path cost plus the non-uniform-bottle count.
    AStarH1,
    /// A* on path cost plus the mismatched-layer count.
    AStarH2,
}

impl Strategy {
    /// All strategies, in tag order.
    pub const ALL: [Strategy; 8] = [
        Strategy::BreadthFirst,
        Strategy::DepthFirst,
        Strategy::IterativeDeepening,
        Strategy::UniformCost,
        Strategy::GreedyH1,
        Strategy::GreedyH2,
        Strategy::AStarH1,
        Strategy::AStarH2,
    ];

    /// Returns the textual tag of the strategy.
    pub fn tag(&self) -> &'static str {
        match self {
            Strategy::BreadthFirst => "BF",
            Strategy::DepthFirst => "DF",
            Strategy::IterativeDeepening => "ID",
            Strategy::UniformCost => "UC",
            Strategy::GreedyH1 => "GR1",
            Strategy::GreedyH2 => "GR2",
            Strategy::AStarH1 => "AS1",
            Strategy::AStarH2 => "AS2",
        }
    }

    /// The heuristic used by informed strategies, if any.
    fn heuristic(&self) -> Option<fn(&PuzzleState) -> u32> {
        match self {
            Strategy::GreedyH1 | Strategy::AStarH1 => Some(non_uniform_bottles),
            Strategy::GreedyH2 | Strategy::AStarH2 => Some(mismatched_layers),
            _ => None,
        }
    }

    /// The primary and secondary ordering keys for priority frontiers.
    ///
    /// Uniform-cost orders by path cost; greedy orders by heuristic value;
    /// A* orders by their sum with the heuristic as tie-break. Uninformed
    /// FIFO/LIFO frontiers ignore the keys.
    fn priority(&self, path_cost: u32, heuristic: u32) -> (u32, u32) {
        match self {
            Strategy::UniformCost => (path_cost, 0),
            Strategy::GreedyH1 | Strategy::GreedyH2 => (heuristic, 0),
            Strategy::AStarH1 | Strategy::AStarH2 => (path_cost + heuristic, heuristic),
            _ => (0, 0),
        }
    }

    fn new_frontier(&self) -> Frontier {
        match self {
            Strategy::BreadthFirst => Frontier::Fifo(VecDeque::new()),
            Strategy::DepthFirst | Strategy::IterativeDeepening => Frontier::Lifo(Vec::new()),
            _ => Frontier::Priority(BinaryHeap::new()),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BF" => Ok(Strategy::BreadthFirst),
            "DF" => Ok(Strategy::DepthFirst),
            "ID" => Ok(Strategy::IterativeDeepening),
            "UC" => Ok(Strategy::UniformCost),
            "GR1" => Ok(Strategy::GreedyH1),
            "GR2" => Ok(Strategy::GreedyH2),
            "AS1" => Ok(Strategy::AStarH1),
            "AS2" => Ok(Strategy::AStarH2),
            other => Err(format!("Unknown strategy: '{}'", other)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The terminal outcome of one search invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchResult {
    /// A goal state was reached.
    Solved {
        /// Root-to-goal action sequence.
        plan: Vec<PourAction>,
        /// Accumulated cost of the plan: one per layer moved.
        total_cost: u32,
        /// Number of nodes expanded during the search.
        expanded: usize,
    },
    /// The reachable state space was exhausted without finding a goal.
    ///
    /// This is a first-class result, not an error.
    Exhausted {
        /// Number of nodes expanded during the search.
        expanded: usize,
    },
}

/// A search-tree node stored in the arena.
///
/// The parent link is an arena index rather than a reference, which keeps path
/// reconstruction O(depth) without ownership cycles.
struct Node {
    state: PuzzleState,
    parent: Option<usize>,
    action: Option<PourAction>,
    depth: u32,
    path_cost: u32,
}

/// The frontier of generated-but-unexpanded nodes, ordered per strategy.
///
/// Priority entries carry a monotone insertion sequence so that equal keys pop
/// in FIFO order, making every strategy deterministic.
enum Frontier {
    Fifo(VecDeque<usize>),
    Lifo(Vec<usize>),
    Priority(BinaryHeap<Reverse<(u32, u32, u64, usize)>>),
}

impl Frontier {
    fn push(&mut self, priority: (u32, u32), seq: u64, id: usize) {
        match self {
            Frontier::Fifo(queue) => queue.push_back(id),
            Frontier::Lifo(stack) => stack.push(id),
            Frontier::Priority(heap) => {
                heap.push(Reverse((priority.0, priority.1, seq, id)));
            }
        }
    }

    fn pop(&mut self) -> Option<usize> {
        match self {
            Frontier::Fifo(queue) => queue.pop_front(),
            Frontier::Lifo(stack) => stack.pop(),
            Frontier::Priority(heap) => heap.pop().map(|Reverse((_, _, _, id))| id),
        }
    }
}

/// Outcome of one (possibly depth-bounded) pass of the driver loop.
enum Outcome {
    Solved { plan: Vec<PourAction>, total_cost: u32 },
    /// `cut_off` records whether the depth bound discarded any expandable
    /// node; a pass that was never cut off proves the space is exhausted.
    Exhausted { cut_off: bool },
}

/// Runs one search with the given strategy and goal policy.
///
/// The initial state is cloned into the root node and never mutated; every
/// invocation owns its frontier, explored set and generated set, so sequential
/// runs cannot leak state into each other.
///
/// # Examples
/// ```
/// use watersort_solver::engine::GoalPolicy;
/// use watersort_solver::search::{run, SearchResult, Strategy};
/// use watersort_solver::utils::state_from_str;
///
/// let initial = state_from_str("2;2;r,r;e,e;").unwrap();
/// let result = run(&initial, Strategy::BreadthFirst, GoalPolicy::AllUniform);
/// assert_eq!(
///     result,
///     SearchResult::Solved { plan: vec![], total_cost: 0, expanded: 0 }
/// );
/// ```
pub fn run(initial: &PuzzleState, strategy: Strategy, policy: GoalPolicy) -> SearchResult {
    match strategy {
        Strategy::IterativeDeepening => iterative_deepening(initial, policy),
        _ => {
            let mut expanded = 0;
            match search_once(initial, strategy, policy, None, &mut expanded) {
                Outcome::Solved { plan, total_cost } => SearchResult::Solved {
                    plan,
                    total_cost,
                    expanded,
                },
                Outcome::Exhausted { .. } => SearchResult::Exhausted { expanded },
            }
        }
    }
}

/// Depth-bounded depth-first passes with bounds 0, 1, 2, ...
///
/// The explored and generated sets reset at every bound, since a state pruned
/// at a shallow bound may be reachable again under a deeper one; the expanded
/// count accumulates across bounds. A pass that completes without hitting the
/// bound has searched the entire reachable space, so the loop also terminates
/// on unsolvable instances.
fn iterative_deepening(initial: &PuzzleState, policy: GoalPolicy) -> SearchResult {
    let mut expanded = 0;
    let mut limit = 0u32;
    loop {
        match search_once(initial, Strategy::DepthFirst, policy, Some(limit), &mut expanded) {
            Outcome::Solved { plan, total_cost } => {
                return SearchResult::Solved {
                    plan,
                    total_cost,
                    expanded,
                }
            }
            Outcome::Exhausted { cut_off: false } => {
                return SearchResult::Exhausted { expanded }
            }
            Outcome::Exhausted { cut_off: true } => limit += 1,
        }
    }
}

/// The common driver loop shared by every strategy.
///
/// Pops per the frontier ordering, goal-tests, and inserts each successor
/// whose state key has never been generated. The generated set is distinct
/// from the explored set: it blocks duplicate frontier insertion even before a
/// state is expanded.
fn search_once(
    initial: &PuzzleState,
    strategy: Strategy,
    policy: GoalPolicy,
    depth_limit: Option<u32>,
    expanded: &mut usize,
) -> Outcome {
    let heuristic = strategy.heuristic();
    let root_h = heuristic.map_or(0, |h| h(initial));

    let mut arena = vec![Node {
        state: initial.clone(),
        parent: None,
        action: None,
        depth: 0,
        path_cost: 0,
    }];
    let mut frontier = strategy.new_frontier();
    let mut generated: HashSet<String> = HashSet::new();
    let mut explored: HashSet<String> = HashSet::new();
    let mut seq: u64 = 0;
    let mut cut_off = false;

    generated.insert(initial.state_key());
    frontier.push(strategy.priority(0, root_h), seq, 0);
    seq += 1;

    while let Some(id) = frontier.pop() {
        if arena[id].state.is_goal(policy) {
            return Outcome::Solved {
                plan: reconstruct_plan(&arena, id),
                total_cost: arena[id].path_cost,
            };
        }

        let (children, depth, path_cost) = {
            let node = &arena[id];
            (node.state.successors(), node.depth, node.path_cost)
        };

        if depth_limit.is_some_and(|limit| depth >= limit) {
            if !children.is_empty() {
                cut_off = true;
            }
            continue;
        }

        let newly_explored = explored.insert(arena[id].state.state_key());
        debug_assert!(newly_explored, "a state key was expanded twice");
        let _ = newly_explored;
        *expanded += 1;

        for (action, child_state, step_cost) in children {
            if !generated.insert(child_state.state_key()) {
                continue;
            }
            let h = heuristic.map_or(0, |hf| hf(&child_state));
            let child_cost = path_cost + step_cost;
            let child_id = arena.len();
            arena.push(Node {
                state: child_state,
                parent: Some(id),
                action: Some(action),
                depth: depth + 1,
                path_cost: child_cost,
            });
            frontier.push(strategy.priority(child_cost, h), seq, child_id);
            seq += 1;
        }
    }

    Outcome::Exhausted { cut_off }
}

/// Follows parent indexes from the goal node back to the root, then reverses
/// the collected actions into the root-to-goal plan.
fn reconstruct_plan(arena: &[Node], goal: usize) -> Vec<PourAction> {
    let mut plan = Vec::new();
    let mut current = Some(goal);
    while let Some(id) = current {
        if let Some(action) = arena[id].action {
            plan.push(action);
        }
        current = arena[id].parent;
    }
    plan.reverse();
    plan
}
