//! Core puzzle engine for the water sort puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Color`: Represents the liquid colors that can appear as layers.
//! - `Bottle`: A fixed-capacity vessel holding an ordered stack of layers,
//!   with queries for fullness, uniformity and pour feasibility.
//! - `PuzzleState`: An ordered collection of bottles; owns the pour transition
//!   function, the goal test, and a canonical key used for deduplication.
//! - `PourAction`: A label identifying one pour (source index, destination index).
use std::fmt;

/// Represents a single liquid color.
///
/// The color alphabet is closed: five colors and nothing else. Empty space in
/// a bottle is not a color; it is modeled by the absence of layers and only
/// rendered as `'e'` in the text format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// Red liquid, `'r'` in the text format.
    Red,
    /// Green liquid, `'g'` in the text format.
    Green,
    /// Blue liquid, `'b'` in the text format.
    Blue,
    /// Yellow liquid, `'y'` in the text format.
    Yellow,
    /// Orange liquid, `'o'` in the text format.
    Orange,
}

impl Color {
    /// Every color, in the order they are dealt by the instance generator.
    pub const ALL: [Color; 5] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Orange,
    ];

    /// Converts the color to its character representation.
    ///
    /// This is used by the text format and by state keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use watersort_solver::engine::Color;
    /// assert_eq!(Color::Red.to_char(), 'r');
    /// assert_eq!(Color::Orange.to_char(), 'o');
    /// ```
    pub fn to_char(&self) -> char {
        match self {
            Color::Red => 'r',
            Color::Green => 'g',
            Color::Blue => 'b',
            Color::Yellow => 'y',
            Color::Orange => 'o',
        }
    }

    /// Parses a color from its character representation.
    ///
    /// Returns `None` for any character outside the closed alphabet, including
    /// the `'e'` empty marker, which is padding rather than a color.
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'r' => Some(Color::Red),
            'g' => Some(Color::Green),
            'b' => Some(Color::Blue),
            'y' => Some(Color::Yellow),
            'o' => Some(Color::Orange),
            _ => None,
        }
    }
}

/// A single puzzle vessel with a fixed capacity and an ordered stack of layers.
///
/// Layers are stored bottom-to-top, so the last element of the internal vector
/// is the topmost layer. The capacity is an explicit per-bottle field copied by
/// every clone; there is no process-wide capacity setting.
///
/// # Examples
/// ```
/// use watersort_solver::engine::{Bottle, Color};
/// let mut bottle = Bottle::new(4);
/// assert!(bottle.is_empty());
/// bottle.push_layer(Color::Red);
/// bottle.push_layer(Color::Red);
/// assert_eq!(bottle.top_color(), Some(Color::Red));
/// assert!(bottle.is_uniform());
/// assert!(!bottle.is_full());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bottle {
    capacity: usize,
    layers: Vec<Color>,
}

impl Bottle {
    /// Creates a new empty bottle with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Bottle {
            capacity,
            layers: Vec::with_capacity(capacity),
        }
    }

    /// Creates a bottle from a bottom-to-top layer sequence.
    ///
    /// # Arguments
    /// * `capacity`: The fixed capacity of the bottle.
    /// * `layers`: The initial layers, bottom first. The length must not
    ///   exceed `capacity`; the parser validates this before construction.
    pub fn with_layers(capacity: usize, layers: Vec<Color>) -> Self {
        debug_assert!(layers.len() <= capacity);
        Bottle { capacity, layers }
    }

    /// Returns the fixed capacity of the bottle.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the layers bottom-to-top.
    pub fn layers(&self) -> &[Color] {
        &self.layers
    }

    /// Returns `true` iff the bottle holds no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Returns `true` iff the layer count equals the capacity.
    pub fn is_full(&self) -> bool {
        self.layers.len() == self.capacity
    }

    /// Returns the number of free layer slots.
    pub fn free_space(&self) -> usize {
        self.capacity - self.layers.len()
    }

    /// Returns the color of the topmost layer, or `None` if the bottle is empty.
    pub fn top_color(&self) -> Option<Color> {
        self.layers.last().copied()
    }

    /// Returns `true` if the bottle is empty or every layer matches the top color.
    pub fn is_uniform(&self) -> bool {
        match self.top_color() {
            None => true,
            Some(top) => self.layers.iter().all(|&c| c == top),
        }
    }

    /// Counts the layers whose color differs from the top color.
    ///
    /// Returns 0 for an empty bottle. This is the per-bottle contribution to
    /// the mismatched-layers heuristic.
    pub fn mismatch_count(&self) -> u32 {
        match self.top_color() {
            None => 0,
            Some(top) => self.layers.iter().filter(|&&c| c != top).count() as u32,
        }
    }

    /// Returns `true` iff a layer of `color` may be poured into this bottle:
    /// the bottle is not full, and is either empty or topped by the same color.
    pub fn can_receive(&self, color: Color) -> bool {
        if self.is_full() {
            return false;
        }
        match self.top_color() {
            None => true,
            Some(top) => top == color,
        }
    }

    /// Length of the maximal same-colored run at the top of the bottle.
    ///
    /// Returns 0 for an empty bottle. A pour moves at most this many layers.
    pub fn top_run_len(&self) -> usize {
        match self.top_color() {
            None => 0,
            Some(top) => self.layers.iter().rev().take_while(|&&c| c == top).count(),
        }
    }

    /// Pushes a layer on top of the bottle.
    ///
    /// Callers must only push into a non-full bottle; the transition function
    /// guarantees this via `can_receive`.
    pub fn push_layer(&mut self, color: Color) {
        debug_assert!(!self.is_full());
        self.layers.push(color);
    }

    /// Removes and returns the topmost layer, or `None` if the bottle is empty.
    pub fn pop_top_layer(&mut self) -> Option<Color> {
        self.layers.pop()
    }
}

impl fmt::Display for Bottle {
    /// Formats the bottle top-to-bottom with `'e'` padding for free slots,
    /// e.g. `e,e,r,g` for a capacity-4 bottle holding `g` below `r`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cells: Vec<String> = vec!["e".to_string(); self.free_space()];
        cells.extend(self.layers.iter().rev().map(|c| c.to_char().to_string()));
        write!(f, "{}", cells.join(","))
    }
}

/// A label identifying one pour: source bottle index and destination bottle index.
///
/// Displays as `pour_<from>_<to>`, the operator format used in solution plans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PourAction {
    /// Index of the bottle poured from.
    pub from: usize,
    /// Index of the bottle poured into.
    pub to: usize,
}

impl fmt::Display for PourAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pour_{}_{}", self.from, self.to)
    }
}

/// Selects the goal test applied during a search.
///
/// The two variants differ in solvability for many instances, so the choice is
/// an explicit configuration value rather than an ambient default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GoalPolicy {
    /// Every bottle is empty or monochrome.
    AllUniform,
    /// Every bottle is empty or monochrome, and no two non-empty bottles
    /// share a top color.
    DistinctTopColors,
}

/// An ordered collection of bottles; the state of the search space.
///
/// The bottle order is significant: it indexes pour actions. Two states are
/// equivalent iff their bottles are pairwise equal in content at the same index.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PuzzleState {
    bottles: Vec<Bottle>,
}

impl PuzzleState {
    /// Creates a state from an ordered bottle sequence.
    pub fn new(bottles: Vec<Bottle>) -> Self {
        PuzzleState { bottles }
    }

    /// Returns the bottles in index order.
    pub fn bottles(&self) -> &[Bottle] {
        &self.bottles
    }

    /// Total layer count across all bottles.
    ///
    /// Pouring moves layers without creating or destroying them, so this count
    /// is conserved across every transition.
    pub fn total_layers(&self) -> usize {
        self.bottles.iter().map(|b| b.layers().len()).sum()
    }

    /// Tests whether this state satisfies the goal under the given policy.
    ///
    /// # Examples
    /// ```
    /// use watersort_solver::engine::GoalPolicy;
    /// use watersort_solver::utils::state_from_str;
    /// let state = state_from_str("2;2;r,r;e,e;").unwrap();
    /// assert!(state.is_goal(GoalPolicy::AllUniform));
    /// ```
    pub fn is_goal(&self, policy: GoalPolicy) -> bool {
        if !self.bottles.iter().all(Bottle::is_uniform) {
            return false;
        }
        match policy {
            GoalPolicy::AllUniform => true,
            GoalPolicy::DistinctTopColors => {
                let mut seen = std::collections::HashSet::new();
                self.bottles
                    .iter()
                    .filter_map(Bottle::top_color)
                    .all(|c| seen.insert(c))
            }
        }
    }

    /// Returns the canonical string key of this state.
    ///
    /// The key encodes each bottle's layers bottom-to-top in index order,
    /// separated by `';'`. It is the hashable identity used by the search
    /// engine's explored and generated sets: two states share a key iff their
    /// bottles hold identical layers at identical indices.
    pub fn state_key(&self) -> String {
        let mut key = String::new();
        for bottle in &self.bottles {
            for color in bottle.layers() {
                key.push(color.to_char());
            }
            key.push(';');
        }
        key
    }

    /// Applies a pour action, returning the successor state and the number of
    /// layers moved, or `None` if the action is not legal in this state.
    ///
    /// A legal pour moves the maximal contiguous run of the source's top color,
    /// stopping when the run is exhausted or the destination becomes full. At
    /// least one layer always moves on a legal pour. The receiver is never
    /// mutated; the successor is a fresh value copy.
    pub fn apply(&self, action: PourAction) -> Option<(PuzzleState, u32)> {
        if action.from == action.to
            || action.from >= self.bottles.len()
            || action.to >= self.bottles.len()
        {
            return None;
        }
        let color = self.bottles[action.from].top_color()?;
        if !self.bottles[action.to].can_receive(color) {
            return None;
        }

        // can_receive guarantees free space >= 1 and the run is >= 1 for a
        // non-empty source, so moved >= 1 here.
        let moved = self.bottles[action.from]
            .top_run_len()
            .min(self.bottles[action.to].free_space());

        let mut next = self.clone();
        for _ in 0..moved {
            if let Some(layer) = next.bottles[action.from].pop_top_layer() {
                next.bottles[action.to].push_layer(layer);
            }
        }
        Some((next, moved as u32))
    }

    /// Generates all legal successor states.
    ///
    /// Every ordered pair of distinct bottle indices is considered, so at most
    /// `n * (n - 1)` candidates exist for `n` bottles; pairs failing the pour
    /// precondition are discarded rather than enumerated. Each entry carries
    /// the action taken, the resulting state, and the action's cost (one per
    /// layer moved).
    pub fn successors(&self) -> Vec<(PourAction, PuzzleState, u32)> {
        let n = self.bottles.len();
        let mut children = Vec::new();
        for from in 0..n {
            for to in 0..n {
                if from == to {
                    continue;
                }
                let action = PourAction { from, to };
                if let Some((state, cost)) = self.apply(action) {
                    children.push((action, state, cost));
                }
            }
        }
        children
    }
}

impl fmt::Display for PuzzleState {
    /// Formats the state one bottle per line, each in the `Bottle` format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, bottle) in self.bottles.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", bottle)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::state_from_str;

    #[test]
    fn test_color_char_round_trip() {
        for c in [
            Color::Red,
            Color::Green,
            Color::Blue,
            Color::Yellow,
            Color::Orange,
        ] {
            assert_eq!(Color::from_char(c.to_char()), Some(c));
        }
        assert_eq!(Color::from_char('e'), None);
        assert_eq!(Color::from_char('x'), None);
    }

    #[test]
    fn test_empty_bottle_queries() {
        let bottle = Bottle::new(4);
        assert!(bottle.is_empty());
        assert!(!bottle.is_full());
        assert_eq!(bottle.free_space(), 4);
        assert_eq!(bottle.top_color(), None);
        assert!(bottle.is_uniform());
        assert_eq!(bottle.mismatch_count(), 0);
        assert_eq!(bottle.top_run_len(), 0);
    }

    #[test]
    fn test_bottle_push_pop() {
        let mut bottle = Bottle::new(3);
        bottle.push_layer(Color::Red);
        bottle.push_layer(Color::Green);
        assert_eq!(bottle.top_color(), Some(Color::Green));
        assert_eq!(bottle.pop_top_layer(), Some(Color::Green));
        assert_eq!(bottle.pop_top_layer(), Some(Color::Red));
        assert_eq!(bottle.pop_top_layer(), None);
    }

    #[test]
    fn test_uniformity_and_mismatches() {
        let uniform = Bottle::with_layers(4, vec![Color::Blue, Color::Blue, Color::Blue]);
        assert!(uniform.is_uniform());
        assert_eq!(uniform.mismatch_count(), 0);

        let mixed = Bottle::with_layers(4, vec![Color::Red, Color::Green, Color::Blue]);
        assert!(!mixed.is_uniform());
        // Top is blue; red and green below it differ.
        assert_eq!(mixed.mismatch_count(), 2);
    }

    #[test]
    fn test_can_receive() {
        let mut bottle = Bottle::with_layers(2, vec![Color::Red]);
        assert!(bottle.can_receive(Color::Red));
        assert!(!bottle.can_receive(Color::Green));
        bottle.push_layer(Color::Red);
        // Full bottles receive nothing, even a matching color.
        assert!(!bottle.can_receive(Color::Red));

        let empty = Bottle::new(2);
        assert!(empty.can_receive(Color::Yellow));
    }

    #[test]
    fn test_top_run_len() {
        let bottle = Bottle::with_layers(4, vec![Color::Green, Color::Red, Color::Red]);
        assert_eq!(bottle.top_run_len(), 2);
        let uniform = Bottle::with_layers(4, vec![Color::Red, Color::Red]);
        assert_eq!(uniform.top_run_len(), 2);
    }

    #[test]
    fn test_bottle_display_pads_with_empty_marker() {
        let bottle = Bottle::with_layers(4, vec![Color::Green, Color::Red]);
        // Top-to-bottom with 'e' padding first.
        assert_eq!(bottle.to_string(), "e,e,r,g");
        assert_eq!(Bottle::new(2).to_string(), "e,e");
    }

    #[test]
    fn test_pour_action_display() {
        let action = PourAction { from: 0, to: 2 };
        assert_eq!(action.to_string(), "pour_0_2");
    }

    #[test]
    fn test_apply_moves_maximal_run() {
        // Source topped by a run of two reds over a green; destination empty.
        let state = state_from_str("2;3;r,r,g;e,e,e;").unwrap();
        let (next, cost) = state.apply(PourAction { from: 0, to: 1 }).unwrap();
        assert_eq!(cost, 2);
        assert_eq!(next.bottles()[0].layers(), &[Color::Green]);
        assert_eq!(next.bottles()[1].layers(), &[Color::Red, Color::Red]);
    }

    #[test]
    fn test_apply_stops_when_destination_fills() {
        // A run of three reds, but the matching destination has two free slots.
        let state = state_from_str("2;3;r,r,r;e,e,r;").unwrap();
        let (next, cost) = state.apply(PourAction { from: 0, to: 1 }).unwrap();
        assert_eq!(cost, 2);
        assert_eq!(next.bottles()[0].layers(), &[Color::Red]);
        assert!(next.bottles()[1].is_full());
    }

    #[test]
    fn test_apply_rejects_illegal_pours() {
        let state = state_from_str("3;2;r,g;b,b;e,e;").unwrap();
        // Mismatched top colors.
        assert!(state.apply(PourAction { from: 0, to: 1 }).is_none());
        // Pouring into itself.
        assert!(state.apply(PourAction { from: 0, to: 0 }).is_none());
        // Pouring from an empty bottle.
        assert!(state.apply(PourAction { from: 2, to: 0 }).is_none());
        // Index out of range.
        assert!(state.apply(PourAction { from: 0, to: 9 }).is_none());
    }

    #[test]
    fn test_apply_rejects_full_destination() {
        let state = state_from_str("2;2;r,g;r,r;").unwrap();
        assert!(state.apply(PourAction { from: 0, to: 1 }).is_none());
    }

    #[test]
    fn test_successors_enumeration() {
        // Bottle 0 top r, bottle 1 top g, bottle 2 empty. Legal pours are
        // 0->2 and 1->2 only.
        let state = state_from_str("3;2;r,g;g,r;e,e;").unwrap();
        let children = state.successors();
        let actions: Vec<PourAction> = children.iter().map(|(a, _, _)| *a).collect();
        assert_eq!(
            actions,
            vec![PourAction { from: 0, to: 2 }, PourAction { from: 1, to: 2 }]
        );
        for (_, child, cost) in &children {
            assert_eq!(*cost, 1);
            assert_eq!(child.total_layers(), state.total_layers());
        }
    }

    #[test]
    fn test_successors_do_not_mutate_source_state() {
        let state = state_from_str("3;2;r,g;g,r;e,e;").unwrap();
        let snapshot = state.clone();
        let _ = state.successors();
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_conservation_over_walk() {
        let mut state = state_from_str("4;3;r,g,b;g,b,r;b,r,g;e,e,e;").unwrap();
        let total = state.total_layers();
        for _ in 0..20 {
            let children = state.successors();
            match children.into_iter().next() {
                Some((_, next, _)) => state = next,
                None => break,
            }
            assert_eq!(state.total_layers(), total);
        }
    }

    #[test]
    fn test_is_goal_all_uniform() {
        let solved = state_from_str("3;2;r,r;g,g;e,e;").unwrap();
        assert!(solved.is_goal(GoalPolicy::AllUniform));

        let unsolved = state_from_str("3;2;r,g;g,r;e,e;").unwrap();
        assert!(!unsolved.is_goal(GoalPolicy::AllUniform));
    }

    #[test]
    fn test_is_goal_distinct_top_colors() {
        // Uniform everywhere, but two bottles are topped by red.
        let shared_tops = state_from_str("3;2;r,r;e,r;g,g;").unwrap();
        assert!(shared_tops.is_goal(GoalPolicy::AllUniform));
        assert!(!shared_tops.is_goal(GoalPolicy::DistinctTopColors));

        let distinct = state_from_str("3;2;r,r;g,g;e,e;").unwrap();
        assert!(distinct.is_goal(GoalPolicy::DistinctTopColors));
    }

    #[test]
    fn test_state_key_is_index_sensitive() {
        let a = state_from_str("2;2;e,r;e,e;").unwrap();
        let b = state_from_str("2;2;e,e;e,r;").unwrap();
        assert_ne!(a.state_key(), b.state_key());
        assert_eq!(a.state_key(), a.clone().state_key());
    }

    #[test]
    fn test_state_display_lists_bottles() {
        let state = state_from_str("2;2;r,g;e,e;").unwrap();
        assert_eq!(state.to_string(), "r,g\ne,e");
    }
}
