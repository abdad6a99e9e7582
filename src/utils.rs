//! Utility collaborators around the core engine: the text-format parser that
//! produces an initial `PuzzleState`, and the report formatter that serializes
//! a `SearchResult`. Neither contains search logic; the engine only ever sees
//! and returns structured values.
use crate::engine::{Bottle, Color, PuzzleState};
use crate::search::SearchResult;

/// Parses a puzzle description string into a `PuzzleState`.
///
/// The format is `numBottles;capacity;seg;seg;...` with an optional trailing
/// `';'`. Each segment describes one bottle as `capacity` comma-separated
/// cells, listed **top to bottom**: the first cell is the topmost layer. Valid
/// cells are the colors `r`, `g`, `b`, `y`, `o` and the empty marker `e`,
/// which may only appear above all colored cells (liquid cannot float).
///
/// # Arguments
/// * `s`: The puzzle description, e.g. `"3;4;e,e,r,g;e,y,y,g;e,e,e,e;"`.
///
/// # Returns
/// * `Ok(PuzzleState)` when the description is well formed. Every bottle in
///   the returned state carries the declared capacity.
/// * `Err(String)` when the bottle count or capacity is malformed, the number
///   of segments disagrees with the declared count, a segment has the wrong
///   number of cells, a cell is not in the alphabet, or an empty marker sits
///   below a color.
///
/// # Examples
/// ```
/// use watersort_solver::engine::Color;
/// use watersort_solver::utils::state_from_str;
///
/// let state = state_from_str("3;2;r,g;g,r;e,e;").unwrap();
/// assert_eq!(state.bottles().len(), 3);
/// // The first cell of a segment is the top layer.
/// assert_eq!(state.bottles()[0].top_color(), Some(Color::Red));
/// assert!(state.bottles()[2].is_empty());
///
/// assert!(state_from_str("1;2;r,x;").is_err());
/// ```
pub fn state_from_str(s: &str) -> Result<PuzzleState, String> {
    let mut parts: Vec<&str> = s.trim().split(';').collect();
    if parts.last() == Some(&"") {
        parts.pop();
    }
    if parts.len() < 2 {
        return Err(format!(
            "Expected 'numBottles;capacity;...', found '{}'",
            s.trim()
        ));
    }

    let num_bottles: usize = parts[0]
        .parse()
        .map_err(|_| format!("Invalid bottle count: '{}'", parts[0]))?;
    let capacity: usize = parts[1]
        .parse()
        .map_err(|_| format!("Invalid capacity: '{}'", parts[1]))?;
    if capacity == 0 {
        return Err("Capacity must be positive".to_string());
    }

    let segments = &parts[2..];
    if segments.len() != num_bottles {
        return Err(format!(
            "Expected {} bottle segments, found {}",
            num_bottles,
            segments.len()
        ));
    }

    let mut bottles = Vec::with_capacity(num_bottles);
    for (i, segment) in segments.iter().enumerate() {
        let cells: Vec<&str> = segment.split(',').collect();
        if cells.len() != capacity {
            return Err(format!(
                "Bottle {} has {} cells (expected {})",
                i,
                cells.len(),
                capacity
            ));
        }

        // Cells run top to bottom, so empty markers must form a prefix.
        let mut seen_color = false;
        for cell in &cells {
            match *cell {
                "e" => {
                    if seen_color {
                        return Err(format!("Bottle {} has an empty marker below a color", i));
                    }
                }
                other => {
                    let mut chars = other.chars();
                    match (chars.next().and_then(Color::from_char), chars.next()) {
                        (Some(_), None) => seen_color = true,
                        _ => {
                            return Err(format!(
                                "Unrecognized cell '{}' in bottle {}",
                                other, i
                            ))
                        }
                    }
                }
            }
        }

        // Reverse into the internal bottom-to-top order, dropping padding.
        let layers: Vec<Color> = cells
            .iter()
            .rev()
            .filter_map(|cell| cell.chars().next().and_then(Color::from_char))
            .collect();
        bottles.push(Bottle::with_layers(capacity, layers));
    }

    Ok(PuzzleState::new(bottles))
}

/// Serializes a `SearchResult` into the textual report format.
///
/// A solved search renders as `plan;cost;expanded` where the plan is the
/// comma-joined action sequence (empty for a trivially solved instance); an
/// exhausted search renders as the literal `NOSOLUTION`.
///
/// # Examples
/// ```
/// use watersort_solver::search::SearchResult;
/// use watersort_solver::utils::format_report;
///
/// let report = format_report(&SearchResult::Exhausted { expanded: 7 });
/// assert_eq!(report, "NOSOLUTION");
/// ```
pub fn format_report(result: &SearchResult) -> String {
    match result {
        SearchResult::Solved {
            plan,
            total_cost,
            expanded,
        } => {
            let actions: Vec<String> = plan.iter().map(|a| a.to_string()).collect();
            format!("{};{};{}", actions.join(","), total_cost, expanded)
        }
        SearchResult::Exhausted { .. } => "NOSOLUTION".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Color, PourAction};

    #[test]
    fn test_parse_valid_state() {
        let state = state_from_str("3;4;e,e,r,g;e,y,y,g;e,e,e,e;").unwrap();
        assert_eq!(state.bottles().len(), 3);
        assert_eq!(state.bottles()[0].capacity(), 4);
        // Bottom-to-top: g below r.
        assert_eq!(state.bottles()[0].layers(), &[Color::Green, Color::Red]);
        assert_eq!(state.bottles()[1].layers(), &[
            Color::Green,
            Color::Yellow,
            Color::Yellow
        ]);
        assert!(state.bottles()[2].is_empty());
    }

    #[test]
    fn test_parse_without_trailing_separator() {
        let with = state_from_str("2;2;r,r;e,e;").unwrap();
        let without = state_from_str("2;2;r,r;e,e").unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_parse_first_cell_is_top() {
        let state = state_from_str("1;2;r,g;").unwrap();
        assert_eq!(state.bottles()[0].top_color(), Some(Color::Red));
    }

    #[test]
    fn test_parse_rejects_bad_counts() {
        assert!(state_from_str("").is_err());
        assert!(state_from_str("x;4;e,e,e,e;").is_err());
        assert!(state_from_str("1;x;e;").is_err());
        assert!(state_from_str("1;0;").is_err());
        let err = state_from_str("3;2;r,r;e,e;").unwrap_err();
        assert!(err.contains("Expected 3 bottle segments"), "{}", err);
    }

    #[test]
    fn test_parse_rejects_wrong_segment_length() {
        let err = state_from_str("1;4;r,g;").unwrap_err();
        assert!(err.contains("Bottle 0 has 2 cells"), "{}", err);
    }

    #[test]
    fn test_parse_rejects_unknown_cell() {
        let err = state_from_str("1;2;r,x;").unwrap_err();
        assert!(err.contains("Unrecognized cell 'x'"), "{}", err);
        // Multi-character cells are rejected too.
        assert!(state_from_str("1;2;rr,g;").is_err());
    }

    #[test]
    fn test_parse_rejects_floating_layers() {
        let err = state_from_str("1;3;r,e,g;").unwrap_err();
        assert!(err.contains("empty marker below a color"), "{}", err);
    }

    #[test]
    fn test_format_report_solved() {
        let result = SearchResult::Solved {
            plan: vec![PourAction { from: 0, to: 2 }, PourAction { from: 1, to: 0 }],
            total_cost: 2,
            expanded: 3,
        };
        assert_eq!(format_report(&result), "pour_0_2,pour_1_0;2;3");
    }

    #[test]
    fn test_format_report_trivial_solution() {
        let result = SearchResult::Solved {
            plan: Vec::new(),
            total_cost: 0,
            expanded: 0,
        };
        assert_eq!(format_report(&result), ";0;0");
    }

    #[test]
    fn test_format_report_exhausted() {
        let result = SearchResult::Exhausted { expanded: 12 };
        assert_eq!(format_report(&result), "NOSOLUTION");
    }

    #[test]
    fn test_display_round_trip() {
        // Rendering a parsed state and re-wrapping it in the header parses back
        // to the same state.
        let text = "3;4;e,e,r,g;e,y,y,g;e,e,e,e;";
        let state = state_from_str(text).unwrap();
        let rendered: Vec<String> = state.bottles().iter().map(|b| b.to_string()).collect();
        let round = format!("3;4;{};", rendered.join(";"));
        assert_eq!(state_from_str(&round).unwrap(), state);
    }
}
