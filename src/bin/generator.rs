use clap::Parser;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::process;
use watersort_solver::engine::Color;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of colors to deal (1 to 5)
    #[clap(short, long, default_value_t = 3)]
    colors: usize,

    /// Capacity of every bottle
    #[clap(long, default_value_t = 4)]
    capacity: usize,

    /// Number of extra empty bottles
    #[clap(short, long, default_value_t = 2)]
    empty: usize,

    /// Seed for the random number generator
    #[clap(long, default_value_t = 514514)]
    seed: u64,
}

/// Deals `capacity` layers of each chosen color across `colors` full bottles,
/// shuffled deterministically by the seed, and renders the instance in the
/// `numBottles;capacity;seg;...` text format (first cell of a segment is the
/// top layer).
fn generate(colors: usize, capacity: usize, empty: usize, seed: u64) -> String {
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut deck: Vec<Color> = Color::ALL[..colors]
        .iter()
        .flat_map(|&c| std::iter::repeat(c).take(capacity))
        .collect();
    deck.shuffle(&mut rng);

    let num_bottles = colors + empty;
    let mut segments = Vec::with_capacity(num_bottles);
    for chunk in deck.chunks(capacity) {
        let cells: Vec<String> = chunk.iter().map(|c| c.to_char().to_string()).collect();
        segments.push(cells.join(","));
    }
    for _ in 0..empty {
        segments.push(vec!["e"; capacity].join(","));
    }

    format!("{};{};{};", num_bottles, capacity, segments.join(";"))
}

fn main() {
    let args = Args::parse();

    if args.colors == 0 || args.colors > Color::ALL.len() {
        eprintln!(
            "Number of colors must be between 1 and {}",
            Color::ALL.len()
        );
        process::exit(2);
    }
    if args.capacity == 0 {
        eprintln!("Capacity must be positive");
        process::exit(2);
    }

    println!(
        "{}",
        generate(args.colors, args.capacity, args.empty, args.seed)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use watersort_solver::utils::state_from_str;

    #[test]
    fn test_generate_is_deterministic_per_seed() {
        let a = generate(3, 4, 2, 123);
        let b = generate(3, 4, 2, 123);
        assert_eq!(a, b, "Instances with the same seed must be identical");

        let c = generate(3, 4, 2, 124);
        assert_ne!(a, c, "Instances with different seeds should differ");
    }

    #[test]
    fn test_generated_instance_parses() {
        let text = generate(3, 4, 2, 514514);
        let state = state_from_str(&text).unwrap();
        assert_eq!(state.bottles().len(), 5);
        assert_eq!(state.total_layers(), 12);
        // The last two bottles are the empty ones.
        assert!(state.bottles()[3].is_empty());
        assert!(state.bottles()[4].is_empty());
    }

    #[test]
    fn test_generated_instance_deals_full_color_counts() {
        let text = generate(4, 3, 1, 7);
        let state = state_from_str(&text).unwrap();
        for &color in &Color::ALL[..4] {
            let count: usize = state
                .bottles()
                .iter()
                .map(|b| b.layers().iter().filter(|&&l| l == color).count())
                .sum();
            assert_eq!(count, 3, "Color {:?} must appear capacity times", color);
        }
    }
}
