use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process;
use watersort_solver::engine::{GoalPolicy, PuzzleState};
use watersort_solver::search::{run, SearchResult, Strategy};
use watersort_solver::utils::{format_report, state_from_str};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Search strategy tag: BF, DF, ID, UC, GR1, GR2, AS1 or AS2
    #[clap(short, long)]
    strategy: String,

    /// Additionally require distinct top colors across non-empty bottles
    #[clap(long)]
    distinct_tops: bool,

    /// Replay the plan, printing every intermediate state
    #[clap(short, long)]
    visualize: bool,

    /// Path to the puzzle file (numBottles;capacity;seg;seg;... format)
    puzzle_file: PathBuf,
}

fn read_puzzle_file(path: &PathBuf) -> Result<PuzzleState, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;
    state_from_str(&content).map_err(|e| format!("Invalid puzzle format: {}", e))
}

fn visualize_plan(initial: &PuzzleState, result: &SearchResult) {
    println!("Initial state:\n{}\n", initial);
    if let SearchResult::Solved { plan, .. } = result {
        let mut state = initial.clone();
        for action in plan {
            println!("Action: {}", action);
            match state.apply(*action) {
                Some((next, _)) => state = next,
                None => {
                    // Plans from the engine are always legal; stop on a bug.
                    eprintln!("Plan action {} is not legal here", action);
                    return;
                }
            }
            println!("{}\n", state);
        }
    }
}

fn main() {
    let args = Args::parse();

    // Reject an unknown strategy before any search state is allocated.
    let strategy = match args.strategy.parse::<Strategy>() {
        Ok(strategy) => strategy,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };
    let policy = if args.distinct_tops {
        GoalPolicy::DistinctTopColors
    } else {
        GoalPolicy::AllUniform
    };

    let initial = match read_puzzle_file(&args.puzzle_file) {
        Ok(state) => state,
        Err(e) => {
            eprintln!(
                "Failed to load puzzle from {}: {}",
                args.puzzle_file.display(),
                e
            );
            process::exit(2);
        }
    };

    println!("Loaded puzzle from {}", args.puzzle_file.display());
    println!("Searching with strategy {}...\n", strategy);

    let result = run(&initial, strategy, policy);

    if args.visualize {
        visualize_plan(&initial, &result);
    }

    match &result {
        SearchResult::Solved {
            plan,
            total_cost,
            expanded,
        } => {
            println!("Solution found: {} actions", plan.len());
            println!("Total cost: {}", total_cost);
            println!("Nodes expanded: {}", expanded);
        }
        SearchResult::Exhausted { expanded } => {
            println!("No solution exists ({} nodes expanded)", expanded);
        }
    }
    println!("{}", format_report(&result));
}
