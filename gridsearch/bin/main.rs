use std::{
    cell::Cell,
    path::PathBuf,
    process::ExitCode,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Context};
use clap::Parser;
use gridsearch::{
    load_grid, CellState, Distance, Grid, Heuristic, PathFinder, Point, SearchConfig,
    SearchOutcome,
};
use log::{info, warn};

/// Find a shortest 4-connected path through a grid with A*
#[derive(Parser, Debug)]
#[command(name = "gridsearch", version)]
struct Args {
    /// Grid to search: an image (dark pixels are barriers) or an ASCII grid
    /// (`X`/`#` barrier, `.` open, `S` start, `E` end)
    grid: PathBuf,

    /// Start cell as `row,col`, defaults to the `S` marker of an ASCII grid
    #[arg(long)]
    start: Option<Point>,

    /// Goal cell as `row,col`, defaults to the `E` marker of an ASCII grid
    #[arg(long)]
    goal: Option<Point>,

    /// JSON search configuration, flags below take precedence over it
    #[arg(long)]
    config: Option<PathBuf>,

    /// manhattan, euclidean or chebyshev
    #[arg(long)]
    heuristic: Option<Distance>,

    /// Give up after this many iterations
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Give up after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print the grid after every iteration
    #[arg(long)]
    trace: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether a path was found
fn run(args: Args) -> Result<bool, anyhow::Error> {
    let mut config = match &args.config {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::default(),
    };
    if let Some(heuristic) = args.heuristic {
        config.heuristic = heuristic;
    }
    if args.max_iterations.is_some() {
        config.max_iterations = args.max_iterations;
    }

    let mut grid = load_grid(&args.grid)?;
    let start = args
        .start
        .or_else(|| grid.marked(CellState::Start))
        .ok_or_else(|| anyhow!("No start given and the grid has no `S` marker"))?;
    let goal = args
        .goal
        .or_else(|| grid.marked(CellState::End))
        .ok_or_else(|| anyhow!("No goal given and the grid has no `E` marker"))?;

    info!(
        "{}x{} grid, {} -> {} using {}",
        grid.rows(),
        grid.columns(),
        start,
        goal,
        config.heuristic
    );

    let deadline = args
        .timeout_ms
        .map(|ms| Instant::now() + Duration::from_millis(ms));
    let limit = config.max_iterations.unwrap_or(usize::MAX);

    // the finder borrows the grid, so painting has to wait until it is dropped
    let (outcome, status, stats) = {
        let mut finder = PathFinder::new(&grid, start, goal, config.heuristic)
            .context("Cannot start search")?;

        let iterations = Cell::new(0usize);
        let cancel = || {
            iterations.get() >= limit || deadline.is_some_and(|d| Instant::now() >= d)
        };

        let outcome = if args.trace {
            finder.run_with(
                |finder| {
                    iterations.set(iterations.get() + 1);
                    print_frame(&grid, finder, iterations.get());
                },
                &cancel,
            )
        } else {
            finder.run(|| iterations.set(iterations.get() + 1), &cancel)
        };

        (outcome, finder.status_table().clone(), finder.stats())
    };

    grid.paint(&status, start, goal, &outcome);
    print!("{}", grid);

    info!(
        "iterations={} expanded={} relaxations={} max_frontier={}",
        stats.iterations, stats.expanded, stats.relaxations, stats.max_frontier
    );

    match outcome {
        SearchOutcome::PathFound(result) => {
            println!(
                "The goal {} is {} steps away from the start {}",
                result.goal, result.total_cost, result.start
            );
            Ok(true)
        }
        SearchOutcome::Exhausted => {
            println!("No path from {} to {}", start, goal);
            Ok(false)
        }
        SearchOutcome::Cancelled => {
            warn!("Search cancelled before reaching the goal");
            println!("Search stopped before a path was found");
            Ok(false)
        }
    }
}

/// Print the grid with the search progress so far
fn print_frame<H: Heuristic<Point>>(
    grid: &Grid,
    finder: &PathFinder<'_, Grid, H>,
    iteration: usize,
) {
    let mut frame = grid.clone();
    frame.paint(
        finder.status_table(),
        finder.start(),
        finder.goal(),
        &SearchOutcome::Exhausted,
    );
    println!("iteration {}\n{}", iteration, frame);
}
