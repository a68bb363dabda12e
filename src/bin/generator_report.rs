use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tileswap::config::{Config, PlanStrategy};
use tileswap::generator::generate;
use tileswap::scoring::{self, StandardRules};
use tileswap::sharing;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Generate seeded boards and report on them", long_about = None)]
struct Args {
    /// JSON config file; missing fields use the defaults
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Number of boards to generate
    #[clap(short, long, default_value_t = 100)]
    boards: u64,

    /// Seed of the first board; board `i` uses `seed + i`, wrapping at `u64::MAX`
    #[clap(short, long, default_value_t = 0)]
    seed: u64,

    /// Override the grid size from the config
    #[clap(long)]
    size: Option<usize>,

    /// Override the planner strategy
    #[clap(long, value_enum)]
    planner: Option<PlanStrategy>,
}

#[derive(Default)]
struct Report {
    size_histogram: BTreeMap<usize, usize>,
    groups: usize,
    scores: Vec<u64>,
    max_scores: Vec<u64>,
    colors_used: usize,
    violations: Vec<String>,
}

/// Seed of the `i`-th board in a run starting at `start`.
fn board_seed(start: u64, i: u64) -> u64 {
    start.wrapping_add(i)
}

fn average(values: &[u64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(size) = args.size {
        config.grid_size = size;
    }
    if let Some(planner) = args.planner {
        config.planner = planner;
    }
    config.validate().context("Invalid configuration")?;

    println!(
        "Generating {} boards ({}x{}, groups {}-{}, {:?} planner, seeds {}..{})...",
        args.boards,
        config.grid_size,
        config.grid_size,
        config.min_group_size,
        config.max_group_size,
        config.planner,
        args.seed,
        board_seed(args.seed, args.boards)
    );

    let mut report = Report::default();
    for i in 0..args.boards {
        let seed = board_seed(args.seed, i);
        let board = generate(&config, &mut SmallRng::seed_from_u64(seed));

        for &size in &board.plan {
            *report.size_histogram.entry(size).or_insert(0) += 1;
        }
        report.groups += board.plan.len();

        let plan_sum: usize = board.plan.iter().sum();
        if plan_sum != config.total_cells() {
            report
                .violations
                .push(format!("seed {}: plan sums to {}", seed, plan_sum));
        }
        if let Some(size) = board
            .plan
            .iter()
            .find(|&&s| s < config.min_group_size || s > config.max_group_size)
        {
            report
                .violations
                .push(format!("seed {}: group of {} out of bounds", seed, size));
        }
        if !board.grid.is_full() {
            report.violations.push(format!("seed {}: board has empty cells", seed));
        }

        let counts = scoring::count_by_color(&board.grid);
        for (color, count) in &counts {
            if *count < 2 {
                report
                    .violations
                    .push(format!("seed {}: color {} appears once", seed, color));
            }
        }
        report.colors_used += counts.len();

        match sharing::encode(&board.grid, &config.palette) {
            Ok(code) => match sharing::decode(&code, &config.palette, config.grid_size) {
                Ok(decoded) if decoded == board.grid => {}
                Ok(_) => report
                    .violations
                    .push(format!("seed {}: share code round trip changed the board", seed)),
                Err(e) => report
                    .violations
                    .push(format!("seed {}: share code does not decode: {}", seed, e)),
            },
            Err(e) => log::warn!("seed {}: board cannot be shared: {}", seed, e),
        }

        report
            .scores
            .push(scoring::score_grid(&board.grid, &StandardRules));
        report
            .max_scores
            .push(scoring::max_possible_score(&board.grid));
    }

    println!("\n--- Group Size Histogram ---");
    for (size, count) in &report.size_histogram {
        let share = *count as f64 / args.boards.max(1) as f64;
        println!("Size {:>3}: {:>6} groups ({:.2} per board)", size, count, share);
    }

    let boards = args.boards.max(1) as f64;
    println!("\n--- Board Statistics ---");
    println!("Average groups per board:  {:.2}", report.groups as f64 / boards);
    println!("Average colors per board:  {:.2}", report.colors_used as f64 / boards);
    println!("Average starting score:    {:.2}", average(&report.scores));
    println!("Average max score:         {:.2}", average(&report.max_scores));
    println!(
        "Highest max score:         {}",
        report.max_scores.iter().max().copied().unwrap_or(0)
    );

    println!("\n--- Invariant Checks ---");
    if report.violations.is_empty() {
        println!("All {} boards passed.", args.boards);
    } else {
        for violation in &report.violations {
            println!("FAILED {}", violation);
        }
        anyhow::bail!("{} invariant violations", report.violations.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_seed_wraps_near_max() {
        assert_eq!(board_seed(5, 3), 8);
        assert_eq!(board_seed(u64::MAX, 0), u64::MAX);
        assert_eq!(board_seed(u64::MAX, 1), 0);
        assert_eq!(board_seed(u64::MAX - 1, 100), 98);
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[2, 4, 9]), 5.0);
    }
}
