use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tileswap::config::Config;
use tileswap::groups::find_groups;
use tileswap::scoring::{self, ScoringRule, StandardRules};
use tileswap::sharing;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Analyze the board behind a share code", long_about = None)]
struct Args {
    /// JSON config file providing the palette and grid size
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Override the grid size from the config
    #[clap(long)]
    size: Option<usize>,

    /// Read the share code from a file instead of the command line
    #[clap(short, long, conflicts_with = "code")]
    file: Option<PathBuf>,

    /// The share code to analyze
    code: Option<String>,
}

fn read_code(args: &Args) -> Result<String> {
    match (&args.code, &args.file) {
        (Some(code), _) => Ok(code.trim().to_string()),
        (None, Some(path)) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(content.trim().to_string())
        }
        (None, None) => bail!("Provide a share code or --file"),
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
    config.validate().context("Invalid configuration")?;

    let code = read_code(&args)?;
    let grid = sharing::decode(&code, &config.palette, config.grid_size)
        .context("Invalid share code")?;

    println!("Board ({}x{}):\n{}\n", grid.size(), grid.size(), grid);

    let groups = find_groups(&grid);
    let rules = StandardRules;
    println!("Groups ({}):", groups.len());
    if groups.is_empty() {
        println!("  No groups of 2 or more.");
    }
    for (i, group) in groups.iter().enumerate() {
        let complete = group.len() == grid.count_color(group.color);
        println!(
            "  Group {}: {} x{} at ({}, {}), {}x{} {:?}{}, score {}",
            i + 1,
            group.color,
            group.len(),
            group.cells[0].0,
            group.cells[0].1,
            group.bounds.width(),
            group.bounds.height(),
            group.shape(),
            if complete { "" } else { " (color split)" },
            rules.score_group(group, &grid)
        );
    }

    let total = scoring::score(&groups, &grid, &rules);
    let max = scoring::max_possible_score(&grid);
    println!("\nScore: {} / {}", total, max);

    let mut counts: Vec<_> = scoring::count_by_color(&grid).into_iter().collect();
    counts.sort_by_key(|&(color, _)| config.palette_index(color));
    println!("\nColor counts:");
    for (color, count) in counts {
        println!(
            "  {} x{:<3} best {}",
            color,
            count,
            scoring::best_score_for_count(count)
        );
    }

    Ok(())
}
