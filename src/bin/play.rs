use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tileswap::config::Config;
use tileswap::engine::{SelectOutcome, Session};
use tileswap::groups::group_at;

/// Simulated frame length used to drive swap transitions.
const FRAME: f64 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play the tile swap puzzle in the terminal", long_about = None)]
struct Args {
    /// JSON config file; missing fields use the defaults
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Seed for reproducible boards
    #[clap(short, long)]
    seed: Option<u64>,

    /// Override the grid size from the config
    #[clap(long)]
    size: Option<usize>,

    /// Start from a share code instead of a random board
    #[clap(long)]
    code: Option<String>,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(size) = args.size {
        config.grid_size = size;
    }
    Ok(config)
}

fn print_status(session: &Session) {
    println!("---------------------");
    println!(
        "Moves: {}, Score: {} / {}",
        session.moves(),
        session.score(),
        session.max_score()
    );
    println!("{}", session.render());
}

fn run_to_completion(session: &mut Session) {
    println!("{}", session.render());
    while !session.tick(FRAME) {}
    let history = session.score_history();
    if let [.., before, after] = history {
        match after.cmp(before) {
            std::cmp::Ordering::Greater => println!("Score up: {} -> {}", before, after),
            std::cmp::Ordering::Less => println!("Score down: {} -> {}", before, after),
            std::cmp::Ordering::Equal => println!("Score unchanged."),
        }
    }
}

fn parse_cells(parts: &[&str]) -> Option<Vec<usize>> {
    parts.iter().map(|p| p.parse::<usize>().ok()).collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(&args)?;
    let mut session = Session::new(config, args.seed).context("Invalid configuration")?;
    if let Some(code) = &args.code {
        session
            .load_share_code(code)
            .context("Failed to load share code")?;
    }

    println!("Welcome to Tile Swap!");
    println!("Rebuild every color as a line or a solid rectangle.");

    loop {
        print_status(&session);

        if session.max_score() > 0 && session.score() == session.max_score() {
            println!();
            println!("---------------------");
            println!("🎉 PERFECT BOARD! 🎉");
            println!("Score: {}", session.score());
            println!("Total Moves: {}", session.moves());
            println!("---------------------");
            println!("Enter 'n' for a new board or 'q' to quit.");
        }

        print!("Enter 'row col' to select, 'r1 c1 r2 c2' to swap, 'n' new, 'c' code, 'l CODE' load, 'q' quit: ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        if io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?
            == 0
        {
            println!();
            break;
        }
        let parts: Vec<&str> = input.split_whitespace().collect();

        match parts.as_slice() {
            ["q"] => {
                println!("Thanks for playing!");
                break;
            }
            ["n"] => {
                session.new_board();
                println!("New board.");
            }
            ["c"] => match session.share_code() {
                Some(code) => println!("Share code: {}", code),
                None => println!("This board cannot be shared with the current palette."),
            },
            ["l", code] => match session.load_share_code(code) {
                Ok(()) => println!("Loaded board from share code."),
                Err(e) => println!("Invalid share code: {}", e),
            },
            [_, _] => match parse_cells(&parts).as_deref() {
                Some(&[r, c]) => match session.select((r, c)) {
                    Ok(SelectOutcome::Selected(cell)) => match group_at(session.grid(), cell) {
                        Some(group) => println!(
                            "Selected {:?}, part of a {:?} group of {}.",
                            cell,
                            group.shape(),
                            group.len()
                        ),
                        None => println!("Selected {:?}.", cell),
                    },
                    Ok(SelectOutcome::Deselected) => println!("Selection cleared."),
                    Ok(SelectOutcome::SwapStarted { from, to, .. }) => {
                        println!("Swapping {:?} and {:?}...", from, to);
                        run_to_completion(&mut session);
                    }
                    Err(e) => println!("Invalid move: {}", e),
                },
                _ => println!("Invalid input: Please enter numbers for row and column (e.g., '3 4')."),
            },
            [_, _, _, _] => match parse_cells(&parts).as_deref() {
                Some(&[r1, c1, r2, c2]) => match session.request_swap((r1, c1), (r2, c2)) {
                    Ok(_) => {
                        println!("Swapping {:?} and {:?}...", (r1, c1), (r2, c2));
                        run_to_completion(&mut session);
                    }
                    Err(e) => println!("Invalid move: {}", e),
                },
                _ => println!("Invalid input: Please enter four numbers (e.g., '0 1 2 3')."),
            },
            _ => println!("Invalid input format. Use 'row col', 'r1 c1 r2 c2', 'n', 'c', 'l CODE', or 'q'."),
        }
    }

    Ok(())
}
