//! Tile Puzzles headless driver
//!
//! Builds a board from a preset (`slider`, `roller`, `hex`) or a JSON
//! configuration file, shuffles it with a seed and prints it.

use std::process::ExitCode;

use clap::Parser;
use tile_puzzles::platform::init_logging;
use tile_puzzles::{Board, BoardConfig, ConfigError, Puzzle, PuzzleKind};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Config { path: String, source: ConfigError },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "tile-puzzles", about = "Build, shuffle and print a tile puzzle board")]
struct Cli {
    /// Preset name or path to a JSON board configuration
    config: Option<String>,

    /// Shuffle seed
    #[arg(default_value_t = 42)]
    seed: u64,

    /// Print the shuffled puzzle as a JSON snapshot
    #[arg(long)]
    json: bool,
}

fn load_config(arg: Option<&str>) -> Result<BoardConfig, CliError> {
    let Some(arg) = arg else {
        return Ok(BoardConfig::preset(PuzzleKind::Slider));
    };
    if let Some(kind) = PuzzleKind::from_str(arg) {
        return Ok(BoardConfig::preset(kind));
    }
    let json = std::fs::read_to_string(arg).map_err(|source| CliError::Read {
        path: arg.to_string(),
        source,
    })?;
    BoardConfig::from_json(&json).map_err(|source| CliError::Config {
        path: arg.to_string(),
        source,
    })
}

fn print_board(label: &str, board: &Board) {
    println!("{label} ({}, solved: {}):", board.kind().as_str(), board.is_solved());
    print!("{board}");
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    let path = cli.config.clone().unwrap_or_else(|| "slider".to_string());
    let mut puzzle =
        Puzzle::new(&config, cli.seed).map_err(|source| CliError::Config { path, source })?;
    log::info!("Tile Puzzles starting with seed {}", cli.seed);

    if !cli.json {
        print_board("Initial", puzzle.board());
    }
    puzzle.on_shuffle_request(glam::Vec2::ZERO);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&puzzle.snapshot())?);
        return Ok(());
    }

    print_board("Shuffled", puzzle.board());
    let board = puzzle.board();
    println!(
        "{} of {} shapes drawn, {} vertices, buffer revision {}",
        board.visible_shapes(),
        board.tile_buffer().shape_count(),
        board.tile_buffer().vertices().len(),
        board.tile_buffer().revision()
    );
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["tile-puzzles"]).unwrap();
        assert_eq!(cli.config, None);
        assert_eq!(cli.seed, 42);
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_positional_and_flag() {
        let cli = Cli::try_parse_from(["tile-puzzles", "hex", "7", "--json"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("hex"));
        assert_eq!(cli.seed, 7);
        assert!(cli.json);
        assert!(Cli::try_parse_from(["tile-puzzles", "hex", "seven"]).is_err());
    }

    #[test]
    fn test_load_config() {
        assert_eq!(load_config(None).unwrap().kind, PuzzleKind::Slider);
        assert_eq!(load_config(Some("roller")).unwrap().kind, PuzzleKind::Roller);
        assert!(matches!(
            load_config(Some("/nonexistent/board.json")),
            Err(CliError::Read { .. })
        ));
    }
}
