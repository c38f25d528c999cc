mod game;
mod term;

use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use grid_snake::config::{DEFAULT_BOARD_SIZE, DEFAULT_CELL_SIZE, DEFAULT_SNAKE_COLOR};
use grid_snake::Settings;
use log::{error, info};
use simplelog::{Config, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "grid-snake", about = "Snake on a square grid in the terminal")]
struct Args {
    /// Snake colour as #rrggbb
    #[arg(long, default_value = DEFAULT_SNAKE_COLOR)]
    snake_color: String,

    /// Milliseconds between steps
    #[arg(long, default_value_t = 100)]
    speed: u64,

    /// Board side in pixels, a multiple of the cell size
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
    board_size: i32,

    /// Cell side in pixels
    #[arg(long, default_value_t = DEFAULT_CELL_SIZE)]
    cell_size: i32,

    /// Seed for food placement, random when absent
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "grid-snake.log")]
    log_file: PathBuf,

    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // The terminal is ours once the game starts, so log to a file
    let log_file = File::create(&args.log_file)
        .with_context(|| format!("creating log file {}", args.log_file.display()))?;
    WriteLogger::init(args.log_level, Config::default(), log_file)?;
    info!("starting grid-snake");

    let settings = Settings {
        snake_color: args.snake_color,
        game_speed: Duration::from_millis(args.speed),
        board_size: args.board_size,
        cell_size: args.cell_size,
    };

    let mut game = game::SnakeGame::new(settings, args.seed)?;
    game.setup()?;
    let res = game.run();
    // Give the terminal back even when the game failed
    game.restore()?;

    if let Err(e) = &res {
        error!("terminal error: {}", e);
    }
    Ok(res?)
}
