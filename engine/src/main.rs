use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::info;

use tfe_engine::console::{self, Ending};
use tfe_engine::protocol::{self, Session};
use tfe_engine::Config;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// JSON request/response lines on stdin/stdout
    Json,
    /// Interactive play with w/a/s/d, q to quit
    Console,
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Album-themed 2048 engine")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Mode::Json)]
    mode: Mode,

    /// Board side length, overriding the config file
    #[arg(long, value_name = "N")]
    size: Option<usize>,

    /// RNG seed, overriding the config file
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Using configuration file: {}", path.display());
            Config::from_toml(path)?
        }
        None => Config::default(),
    };
    if let Some(size) = cli.size {
        config.size = size;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let theme = config.theme()?;
    let mut game = config.new_game().context("cannot start game")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    match cli.mode {
        Mode::Json => {
            let mut session = Session::new(game, theme);
            protocol::serve(&mut session, stdin.lock(), stdout.lock())?;
        }
        Mode::Console => {
            let ending = console::play(&mut game, &theme, stdin.lock(), stdout.lock())?;
            if ending != Ending::Quit {
                info!("game finished: {ending:?}");
            }
        }
    }
    Ok(())
}
