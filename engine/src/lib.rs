//! Album-themed 2048: board model, move resolution, tile spawning and the
//! game state a front-end drives.
//!
//! - `board` holds the grid and the collapse/merge rules.
//! - `game` owns a board and keeps score, moves, and the largest tile.
//! - `protocol` and `console` are the two ways the binary exposes a game.

pub mod board;
pub mod config;
pub mod console;
mod error;
pub mod game;
pub mod protocol;
pub mod spawn;
pub mod theme;

pub use board::{Board, Direction, MoveOutcome, Tile};
pub use config::Config;
pub use error::{Error, Result};
pub use game::{Game, MoveReport, Rules, WinPolicy};
pub use theme::Theme;

/// Start a game on a `dims` board with default rules.
pub fn new_game(dims: (usize, usize)) -> Result<Game> {
    Game::new(dims)
}
