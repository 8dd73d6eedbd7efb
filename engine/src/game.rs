//! Game state: the board plus score, move counter, and the largest tile seen.
//!
//! A `Game` is the single owner of its board. Callers only ever receive
//! copies of it, and every mutation goes through a move or a reset.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Direction, Tile};
use crate::error::{Error, Result};
use crate::spawn;

pub const DEFAULT_SIZE: usize = 4;
pub const DEFAULT_WINNING_TILE: Tile = 2048;

/// What happens once the winning tile is on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinPolicy {
    /// Reject further moves.
    #[default]
    Stop,
    /// Keep playing past the winning tile.
    Continue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    pub winning_tile: Tile,
    pub win_policy: WinPolicy,
}

impl Rules {
    pub fn validate(&self) -> Result<()> {
        if self.winning_tile < 4 || !self.winning_tile.is_power_of_two() {
            return Err(Error::InvalidWinningTile(self.winning_tile));
        }
        Ok(())
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            winning_tile: DEFAULT_WINNING_TILE,
            win_policy: WinPolicy::Stop,
        }
    }
}

/// What an accepted move did to the game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveReport {
    pub direction: Direction,
    pub previous: Board,
    /// Points added to the score by this move's merges.
    pub gained: u64,
    /// Cell index and value of the tile spawned after the move.
    pub spawned: Option<(usize, Tile)>,
    /// This move put the winning tile on the board for the first time.
    pub reached_win: bool,
}

pub struct Game {
    board: Board,
    score: u64,
    moves: u64,
    max_tile: Tile,
    rules: Rules,
    rng: StdRng,
}

impl Game {
    /// Start a game with default rules and an entropy-seeded RNG.
    pub fn new(dims: (usize, usize)) -> Result<Self> {
        Self::with_rules(dims, Rules::default(), None)
    }

    /// Start a reproducible game with default rules.
    pub fn with_seed(dims: (usize, usize), seed: u64) -> Result<Self> {
        Self::with_rules(dims, Rules::default(), Some(seed))
    }

    pub fn with_rules(dims: (usize, usize), rules: Rules, seed: Option<u64>) -> Result<Self> {
        let (rows, cols) = dims;
        if rows != cols {
            return Err(Error::NotSquare { rows, cols });
        }
        if rows < 2 {
            return Err(Error::TooSmall(rows));
        }
        rules.validate()?;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut game = Self {
            board: Board::empty(rows),
            score: 0,
            moves: 0,
            max_tile: 0,
            rules,
            rng,
        };
        game.reset();
        Ok(game)
    }

    /// Resume from an existing board, counters zeroed.
    #[cfg(test)]
    pub(crate) fn from_board(board: Board, rules: Rules, seed: u64) -> Self {
        Self {
            max_tile: board.max_tile(),
            board,
            score: 0,
            moves: 0,
            rules,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Clear the board and seed it with two random tiles.
    pub fn reset(&mut self) {
        self.board = Board::empty(self.board.size());
        self.score = 0;
        self.moves = 0;
        self.max_tile = 0;
        for _ in 0..2 {
            if let Some((_, value)) = spawn::add_random_tile(&mut self.board, &mut self.rng) {
                self.max_tile = self.max_tile.max(value);
            }
        }
        info!(
            "new {}x{} game, winning tile {}",
            self.board.size(),
            self.board.size(),
            self.rules.winning_tile
        );
    }

    /// Copy of the current board.
    pub fn board(&self) -> Board {
        self.board.clone()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn moves(&self) -> u64 {
        self.moves
    }

    /// Largest tile ever placed or produced in this game.
    pub fn max_tile(&self) -> Tile {
        self.max_tile
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.board.dimensions()
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// Move in `direction` and report the direction consumed.
    pub fn make_move(&mut self, direction: Direction) -> Direction {
        let _ = self.apply_move(direction);
        direction
    }

    /// Resolve `direction`, then spawn a tile and count the move if anything changed.
    ///
    /// Returns `None` when the move was rejected or left the board untouched.
    pub fn apply_move(&mut self, direction: Direction) -> Option<MoveReport> {
        if !self.accepts_moves() {
            debug!("move {direction} ignored: game is over");
            return None;
        }
        let was_won = self.won();
        let outcome = self.board.resolve(direction);
        if !outcome.changed {
            debug!("move {direction} changed nothing");
            return None;
        }

        let previous = std::mem::replace(&mut self.board, outcome.board);
        self.score += outcome.score;
        self.max_tile = self.max_tile.max(outcome.max_merged);
        let spawned = spawn::add_random_tile(&mut self.board, &mut self.rng);
        if let Some((_, value)) = spawned {
            self.max_tile = self.max_tile.max(value);
        }
        self.moves += 1;
        debug!(
            "move {} #{}: +{} (score {}, max tile {})",
            direction, self.moves, outcome.score, self.score, self.max_tile
        );

        let reached_win = !was_won && self.won();
        if reached_win {
            info!("reached {} after {} moves, score {}", self.rules.winning_tile, self.moves, self.score);
        } else if self.lost() {
            info!("no moves left after {} moves, score {}", self.moves, self.score);
        }

        Some(MoveReport {
            direction,
            previous,
            gained: outcome.score,
            spawned,
            reached_win,
        })
    }

    pub fn can_move(&self) -> bool {
        self.board.can_move()
    }

    /// True once the winning tile or anything larger is on the board.
    ///
    /// Larger tiles only appear under `WinPolicy::Continue`; with `Stop` this
    /// is the same as the largest tile equalling the winning tile.
    pub fn won(&self) -> bool {
        self.board.max_tile() >= self.rules.winning_tile
    }

    pub fn lost(&self) -> bool {
        !self.can_move() && !self.won()
    }

    /// True while moves can still change the game.
    pub fn is_playable(&self) -> bool {
        self.can_move() && (!self.won() || self.rules.win_policy == WinPolicy::Continue)
    }

    fn accepts_moves(&self) -> bool {
        !self.lost() && (self.rules.win_policy == WinPolicy::Continue || !self.won())
    }
}
