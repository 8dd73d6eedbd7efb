use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, Tile};

/// Chance that a spawned tile is a 2 rather than a 4.
pub const TWO_PROBABILITY: f64 = 0.9;

/// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
///
/// Returns the cell index and the value written, or `None` if the board is full.
pub fn add_random_tile<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Option<(usize, Tile)> {
    let empties = board.empty_indices();
    let &idx = empties.choose(rng)?;
    let value = random_tile_value(rng);
    board.place(idx, value);
    Some((idx, value))
}

pub fn random_tile_value<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen::<f64>() < TWO_PROBABILITY {
        2
    } else {
        4
    }
}
