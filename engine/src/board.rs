//! Square tile grid and the collapse/merge move resolution.
//!
//! Cells are stored row-major in a flat buffer. A move is resolved one line
//! at a time: every line is read in the order tiles travel toward the
//! leading edge, so a single collapse routine serves all four directions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type Tile = u32;

/// Largest representable tile. It never merges further.
pub const MAX_TILE: Tile = 1 << 31;

/// True for 0 (empty) and for powers of two up to `MAX_TILE`.
pub fn is_valid_tile(value: Tile) -> bool {
    value == 0 || value.is_power_of_two()
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(Error::UnknownDirection(s.to_string())),
        }
    }
}

/// Result of resolving one direction against a board. No tile is spawned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    /// Sum of every tile produced by a merge.
    pub score: u64,
    /// Largest tile produced by a merge, 0 when nothing merged.
    pub max_merged: Tile,
    pub changed: bool,
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Tile>,
}

impl Board {
    /// An all-empty `size`x`size` board. Callers guarantee `size > 0`.
    pub(crate) fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a board from explicit rows. Every row must be as long as there are
    /// rows, and every cell must be 0 or a power of two.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(Error::TooSmall(0));
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != size) {
            return Err(Error::NotSquare {
                rows: size,
                cols: bad.len(),
            });
        }
        if let Some(&bad) = rows.iter().flatten().find(|&&v| !is_valid_tile(v)) {
            return Err(Error::InvalidTile(bad));
        }
        Ok(Self {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.size, self.size)
    }

    pub fn get(&self, row: usize, col: usize) -> Tile {
        self.cells[row * self.size + col]
    }

    /// Row-major view of every cell.
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        self.cells.chunks(self.size).map(|r| r.to_vec()).collect()
    }

    pub(crate) fn place(&mut self, idx: usize, value: Tile) {
        self.cells[idx] = value;
    }

    pub fn empty_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, &v)| if v == 0 { Some(i) } else { None })
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Total value of all tiles. Merges conserve it; only spawns raise it.
    pub fn sum(&self) -> u64 {
        self.cells.iter().map(|&v| u64::from(v)).sum()
    }

    /// True when an empty cell exists or two equal tiles touch along a row or column.
    pub fn can_move(&self) -> bool {
        if !self.is_full() {
            return true;
        }
        let n = self.size;
        for r in 0..n {
            for c in 0..n {
                let idx = r * n + c;
                let v = self.cells[idx];
                if v == MAX_TILE {
                    continue;
                }
                if c + 1 < n && self.cells[idx + 1] == v {
                    return true;
                }
                if r + 1 < n && self.cells[idx + n] == v {
                    return true;
                }
            }
        }
        false
    }

    /// Slide and merge every line toward `direction`.
    pub fn resolve(&self, direction: Direction) -> MoveOutcome {
        let mut new_board = self.clone();
        let mut total_score = 0;
        let mut max_merged = 0;
        let mut changed = false;

        for line in 0..self.size {
            let indices = line_indices(self.size, direction, line);
            let values: Vec<Tile> = indices.iter().map(|&i| self.cells[i]).collect();
            let collapsed = collapse_line(&values);
            total_score += collapsed.score;
            max_merged = max_merged.max(collapsed.max_merged);
            for (offset, &idx) in indices.iter().enumerate() {
                if new_board.cells[idx] != collapsed.line[offset] {
                    changed = true;
                }
                new_board.cells[idx] = collapsed.line[offset];
            }
        }

        MoveOutcome {
            board: new_board,
            score: total_score,
            max_merged,
            changed,
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.cells.chunks(self.size)).finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.size).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            write!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

/// Cell indices of one line, ordered from the edge tiles collapse toward.
fn line_indices(size: usize, direction: Direction, line: usize) -> Vec<usize> {
    match direction {
        Direction::Left => (0..size).map(|i| line * size + i).collect(),
        Direction::Right => (0..size).map(|i| line * size + (size - 1 - i)).collect(),
        Direction::Up => (0..size).map(|i| i * size + line).collect(),
        Direction::Down => (0..size).map(|i| (size - 1 - i) * size + line).collect(),
    }
}

struct Collapsed {
    line: Vec<Tile>,
    score: u64,
    max_merged: Tile,
}

/// Compact non-zero tiles to the front, merge equal neighbours once each,
/// and pad with zeros. A merged tile is never a merge source again.
fn collapse_line(values: &[Tile]) -> Collapsed {
    let tiles: Vec<Tile> = values.iter().copied().filter(|&v| v != 0).collect();

    let mut line = Vec::with_capacity(values.len());
    let mut score = 0;
    let mut max_merged = 0;
    let mut i = 0;
    while i < tiles.len() {
        if i + 1 < tiles.len() && tiles[i] == tiles[i + 1] && tiles[i] < MAX_TILE {
            let merged = tiles[i] * 2;
            line.push(merged);
            score += u64::from(merged);
            max_merged = max_merged.max(merged);
            i += 2;
        } else {
            line.push(tiles[i]);
            i += 1;
        }
    }
    line.resize(values.len(), 0);

    Collapsed {
        line,
        score,
        max_merged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[Tile]) -> Board {
        let n = values.len();
        let mut rows = vec![values.to_vec()];
        rows.resize(n, vec![0; n]);
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn collapse_line_cases() {
        assert_eq!(collapse_line(&[0, 0, 0, 0]).line, vec![0, 0, 0, 0]);
        assert_eq!(collapse_line(&[2, 4, 2, 4]).line, vec![2, 4, 2, 4]);
        assert_eq!(collapse_line(&[2, 2, 4, 4]).line, vec![4, 8, 0, 0]);
        assert_eq!(collapse_line(&[2, 0, 0, 2]).line, vec![4, 0, 0, 0]);
        assert_eq!(collapse_line(&[0, 4, 4, 4]).line, vec![8, 4, 0, 0]);
        assert_eq!(collapse_line(&[8, 0, 0, 0]).line, vec![8, 0, 0, 0]);
    }

    #[test]
    fn no_cascading_merges() {
        let c = collapse_line(&[2, 2, 2, 2]);
        assert_eq!(c.line, vec![4, 4, 0, 0]);
        assert_eq!(c.score, 8);
        assert_eq!(c.max_merged, 4);

        let c = collapse_line(&[4, 2, 2, 0]);
        assert_eq!(c.line, vec![4, 4, 0, 0]);
        assert_eq!(c.score, 4);
    }

    #[test]
    fn slide_without_merge_counts_as_change() {
        let out = row(&[2, 0, 0, 0]).resolve(Direction::Right);
        assert!(out.changed);
        assert_eq!(out.score, 0);
        assert_eq!(out.board.to_rows()[0], vec![0, 0, 0, 2]);
    }

    #[test]
    fn merge_left_and_right() {
        let left = row(&[2, 2, 4, 0]).resolve(Direction::Left);
        assert_eq!(left.board.to_rows()[0], vec![4, 4, 0, 0]);
        assert_eq!(left.score, 4);

        let right = row(&[2, 2, 4, 0]).resolve(Direction::Right);
        assert_eq!(right.board.to_rows()[0], vec![0, 0, 4, 4]);
        assert_eq!(right.score, 4);
    }

    #[test]
    fn resolve_columns() {
        let b = Board::from_rows(vec![
            vec![2, 0, 4, 0],
            vec![2, 0, 0, 0],
            vec![0, 8, 4, 0],
            vec![4, 8, 2, 2],
        ])
        .unwrap();

        let up = b.resolve(Direction::Up);
        assert_eq!(
            up.board.to_rows(),
            vec![
                vec![4, 16, 8, 2],
                vec![4, 0, 2, 0],
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
            ]
        );
        assert_eq!(up.score, 4 + 16 + 8);
        assert_eq!(up.max_merged, 16);

        let down = b.resolve(Direction::Down);
        assert_eq!(
            down.board.to_rows(),
            vec![
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
                vec![4, 0, 8, 0],
                vec![4, 16, 2, 2],
            ]
        );
    }

    #[test]
    fn second_identical_resolve_is_a_no_op() {
        let b = Board::from_rows(vec![
            vec![2, 2, 2, 0],
            vec![0, 4, 0, 4],
            vec![8, 0, 8, 8],
            vec![0, 0, 0, 2],
        ])
        .unwrap();
        for dir in Direction::ALL {
            let first = b.resolve(dir);
            assert!(first.changed, "{dir} should change the board");
            let second = first.board.resolve(dir);
            assert!(!second.changed, "{dir} repeated should not change");
            assert_eq!(second.board, first.board);
        }
    }

    #[test]
    fn merges_conserve_total_value() {
        let b = Board::from_rows(vec![
            vec![2, 2, 4, 4],
            vec![8, 8, 8, 0],
            vec![16, 0, 16, 2],
            vec![2, 4, 2, 4],
        ])
        .unwrap();
        for dir in Direction::ALL {
            assert_eq!(b.resolve(dir).board.sum(), b.sum());
        }
    }

    #[test]
    fn empty_and_locked_lines_do_not_change() {
        assert!(!Board::empty(4).resolve(Direction::Left).changed);
        let locked = Board::from_rows(vec![vec![2, 4], vec![4, 2]]).unwrap();
        for dir in Direction::ALL {
            assert!(!locked.resolve(dir).changed);
        }
    }

    #[test]
    fn can_move_checks_both_axes() {
        let row_pair = Board::from_rows(vec![vec![2, 2], vec![4, 8]]).unwrap();
        assert!(row_pair.can_move());
        let col_pair = Board::from_rows(vec![vec![2, 4], vec![2, 8]]).unwrap();
        assert!(col_pair.can_move());
        let stuck = Board::from_rows(vec![
            vec![2, 4, 2],
            vec![4, 2, 4],
            vec![2, 4, 2],
        ])
        .unwrap();
        assert!(!stuck.can_move());
        assert!(Board::from_rows(vec![vec![2, 0], vec![4, 8]]).unwrap().can_move());
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Board::from_rows(vec![vec![0, 0, 0], vec![0, 0, 0]]).unwrap_err();
        assert!(matches!(err, Error::NotSquare { rows: 2, cols: 3 }));
    }

    #[test]
    fn from_rows_rejects_empty_grid() {
        assert!(matches!(Board::from_rows(vec![]), Err(Error::TooSmall(0))));
    }

    #[test]
    fn from_rows_rejects_non_tile_values() {
        let err = Board::from_rows(vec![vec![3, 3], vec![0, 0]]).unwrap_err();
        assert!(matches!(err, Error::InvalidTile(3)));
        let err = Board::from_rows(vec![vec![2, 0], vec![0, 12]]).unwrap_err();
        assert!(matches!(err, Error::InvalidTile(12)));
    }

    #[test]
    fn largest_tile_does_not_overflow() {
        let b = row(&[MAX_TILE, MAX_TILE]);
        let out = b.resolve(Direction::Left);
        assert!(!out.changed);
        assert_eq!(out.score, 0);
        assert!(!Board::from_rows(vec![vec![MAX_TILE, 2], vec![MAX_TILE, 4]]).unwrap().can_move());
        assert_eq!(collapse_line(&[MAX_TILE / 2, MAX_TILE / 2]).line, vec![MAX_TILE, 0]);
    }

    #[test]
    fn direction_parsing() {
        assert_eq!("Left".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!(" down ".parse::<Direction>().unwrap(), Direction::Down);
        assert!(matches!(
            "sideways".parse::<Direction>(),
            Err(Error::UnknownDirection(_))
        ));
    }

    #[test]
    fn display_renders_rows() {
        let b = Board::from_rows(vec![vec![2, 0], vec![0, 4]]).unwrap();
        assert_eq!(b.to_string(), "2 0\n0 4");
    }
}
