//! JSON-lines protocol between a front-end and one game session.
//!
//! Every stdin line is one request object tagged by `type`; every request
//! gets exactly one response line. Blank lines are skipped.

use std::io::{self, BufRead, Write};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::board::{Direction, Tile};
use crate::game::Game;
use crate::theme::Theme;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename = "reset")]
    Reset { id: u64 },
    #[serde(rename = "state")]
    State { id: u64 },
    #[serde(rename = "move")]
    Move { id: u64, direction: Direction },
}

/// Counters and end-of-game flags shared by every state-bearing response.
#[derive(Debug, Serialize, PartialEq)]
pub struct Status {
    pub score: u64,
    pub moves: u64,
    pub max_tile: Tile,
    pub max_tile_label: Option<String>,
    pub won: bool,
    pub lost: bool,
    pub playable: bool,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    #[serde(rename = "state")]
    State {
        id: u64,
        board: Vec<Vec<Tile>>,
        labels: Vec<Vec<Option<String>>>,
        #[serde(flatten)]
        status: Status,
    },
    #[serde(rename = "move_result")]
    MoveResult {
        id: u64,
        direction: Direction,
        previous_board: Vec<Vec<Tile>>,
        final_board: Vec<Vec<Tile>>,
        labels: Vec<Vec<Option<String>>>,
        gained: u64,
        spawned_index: Option<usize>,
        spawned_value: Option<Tile>,
        #[serde(flatten)]
        status: Status,
    },
    #[serde(rename = "error")]
    Error { id: Option<u64>, message: String },
}

/// A game plus the theme its responses are labelled with.
pub struct Session {
    game: Game,
    theme: Theme,
}

impl Session {
    pub fn new(game: Game, theme: Theme) -> Self {
        Self { game, theme }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::Reset { id } => {
                self.game.reset();
                self.state_response(id)
            }
            Request::State { id } => self.state_response(id),
            Request::Move { id, direction } => match self.game.apply_move(direction) {
                Some(report) => {
                    let final_board = self.game.board().to_rows();
                    Response::MoveResult {
                        id,
                        direction: report.direction,
                        previous_board: report.previous.to_rows(),
                        labels: self.theme.label_rows(&final_board),
                        final_board,
                        gained: report.gained,
                        spawned_index: report.spawned.map(|(idx, _)| idx),
                        spawned_value: report.spawned.map(|(_, value)| value),
                        status: self.status(),
                    }
                }
                None => self.state_response(id),
            },
        }
    }

    /// Parse and answer one input line. `None` for blank lines.
    pub fn handle_line(&mut self, line: &str) -> Option<Response> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match serde_json::from_str::<Request>(line) {
            Ok(req) => Some(self.handle(req)),
            Err(e) => {
                warn!("rejected request {line:?}: {e}");
                Some(Response::Error {
                    id: request_id(line),
                    message: e.to_string(),
                })
            }
        }
    }

    fn state_response(&self, id: u64) -> Response {
        let board = self.game.board().to_rows();
        Response::State {
            id,
            labels: self.theme.label_rows(&board),
            board,
            status: self.status(),
        }
    }

    fn status(&self) -> Status {
        Status {
            score: self.game.score(),
            moves: self.game.moves(),
            max_tile: self.game.max_tile(),
            max_tile_label: self.theme.label(self.game.max_tile()).map(str::to_owned),
            won: self.game.won(),
            lost: self.game.lost(),
            playable: self.game.is_playable(),
        }
    }
}

/// Best-effort `id` recovery from a request that failed to parse.
fn request_id(line: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(line)
        .ok()?
        .get("id")?
        .as_u64()
}

/// Answer requests from `input` until it is exhausted.
pub fn serve<R: BufRead, W: Write>(session: &mut Session, input: R, mut output: W) -> io::Result<()> {
    for line in input.lines() {
        let resp = match line {
            Ok(line) => session.handle_line(&line),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!("rejected unreadable request line: {e}");
                Some(Response::Error {
                    id: None,
                    message: e.to_string(),
                })
            }
            Err(e) => return Err(e),
        };
        if let Some(resp) = resp {
            write_response(&mut output, &resp)?;
        }
    }
    Ok(())
}

fn write_response<W: Write>(output: &mut W, resp: &Response) -> io::Result<()> {
    serde_json::to_writer(&mut *output, resp)?;
    writeln!(output)?;
    output.flush()
}
