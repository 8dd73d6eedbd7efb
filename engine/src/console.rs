//! Plain-terminal play loop: `w a s d` to move, `q` to quit.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::board::Direction;
use crate::game::Game;
use crate::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Quit,
}

impl Command {
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'w' => Some(Command::Move(Direction::Up)),
            'a' => Some(Command::Move(Direction::Left)),
            's' => Some(Command::Move(Direction::Down)),
            'd' => Some(Command::Move(Direction::Right)),
            'q' => Some(Command::Quit),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ending {
    Won,
    Lost,
    Quit,
}

/// Play `game` from keys on `input` until it is won, lost, or quit.
///
/// End of input counts as quitting.
pub fn play<R: BufRead, W: Write>(
    game: &mut Game,
    theme: &Theme,
    input: R,
    mut output: W,
) -> io::Result<Ending> {
    let mut lines = input.lines();
    let mut pending = VecDeque::new();

    while game.is_playable() {
        render(game, theme, &mut output)?;
        let command = loop {
            if let Some(key) = pending.pop_front() {
                if let Some(cmd) = Command::from_key(key) {
                    break cmd;
                }
                continue;
            }
            match lines.next() {
                Some(line) => pending.extend(line?.chars()),
                None => break Command::Quit,
            }
        };
        match command {
            Command::Move(direction) => {
                game.make_move(direction);
            }
            Command::Quit => {
                writeln!(output, "quitting game...")?;
                return Ok(Ending::Quit);
            }
        }
    }

    render(game, theme, &mut output)?;
    let ending = if game.won() { Ending::Won } else { Ending::Lost };
    match ending {
        Ending::Won => writeln!(
            output,
            "You won with a score of {} in {} moves!",
            game.score(),
            game.moves()
        )?,
        _ => writeln!(
            output,
            "You lost with a score of {} in {} moves.",
            game.score(),
            game.moves()
        )?,
    }
    Ok(ending)
}

fn render<W: Write>(game: &Game, theme: &Theme, output: &mut W) -> io::Result<()> {
    let max = game.max_tile();
    match theme.label(max) {
        Some(album) => writeln!(
            output,
            "Score: {}  Moves: {}  Max Tile: {} ({})",
            game.score(),
            game.moves(),
            max,
            album
        )?,
        None => writeln!(
            output,
            "Score: {}  Moves: {}  Max Tile: {}",
            game.score(),
            game.moves(),
            max
        )?,
    }
    writeln!(output, "{}\n", game.board())?;
    output.flush()
}
