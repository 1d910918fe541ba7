use std::str::FromStr;

use thiserror::Error;
use wormsweeper_core::{Coord, Coord2, Level, ParseLevelError};

pub const HELP: &str = "\
Commands:
  reveal ROW COL   (r)  open a cell
  mark ROW COL     (m)  place or remove a hook
  hint                  show a color to the detector to unlock a hint
  apply                 spend the unlocked hint
  cancel                stop unlocking the hint
  new [LEVEL]           start a new game, LEVEL is basic or advanced
  restart               start a new game with the same settings
  show                  print the board again
  help                  print this help
  quit             (q)  leave the game";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Mark(Coord2),
    Hint,
    Apply,
    Cancel,
    New(Option<Level>),
    Restart,
    Show,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command \"{0}\", try \"help\"")]
    Unknown(String),
    #[error("Expected ROW COL after \"{0}\"")]
    MissingCoords(String),
    #[error("Invalid coordinate \"{0}\"")]
    InvalidCoord(String),
    #[error("Unexpected argument \"{0}\"")]
    Unexpected(String),
    #[error(transparent)]
    Level(#[from] ParseLevelError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();

        let command = match name.as_str() {
            "reveal" | "r" => Self::Reveal(parse_coords(&name, &mut words)?),
            "mark" | "m" => Self::Mark(parse_coords(&name, &mut words)?),
            "hint" => Self::Hint,
            "apply" => Self::Apply,
            "cancel" => Self::Cancel,
            "new" => Self::New(words.next().map(str::parse).transpose()?),
            "restart" => Self::Restart,
            "show" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => return Err(CommandError::Unknown(name)),
        };

        match words.next() {
            Some(extra) => Err(CommandError::Unexpected(extra.to_string())),
            None => Ok(command),
        }
    }
}

fn parse_coords<'a>(
    name: &str,
    words: &mut impl Iterator<Item = &'a str>,
) -> Result<Coord2, CommandError> {
    let mut next_coord = || -> Result<Coord, CommandError> {
        let word = words
            .next()
            .ok_or_else(|| CommandError::MissingCoords(name.to_string()))?;
        word.parse()
            .map_err(|_| CommandError::InvalidCoord(word.to_string()))
    };
    let row = next_coord()?;
    let col = next_coord()?;
    Ok((row, col))
}
