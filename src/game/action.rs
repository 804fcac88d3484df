use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction tiles slide in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
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

    /// Parse a single move character (`u`, `d`, `l`, `r`, any case)
    pub fn from_char(c: char) -> Result<Self, ParseDirectionError> {
        match c.to_ascii_lowercase() {
            'u' => Ok(Direction::Up),
            'd' => Ok(Direction::Down),
            'l' => Ok(Direction::Left),
            'r' => Ok(Direction::Right),
            _ => Err(ParseDirectionError::UnknownChar(c)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Direction::from_char(c),
                    _ => Err(ParseDirectionError::UnknownWord(s.to_string())),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDirectionError {
    #[error("unknown move character {0:?} (expected u, d, l or r)")]
    UnknownChar(char),
    #[error("unknown direction {0:?}")]
    UnknownWord(String),
}

/// How a fresh board is populated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StartMode {
    /// Empty board with two random 2/4 tiles
    #[default]
    Fresh,
    /// Every cell independently random, for demos and debugging
    Scrambled,
}

/// Command issued to the game by the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Slide the board in a direction
    Move(Direction),
    /// Start over from a fresh board
    NewGame,
    /// Start over from a scrambled board
    MidGame,
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        Action::Move(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chars() {
        assert_eq!(Direction::from_char('u'), Ok(Direction::Up));
        assert_eq!(Direction::from_char('U'), Ok(Direction::Up));
        assert_eq!(Direction::from_char('d'), Ok(Direction::Down));
        assert_eq!(Direction::from_char('l'), Ok(Direction::Left));
        assert_eq!(Direction::from_char('R'), Ok(Direction::Right));
        // WASD belongs to the key handler, not the script notation
        assert!(Direction::from_char('w').is_err());
        assert_eq!(
            Direction::from_char('x'),
            Err(ParseDirectionError::UnknownChar('x'))
        );
    }

    #[test]
    fn test_parse_words() {
        assert_eq!("left".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!("RIGHT".parse::<Direction>(), Ok(Direction::Right));
        assert_eq!("u".parse::<Direction>(), Ok(Direction::Up));
        assert!("sideways".parse::<Direction>().is_err());
        assert!("".parse::<Direction>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for dir in Direction::ALL {
            assert_eq!(dir.to_string().parse::<Direction>(), Ok(dir));
        }
    }
}
