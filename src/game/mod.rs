//! Core game logic for the sliding-tile puzzle
//!
//! This module contains the board model and move transitions without any I/O
//! or rendering dependencies. Front-ends hold the current `Grid` and hand it
//! to `BoardEngine` together with a `Direction`.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction, ParseDirectionError, StartMode};
pub use config::GameConfig;
pub use engine::{BoardEngine, MoveOutcome, Spawn, compute_next_board};
pub use state::{Grid, GridError, Position, Tile};
