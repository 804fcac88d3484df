//! slide_2048 - the sliding-tile merge puzzle in the terminal
//!
//! This library provides:
//! - Core board logic: initialization, slide/merge transitions, tile spawning (game module)
//! - Key mapping for terminal input (input module)
//! - TUI rendering with a value-keyed tile palette (render module)
//! - Session counters (metrics module)
//! - Interactive and scripted play (modes module)
//!
//! ```
//! use slide_2048::game::{BoardEngine, Direction, GameConfig};
//!
//! let mut engine = BoardEngine::new(GameConfig::default().with_seed(42));
//! let grid = engine.new_game();
//! let outcome = engine.apply_move(&grid, Direction::Left);
//! assert_eq!(outcome.grid.size(), 4);
//! ```

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
