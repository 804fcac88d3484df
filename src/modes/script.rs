//! Non-interactive play from a move string.
//!
//! Moves are single characters `u`, `d`, `l`, `r`; whitespace and commas
//! between them are ignored. Each board is written to the output, so a seeded
//! run doubles as a reproducible trace.

use std::io::Write;

use anyhow::{Context, Result};
use log::info;

use crate::game::{BoardEngine, Direction, GameConfig, Grid};
use crate::metrics::GameMetrics;

pub struct ScriptMode {
    engine: BoardEngine,
    metrics: GameMetrics,
}

impl ScriptMode {
    pub fn new(config: GameConfig) -> Self {
        Self {
            engine: BoardEngine::new(config),
            metrics: GameMetrics::new(),
        }
    }

    /// Parse a move string into directions
    pub fn parse_moves(moves: &str) -> Result<Vec<Direction>> {
        moves
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .enumerate()
            .map(|(i, c)| {
                Direction::from_char(c).with_context(|| format!("Invalid move #{}", i + 1))
            })
            .collect()
    }

    /// Start a game, play `moves`, and write every board to `out`.
    ///
    /// Returns the final board.
    pub fn run<W: Write>(&mut self, moves: &str, out: &mut W) -> Result<Grid> {
        let directions = Self::parse_moves(moves)?;

        let mut grid = self.engine.reset();
        self.metrics.on_game_start(&grid);
        writeln!(out, "start\n{grid}").context("Failed to write board")?;

        for (i, direction) in directions.into_iter().enumerate() {
            let outcome = self.engine.apply_move(&grid, direction);
            self.metrics.on_move(&outcome);

            let note = match outcome.spawned {
                Some(spawn) => format!(
                    "spawned {} at ({}, {})",
                    spawn.value, spawn.position.row, spawn.position.col
                ),
                None => "no change".to_string(),
            };
            writeln!(out, "move {} {direction}: {note}\n{}", i + 1, outcome.grid)
                .context("Failed to write board")?;

            grid = outcome.grid;
        }

        info!(
            "script finished: {} moves applied, {} blocked, best tile {}",
            self.metrics.moves, self.metrics.noop_moves, self.metrics.highest_tile
        );
        writeln!(
            out,
            "moves: {}  blocked: {}  best tile: {}",
            self.metrics.moves, self.metrics.noop_moves, self.metrics.highest_tile
        )
        .context("Failed to write summary")?;

        Ok(grid)
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_moves() {
        let moves = ScriptMode::parse_moves("u d, L r").unwrap();
        assert_eq!(
            moves,
            vec![Direction::Up, Direction::Down, Direction::Left, Direction::Right]
        );
        assert!(ScriptMode::parse_moves("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_unknown_moves() {
        let err = ScriptMode::parse_moves("ulx").unwrap_err();
        assert!(err.to_string().contains("Invalid move #3"));
    }

    #[test]
    fn test_run_writes_each_board() {
        let mut mode = ScriptMode::new(GameConfig::default().with_seed(21));
        let mut out = Vec::new();

        let grid = mode.run("lurd", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("start\n"));
        for step in 1..=4 {
            assert!(text.contains(&format!("move {step} ")));
        }
        assert!(text.contains("best tile"));
        assert_eq!(grid.size(), 4);
        assert_eq!(mode.metrics().moves + mode.metrics().noop_moves, 4);
    }

    #[test]
    fn test_run_is_reproducible_with_seed() {
        let config = GameConfig::default().with_seed(5);
        let mut a = ScriptMode::new(config.clone());
        let mut b = ScriptMode::new(config);

        let mut out_a = Vec::new();
        let mut out_b = Vec::new();
        let grid_a = a.run("llurdrdu", &mut out_a).unwrap();
        let grid_b = b.run("llurdrdu", &mut out_b).unwrap();

        assert_eq!(grid_a, grid_b);
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn test_run_matches_engine_replay() {
        let config = GameConfig::default().with_seed(8);
        let moves = "lurdllrruudd";

        let mut mode = ScriptMode::new(config.clone());
        let mut out = Vec::new();
        let grid = mode.run(moves, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        // Same seed, same moves, straight through the engine
        let mut engine = BoardEngine::new(config);
        let start = engine.reset();
        let mut expected = start.clone();
        let mut accepted = 0;
        for direction in ScriptMode::parse_moves(moves).unwrap() {
            let outcome = engine.apply_move(&expected, direction);
            if outcome.changed {
                accepted += 1;
            }
            expected = outcome.grid;
        }

        assert_eq!(grid, expected);
        assert_eq!(mode.metrics().moves, accepted);
        assert_eq!(mode.metrics().noop_moves, 12 - accepted);
        assert_eq!(grid.total_value(), expected.total_value());
        assert!(text.starts_with(&format!("start\n{start}")));
        assert!(text.contains("move 12 down: "));
        assert!(text.contains(&expected.to_string()));
    }
}
