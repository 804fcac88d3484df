use crate::game::{Grid, MoveOutcome, Tile};

/// Per-session counters shown alongside the board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameMetrics {
    /// Accepted moves in the current game
    pub moves: u32,
    /// Moves in the current game that changed nothing
    pub noop_moves: u32,
    /// Games started this session, including the current one
    pub games_played: u32,
    /// Largest tile seen on any board this session
    pub highest_tile: Tile,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_game_start(&mut self, grid: &Grid) {
        self.games_played += 1;
        self.moves = 0;
        self.noop_moves = 0;
        self.observe(grid);
    }

    pub fn on_move(&mut self, outcome: &MoveOutcome) {
        if outcome.changed {
            self.moves += 1;
            self.observe(&outcome.grid);
        } else {
            self.noop_moves += 1;
        }
    }

    fn observe(&mut self, grid: &Grid) {
        self.highest_tile = self.highest_tile.max(grid.highest_tile());
    }
}
