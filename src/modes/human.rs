use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};

use crate::game::{Action, BoardEngine, GameConfig, Grid};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Interactive play in the terminal.
///
/// The mode owns the single current `Grid`. Each key press runs one full
/// compute-and-draw cycle before the next event is read.
pub struct HumanMode {
    engine: BoardEngine,
    grid: Grid,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        let mut engine = BoardEngine::new(config);
        let grid = engine.reset();
        let mut metrics = GameMetrics::new();
        metrics.on_game_start(&grid);

        Self {
            engine,
            grid,
            metrics,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        self.draw(terminal)?;

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            if self.handle_event(event) {
                                self.draw(terminal)?;
                            }
                        }
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => break,
                    }
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!(
            "session over after {} games, best tile {}",
            self.metrics.games_played, self.metrics.highest_tile
        );
        Ok(())
    }

    fn draw(&self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        terminal
            .draw(|frame| {
                self.renderer.render(frame, &self.grid, &self.metrics);
            })
            .context("Failed to draw frame")?;
        Ok(())
    }

    /// Returns true when the screen needs redrawing
    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return false;
                }

                match self.input_handler.handle_key_event(key) {
                    KeyAction::GameAction(action) => self.apply(action),
                    KeyAction::Quit => {
                        self.should_quit = true;
                        false
                    }
                    KeyAction::None => false,
                }
            }
            Event::Resize(_, _) => true,
            _ => false,
        }
    }

    /// Run one game command; returns true when the board or counters changed
    fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Move(direction) => {
                let outcome = self.engine.apply_move(&self.grid, direction);
                self.metrics.on_move(&outcome);
                if outcome.changed {
                    self.grid = outcome.grid;
                }
                // Blocked-move counter changes even on a no-op
                true
            }
            Action::NewGame => {
                let grid = self.engine.new_game();
                self.start(grid);
                true
            }
            Action::MidGame => {
                let grid = self.engine.mid_game();
                self.start(grid);
                true
            }
        }
    }

    fn start(&mut self, grid: Grid) {
        self.metrics.on_game_start(&grid);
        self.grid = grid;
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
