use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::palette::{BOARD_BG, Palette};
use crate::game::{Grid, Tile};
use crate::metrics::GameMetrics;

const CELL_WIDTH: u16 = 8;
const CELL_HEIGHT: u16 = 3;
const GAP: u16 = 1;

/// Draws the board and session info. Reads the grid, never changes it.
pub struct Renderer {
    palette: Palette,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            palette: Palette::new(),
        }
    }

    pub fn render(&self, frame: &mut Frame, grid: &Grid, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(metrics), chunks[0]);
        self.render_board(frame, chunks[1], grid);
        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_board(&self, frame: &mut Frame, area: Rect, grid: &Grid) {
        let n = grid.size() as u16;
        // Border (1) and gap padding on each side
        let width = n * CELL_WIDTH + (n + 1) * GAP + 2;
        let height = n * CELL_HEIGHT + (n + 1) * GAP + 2;
        let board_area = centered(area, width, height);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BOARD_BG))
            .style(Style::default().bg(BOARD_BG))
            .title(" 2048 ");
        let inner = block.inner(board_area);
        frame.render_widget(block, board_area);

        let padded = Rect {
            x: inner.x + GAP,
            y: inner.y + GAP,
            width: inner.width.saturating_sub(2 * GAP),
            height: inner.height.saturating_sub(2 * GAP),
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(CELL_HEIGHT); grid.size()])
            .spacing(GAP)
            .split(padded);

        for (row_area, values) in rows.iter().zip(grid.rows()) {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Length(CELL_WIDTH); grid.size()])
                .spacing(GAP)
                .split(*row_area);

            for (cell_area, &value) in cells.iter().zip(values) {
                frame.render_widget(self.render_tile(value), *cell_area);
            }
        }
    }

    fn render_tile(&self, value: Tile) -> Paragraph<'_> {
        let label = if value == 0 {
            String::new()
        } else {
            value.to_string()
        };

        // Blank first line centres the label vertically in a 3-row cell
        Paragraph::new(vec![Line::from(""), Line::from(label)])
            .style(self.palette.style_for(value).style())
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Moves: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.moves.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Blocked: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.noop_moves.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Best tile: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.highest_tile.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Game: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.games_played.to_string(),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("N", Style::default().fg(Color::Green)),
            Span::raw(" new game | "),
            Span::styled("M", Style::default().fg(Color::Green)),
            Span::raw(" mid-game | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rect of at most `width`×`height` centred in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
