//! Tile colours keyed by tile value.
//!
//! Values `0..=2048` use the classic 2048 colours. Anything else (4096 and
//! up) falls back to a single dark style so larger tiles still render.

use ratatui::style::{Color, Modifier, Style};

use crate::game::Tile;

/// Colours for one tile value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileStyle {
    pub fg: Color,
    pub bg: Color,
}

impl TileStyle {
    const fn rgb(fg: u32, bg: u32) -> Self {
        Self {
            fg: hex(fg),
            bg: hex(bg),
        }
    }

    pub fn style(&self) -> Style {
        Style::default()
            .fg(self.fg)
            .bg(self.bg)
            .add_modifier(Modifier::BOLD)
    }
}

const DARK_TEXT: u32 = 0x776e65;
const LIGHT_TEXT: u32 = 0xf9f6f2;

/// Board background behind the tiles
pub const BOARD_BG: Color = hex(0xbcac9f);

const fn hex(rgb: u32) -> Color {
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

const TABLE: [(Tile, TileStyle); 12] = [
    (0, TileStyle::rgb(0xccc1b4, 0xccc1b4)),
    (2, TileStyle::rgb(DARK_TEXT, 0xeee4da)),
    (4, TileStyle::rgb(DARK_TEXT, 0xede0c8)),
    (8, TileStyle::rgb(LIGHT_TEXT, 0xf2b179)),
    (16, TileStyle::rgb(LIGHT_TEXT, 0xf59563)),
    (32, TileStyle::rgb(LIGHT_TEXT, 0xf67c5f)),
    (64, TileStyle::rgb(LIGHT_TEXT, 0xf65e3b)),
    (128, TileStyle::rgb(LIGHT_TEXT, 0xedcf72)),
    (256, TileStyle::rgb(LIGHT_TEXT, 0xedcc61)),
    (512, TileStyle::rgb(LIGHT_TEXT, 0xedc850)),
    (1024, TileStyle::rgb(LIGHT_TEXT, 0xedc53f)),
    (2048, TileStyle::rgb(LIGHT_TEXT, 0xedc22e)),
];

const FALLBACK: TileStyle = TileStyle::rgb(LIGHT_TEXT, 0x3c3a32);

/// Lookup from tile value to colours, with a fallback entry
pub struct Palette {
    entries: &'static [(Tile, TileStyle)],
    fallback: TileStyle,
}

impl Palette {
    pub fn new() -> Self {
        Self {
            entries: &TABLE,
            fallback: FALLBACK,
        }
    }

    pub fn style_for(&self, value: Tile) -> TileStyle {
        self.entries
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, style)| *style)
            .unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> TileStyle {
        self.fallback
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}
