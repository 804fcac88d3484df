pub mod palette;
pub mod renderer;

pub use palette::{Palette, TileStyle};
pub use renderer::Renderer;
