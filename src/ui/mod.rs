mod renderer;
mod state;
pub mod theme;

pub use renderer::render;
pub use state::{InputMode, UiState};
pub use theme::Theme;
