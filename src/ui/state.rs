use super::theme::Theme;

/// Where key presses go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the filter box.
    Filter,
}

/// Presentation-only state. Everything about processes, selection and
/// refresh lives in the coordinator; this only covers how it is drawn.
#[derive(Debug, Clone)]
pub struct UiState {
    pub theme: Theme,
    pub show_help: bool,
    pub input_mode: InputMode,
}

impl UiState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            show_help: false,
            input_mode: InputMode::Normal,
        }
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}
