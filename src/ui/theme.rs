use ratatui::style::{Color, Modifier, Style};

use crate::constants::*;
use crate::coordinator::NotificationLevel;
use crate::models::ProcessStatus;

/// Built-in palettes, in cycling order.
pub const THEME_NAMES: &[&str] = &["default", "gruvbox", "nord", "mono"];

/// Every color the renderer uses.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,

    pub accent: Color,
    pub accent_alt: Color,
    pub bg: Color,
    pub text: Color,
    pub text_dim: Color,

    pub ok: Color,
    pub warn: Color,
    pub error: Color,

    pub gauge_low: Color,
    pub gauge_mid: Color,
    pub gauge_high: Color,
    pub gauge_critical: Color,

    pub row_selected_bg: Color,
    pub row_cursor_bg: Color,
    pub border: Color,
}

impl Theme {
    pub fn default_dark() -> Self {
        Self {
            name: "default",
            accent: Color::Rgb(99, 179, 237),
            accent_alt: Color::Rgb(129, 230, 217),
            bg: Color::Rgb(22, 22, 30),
            text: Color::Rgb(220, 220, 235),
            text_dim: Color::Rgb(120, 120, 145),
            ok: Color::Rgb(72, 199, 142),
            warn: Color::Rgb(255, 193, 69),
            error: Color::Rgb(255, 85, 85),
            gauge_low: Color::Rgb(72, 199, 142),
            gauge_mid: Color::Rgb(255, 193, 69),
            gauge_high: Color::Rgb(255, 136, 0),
            gauge_critical: Color::Rgb(255, 85, 85),
            row_selected_bg: Color::Rgb(52, 60, 90),
            row_cursor_bg: Color::Rgb(40, 40, 60),
            border: Color::Rgb(55, 55, 75),
        }
    }

    pub fn gruvbox() -> Self {
        Self {
            name: "gruvbox",
            accent: Color::Rgb(250, 189, 47),
            accent_alt: Color::Rgb(184, 187, 38),
            bg: Color::Rgb(40, 40, 40),
            text: Color::Rgb(235, 219, 178),
            text_dim: Color::Rgb(146, 131, 116),
            ok: Color::Rgb(184, 187, 38),
            warn: Color::Rgb(250, 189, 47),
            error: Color::Rgb(251, 73, 52),
            gauge_low: Color::Rgb(142, 192, 124),
            gauge_mid: Color::Rgb(250, 189, 47),
            gauge_high: Color::Rgb(254, 128, 25),
            gauge_critical: Color::Rgb(251, 73, 52),
            row_selected_bg: Color::Rgb(80, 73, 69),
            row_cursor_bg: Color::Rgb(60, 56, 54),
            border: Color::Rgb(102, 92, 84),
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "nord",
            accent: Color::Rgb(136, 192, 208),
            accent_alt: Color::Rgb(143, 188, 187),
            bg: Color::Rgb(46, 52, 64),
            text: Color::Rgb(236, 239, 244),
            text_dim: Color::Rgb(129, 161, 193),
            ok: Color::Rgb(163, 190, 140),
            warn: Color::Rgb(235, 203, 139),
            error: Color::Rgb(191, 97, 106),
            gauge_low: Color::Rgb(163, 190, 140),
            gauge_mid: Color::Rgb(235, 203, 139),
            gauge_high: Color::Rgb(208, 135, 112),
            gauge_critical: Color::Rgb(191, 97, 106),
            row_selected_bg: Color::Rgb(76, 86, 106),
            row_cursor_bg: Color::Rgb(59, 66, 82),
            border: Color::Rgb(67, 76, 94),
        }
    }

    /// Plain ANSI colors for terminals without truecolor.
    pub fn mono() -> Self {
        Self {
            name: "mono",
            accent: Color::White,
            accent_alt: Color::Gray,
            bg: Color::Black,
            text: Color::White,
            text_dim: Color::DarkGray,
            ok: Color::Green,
            warn: Color::Yellow,
            error: Color::Red,
            gauge_low: Color::Green,
            gauge_mid: Color::Yellow,
            gauge_high: Color::LightRed,
            gauge_critical: Color::Red,
            row_selected_bg: Color::Blue,
            row_cursor_bg: Color::DarkGray,
            border: Color::Gray,
        }
    }

    /// Look up a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default_dark()),
            "gruvbox" => Some(Self::gruvbox()),
            "nord" => Some(Self::nord()),
            "mono" => Some(Self::mono()),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        let idx = THEME_NAMES.iter().position(|&n| n == self.name).unwrap_or(0);
        let next = THEME_NAMES[(idx + 1) % THEME_NAMES.len()];
        Self::by_name(next).unwrap_or_default()
    }

    // ── Styles ───────────────────────────────────────────────

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn table_header_style(&self) -> Style {
        Style::default()
            .fg(self.accent_alt)
            .add_modifier(Modifier::BOLD)
    }

    pub fn cursor_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.row_cursor_bg)
    }

    /// Row of the selected pid.
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.text)
            .bg(self.row_selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn label_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_focus_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn notification_style(&self, level: NotificationLevel) -> Style {
        let bg = match level {
            NotificationLevel::Info => self.ok,
            NotificationLevel::Error => self.error,
        };
        Style::default()
            .fg(self.bg)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_color(&self, status: ProcessStatus) -> Color {
        match status {
            ProcessStatus::Running => self.ok,
            ProcessStatus::Sleeping => self.text_dim,
            ProcessStatus::Stopped => self.warn,
            ProcessStatus::Zombie => self.error,
            ProcessStatus::Unknown => self.text_dim,
        }
    }

    pub fn usage_color(&self, percent: f32) -> Color {
        if percent >= USAGE_CRITICAL_PCT {
            self.gauge_critical
        } else if percent >= USAGE_HIGH_PCT {
            self.gauge_high
        } else if percent >= USAGE_MID_PCT {
            self.gauge_mid
        } else {
            self.gauge_low
        }
    }

    pub fn temp_color(&self, celsius: f32) -> Color {
        if celsius >= TEMP_CRITICAL_C {
            self.gauge_critical
        } else if celsius >= TEMP_HIGH_C {
            self.gauge_high
        } else if celsius >= TEMP_MID_C {
            self.gauge_mid
        } else {
            self.gauge_low
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}
