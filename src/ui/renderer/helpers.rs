//! Shared rendering helpers: labelled lines, gauges, scrollbar, centered rect.

use ratatui::{
    layout::{Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::ui::theme::Theme;

/// `label` in the dim style followed by `value`.
pub fn labelled<'a>(label: &str, value: impl Into<String>, t: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", label), t.label_style()),
        Span::styled(value.into(), Style::default().fg(t.text)),
    ])
}

/// Section heading inside a panel.
pub fn heading<'a>(text: &str, t: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!(" {}", text),
        Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
    ))
}

/// Gauge ratio for a percentage, clamped to what ratatui accepts.
pub fn ratio(percent: f32) -> f64 {
    (percent as f64 / 100.0).clamp(0.0, 1.0)
}

/// Render a vertical scrollbar inside a bordered area (1px vertical margin).
pub fn render_scrollbar_bordered(frame: &mut Frame, area: Rect, total: usize, position: usize) {
    let visible_height = area.height.saturating_sub(3) as usize;
    if total <= visible_height {
        return;
    }
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("▲"))
        .end_symbol(Some("▼"));
    let mut scrollbar_state = ScrollbarState::new(total).position(position);
    frame.render_stateful_widget(
        scrollbar,
        area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}

/// Return a `Rect` centered within `area` with the given dimensions.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
