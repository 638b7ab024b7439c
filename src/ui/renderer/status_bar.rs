//! Status bar at the bottom of the screen.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::coordinator::RefreshCoordinator;
use crate::ui::state::{InputMode, UiState};

pub fn render_status_bar(frame: &mut Frame, area: Rect, coord: &RefreshCoordinator, ui: &UiState) {
    let t = &ui.theme;

    // Notifications take over the whole bar until they expire.
    if let Some(n) = coord.notification(Instant::now()) {
        let bar = Paragraph::new(Line::from(Span::styled(
            format!(" {} ", n.message),
            t.notification_style(n.level),
        )));
        frame.render_widget(bar, area);
        return;
    }

    let badge = |key: &str, color: Color| -> Span {
        Span::styled(
            format!(" {} ", key),
            Style::default()
                .fg(t.bg)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        )
    };
    let dim = |text: &str| -> Span { Span::styled(format!(" {} ", text), t.label_style()) };

    let spans = match ui.input_mode {
        InputMode::Filter => vec![
            badge("Enter", t.accent),
            dim("apply"),
            badge("Esc", t.accent),
            dim("clear filter"),
        ],
        InputMode::Normal => vec![
            badge("q", t.accent),
            dim("quit"),
            badge("Enter", t.accent),
            dim("select"),
            badge("s", t.accent),
            dim("sort"),
            badge("r", t.accent),
            dim("refresh"),
            badge("/", t.accent),
            dim("filter"),
            badge("K", t.error),
            dim("terminate"),
            badge("T", t.accent),
            dim(&format!("theme: {}", t.name)),
            badge("?", t.accent),
            dim("help"),
            dim(&format!(
                "│ every {:.1}s",
                coord.process_interval().as_secs_f32()
            )),
        ],
    };

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
