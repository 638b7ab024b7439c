//! Popup overlays: kill confirmation and help.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::constants::*;
use crate::coordinator::{ConfirmChoice, KillConfirm};
use crate::ui::theme::Theme;
use crate::utils::truncate_str;

use super::helpers::centered_rect;

pub fn render_kill_confirm(frame: &mut Frame, area: Rect, dialog: &KillConfirm, t: &Theme) {
    let popup_area = centered_rect(CONFIRM_POPUP_WIDTH, CONFIRM_POPUP_HEIGHT, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(
            " Terminate Process ",
            Style::default().fg(t.error).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.error));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut buttons = vec![Span::raw("  ")];
    for choice in ConfirmChoice::all() {
        let style = if *choice == dialog.choice {
            Style::default()
                .fg(t.bg)
                .bg(button_color(*choice, t))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(button_color(*choice, t))
        };
        buttons.push(Span::styled(format!(" {} ", choice.label()), style));
        buttons.push(Span::raw("  "));
    }

    let name_width = (inner.width as usize).saturating_sub(20);
    let lines = vec![
        Line::raw(""),
        Line::from(vec![
            Span::styled("  Terminate ", Style::default().fg(t.text)),
            Span::styled(
                truncate_str(&dialog.name, name_width),
                Style::default().fg(t.warn).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" (PID {})?", dialog.pid), Style::default().fg(t.text)),
        ]),
        Line::raw(""),
        Line::from(buttons),
        Line::raw(""),
        Line::from(Span::styled(
            "  ←/→ choose · Enter confirm · t/f/c shortcut · Esc cancel",
            t.label_style(),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

fn button_color(choice: ConfirmChoice, t: &Theme) -> ratatui::style::Color {
    match choice {
        ConfirmChoice::Cancel => t.accent,
        ConfirmChoice::Terminate => t.warn,
        ConfirmChoice::ForceKill => t.error,
    }
}

pub fn render_help_overlay(frame: &mut Frame, area: Rect, t: &Theme) {
    let popup_area = centered_rect(HELP_POPUP_WIDTH, HELP_POPUP_HEIGHT, area);
    frame.render_widget(Clear, popup_area);

    let entry = |key: &str, desc: &str| -> Line {
        Line::from(vec![
            Span::styled(
                format!("  {:<16}", key),
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(desc.to_string(), Style::default().fg(t.text)),
        ])
    };

    let text = vec![
        Line::raw(""),
        entry("↑/↓  j/k", "Move cursor"),
        entry("PgUp/PgDn", "Page up/down"),
        entry("Home/End", "First/last row"),
        entry("Enter", "Select process, refresh detail"),
        entry("c m n p", "Sort by cpu/memory/name/pid"),
        entry("s", "Cycle sort key"),
        entry("r", "Refresh now"),
        entry("K / Delete", "Terminate selected process"),
        entry("/", "Filter processes"),
        entry("Esc (filter)", "Clear filter"),
        entry("x", "Clear selection"),
        entry("T", "Cycle color theme"),
        entry("?", "Toggle this help"),
        entry("q / Esc", "Quit"),
        Line::raw(""),
        Line::from(Span::styled(
            "  Confirm dialog: ←/→ + Enter, t terminate,",
            t.label_style(),
        )),
        Line::from(Span::styled(
            "  f force kill, c or Esc cancel",
            t.label_style(),
        )),
    ];

    let help = Paragraph::new(text)
        .block(
            Block::default()
                .title(Span::styled(" Keyboard Shortcuts ", t.title_style()))
                .borders(Borders::ALL)
                .border_style(t.border_focus_style()),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(help, popup_area);
}
