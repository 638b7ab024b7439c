//! Detail panel for the selected process.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::constants::NOT_AVAILABLE;
use crate::coordinator::{DetailView, RefreshCoordinator};
use crate::models::ProcessRecord;
use crate::ui::theme::Theme;
use crate::utils::{format_bytes, format_timestamp};

use super::helpers::{heading, labelled};

pub fn render_detail(frame: &mut Frame, area: Rect, coord: &RefreshCoordinator, t: &Theme) {
    let block = Block::default()
        .title(Span::styled(" Details ", t.title_style()))
        .borders(Borders::ALL)
        .border_style(t.border_style());

    let mut lines = match coord.detail() {
        DetailView::Empty => vec![
            Line::raw(""),
            Line::from(Span::styled("  No process selected.", t.label_style())),
            Line::from(Span::styled(
                "  Press Enter on a row to inspect it.",
                t.label_style(),
            )),
        ],
        DetailView::Loading(pid) => vec![
            Line::raw(""),
            Line::from(Span::styled(
                format!("  Loading process {}...", pid),
                t.label_style(),
            )),
        ],
        DetailView::Unavailable(pid) => vec![
            Line::raw(""),
            labelled("PID", pid.to_string(), t),
            Line::from(Span::styled(
                format!("  {}", NOT_AVAILABLE),
                Style::default().fg(t.error),
            )),
        ],
        DetailView::Loaded(record) => detail_lines(record, t),
    };

    if let Some(reason) = coord.last_error() {
        lines.push(Line::raw(""));
        lines.push(heading("Last terminate error", t));
        lines.push(Line::from(Span::styled(
            format!("  {}", reason),
            Style::default().fg(t.error),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn detail_lines<'a>(p: &ProcessRecord, t: &Theme) -> Vec<Line<'a>> {
    vec![
        heading("Process", t),
        labelled("PID", p.pid.to_string(), t),
        labelled("Name", p.name.clone(), t),
        Line::from(vec![
            Span::styled(format!("  {:<10}", "Status"), t.label_style()),
            Span::styled(p.status.to_string(), Style::default().fg(t.status_color(p.status))),
        ]),
        labelled("User", p.username.clone(), t),
        labelled("Started", format_timestamp(p.created_time), t),
        Line::raw(""),
        heading("Resources", t),
        Line::from(vec![
            Span::styled(format!("  {:<10}", "CPU"), t.label_style()),
            Span::styled(
                format!("{:.1}%", p.cpu_percent),
                Style::default().fg(t.usage_color(p.cpu_percent)),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("  {:<10}", "Memory"), t.label_style()),
            Span::styled(
                format!("{:.1}%", p.memory_percent),
                Style::default().fg(t.usage_color(p.memory_percent)),
            ),
        ]),
        labelled("RSS", format_bytes(p.memory_rss), t),
        labelled("VMS", format_bytes(p.memory_vms), t),
        labelled("IO read", format_bytes(p.io_read_bytes), t),
        labelled("IO write", format_bytes(p.io_write_bytes), t),
        Line::raw(""),
        heading("Executable", t),
        Line::from(Span::styled(format!("  {}", p.exe), Style::default().fg(t.text))),
        Line::raw(""),
        heading("Command line", t),
        Line::from(Span::styled(format!("  {}", p.cmdline), Style::default().fg(t.text))),
    ]
}
