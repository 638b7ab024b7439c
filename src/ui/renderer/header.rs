//! System info panel: CPU, memory, swap and disk gauges plus host facts.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, Paragraph},
    Frame,
};

use crate::coordinator::RefreshCoordinator;
use crate::models::SystemSnapshot;
use crate::ui::theme::Theme;
use crate::utils::{format_bytes, format_time_delta};

use super::helpers::ratio;

pub fn render_system_panel(frame: &mut Frame, area: Rect, coord: &RefreshCoordinator, t: &Theme) {
    let block = Block::default()
        .title(Span::styled(" proc-peek ", t.title_style()))
        .borders(Borders::ALL)
        .border_style(t.border_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(sys) = coord.system() else {
        frame.render_widget(
            Paragraph::new(Span::styled(" Collecting system info...", t.label_style())),
            inner,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let gauges = [
        (
            "CPU ",
            sys.cpu.percent,
            format!("{:.1}%", sys.cpu.percent),
        ),
        (
            "MEM ",
            sys.memory.percent,
            format!(
                "{:.1}% {} / {}",
                sys.memory.percent,
                format_bytes(sys.memory.total.saturating_sub(sys.memory.available)),
                format_bytes(sys.memory.total)
            ),
        ),
        (
            "SWAP",
            sys.swap.percent,
            format!(
                "{:.1}% {} / {}",
                sys.swap.percent,
                format_bytes(sys.swap.used),
                format_bytes(sys.swap.total)
            ),
        ),
        (
            "DISK",
            sys.disk.percent,
            format!(
                "{:.1}% {} / {} ({})",
                sys.disk.percent,
                format_bytes(sys.disk.used),
                format_bytes(sys.disk.total),
                sys.disk.path
            ),
        ),
    ];

    for (row, (label, percent, text)) in rows.iter().zip(gauges) {
        let color = t.usage_color(percent);
        let gauge = LineGauge::default()
            .filled_style(Style::default().fg(color))
            .unfilled_style(Style::default().fg(t.border))
            .label(Line::from(vec![
                Span::styled(format!(" {} ", label), t.label_style()),
                Span::styled(format!("{:<34}", text), Style::default().fg(color)),
            ]))
            .ratio(ratio(percent));
        frame.render_widget(gauge, *row);
    }

    frame.render_widget(Paragraph::new(facts_line(sys, t)), rows[4]);
}

fn facts_line<'a>(sys: &SystemSnapshot, t: &Theme) -> Line<'a> {
    let mut spans = vec![
        Span::styled(" Cores ", t.label_style()),
        Span::styled(
            format!("{} logical / {} physical", sys.cpu.count_logical, sys.cpu.count_physical),
            Style::default().fg(t.text),
        ),
        Span::styled("  │ Temp ", t.label_style()),
    ];
    match sys.temperature {
        Some(c) => spans.push(Span::styled(
            format!("{:.1}°C", c),
            Style::default().fg(t.temp_color(c)),
        )),
        None => spans.push(Span::styled("N/A", t.label_style())),
    }
    spans.push(Span::styled("  │ Uptime ", t.label_style()));
    spans.push(Span::styled(
        format_time_delta(sys.uptime_seconds),
        Style::default().fg(t.text),
    ));
    Line::from(spans)
}
