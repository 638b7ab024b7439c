//! Process table.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::coordinator::RefreshCoordinator;
use crate::models::SortKey;
use crate::ui::state::{InputMode, UiState};
use crate::utils::truncate_str;

use super::helpers::render_scrollbar_bordered;

pub fn render_processes(frame: &mut Frame, area: Rect, coord: &RefreshCoordinator, ui: &UiState) {
    let t = &ui.theme;
    let visible = coord.visible_processes();
    let sort = coord.sort_key();

    // Numeric keys sort descending, text keys ascending.
    let indicator = |key: SortKey| -> &'static str {
        match (key == sort, key) {
            (false, _) => "",
            (true, SortKey::Cpu | SortKey::Memory) => " ▼",
            (true, _) => " ▲",
        }
    };

    let header = Row::new(vec![
        Cell::from(format!("PID{}", indicator(SortKey::Pid))),
        Cell::from(format!("NAME{}", indicator(SortKey::Name))),
        Cell::from(format!("CPU%{}", indicator(SortKey::Cpu))),
        Cell::from(format!("MEM%{}", indicator(SortKey::Memory))),
        Cell::from("STATUS"),
        Cell::from("USER"),
    ])
    .style(t.table_header_style())
    .height(1);

    let selection = coord.selection();
    let rows: Vec<Row> = visible
        .iter()
        .map(|p| {
            let row = Row::new(vec![
                Cell::from(p.pid.to_string()).style(t.label_style()),
                Cell::from(truncate_str(&p.name, 28)),
                Cell::from(format!("{:.1}", p.cpu_percent))
                    .style(Style::default().fg(t.usage_color(p.cpu_percent))),
                Cell::from(format!("{:.1}", p.memory_percent))
                    .style(Style::default().fg(t.usage_color(p.memory_percent))),
                Cell::from(p.status.to_string())
                    .style(Style::default().fg(t.status_color(p.status))),
                Cell::from(truncate_str(&p.username, 12)).style(t.label_style()),
            ]);
            if selection == Some(p.pid) {
                row.style(t.selected_style())
            } else {
                row.style(Style::default().fg(t.text))
            }
        })
        .collect();

    let mut title = vec![
        Span::styled(format!(" Processes ({}) ", visible.len()), t.title_style()),
        Span::styled(format!("│ sort: {} ", sort), t.label_style()),
    ];
    let filtering = ui.input_mode == InputMode::Filter;
    if filtering || !coord.filter_text().is_empty() {
        let cursor = if filtering { "_" } else { "" };
        title.push(Span::styled(
            format!("│ filter: {}{} ", coord.filter_text(), cursor),
            Style::default().fg(t.warn),
        ));
    }

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Min(16),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(9),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_style(t.border_focus_style()),
    )
    .row_highlight_style(t.cursor_style());

    let mut table_state = TableState::default();
    if !visible.is_empty() {
        table_state.select(Some(coord.cursor()));
    }
    frame.render_stateful_widget(table, area, &mut table_state);

    render_scrollbar_bordered(frame, area, visible.len(), coord.cursor());
}
