//! Renderer module: split into focused submodules.
//!
//! - `header`: System info panel
//! - `processes`: Process table
//! - `detail`: Detail panel for the selected process
//! - `overlays`: Kill confirmation and help popups
//! - `status_bar`: Key hints and notifications
//! - `helpers`: Shared rendering utilities

mod detail;
mod header;
mod helpers;
mod overlays;
mod processes;
mod status_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::constants::*;
use crate::coordinator::RefreshCoordinator;

use super::state::UiState;

/// Draw one frame from the coordinator's state.
pub fn render(frame: &mut Frame, coord: &RefreshCoordinator, ui: &UiState) {
    let size = frame.area();
    let t = &ui.theme;

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(SYSTEM_PANEL_HEIGHT),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(size);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(TABLE_WIDTH_PCT),
            Constraint::Percentage(100 - TABLE_WIDTH_PCT),
        ])
        .split(main_chunks[1]);

    header::render_system_panel(frame, main_chunks[0], coord, t);
    processes::render_processes(frame, body[0], coord, ui);
    detail::render_detail(frame, body[1], coord, t);
    status_bar::render_status_bar(frame, main_chunks[2], coord, ui);

    if let Some(dialog) = coord.confirm_dialog() {
        overlays::render_kill_confirm(frame, size, dialog, t);
    }

    if ui.show_help {
        overlays::render_help_overlay(frame, size, t);
    }
}
