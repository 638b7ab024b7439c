//! Application struct and event loop.
//!
//! Owns the terminal, the coordinator and the collector worker handle.
//! Key handlers only touch coordinator/UI state and queue worker requests;
//! the loop flushes the queue once per frame.

use std::io;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::constants::*;
use crate::coordinator::{ConfirmChoice, RefreshCoordinator};
use crate::models::SortKey;
use crate::monitor::{worker, CollectRequest, CollectorHandle, SnapshotCollector, SysinfoProvider};
use crate::ui::{self, InputMode, Theme, UiState};

pub struct App {
    coordinator: RefreshCoordinator,
    ui: UiState,
    worker: CollectorHandle,
    /// Requests produced by key handlers, sent on the next frame.
    pending: Vec<CollectRequest>,
}

impl App {
    /// Build the app around a sysinfo-backed collector worker.
    pub fn new(config: &Config) -> Self {
        let collector = SnapshotCollector::new(SysinfoProvider::new(), config.disk_path.clone());
        Self::with_worker(config, worker::spawn(collector))
    }

    pub fn with_worker(config: &Config, worker: CollectorHandle) -> Self {
        let theme = Theme::by_name(&config.theme).unwrap_or_default();
        Self {
            coordinator: RefreshCoordinator::new(
                config.default_sort,
                Duration::from_millis(config.process_refresh_ms),
                Duration::from_millis(config.system_refresh_ms),
            ),
            ui: UiState::new(theme),
            worker,
            pending: Vec::new(),
        }
    }

    /// Run the main event loop. Returns when the user quits.
    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        info!("tui started");
        let result = self.event_loop(&mut terminal);

        // Restore the terminal even when the loop failed.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        info!("tui stopped");

        result
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.drain_events();
            self.pending
                .extend(self.coordinator.due_requests(Instant::now()));
            self.flush_requests()?;

            terminal.draw(|frame| ui::render(frame, &self.coordinator, &self.ui))?;

            if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key) {
                        return Ok(());
                    }
                }
            }
        }
    }

    // ── Worker channels ──────────────────────────────────────────

    fn drain_events(&mut self) {
        while let Some(event) = self.worker.try_recv() {
            self.coordinator.apply(event);
        }
    }

    fn flush_requests(&mut self) -> Result<()> {
        for request in self.pending.drain(..) {
            if !self.worker.send(request) {
                error!("collector worker stopped unexpectedly");
                bail!("collector worker stopped unexpectedly");
            }
        }
        Ok(())
    }

    // ── Key handling ─────────────────────────────────────────────

    /// Returns true when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        if self.coordinator.confirm_dialog().is_some() {
            self.handle_key_confirm(key);
            return false;
        }

        if self.ui.show_help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.ui.toggle_help();
            }
            return false;
        }

        match self.ui.input_mode {
            InputMode::Filter => {
                self.handle_key_filter(key);
                false
            }
            InputMode::Normal => self.handle_key_normal(key),
        }
    }

    fn handle_key_normal(&mut self, key: KeyEvent) -> bool {
        let c = &mut self.coordinator;
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if c.filter_text().is_empty() {
                    return true;
                }
                c.clear_filter();
            }

            KeyCode::Up | KeyCode::Char('k') => c.move_up(),
            KeyCode::Down | KeyCode::Char('j') => c.move_down(),
            KeyCode::PageUp => c.page_up(),
            KeyCode::PageDown => c.page_down(),
            KeyCode::Home | KeyCode::Char('g') => c.home(),
            KeyCode::End | KeyCode::Char('G') => c.end(),

            KeyCode::Enter => {
                if let Some(req) = c.select_under_cursor() {
                    debug!(?req, "selected");
                    self.pending.push(req);
                }
            }
            KeyCode::Char('x') => c.clear_selection(),

            KeyCode::Char('c') => c.set_sort(SortKey::Cpu),
            KeyCode::Char('m') => c.set_sort(SortKey::Memory),
            KeyCode::Char('n') => c.set_sort(SortKey::Name),
            KeyCode::Char('p') => c.set_sort(SortKey::Pid),
            KeyCode::Char('s') => {
                let next = c.sort_key().next();
                c.set_sort(next);
            }

            KeyCode::Char('r') => {
                if let Some(req) = c.refresh_now() {
                    self.pending.push(req);
                }
            }

            KeyCode::Char('K') | KeyCode::Delete => c.request_kill(),

            KeyCode::Char('/') => self.ui.input_mode = InputMode::Filter,
            KeyCode::Char('T') => self.ui.cycle_theme(),
            KeyCode::Char('?') => self.ui.toggle_help(),
            _ => {}
        }
        false
    }

    fn handle_key_filter(&mut self, key: KeyEvent) {
        let c = &mut self.coordinator;
        match key.code {
            KeyCode::Esc => {
                c.clear_filter();
                self.ui.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => self.ui.input_mode = InputMode::Normal,
            KeyCode::Backspace => c.pop_filter_char(),
            KeyCode::Up => c.move_up(),
            KeyCode::Down => c.move_down(),
            KeyCode::Char(ch) => c.push_filter_char(ch),
            _ => {}
        }
    }

    fn handle_key_confirm(&mut self, key: KeyEvent) {
        let c = &mut self.coordinator;
        let choice = match key.code {
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
                c.confirm_prev();
                return;
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
                c.confirm_next();
                return;
            }
            KeyCode::Enter => match c.confirm_dialog() {
                Some(dialog) => dialog.choice,
                None => return,
            },
            KeyCode::Char('t') | KeyCode::Char('y') => ConfirmChoice::Terminate,
            KeyCode::Char('f') => ConfirmChoice::ForceKill,
            KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('n') => ConfirmChoice::Cancel,
            _ => return,
        };
        if let Some(req) = c.confirm(choice) {
            info!(?req, "terminate requested");
            self.pending.push(req);
        }
    }
}
