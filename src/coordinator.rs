//! Refresh coordination: the single owner of everything the UI shows.
//!
//! The coordinator never talks to the OS. It decides which collection
//! requests are due, folds worker events back into its state and keeps the
//! selection consistent with the latest process list.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::constants::*;
use crate::models::{sort_records, ProcessRecord, SortKey, SystemSnapshot, TerminateOutcome};
use crate::monitor::{CollectEvent, CollectRequest};

/// What the detail panel currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailView {
    /// Nothing selected.
    Empty,
    Loading(u32),
    Loaded(ProcessRecord),
    Unavailable(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmChoice {
    #[default]
    Cancel,
    Terminate,
    ForceKill,
}

impl ConfirmChoice {
    pub fn all() -> &'static [ConfirmChoice] {
        &[
            ConfirmChoice::Cancel,
            ConfirmChoice::Terminate,
            ConfirmChoice::ForceKill,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfirmChoice::Cancel => "Cancel",
            ConfirmChoice::Terminate => "Terminate",
            ConfirmChoice::ForceKill => "Force Kill",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ConfirmChoice::Cancel => ConfirmChoice::Terminate,
            ConfirmChoice::Terminate => ConfirmChoice::ForceKill,
            ConfirmChoice::ForceKill => ConfirmChoice::Cancel,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ConfirmChoice::Cancel => ConfirmChoice::ForceKill,
            ConfirmChoice::Terminate => ConfirmChoice::Cancel,
            ConfirmChoice::ForceKill => ConfirmChoice::Terminate,
        }
    }
}

/// Open kill confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillConfirm {
    pub pid: u32,
    pub name: String,
    pub choice: ConfirmChoice,
}

pub struct RefreshCoordinator {
    processes: Vec<ProcessRecord>,
    system: Option<SystemSnapshot>,
    sort_key: SortKey,
    selection: Option<u32>,
    detail: DetailView,
    cursor: usize,
    filter_text: String,
    confirm: Option<KillConfirm>,
    notification: Option<Notification>,
    last_error: Option<String>,

    process_interval: Duration,
    system_interval: Duration,
    last_process_request: Option<Instant>,
    last_system_request: Option<Instant>,
    processes_in_flight: bool,
    system_in_flight: bool,
    force_processes: bool,
}

impl RefreshCoordinator {
    pub fn new(sort_key: SortKey, process_interval: Duration, system_interval: Duration) -> Self {
        Self {
            processes: Vec::new(),
            system: None,
            sort_key,
            selection: None,
            detail: DetailView::Empty,
            cursor: 0,
            filter_text: String::new(),
            confirm: None,
            notification: None,
            last_error: None,
            process_interval,
            system_interval,
            last_process_request: None,
            last_system_request: None,
            processes_in_flight: false,
            system_in_flight: false,
            force_processes: false,
        }
    }

    // ── Accessors ────────────────────────────────────────────────

    #[cfg(test)]
    pub fn processes(&self) -> &[ProcessRecord] {
        &self.processes
    }

    pub fn system(&self) -> Option<&SystemSnapshot> {
        self.system.as_ref()
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn selection(&self) -> Option<u32> {
        self.selection
    }

    pub fn detail(&self) -> &DetailView {
        &self.detail
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn confirm_dialog(&self) -> Option<&KillConfirm> {
        self.confirm.as_ref()
    }

    /// Reason of the most recent failed terminate, verbatim.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn process_interval(&self) -> Duration {
        self.process_interval
    }

    // ── Scheduling ───────────────────────────────────────────────

    /// Requests whose cadence has elapsed (or that were forced), never
    /// re-issuing a kind that is still in flight.
    pub fn due_requests(&mut self, now: Instant) -> Vec<CollectRequest> {
        let mut due = Vec::new();

        if !self.system_in_flight && elapsed(self.last_system_request, now, self.system_interval) {
            self.system_in_flight = true;
            self.last_system_request = Some(now);
            due.push(CollectRequest::System);
        }

        if !self.processes_in_flight
            && (self.force_processes
                || elapsed(self.last_process_request, now, self.process_interval))
        {
            self.processes_in_flight = true;
            self.force_processes = false;
            self.last_process_request = Some(now);
            due.push(CollectRequest::Processes(self.sort_key));
        }

        due
    }

    /// Fold one worker event into the state.
    pub fn apply(&mut self, event: CollectEvent) {
        match event {
            CollectEvent::Processes(list) => {
                self.processes_in_flight = false;
                self.replace_processes(list);
            }
            CollectEvent::System(snapshot) => {
                self.system_in_flight = false;
                self.system = Some(snapshot);
            }
            CollectEvent::Detail(record) => {
                // A detail for a pid that is no longer selected is stale.
                if self.selection != Some(record.pid) {
                    debug!(pid = record.pid, "dropping stale detail");
                    return;
                }
                self.detail = if record.is_available() {
                    DetailView::Loaded(record)
                } else {
                    DetailView::Unavailable(record.pid)
                };
            }
            CollectEvent::Terminated { pid, outcome } => self.on_terminated(pid, outcome),
        }
    }

    fn replace_processes(&mut self, mut list: Vec<ProcessRecord>) {
        let anchor = self.selection.or_else(|| self.pid_under_cursor());

        // The list may have been requested under an older sort key.
        sort_records(&mut list, self.sort_key);
        self.processes = list;

        if let Some(pid) = self.selection {
            if !self.processes.iter().any(|p| p.pid == pid) {
                debug!(pid, "selected process vanished");
                self.clear_selection();
            }
        }

        self.follow(anchor);
    }

    fn on_terminated(&mut self, pid: u32, outcome: TerminateOutcome) {
        if outcome.success {
            info!(pid, "terminate confirmed");
            if self.selection == Some(pid) {
                self.selection = None;
                self.detail = DetailView::Empty;
            }
            self.force_processes = true;
            self.last_error = None;
            self.notify(NotificationLevel::Info, format!("Process {} terminated", pid));
        } else {
            let reason = outcome.error_reason.unwrap_or_default();
            self.notify(
                NotificationLevel::Error,
                format!("Failed to terminate process: {}", reason),
            );
            self.last_error = Some(reason);
        }
    }

    // ── Selection & actions ──────────────────────────────────────

    /// Select `pid` and ask for its detail. Selecting the current pid again
    /// re-requests the detail.
    pub fn select(&mut self, pid: u32) -> Option<CollectRequest> {
        if !self.processes.iter().any(|p| p.pid == pid) {
            return None;
        }
        if self.selection != Some(pid) {
            self.last_error = None;
        }
        self.selection = Some(pid);
        self.detail = DetailView::Loading(pid);
        self.follow(Some(pid));
        Some(CollectRequest::Detail(pid))
    }

    pub fn select_under_cursor(&mut self) -> Option<CollectRequest> {
        let pid = self.pid_under_cursor()?;
        self.select(pid)
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.detail = DetailView::Empty;
        self.last_error = None;
    }

    /// Open the kill confirmation for the selection.
    pub fn request_kill(&mut self) {
        let Some(pid) = self.selection else {
            self.notify(NotificationLevel::Error, "No process selected".to_string());
            return;
        };
        let name = self
            .processes
            .iter()
            .find(|p| p.pid == pid)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        self.confirm = Some(KillConfirm {
            pid,
            name,
            choice: ConfirmChoice::default(),
        });
    }

    pub fn confirm_next(&mut self) {
        if let Some(c) = self.confirm.as_mut() {
            c.choice = c.choice.next();
        }
    }

    pub fn confirm_prev(&mut self) {
        if let Some(c) = self.confirm.as_mut() {
            c.choice = c.choice.prev();
        }
    }

    /// Close the dialog with `choice`, yielding the terminate request if any.
    pub fn confirm(&mut self, choice: ConfirmChoice) -> Option<CollectRequest> {
        let dialog = self.confirm.take()?;
        match choice {
            ConfirmChoice::Cancel => None,
            ConfirmChoice::Terminate => Some(CollectRequest::Terminate {
                pid: dialog.pid,
                force: false,
            }),
            ConfirmChoice::ForceKill => Some(CollectRequest::Terminate {
                pid: dialog.pid,
                force: true,
            }),
        }
    }

    /// Change the ordering locally and fetch a fresh list.
    pub fn set_sort(&mut self, key: SortKey) {
        let anchor = self.selection.or_else(|| self.pid_under_cursor());
        self.sort_key = key;
        sort_records(&mut self.processes, key);
        self.force_processes = true;
        self.follow(anchor);
    }

    /// Manual refresh: force a list refresh and re-fetch the selected detail.
    pub fn refresh_now(&mut self) -> Option<CollectRequest> {
        self.force_processes = true;
        self.selection.map(CollectRequest::Detail)
    }

    // ── Filter ───────────────────────────────────────────────────

    /// Rows that pass the filter, in display order.
    pub fn visible_processes(&self) -> Vec<&ProcessRecord> {
        if self.filter_text.is_empty() {
            return self.processes.iter().collect();
        }
        let filter = self.filter_text.to_lowercase();
        self.processes
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&filter)
                    || p.cmdline.to_lowercase().contains(&filter)
                    || p.pid.to_string().contains(&filter)
            })
            .collect()
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_text.push(c);
        self.cursor = 0;
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_text.pop();
        self.clamp_cursor();
    }

    pub fn clear_filter(&mut self) {
        let anchor = self.pid_under_cursor();
        self.filter_text.clear();
        self.follow(anchor);
    }

    // ── Cursor ───────────────────────────────────────────────────

    pub fn pid_under_cursor(&self) -> Option<u32> {
        self.visible_processes().get(self.cursor).map(|p| p.pid)
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let max = self.visible_processes().len().saturating_sub(1);
        if self.cursor < max {
            self.cursor += 1;
        }
    }

    pub fn page_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(PAGE_SIZE);
    }

    pub fn page_down(&mut self) {
        let max = self.visible_processes().len().saturating_sub(1);
        self.cursor = (self.cursor + PAGE_SIZE).min(max);
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.visible_processes().len().saturating_sub(1);
    }

    fn follow(&mut self, anchor: Option<u32>) {
        let found = anchor.and_then(|pid| self.visible_processes().iter().position(|p| p.pid == pid));
        match found {
            Some(row) => self.cursor = row,
            None => self.clamp_cursor(),
        }
    }

    fn clamp_cursor(&mut self) {
        let max = self.visible_processes().len().saturating_sub(1);
        self.cursor = self.cursor.min(max);
    }

    // ── Notifications ────────────────────────────────────────────

    pub fn notify(&mut self, level: NotificationLevel, message: String) {
        self.notification = Some(Notification {
            message,
            level,
            at: Instant::now(),
        });
    }

    /// The current notification, unless it has expired by `now`.
    pub fn notification(&self, now: Instant) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| {
            now.saturating_duration_since(n.at) < Duration::from_secs(STATUS_MESSAGE_TIMEOUT_SECS)
        })
    }
}

fn elapsed(last: Option<Instant>, now: Instant, interval: Duration) -> bool {
    match last {
        None => true,
        Some(at) => now.saturating_duration_since(at) >= interval,
    }
}
