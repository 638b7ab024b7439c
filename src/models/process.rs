use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::constants::{NOT_AVAILABLE, UNKNOWN_USER};

/// One process at one snapshot instant.
///
/// Every field always carries a value: when the OS refuses a query the
/// collector substitutes a fallback, so a record is never partial.
/// Records are built fresh each cycle and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub status: ProcessStatus,
    pub username: String,
    /// Usage over the sampling window; may exceed 100 on multi-core hosts.
    pub cpu_percent: f32,
    pub memory_percent: f32,
    /// Unix epoch seconds, 0 if unknown.
    pub created_time: u64,
    pub cmdline: String,
    pub exe: String,
    pub memory_rss: u64,
    pub memory_vms: u64,
    pub io_read_bytes: u64,
    pub io_write_bytes: u64,
}

impl ProcessRecord {
    /// Row produced by the list scan: only the sampled columns are real,
    /// the detail-only fields hold their fallbacks.
    pub fn summary(
        pid: u32,
        name: String,
        status: ProcessStatus,
        cpu_percent: f32,
        memory_percent: f32,
    ) -> Self {
        Self {
            pid,
            name,
            status,
            username: UNKNOWN_USER.to_string(),
            cpu_percent,
            memory_percent,
            created_time: 0,
            cmdline: String::new(),
            exe: String::new(),
            memory_rss: 0,
            memory_vms: 0,
            io_read_bytes: 0,
            io_write_bytes: 0,
        }
    }

    /// The "process not available" record returned when a pid cannot be opened.
    pub fn unavailable(pid: u32) -> Self {
        Self {
            pid,
            name: NOT_AVAILABLE.to_string(),
            status: ProcessStatus::Unknown,
            username: UNKNOWN_USER.to_string(),
            cpu_percent: 0.0,
            memory_percent: 0.0,
            created_time: 0,
            cmdline: String::new(),
            exe: String::new(),
            memory_rss: 0,
            memory_vms: 0,
            io_read_bytes: 0,
            io_write_bytes: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.name != NOT_AVAILABLE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    Running,
    Sleeping,
    Stopped,
    Zombie,
    Unknown,
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessStatus::Running => write!(f, "running"),
            ProcessStatus::Sleeping => write!(f, "sleeping"),
            ProcessStatus::Stopped => write!(f, "stopped"),
            ProcessStatus::Zombie => write!(f, "zombie"),
            ProcessStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Ordering applied to a collected process list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Cpu,
    Memory,
    Name,
    Pid,
}

impl SortKey {
    pub fn all() -> &'static [SortKey] {
        &[SortKey::Cpu, SortKey::Memory, SortKey::Name, SortKey::Pid]
    }

    pub fn next(self) -> Self {
        match self {
            SortKey::Cpu => SortKey::Memory,
            SortKey::Memory => SortKey::Name,
            SortKey::Name => SortKey::Pid,
            SortKey::Pid => SortKey::Cpu,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Cpu => write!(f, "cpu"),
            SortKey::Memory => write!(f, "memory"),
            SortKey::Name => write!(f, "name"),
            SortKey::Pid => write!(f, "pid"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(SortKey::Cpu),
            "memory" | "mem" => Ok(SortKey::Memory),
            "name" => Ok(SortKey::Name),
            "pid" => Ok(SortKey::Pid),
            other => {
                let known: Vec<String> = SortKey::all().iter().map(|k| k.to_string()).collect();
                Err(format!(
                    "unknown sort key '{}' (expected one of: {})",
                    other,
                    known.join(", ")
                ))
            }
        }
    }
}

/// Sort `records` in place. The sort is stable: equal keys keep their prior order.
pub fn sort_records(records: &mut [ProcessRecord], key: SortKey) {
    match key {
        SortKey::Cpu => records.sort_by(|a, b| {
            b.cpu_percent
                .partial_cmp(&a.cpu_percent)
                .unwrap_or(Ordering::Equal)
        }),
        SortKey::Memory => records.sort_by(|a, b| {
            b.memory_percent
                .partial_cmp(&a.memory_percent)
                .unwrap_or(Ordering::Equal)
        }),
        SortKey::Name => records.sort_by_cached_key(|r| r.name.to_lowercase()),
        SortKey::Pid => records.sort_by_key(|r| r.pid),
    }
}

/// Result of a terminate/kill attempt. Failures carry a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminateOutcome {
    pub success: bool,
    pub error_reason: Option<String>,
}

impl TerminateOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error_reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error_reason: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(pid: u32, name: &str, cpu: f32, mem: f32) -> ProcessRecord {
        ProcessRecord::summary(pid, name.to_string(), ProcessStatus::Running, cpu, mem)
    }

    fn pids(records: &[ProcessRecord]) -> Vec<u32> {
        records.iter().map(|r| r.pid).collect()
    }

    #[test]
    fn sort_by_cpu_is_descending() {
        let mut procs = vec![rec(10, "a", 1.0, 0.0), rec(20, "b", 50.0, 0.0), rec(30, "c", 25.0, 0.0)];
        sort_records(&mut procs, SortKey::Cpu);
        assert_eq!(pids(&procs), vec![20, 30, 10]);
    }

    #[test]
    fn sort_by_memory_is_descending() {
        let mut procs = vec![rec(1, "a", 0.0, 3.5), rec(2, "b", 0.0, 12.0), rec(3, "c", 0.0, 0.1)];
        sort_records(&mut procs, SortKey::Memory);
        assert_eq!(pids(&procs), vec![2, 1, 3]);
    }

    #[test]
    fn sort_by_name_ignores_case() {
        let mut procs = vec![rec(1, "Zebra", 0.0, 0.0), rec(2, "alpha", 0.0, 0.0), rec(3, "Beta", 0.0, 0.0)];
        sort_records(&mut procs, SortKey::Name);
        let names: Vec<&str> = procs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Beta", "Zebra"]);
    }

    #[test]
    fn sort_by_pid_is_ascending() {
        let mut procs = vec![rec(100, "b", 0.0, 0.0), rec(1, "a", 0.0, 0.0), rec(50, "c", 0.0, 0.0)];
        sort_records(&mut procs, SortKey::Pid);
        assert_eq!(pids(&procs), vec![1, 50, 100]);
    }

    #[test]
    fn sort_keeps_prior_order_of_ties() {
        let mut procs = vec![rec(5, "x", 10.0, 0.0), rec(3, "y", 10.0, 0.0), rec(9, "z", 10.0, 0.0)];
        sort_records(&mut procs, SortKey::Cpu);
        assert_eq!(pids(&procs), vec![5, 3, 9]);
    }

    #[test]
    fn sort_key_parses_and_displays() {
        for key in SortKey::all() {
            assert_eq!(key.to_string().parse::<SortKey>(), Ok(*key));
        }
        assert_eq!("MEM".parse::<SortKey>(), Ok(SortKey::Memory));
        assert!("rss".parse::<SortKey>().is_err());
    }

    #[test]
    fn sort_key_next_cycles_through_all() {
        let mut key = SortKey::Cpu;
        for expected in [SortKey::Memory, SortKey::Name, SortKey::Pid, SortKey::Cpu] {
            key = key.next();
            assert_eq!(key, expected);
        }
    }

    #[test]
    fn unavailable_record_is_fully_populated() {
        let r = ProcessRecord::unavailable(77);
        assert_eq!(r.pid, 77);
        assert_eq!(r.name, NOT_AVAILABLE);
        assert_eq!(r.username, UNKNOWN_USER);
        assert_eq!(r.status, ProcessStatus::Unknown);
        assert_eq!(r.cpu_percent, 0.0);
        assert_eq!(r.memory_rss, 0);
        assert!(!r.is_available());
    }

    #[test]
    fn terminate_outcome_constructors() {
        assert_eq!(TerminateOutcome::succeeded().error_reason, None);
        let failed = TerminateOutcome::failed("nope");
        assert!(!failed.success);
        assert_eq!(failed.error_reason.as_deref(), Some("nope"));
    }
}
