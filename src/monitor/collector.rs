use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

use crate::constants::*;
use crate::models::{
    percent_of, sort_records, CpuStats, MemoryStats, ProcessRecord, SortKey,
    SwapStats, SystemSnapshot, TerminateOutcome,
};

use super::provider::{MetricsProvider, ProviderError};
use super::worker::{CollectEvent, CollectRequest};

/// Turns raw provider queries into well-formed snapshots.
/// Per-process and per-metric failures are absorbed here and never reach callers.
pub struct SnapshotCollector<P: MetricsProvider> {
    provider: P,
    disk_path: String,
    settle: Duration,
}

impl<P: MetricsProvider> SnapshotCollector<P> {
    pub fn new(provider: P, disk_path: impl Into<String>) -> Self {
        Self {
            provider,
            disk_path: disk_path.into(),
            settle: Duration::from_millis(CPU_SETTLE_MS),
        }
    }

    /// Override the delay between CPU priming and sampling.
    #[cfg(test)]
    pub fn with_settle_delay(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    #[cfg(test)]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Execute one worker request.
    pub fn run(&mut self, request: CollectRequest) -> CollectEvent {
        match request {
            CollectRequest::Processes(key) => CollectEvent::Processes(self.collect_processes(key)),
            CollectRequest::System => CollectEvent::System(self.collect_system_snapshot()),
            CollectRequest::Detail(pid) => CollectEvent::Detail(self.collect_process_detail(pid)),
            CollectRequest::Terminate { pid, force } => CollectEvent::Terminated {
                pid,
                outcome: self.terminate_process(pid, force),
            },
        }
    }

    /// Sample every visible process and return them sorted by `key`.
    ///
    /// Phase one primes the CPU counter of each pid, then after the settling
    /// delay phase two takes the real sample. Pids that vanish or refuse
    /// access in either phase are dropped.
    pub fn collect_processes(&mut self, key: SortKey) -> Vec<ProcessRecord> {
        let pids = match self.provider.pids() {
            Ok(pids) => pids,
            Err(e) => {
                warn!("process enumeration failed: {}", e);
                return Vec::new();
            }
        };

        let mut primed = Vec::with_capacity(pids.len());
        for pid in pids {
            let opened = self
                .provider
                .open(pid)
                .and_then(|_| self.provider.cpu_percent(pid));
            if opened.is_ok() {
                primed.push(pid);
            }
        }

        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }

        let mut records = Vec::with_capacity(primed.len());
        let mut dropped = 0usize;
        for pid in primed {
            match self.sample(pid) {
                Ok(record) => records.push(record),
                Err(_) => dropped += 1,
            }
        }

        sort_records(&mut records, key);
        debug!(
            count = records.len(),
            dropped,
            sort = %key,
            "process list collected"
        );
        records
    }

    fn sample(&mut self, pid: u32) -> Result<ProcessRecord, ProviderError> {
        let cpu = self.provider.cpu_percent(pid)?;
        let name = self.provider.name(pid)?;
        let memory_percent = self.provider.memory_percent(pid)?;
        let status = self.provider.status(pid)?;

        let mut record = ProcessRecord::summary(pid, name, status, cpu, memory_percent);
        if let Ok(user) = self.provider.username(pid) {
            record.username = user;
        }
        if let Ok(mem) = self.provider.memory_info(pid) {
            record.memory_rss = mem.rss;
            record.memory_vms = mem.vms;
        }
        Ok(record)
    }

    /// Full record for one pid. Sub-queries fall back independently; only a
    /// pid that cannot be opened at all yields the "not available" record.
    pub fn collect_process_detail(&mut self, pid: u32) -> ProcessRecord {
        let handle = self.provider.open(pid).and_then(|_| {
            let name = self.provider.name(pid)?;
            let status = self.provider.status(pid)?;
            Ok((name, status))
        });
        let (name, status) = match handle {
            Ok(h) => h,
            Err(e) => {
                debug!(pid, error = %e, "process detail not available");
                return ProcessRecord::unavailable(pid);
            }
        };

        let p = &mut self.provider;
        let cmdline = match p.cmdline(pid) {
            Ok(parts) => parts.join(" "),
            Err(_) => ACCESS_DENIED.to_string(),
        };
        let exe = p.exe(pid).unwrap_or_else(|_| ACCESS_DENIED.to_string());
        let memory = p.memory_info(pid).unwrap_or_default();
        let io = p.io_counters(pid).unwrap_or_default();

        ProcessRecord {
            pid,
            name,
            status,
            username: p.username(pid).unwrap_or_else(|_| UNKNOWN_USER.to_string()),
            cpu_percent: p.cpu_percent(pid).unwrap_or(0.0),
            memory_percent: p.memory_percent(pid).unwrap_or(0.0),
            created_time: p.create_time(pid).unwrap_or(0),
            cmdline,
            exe,
            memory_rss: memory.rss,
            memory_vms: memory.vms,
            io_read_bytes: io.read_bytes,
            io_write_bytes: io.write_bytes,
        }
    }

    /// Aggregate system metrics; each section falls back on its own.
    pub fn collect_system_snapshot(&mut self) -> SystemSnapshot {
        let mut snapshot = SystemSnapshot::fallback(&self.disk_path);
        let p = &mut self.provider;

        let cpu = CpuStats {
            percent: fallback(p.cpu_percent_total(), "cpu percent"),
            count_logical: fallback(p.cpu_count_logical(), "logical cores"),
            count_physical: match p.cpu_count_physical() {
                Ok(Some(n)) => n,
                Ok(None) => 1,
                Err(e) => {
                    warn!("physical cores unavailable: {}", e);
                    0
                }
            },
        };

        snapshot.cpu = cpu;

        if let Ok(vm) = p.virtual_memory().map_err(|e| warn!("memory stats unavailable: {}", e)) {
            snapshot.memory = MemoryStats {
                total: vm.total,
                available: vm.available,
                used: vm.used,
                percent: percent_of(vm.total.saturating_sub(vm.available), vm.total),
            };
        }

        if let Ok(s) = p.swap_memory().map_err(|e| warn!("swap stats unavailable: {}", e)) {
            snapshot.swap = SwapStats {
                total: s.total,
                used: s.used,
                percent: percent_of(s.used, s.total),
            };
        }

        match p.disk_usage(&self.disk_path) {
            Ok(d) => {
                let used = d.total.saturating_sub(d.available);
                snapshot.disk.total = d.total;
                snapshot.disk.used = used;
                snapshot.disk.percent = percent_of(used, d.total);
            }
            Err(e) => warn!("disk usage for {} unavailable: {}", self.disk_path, e),
        }

        snapshot.temperature = p.temperatures().ok().and_then(|t| t.first().copied());

        let boot_time = fallback(p.boot_time(), "boot time");
        if boot_time != 0 {
            snapshot.boot_time = boot_time;
            snapshot.uptime_seconds = unix_now().saturating_sub(boot_time);
        }

        snapshot
    }

    /// Send terminate (or kill when `force`) to `pid`. Never fails; the
    /// outcome carries the reason instead.
    pub fn terminate_process(&mut self, pid: u32, force: bool) -> TerminateOutcome {
        let result = if force {
            self.provider.kill(pid)
        } else {
            self.provider.terminate(pid)
        };
        match result {
            Ok(()) => {
                info!(pid, force, "process terminated");
                TerminateOutcome::succeeded()
            }
            Err(e) => {
                warn!(pid, force, error = %e, "terminate failed");
                TerminateOutcome::failed(e.to_string())
            }
        }
    }
}

fn fallback<T: Default>(result: Result<T, ProviderError>, what: &str) -> T {
    result.unwrap_or_else(|e| {
        warn!("{} unavailable: {}", what, e);
        T::default()
    })
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiskStats, ProcessStatus};
    use crate::monitor::mock::{MockProcess, MockProvider};

    fn collector(provider: MockProvider) -> SnapshotCollector<MockProvider> {
        SnapshotCollector::new(provider, "/").with_settle_delay(Duration::ZERO)
    }

    // ── collect_processes ─────────────────────────────────────────

    #[test]
    fn cpu_sort_scenario() {
        let provider = MockProvider::new()
            .with_process(MockProcess::new(10, "ten").cpu(1.0))
            .with_process(MockProcess::new(20, "twenty").cpu(50.0))
            .with_process(MockProcess::new(30, "thirty").cpu(25.0));
        let mut c = collector(provider);
        let pids: Vec<u32> = c.collect_processes(SortKey::Cpu).iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![20, 30, 10]);
    }

    #[test]
    fn primed_value_is_discarded() {
        // The baseline call reports 999% and must never show up in a record.
        let provider =
            MockProvider::new().with_process(MockProcess::new(1, "busy").cpu(12.5).baseline(999.0));
        let mut c = collector(provider);
        let records = c.collect_processes(SortKey::Cpu);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cpu_percent, 12.5);
        assert_eq!(c.provider().cpu_calls(1), 2);
    }

    #[test]
    fn zombie_and_stopped_processes_keep_their_status() {
        let provider = MockProvider::new()
            .with_process(MockProcess::new(5, "defunct").status(ProcessStatus::Zombie))
            .with_process(MockProcess::new(6, "paused").status(ProcessStatus::Stopped))
            .with_process(MockProcess::new(7, "worker"));
        let mut c = collector(provider);

        let records = c.collect_processes(SortKey::Pid);
        let statuses: Vec<(u32, ProcessStatus)> =
            records.iter().map(|r| (r.pid, r.status)).collect();
        assert_eq!(
            statuses,
            vec![
                (5, ProcessStatus::Zombie),
                (6, ProcessStatus::Stopped),
                (7, ProcessStatus::Running),
            ]
        );

        let detail = c.collect_process_detail(5);
        assert!(detail.is_available());
        assert_eq!(detail.name, "defunct");
        assert_eq!(detail.status, ProcessStatus::Zombie);
    }

    #[test]
    fn vanished_or_denied_processes_are_skipped() {
        let provider = MockProvider::new()
            .with_process(MockProcess::new(1, "ok"))
            .with_process(MockProcess::new(2, "gone").deny_open(ProviderError::NoSuchProcess))
            .with_process(MockProcess::new(3, "secret").deny_name(ProviderError::AccessDenied))
            .with_process(MockProcess::new(4, "undead").deny_name(ProviderError::ZombieProcess));
        let mut c = collector(provider);
        let pids: Vec<u32> = c.collect_processes(SortKey::Pid).iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![1]);
    }

    #[test]
    fn process_exiting_between_phases_is_dropped() {
        let provider = MockProvider::new()
            .with_process(MockProcess::new(1, "stays"))
            .with_process(MockProcess::new(2, "leaves").exit_after_cpu_calls(1));
        let mut c = collector(provider);
        let pids: Vec<u32> = c.collect_processes(SortKey::Pid).iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![1]);
    }

    #[test]
    fn empty_environment_yields_empty_list() {
        let mut c = collector(MockProvider::new());
        assert!(c.collect_processes(SortKey::Cpu).is_empty());
    }

    #[test]
    fn enumeration_failure_yields_empty_list() {
        let mut c = collector(MockProvider::new().fail_enumeration());
        assert!(c.collect_processes(SortKey::Name).is_empty());
    }

    #[test]
    fn list_rows_fall_back_for_username() {
        let provider = MockProvider::new()
            .with_process(MockProcess::new(5, "anon").deny_username(ProviderError::AccessDenied));
        let mut c = collector(provider);
        let records = c.collect_processes(SortKey::Pid);
        assert_eq!(records[0].username, UNKNOWN_USER);
        assert_eq!(records[0].cmdline, "");
    }

    #[test]
    fn every_sort_key_orders_output() {
        let provider = MockProvider::new()
            .with_process(MockProcess::new(3, "bravo").cpu(5.0).memory(1.0))
            .with_process(MockProcess::new(1, "Charlie").cpu(15.0).memory(0.5))
            .with_process(MockProcess::new(2, "alpha").cpu(10.0).memory(9.0));
        let mut c = collector(provider);

        let by_pid = c.collect_processes(SortKey::Pid);
        assert!(by_pid.windows(2).all(|w| w[0].pid <= w[1].pid));

        let by_name = c.collect_processes(SortKey::Name);
        assert!(by_name
            .windows(2)
            .all(|w| w[0].name.to_lowercase() <= w[1].name.to_lowercase()));

        let by_cpu = c.collect_processes(SortKey::Cpu);
        assert!(by_cpu.windows(2).all(|w| w[0].cpu_percent >= w[1].cpu_percent));

        let by_mem = c.collect_processes(SortKey::Memory);
        assert!(by_mem
            .windows(2)
            .all(|w| w[0].memory_percent >= w[1].memory_percent));
    }

    // ── collect_process_detail ────────────────────────────────────

    #[test]
    fn detail_is_fully_populated() {
        let provider = MockProvider::new().with_process(
            MockProcess::new(42, "server")
                .cmdline(&["server", "--port", "80"])
                .exe("/usr/bin/server")
                .rss(4096)
                .io(10, 20),
        );
        let mut c = collector(provider);
        let r = c.collect_process_detail(42);
        assert!(r.is_available());
        assert_eq!(r.name, "server");
        assert_eq!(r.cmdline, "server --port 80");
        assert_eq!(r.exe, "/usr/bin/server");
        assert_eq!(r.memory_rss, 4096);
        assert_eq!(r.io_read_bytes, 10);
        assert_eq!(r.io_write_bytes, 20);
        assert_eq!(r.username, "tester");
    }

    #[test]
    fn detail_sub_fields_fall_back_independently() {
        let provider = MockProvider::new().with_process(
            MockProcess::new(7, "guarded")
                .deny_cmdline(ProviderError::AccessDenied)
                .deny_exe(ProviderError::ZombieProcess)
                .deny_io(ProviderError::Unsupported)
                .deny_username(ProviderError::AccessDenied)
                .rss(2048),
        );
        let mut c = collector(provider);
        let r = c.collect_process_detail(7);
        assert!(r.is_available());
        assert_eq!(r.cmdline, ACCESS_DENIED);
        assert_eq!(r.exe, ACCESS_DENIED);
        assert_eq!(r.io_read_bytes, 0);
        assert_eq!(r.io_write_bytes, 0);
        assert_eq!(r.username, UNKNOWN_USER);
        // The untouched sub-field is still populated.
        assert_eq!(r.memory_rss, 2048);
    }

    #[test]
    fn detail_of_missing_process_is_not_available_record() {
        let mut c = collector(MockProvider::new());
        assert_eq!(c.collect_process_detail(999), ProcessRecord::unavailable(999));
    }

    #[test]
    fn detail_of_inaccessible_process_is_not_available_record() {
        let provider = MockProvider::new()
            .with_process(MockProcess::new(8, "root-only").deny_open(ProviderError::AccessDenied));
        let mut c = collector(provider);
        let r = c.collect_process_detail(8);
        assert!(!r.is_available());
        assert_eq!(r.status, ProcessStatus::Unknown);
    }

    // ── collect_system_snapshot ───────────────────────────────────

    #[test]
    fn system_snapshot_populated() {
        let mut c = collector(MockProvider::new());
        let s = c.collect_system_snapshot();
        assert_eq!(s.cpu.count_logical, 8);
        assert_eq!(s.cpu.count_physical, 4);
        assert_eq!(s.memory.total, 16_000);
        assert!((s.memory.percent - 25.0).abs() < 0.01);
        assert_eq!(s.disk.path, "/");
        assert_eq!(s.disk.used, 600);
        assert!((s.disk.percent - 60.0).abs() < 0.01);
        assert_eq!(s.temperature, Some(48.0));
        assert!(s.uptime_seconds > 0);
    }

    #[test]
    fn failing_sub_metrics_fall_back_individually() {
        let mut c = collector(MockProvider::new().fail_temperature().fail_disk());
        let s = c.collect_system_snapshot();
        assert_eq!(s.temperature, None);
        assert_eq!(s.disk, DiskStats::fallback("/"));
        assert_eq!(s.memory.total, 16_000);
    }

    #[test]
    fn unknown_physical_cores_default_to_one() {
        let mut c = collector(MockProvider::new().physical_cores(None));
        assert_eq!(c.collect_system_snapshot().cpu.count_physical, 1);
    }

    #[test]
    fn total_failure_yields_fallback_snapshot() {
        let mut c = collector(MockProvider::new().fail_system());
        assert_eq!(c.collect_system_snapshot(), SystemSnapshot::fallback("/"));
    }

    #[test]
    fn repeated_snapshots_keep_shape() {
        let mut c = collector(MockProvider::new());
        let a = c.collect_system_snapshot();
        let b = c.collect_system_snapshot();
        assert_eq!(a.disk.path, b.disk.path);
        assert_eq!(a.cpu.count_logical, b.cpu.count_logical);
        assert_eq!(a.temperature.is_some(), b.temperature.is_some());
    }

    // ── terminate_process ─────────────────────────────────────────

    #[test]
    fn terminate_success() {
        let mut c = collector(MockProvider::new().with_process(MockProcess::new(42, "victim")));
        assert_eq!(c.terminate_process(42, false), TerminateOutcome::succeeded());
        assert_eq!(c.provider().terminate_calls(), 1);
        assert_eq!(c.provider().kill_calls(), 0);
    }

    #[test]
    fn force_uses_kill() {
        let mut c = collector(MockProvider::new().with_process(MockProcess::new(42, "victim")));
        assert!(c.terminate_process(42, true).success);
        assert_eq!(c.provider().kill_calls(), 1);
        assert_eq!(c.provider().terminate_calls(), 0);
    }

    #[test]
    fn terminate_failures_become_reasons() {
        let provider = MockProvider::new()
            .with_process(MockProcess::new(7, "protected").deny_signal(ProviderError::AccessDenied))
            .with_process(MockProcess::new(9, "zombie").deny_signal(ProviderError::ZombieProcess))
            .with_process(
                MockProcess::new(11, "odd").deny_signal(ProviderError::Other("EINVAL".into())),
            );
        let mut c = collector(provider);
        assert_eq!(
            c.terminate_process(7, false).error_reason.as_deref(),
            Some("Access denied (try running as administrator)")
        );
        assert_eq!(
            c.terminate_process(9, true).error_reason.as_deref(),
            Some("Process is a zombie process")
        );
        assert_eq!(c.terminate_process(11, false).error_reason.as_deref(), Some("EINVAL"));
        assert_eq!(
            c.terminate_process(12345, false).error_reason.as_deref(),
            Some("Process does not exist")
        );
    }

    #[test]
    fn run_dispatches_requests() {
        let mut c = collector(MockProvider::new().with_process(MockProcess::new(42, "x")));
        assert!(matches!(c.run(CollectRequest::System), CollectEvent::System(_)));
        assert!(matches!(
            c.run(CollectRequest::Detail(42)),
            CollectEvent::Detail(ref r) if r.pid == 42
        ));
        assert!(matches!(
            c.run(CollectRequest::Terminate { pid: 42, force: false }),
            CollectEvent::Terminated { pid: 42, ref outcome } if outcome.success
        ));
    }
}
