//! Scripted provider for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::ProcessStatus;

use super::provider::{
    DiskSpace, IoCounters, MemoryInfo, MetricsProvider, ProviderError, ProviderResult,
    SwapMemory, VirtualMemory,
};

#[derive(Debug, Clone)]
pub struct MockProcess {
    pid: u32,
    name: String,
    status: ProcessStatus,
    username: String,
    cpu: f32,
    baseline: f32,
    memory: f32,
    rss: u64,
    vms: u64,
    read_bytes: u64,
    write_bytes: u64,
    created: u64,
    cmdline: Vec<String>,
    exe: String,
    exits_after_cpu_calls: Option<usize>,
    open_err: Option<ProviderError>,
    name_err: Option<ProviderError>,
    username_err: Option<ProviderError>,
    cmdline_err: Option<ProviderError>,
    exe_err: Option<ProviderError>,
    io_err: Option<ProviderError>,
    signal_err: Option<ProviderError>,
}

impl MockProcess {
    pub fn new(pid: u32, name: &str) -> Self {
        Self {
            pid,
            name: name.to_string(),
            status: ProcessStatus::Running,
            username: "tester".to_string(),
            cpu: 0.0,
            baseline: 0.0,
            memory: 0.0,
            rss: 0,
            vms: 0,
            read_bytes: 0,
            write_bytes: 0,
            created: 1_700_000_000,
            cmdline: vec![name.to_string()],
            exe: format!("/usr/bin/{}", name),
            exits_after_cpu_calls: None,
            open_err: None,
            name_err: None,
            username_err: None,
            cmdline_err: None,
            exe_err: None,
            io_err: None,
            signal_err: None,
        }
    }

    pub fn cpu(mut self, cpu: f32) -> Self {
        self.cpu = cpu;
        self
    }

    /// Value reported by the first cpu call (the priming sample).
    pub fn baseline(mut self, baseline: f32) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn memory(mut self, percent: f32) -> Self {
        self.memory = percent;
        self
    }

    pub fn status(mut self, status: ProcessStatus) -> Self {
        self.status = status;
        self
    }

    pub fn rss(mut self, rss: u64) -> Self {
        self.rss = rss;
        self
    }

    pub fn io(mut self, read: u64, write: u64) -> Self {
        self.read_bytes = read;
        self.write_bytes = write;
        self
    }

    pub fn cmdline(mut self, parts: &[&str]) -> Self {
        self.cmdline = parts.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn exe(mut self, exe: &str) -> Self {
        self.exe = exe.to_string();
        self
    }

    /// The process disappears once `n` cpu samples have been taken.
    pub fn exit_after_cpu_calls(mut self, n: usize) -> Self {
        self.exits_after_cpu_calls = Some(n);
        self
    }

    pub fn deny_open(mut self, err: ProviderError) -> Self {
        self.open_err = Some(err);
        self
    }

    pub fn deny_name(mut self, err: ProviderError) -> Self {
        self.name_err = Some(err);
        self
    }

    pub fn deny_username(mut self, err: ProviderError) -> Self {
        self.username_err = Some(err);
        self
    }

    pub fn deny_cmdline(mut self, err: ProviderError) -> Self {
        self.cmdline_err = Some(err);
        self
    }

    pub fn deny_exe(mut self, err: ProviderError) -> Self {
        self.exe_err = Some(err);
        self
    }

    pub fn deny_io(mut self, err: ProviderError) -> Self {
        self.io_err = Some(err);
        self
    }

    pub fn deny_signal(mut self, err: ProviderError) -> Self {
        self.signal_err = Some(err);
        self
    }
}

fn check(err: &Option<ProviderError>) -> ProviderResult<()> {
    match err {
        Some(e) => Err(e.clone()),
        None => Ok(()),
    }
}

pub struct MockProvider {
    processes: Vec<MockProcess>,
    cpu_calls: HashMap<u32, usize>,
    pids_calls: Arc<AtomicUsize>,
    terminate_calls: usize,
    kill_calls: usize,
    fail_enumeration: bool,
    fail_system: bool,
    fail_disk: bool,
    fail_temperature: bool,
    physical_cores: Option<usize>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            processes: Vec::new(),
            cpu_calls: HashMap::new(),
            pids_calls: Arc::new(AtomicUsize::new(0)),
            terminate_calls: 0,
            kill_calls: 0,
            fail_enumeration: false,
            fail_system: false,
            fail_disk: false,
            fail_temperature: false,
            physical_cores: Some(4),
        }
    }

    pub fn with_process(mut self, process: MockProcess) -> Self {
        self.processes.push(process);
        self
    }

    pub fn fail_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    /// Every system-wide query fails.
    pub fn fail_system(mut self) -> Self {
        self.fail_system = true;
        self
    }

    pub fn fail_disk(mut self) -> Self {
        self.fail_disk = true;
        self
    }

    pub fn fail_temperature(mut self) -> Self {
        self.fail_temperature = true;
        self
    }

    pub fn physical_cores(mut self, cores: Option<usize>) -> Self {
        self.physical_cores = cores;
        self
    }

    /// Shared counter of `pids` calls, readable after the provider moved to a worker.
    pub fn pids_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.pids_calls)
    }

    pub fn cpu_calls(&self, pid: u32) -> usize {
        self.cpu_calls.get(&pid).copied().unwrap_or(0)
    }

    pub fn terminate_calls(&self) -> usize {
        self.terminate_calls
    }

    pub fn kill_calls(&self) -> usize {
        self.kill_calls
    }

    fn find(&self, pid: u32) -> ProviderResult<&MockProcess> {
        self.processes
            .iter()
            .find(|p| p.pid == pid)
            .ok_or(ProviderError::NoSuchProcess)
    }

    fn system_check(&self) -> ProviderResult<()> {
        if self.fail_system {
            Err(ProviderError::Unsupported)
        } else {
            Ok(())
        }
    }

    fn signal(&mut self, pid: u32) -> ProviderResult<()> {
        check(&self.find(pid)?.signal_err)?;
        self.processes.retain(|p| p.pid != pid);
        Ok(())
    }
}

impl MetricsProvider for MockProvider {
    fn pids(&mut self) -> ProviderResult<Vec<u32>> {
        self.pids_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_enumeration {
            return Err(ProviderError::AccessDenied);
        }
        Ok(self.processes.iter().map(|p| p.pid).collect())
    }

    fn open(&mut self, pid: u32) -> ProviderResult<()> {
        check(&self.find(pid)?.open_err)
    }

    fn name(&self, pid: u32) -> ProviderResult<String> {
        let p = self.find(pid)?;
        check(&p.name_err)?;
        Ok(p.name.clone())
    }

    fn status(&self, pid: u32) -> ProviderResult<ProcessStatus> {
        Ok(self.find(pid)?.status)
    }

    fn username(&self, pid: u32) -> ProviderResult<String> {
        let p = self.find(pid)?;
        check(&p.username_err)?;
        Ok(p.username.clone())
    }

    fn cpu_percent(&mut self, pid: u32) -> ProviderResult<f32> {
        let p = self.find(pid)?.clone();
        let calls = self.cpu_calls.entry(pid).or_insert(0);
        if p.exits_after_cpu_calls.is_some_and(|n| *calls >= n) {
            return Err(ProviderError::NoSuchProcess);
        }
        *calls += 1;
        Ok(if *calls == 1 { p.baseline } else { p.cpu })
    }

    fn memory_percent(&self, pid: u32) -> ProviderResult<f32> {
        Ok(self.find(pid)?.memory)
    }

    fn memory_info(&self, pid: u32) -> ProviderResult<MemoryInfo> {
        let p = self.find(pid)?;
        Ok(MemoryInfo {
            rss: p.rss,
            vms: p.vms,
        })
    }

    fn create_time(&self, pid: u32) -> ProviderResult<u64> {
        Ok(self.find(pid)?.created)
    }

    fn cmdline(&self, pid: u32) -> ProviderResult<Vec<String>> {
        let p = self.find(pid)?;
        check(&p.cmdline_err)?;
        Ok(p.cmdline.clone())
    }

    fn exe(&self, pid: u32) -> ProviderResult<String> {
        let p = self.find(pid)?;
        check(&p.exe_err)?;
        Ok(p.exe.clone())
    }

    fn io_counters(&self, pid: u32) -> ProviderResult<IoCounters> {
        let p = self.find(pid)?;
        check(&p.io_err)?;
        Ok(IoCounters {
            read_bytes: p.read_bytes,
            write_bytes: p.write_bytes,
        })
    }

    fn terminate(&mut self, pid: u32) -> ProviderResult<()> {
        self.terminate_calls += 1;
        self.signal(pid)
    }

    fn kill(&mut self, pid: u32) -> ProviderResult<()> {
        self.kill_calls += 1;
        self.signal(pid)
    }

    fn cpu_percent_total(&mut self) -> ProviderResult<f32> {
        self.system_check()?;
        Ok(37.5)
    }

    fn cpu_count_logical(&self) -> ProviderResult<usize> {
        self.system_check()?;
        Ok(8)
    }

    fn cpu_count_physical(&self) -> ProviderResult<Option<usize>> {
        self.system_check()?;
        Ok(self.physical_cores)
    }

    fn virtual_memory(&mut self) -> ProviderResult<VirtualMemory> {
        self.system_check()?;
        Ok(VirtualMemory {
            total: 16_000,
            available: 12_000,
            used: 4_000,
        })
    }

    fn swap_memory(&mut self) -> ProviderResult<SwapMemory> {
        self.system_check()?;
        Ok(SwapMemory {
            total: 2_000,
            used: 500,
        })
    }

    fn disk_usage(&mut self, _path: &str) -> ProviderResult<DiskSpace> {
        self.system_check()?;
        if self.fail_disk {
            return Err(ProviderError::Other("no filesystem".into()));
        }
        Ok(DiskSpace {
            total: 1_000,
            available: 400,
        })
    }

    fn temperatures(&mut self) -> ProviderResult<Vec<f32>> {
        self.system_check()?;
        if self.fail_temperature {
            return Err(ProviderError::Unsupported);
        }
        Ok(vec![48.0, 55.0])
    }

    fn boot_time(&self) -> ProviderResult<u64> {
        self.system_check()?;
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Ok(now.saturating_sub(3_600))
    }
}
