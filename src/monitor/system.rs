//! `sysinfo`-backed implementation of [`MetricsProvider`].

use std::collections::HashSet;
use std::path::Path;

use sysinfo::{
    Components, Disks, Pid, Process, ProcessRefreshKind, ProcessStatus as SysProcessStatus,
    ProcessesToUpdate, System, UpdateKind, Users,
};

use crate::models::{percent_of, ProcessStatus};

use super::provider::{
    DiskSpace, IoCounters, MemoryInfo, MetricsProvider, ProviderError, ProviderResult,
    SwapMemory, VirtualMemory,
};

/// Owns the sysinfo handles.
///
/// sysinfo only recomputes per-process CPU on a full process table refresh,
/// and any per-pid refresh moves that pid's CPU baseline. So process data is
/// read from the cached table, and the table is refreshed as a whole: on
/// `pids()`, and on `cpu_percent()` of a pid already read since the last
/// refresh. The two-sample pattern becomes two full refreshes.
pub struct SysinfoProvider {
    sys: System,
    users: Users,
    disks: Disks,
    components: Components,
    /// Pids whose CPU value was handed out since the last full refresh.
    cpu_read: HashSet<u32>,
}

impl SysinfoProvider {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_usage();
        Self {
            sys,
            users: Users::new_with_refreshed_list(),
            disks: Disks::new_with_refreshed_list(),
            components: Components::new_with_refreshed_list(),
            cpu_read: HashSet::new(),
        }
    }

    /// Refresh the whole process table, CPU included, dropping dead pids.
    fn refresh_all(&mut self) {
        self.sys.refresh_memory();
        self.sys
            .refresh_processes_specifics(ProcessesToUpdate::All, true, table_refresh_kind());
        self.cpu_read.clear();
    }

    fn process(&self, pid: u32) -> ProviderResult<&Process> {
        self.sys
            .process(Pid::from_u32(pid))
            .ok_or(ProviderError::NoSuchProcess)
    }

    /// Re-read one pid. Fails when the process has exited since the last look.
    /// Only for pids the table does not know yet; it resets the CPU baseline.
    fn refresh_one(&mut self, pid: u32, kind: ProcessRefreshKind) -> ProviderResult<()> {
        let target = [Pid::from_u32(pid)];
        let updated =
            self.sys
                .refresh_processes_specifics(ProcessesToUpdate::Some(&target), true, kind);
        if updated == 0 {
            return Err(ProviderError::NoSuchProcess);
        }
        Ok(())
    }

    fn is_zombie(&self, pid: u32) -> bool {
        self.process(pid)
            .map(|p| p.status() == SysProcessStatus::Zombie)
            .unwrap_or(false)
    }

    #[cfg(unix)]
    fn send_signal(&mut self, pid: u32, signal: libc::c_int) -> ProviderResult<()> {
        // kill(0) and kill(-1) address process groups, never a single process.
        let raw = i32::try_from(pid).map_err(|_| ProviderError::NoSuchProcess)?;
        if raw <= 0 {
            return Err(ProviderError::NoSuchProcess);
        }
        if self.is_zombie(pid) {
            return Err(ProviderError::ZombieProcess);
        }
        let result = unsafe { libc::kill(raw, signal) };
        if result == 0 {
            return Ok(());
        }
        let err = std::io::Error::last_os_error();
        match err.raw_os_error() {
            Some(libc::ESRCH) => Err(ProviderError::NoSuchProcess),
            Some(libc::EPERM) => Err(ProviderError::AccessDenied),
            _ => Err(ProviderError::Other(err.to_string())),
        }
    }
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProvider for SysinfoProvider {
    fn pids(&mut self) -> ProviderResult<Vec<u32>> {
        self.refresh_all();
        Ok(self.sys.processes().keys().map(|pid| pid.as_u32()).collect())
    }

    fn open(&mut self, pid: u32) -> ProviderResult<()> {
        if self.sys.process(Pid::from_u32(pid)).is_some() {
            return Ok(());
        }
        self.refresh_one(pid, table_refresh_kind())
    }

    fn name(&self, pid: u32) -> ProviderResult<String> {
        Ok(self.process(pid)?.name().to_string_lossy().to_string())
    }

    fn status(&self, pid: u32) -> ProviderResult<ProcessStatus> {
        Ok(map_process_status(self.process(pid)?.status()))
    }

    fn username(&self, pid: u32) -> ProviderResult<String> {
        let uid = self
            .process(pid)?
            .user_id()
            .ok_or(ProviderError::AccessDenied)?;
        Ok(self
            .users
            .get_user_by_id(uid)
            .map(|u| u.name().to_string())
            // Fall back to the numeric UID if the name is not in the user list.
            .unwrap_or_else(|| uid.to_string()))
    }

    fn cpu_percent(&mut self, pid: u32) -> ProviderResult<f32> {
        if self.cpu_read.contains(&pid) {
            self.refresh_all();
        }
        let usage = self.process(pid)?.cpu_usage().max(0.0);
        self.cpu_read.insert(pid);
        Ok(usage)
    }

    fn memory_percent(&self, pid: u32) -> ProviderResult<f32> {
        let rss = self.process(pid)?.memory();
        Ok(percent_of(rss, self.sys.total_memory()))
    }

    fn memory_info(&self, pid: u32) -> ProviderResult<MemoryInfo> {
        let p = self.process(pid)?;
        Ok(MemoryInfo {
            rss: p.memory(),
            vms: p.virtual_memory(),
        })
    }

    fn create_time(&self, pid: u32) -> ProviderResult<u64> {
        Ok(self.process(pid)?.start_time())
    }

    fn cmdline(&self, pid: u32) -> ProviderResult<Vec<String>> {
        let p = self.process(pid)?;
        if p.cmd().is_empty() && p.status() == SysProcessStatus::Zombie {
            return Err(ProviderError::ZombieProcess);
        }
        Ok(p.cmd()
            .iter()
            .map(|s| s.to_string_lossy().to_string())
            .collect())
    }

    fn exe(&self, pid: u32) -> ProviderResult<String> {
        let p = self.process(pid)?;
        match p.exe() {
            Some(path) => Ok(path.display().to_string()),
            None if p.status() == SysProcessStatus::Zombie => Err(ProviderError::ZombieProcess),
            None => Err(ProviderError::AccessDenied),
        }
    }

    fn io_counters(&self, pid: u32) -> ProviderResult<IoCounters> {
        let usage = self.process(pid)?.disk_usage();
        Ok(IoCounters {
            read_bytes: usage.total_read_bytes,
            write_bytes: usage.total_written_bytes,
        })
    }

    #[cfg(unix)]
    fn terminate(&mut self, pid: u32) -> ProviderResult<()> {
        self.send_signal(pid, libc::SIGTERM)
    }

    #[cfg(unix)]
    fn kill(&mut self, pid: u32) -> ProviderResult<()> {
        self.send_signal(pid, libc::SIGKILL)
    }

    #[cfg(not(unix))]
    fn terminate(&mut self, pid: u32) -> ProviderResult<()> {
        self.refresh_one(pid, ProcessRefreshKind::new())?;
        match self.process(pid)?.kill_with(sysinfo::Signal::Term) {
            Some(true) => Ok(()),
            Some(false) => Err(ProviderError::AccessDenied),
            None => Err(ProviderError::Unsupported),
        }
    }

    #[cfg(not(unix))]
    fn kill(&mut self, pid: u32) -> ProviderResult<()> {
        self.refresh_one(pid, ProcessRefreshKind::new())?;
        if self.process(pid)?.kill() {
            Ok(())
        } else {
            Err(ProviderError::AccessDenied)
        }
    }

    fn cpu_percent_total(&mut self) -> ProviderResult<f32> {
        self.sys.refresh_cpu_usage();
        Ok(self.sys.global_cpu_usage())
    }

    fn cpu_count_logical(&self) -> ProviderResult<usize> {
        match self.sys.cpus().len() {
            0 => Err(ProviderError::Unsupported),
            n => Ok(n),
        }
    }

    fn cpu_count_physical(&self) -> ProviderResult<Option<usize>> {
        Ok(self.sys.physical_core_count())
    }

    fn virtual_memory(&mut self) -> ProviderResult<VirtualMemory> {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            return Err(ProviderError::Unsupported);
        }
        Ok(VirtualMemory {
            total,
            available: self.sys.available_memory(),
            used: self.sys.used_memory(),
        })
    }

    fn swap_memory(&mut self) -> ProviderResult<SwapMemory> {
        self.sys.refresh_memory();
        Ok(SwapMemory {
            total: self.sys.total_swap(),
            used: self.sys.used_swap(),
        })
    }

    fn disk_usage(&mut self, path: &str) -> ProviderResult<DiskSpace> {
        self.disks.refresh_list();
        self.disks
            .list()
            .iter()
            .filter(|d| mount_covers(d.mount_point(), path))
            .max_by_key(|d| d.mount_point().as_os_str().len())
            .map(|d| DiskSpace {
                total: d.total_space(),
                available: d.available_space(),
            })
            .ok_or_else(|| ProviderError::Other(format!("no filesystem mounted at {}", path)))
    }

    fn temperatures(&mut self) -> ProviderResult<Vec<f32>> {
        self.components.refresh_list();
        if self.components.list().is_empty() {
            return Err(ProviderError::Unsupported);
        }
        Ok(self
            .components
            .list()
            .iter()
            .map(|c| c.temperature())
            .filter(|t| t.is_finite())
            .collect())
    }

    fn boot_time(&self) -> ProviderResult<u64> {
        match System::boot_time() {
            0 => Err(ProviderError::Unsupported),
            t => Ok(t),
        }
    }
}

fn table_refresh_kind() -> ProcessRefreshKind {
    ProcessRefreshKind::new()
        .with_cpu()
        .with_memory()
        .with_disk_usage()
        .with_user(UpdateKind::OnlyIfNotSet)
        .with_exe(UpdateKind::OnlyIfNotSet)
        .with_cmd(UpdateKind::OnlyIfNotSet)
}

fn map_process_status(status: SysProcessStatus) -> ProcessStatus {
    match status {
        SysProcessStatus::Run => ProcessStatus::Running,
        SysProcessStatus::Sleep | SysProcessStatus::Idle => ProcessStatus::Sleeping,
        SysProcessStatus::Stop | SysProcessStatus::Tracing => ProcessStatus::Stopped,
        SysProcessStatus::Zombie => ProcessStatus::Zombie,
        _ => ProcessStatus::Unknown,
    }
}

/// Whether the filesystem mounted at `mount` holds `path`.
fn mount_covers(mount: &Path, path: &str) -> bool {
    let trim = |s: &str| s.trim_end_matches(['/', '\\']).to_lowercase();
    Path::new(path).starts_with(mount) || trim(&mount.to_string_lossy()) == trim(path)
}
