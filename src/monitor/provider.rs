//! The platform metrics seam: everything the collector needs from the OS.
//!
//! Every query can fail on its own with a distinguishable reason, so callers
//! decide per field whether to skip, fall back or surface the error.

use thiserror::Error;

use crate::models::ProcessStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Process does not exist")]
    NoSuchProcess,
    #[error("Access denied (try running as administrator)")]
    AccessDenied,
    #[error("Process is a zombie process")]
    ZombieProcess,
    #[error("Not supported on this platform")]
    Unsupported,
    #[error("{0}")]
    Other(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryInfo {
    pub rss: u64,
    pub vms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IoCounters {
    pub read_bytes: u64,
    pub write_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VirtualMemory {
    pub total: u64,
    pub available: u64,
    pub used: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapMemory {
    pub total: u64,
    pub used: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiskSpace {
    pub total: u64,
    pub available: u64,
}

pub trait MetricsProvider: Send {
    // ── Per process ──────────────────────────────────────────

    /// Every process identifier currently visible.
    fn pids(&mut self) -> ProviderResult<Vec<u32>>;
    /// Obtain a handle on `pid`. Fails when the process is gone or wholly inaccessible.
    fn open(&mut self, pid: u32) -> ProviderResult<()>;
    fn name(&self, pid: u32) -> ProviderResult<String>;
    fn status(&self, pid: u32) -> ProviderResult<ProcessStatus>;
    fn username(&self, pid: u32) -> ProviderResult<String>;
    /// CPU usage since the previous call on the same pid. The first call on a
    /// fresh handle only establishes a baseline; its value is meaningless.
    fn cpu_percent(&mut self, pid: u32) -> ProviderResult<f32>;
    fn memory_percent(&self, pid: u32) -> ProviderResult<f32>;
    fn memory_info(&self, pid: u32) -> ProviderResult<MemoryInfo>;
    /// Unix epoch seconds.
    fn create_time(&self, pid: u32) -> ProviderResult<u64>;
    fn cmdline(&self, pid: u32) -> ProviderResult<Vec<String>>;
    fn exe(&self, pid: u32) -> ProviderResult<String>;
    fn io_counters(&self, pid: u32) -> ProviderResult<IoCounters>;
    /// Graceful terminate signal.
    fn terminate(&mut self, pid: u32) -> ProviderResult<()>;
    /// Unconditional kill signal.
    fn kill(&mut self, pid: u32) -> ProviderResult<()>;

    // ── System wide ──────────────────────────────────────────

    fn cpu_percent_total(&mut self) -> ProviderResult<f32>;
    fn cpu_count_logical(&self) -> ProviderResult<usize>;
    /// `Ok(None)` when the platform cannot tell physical cores apart.
    fn cpu_count_physical(&self) -> ProviderResult<Option<usize>>;
    fn virtual_memory(&mut self) -> ProviderResult<VirtualMemory>;
    fn swap_memory(&mut self) -> ProviderResult<SwapMemory>;
    fn disk_usage(&mut self, path: &str) -> ProviderResult<DiskSpace>;
    /// Sensor readings in Celsius, in discovery order.
    fn temperatures(&mut self) -> ProviderResult<Vec<f32>>;
    /// Unix epoch seconds.
    fn boot_time(&self) -> ProviderResult<u64>;
}
