use serde::Serialize;

/// System-wide resource snapshot.
///
/// Each section degrades to its own zero fallback, so a snapshot is always
/// fully shaped even when every underlying query failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSnapshot {
    pub cpu: CpuStats,
    pub memory: MemoryStats,
    pub swap: SwapStats,
    pub disk: DiskStats,
    /// First available sensor reading in Celsius.
    pub temperature: Option<f32>,
    /// Unix epoch seconds.
    pub boot_time: u64,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CpuStats {
    pub percent: f32,
    pub count_logical: usize,
    pub count_physical: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MemoryStats {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub percent: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SwapStats {
    pub total: u64,
    pub used: u64,
    pub percent: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskStats {
    pub total: u64,
    pub used: u64,
    pub percent: f32,
    pub path: String,
}

impl DiskStats {
    pub fn fallback(path: &str) -> Self {
        Self {
            total: 0,
            used: 0,
            percent: 0.0,
            path: path.to_string(),
        }
    }
}

impl SystemSnapshot {
    /// All-zero snapshot used when nothing could be queried.
    pub fn fallback(disk_path: &str) -> Self {
        Self {
            cpu: CpuStats::default(),
            memory: MemoryStats::default(),
            swap: SwapStats::default(),
            disk: DiskStats::fallback(disk_path),
            temperature: None,
            boot_time: 0,
            uptime_seconds: 0,
        }
    }
}

/// `part / whole` as a percentage, 0 when `whole` is 0.
pub fn percent_of(part: u64, whole: u64) -> f32 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 100.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_of_zero_whole() {
        assert_eq!(percent_of(10, 0), 0.0);
    }

    #[test]
    fn percent_of_half() {
        assert!((percent_of(512, 1024) - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn fallback_keeps_disk_path() {
        let snap = SystemSnapshot::fallback("/");
        assert_eq!(snap.disk.path, "/");
        assert_eq!(snap.cpu, CpuStats::default());
        assert_eq!(snap.temperature, None);
        assert_eq!(snap.uptime_seconds, 0);
    }
}
