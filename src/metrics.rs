// filepath: src/metrics.rs
//! Host metric sources
//!
//! Widgets only see the traits defined here. The implementations read
//! `/proc/uptime`, sample CPU usage through sysinfo, and ask systemd
//! about units via `systemctl`.

use log::debug;
use std::{
    fmt, fs, io,
    path::PathBuf,
    process::{Command, Stdio},
    thread,
    time::{Duration, Instant},
};
use sysinfo::System;

/// Failure while collecting a metric
#[derive(Debug)]
pub enum MetricError {
    /// Reading a counter or launching a query process failed
    Io(io::Error),
    /// A counter could not be parsed
    Parse(String),
    /// A query did not answer in time
    Timeout { what: String, after: Duration },
}

impl fmt::Display for MetricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricError::Io(e) => write!(f, "I/O error: {}", e),
            MetricError::Parse(msg) => write!(f, "parse error: {}", msg),
            MetricError::Timeout { what, after } => {
                write!(f, "{} timed out after {:?}", what, after)
            }
        }
    }
}

impl std::error::Error for MetricError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MetricError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MetricError {
    fn from(e: io::Error) -> Self {
        MetricError::Io(e)
    }
}

/// Health of a named service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Active,
    Inactive,
    Failed,
}

/// Seconds since boot
pub trait UptimeSource {
    fn uptime(&self) -> Result<Duration, MetricError>;
}

/// CPU utilisation in percent, blocking for the sampling window
pub trait CpuSampler {
    /// One value per core when `per_core`, otherwise a single aggregate
    fn sample(&mut self, per_core: bool) -> Result<Vec<f32>, MetricError>;

    /// How long a call to [`CpuSampler::sample`] blocks
    fn interval(&self) -> Duration;
}

/// Service manager query
pub trait ServiceChecker {
    fn status(&self, service: &str) -> Result<ServiceStatus, MetricError>;
}

/// Reads the first field of the kernel's uptime counter
#[derive(Debug, Clone)]
pub struct ProcUptime {
    path: PathBuf,
}

impl Default for ProcUptime {
    fn default() -> Self {
        Self::new("/proc/uptime")
    }
}

impl ProcUptime {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl UptimeSource for ProcUptime {
    fn uptime(&self) -> Result<Duration, MetricError> {
        let content = fs::read_to_string(&self.path)?;
        let field = content
            .split_whitespace()
            .next()
            .ok_or_else(|| MetricError::Parse(format!("{} is empty", self.path.display())))?;
        let seconds: f64 = field
            .parse()
            .map_err(|_| MetricError::Parse(format!("bad uptime value {:?}", field)))?;
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(MetricError::Parse(format!("bad uptime value {:?}", field)));
        }
        Duration::try_from_secs_f64(seconds)
            .map_err(|_| MetricError::Parse(format!("uptime {:?} out of range", field)))
    }
}

/// CPU sampler backed by sysinfo
pub struct SysinfoCpu {
    system: System,
    interval: Duration,
}

impl SysinfoCpu {
    pub fn new(interval: Duration) -> Self {
        let mut system = System::new();
        system.refresh_cpu();
        Self {
            system,
            // sysinfo needs a minimum gap between refreshes to compute usage
            interval: interval.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }
}

impl CpuSampler for SysinfoCpu {
    fn sample(&mut self, per_core: bool) -> Result<Vec<f32>, MetricError> {
        self.system.refresh_cpu();
        thread::sleep(self.interval);
        self.system.refresh_cpu();

        let loads = if per_core {
            self.system.cpus().iter().map(|cpu| cpu.cpu_usage()).collect()
        } else {
            vec![self.system.global_cpu_info().cpu_usage()]
        };
        debug!("CPU sample: {:?}", loads);
        Ok(loads)
    }

    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Queries units with `systemctl -q is-failed` and `systemctl -q is-active`
#[derive(Debug, Clone)]
pub struct Systemctl {
    timeout: Duration,
}

impl Systemctl {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run `systemctl -q <verb> <unit>` and report whether it exited successfully
    fn query(&self, verb: &str, unit: &str) -> Result<bool, MetricError> {
        let mut child = Command::new("systemctl")
            .args(["-q", verb, unit])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status.success());
            }
            if started.elapsed() >= self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(MetricError::Timeout {
                    what: format!("systemctl {} {}", verb, unit),
                    after: self.timeout,
                });
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl ServiceChecker for Systemctl {
    fn status(&self, service: &str) -> Result<ServiceStatus, MetricError> {
        if self.query("is-failed", service)? {
            return Ok(ServiceStatus::Failed);
        }
        if self.query("is-active", service)? {
            Ok(ServiceStatus::Active)
        } else {
            Ok(ServiceStatus::Inactive)
        }
    }
}
