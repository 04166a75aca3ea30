//! Peak-memory profiling for pipeline steps
//!
//! Samples resident memory of the current process and its children on a fixed
//! interval while a step runs, then logs the peak. The facility is
//! capability-gated: [`MemoryProfiler::new`] fails on platforms where
//! `sysinfo` cannot read process memory, and callers are expected to check
//! [`memory_profiling_available`] before constructing one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sysinfo::{Pid, Process, ProcessesToUpdate, System};
use tracing::info;

use crate::error::{Error, Result};

/// Resolved once at first use, read-only thereafter.
static MEMORY_PROFILING_AVAILABLE: Lazy<bool> = Lazy::new(|| sysinfo::IS_SUPPORTED_SYSTEM);

/// Whether a memory sampling facility exists on this platform.
pub fn memory_profiling_available() -> bool {
    *MEMORY_PROFILING_AVAILABLE
}

/// Sampling settings for [`MemoryProfiler`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Interval between memory snapshots
    #[serde(with = "humantime_serde")]
    pub interval: Duration,

    /// How long to wait for the sampler's final reading after the step ends
    #[serde(with = "humantime_serde")]
    pub drain_timeout: Duration,

    /// Sum memory of descendant processes into each snapshot
    pub include_children: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            drain_timeout: Duration::from_secs(1),
            include_children: true,
        }
    }
}

/// Measures peak resident memory of wrapped calls
pub struct MemoryProfiler {
    config: SamplerConfig,
}

/// Flips the sampler's stop flag when dropped, so the sampling thread winds
/// down even if the wrapped step panics.
struct StopOnDrop(Arc<AtomicBool>);

impl Drop for StopOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

impl MemoryProfiler {
    /// Create a profiler with default sampling settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MemoryProfilingUnavailable`] when the platform has no
    /// memory sampling facility.
    pub fn new() -> Result<Self> {
        Self::with_config(SamplerConfig::default())
    }

    /// Create a profiler with explicit sampling settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MemoryProfilingUnavailable`] when the platform has no
    /// memory sampling facility.
    pub fn with_config(config: SamplerConfig) -> Result<Self> {
        if !memory_profiling_available() {
            return Err(Error::MemoryProfilingUnavailable);
        }
        Ok(Self { config })
    }

    /// Run `f`, logging its peak resident memory usage under `name`.
    ///
    /// Memory is snapshotted once up front and then on every `interval` tick
    /// until `f` returns, so steps finishing well inside one interval may see
    /// only the initial reading. Returns `f`'s value unchanged; a panic in `f`
    /// propagates and no usage record is logged.
    pub fn measure<T, F: FnOnce() -> T>(&self, name: &str, f: F) -> T {
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();
        let interval = self.config.interval;
        let include_children = self.config.include_children;

        let sampler = {
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut system = System::new();
                let mut peak = sample_rss(&mut system, include_children);
                while !stop.load(Ordering::Relaxed) {
                    thread::sleep(interval);
                    peak = peak.max(sample_rss(&mut system, include_children));
                }
                let _ = tx.send(peak);
            })
        };

        let stop_guard = StopOnDrop(Arc::clone(&stop));
        let result = f();
        drop(stop_guard);

        if let Ok(peak) = rx.recv_timeout(self.config.drain_timeout) {
            info!(
                "Running {name:?} consumed {:.2}MiB memory at peak time",
                peak as f64 / (1024.0 * 1024.0)
            );
        }
        let _ = sampler.join();
        result
    }
}

/// Resident memory of the current process, plus its descendants when
/// `include_children` is set, in bytes.
fn sample_rss(system: &mut System, include_children: bool) -> u64 {
    let Ok(pid) = sysinfo::get_current_pid() else {
        return 0;
    };
    system.refresh_processes(ProcessesToUpdate::All, true);

    if !include_children {
        return system.process(pid).map_or(0, Process::memory);
    }

    system
        .processes()
        .iter()
        .filter(|(candidate, process)| **candidate == pid || descends_from(system, process, pid))
        .map(|(_, process)| process.memory())
        .sum()
}

fn descends_from(system: &System, process: &Process, root: Pid) -> bool {
    // Parent chains are short; the hop cap guards against pid-reuse cycles.
    let mut current = process.parent();
    for _ in 0..64 {
        match current {
            Some(pid) if pid == root => return true,
            Some(pid) => current = system.process(pid).and_then(Process::parent),
            None => return false,
        }
    }
    false
}
