use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
///
/// Set at record creation, refreshed on every save. Serves both as the
/// "last modified" marker and as the default sort key (descending).
pub type EpochMillis = u64;

/// Substitutable millisecond clock.
///
/// Production code uses [`SystemClock`]; tests inject [`ManualClock`] so
/// epochs are deterministic and strictly increasing.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> EpochMillis;
}

/// Wall-clock implementation backed by [`SystemTime`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> EpochMillis {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Deterministic clock for tests.
///
/// Every reading advances by a fixed step, so consecutive saves observe
/// strictly increasing epochs even within one millisecond of real time.
#[derive(Debug)]
pub struct ManualClock {
    next: AtomicU64,
    step: u64,
}

impl ManualClock {
    /// Start at `base`, advancing by 1 per reading.
    pub fn new(base: EpochMillis) -> Self {
        Self::with_step(base, 1)
    }

    /// Start at `base`, advancing by `step` per reading.
    pub fn with_step(base: EpochMillis, step: u64) -> Self {
        Self {
            next: AtomicU64::new(base),
            step,
        }
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> EpochMillis {
        self.next.fetch_add(self.step, Ordering::Relaxed)
    }
}
