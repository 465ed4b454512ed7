#[cfg(test)]
use std::sync::atomic::AtomicU64;
#[cfg(test)]
use std::sync::atomic::Ordering::{AcqRel, Acquire, Release};
use std::time::{SystemTime, UNIX_EPOCH};
use log::warn;

/// Source of "now" in whole seconds. Expected to never go backwards.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            // zero is reserved for "never acquired"
            Ok(d) => d.as_secs().max(1),
            Err(e) => {
                warn!("system clock is before the UNIX epoch ({e}), using 1");
                1
            }
        }
    }
}

/// Clock that only moves when told to.
#[cfg(test)]
pub struct ManualClock {
    now: AtomicU64,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self { now: AtomicU64::new(start) }
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, AcqRel);
    }

    pub fn set(&self, now: u64) {
        self.now.store(now, Release);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Acquire)
    }
}
