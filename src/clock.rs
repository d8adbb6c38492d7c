//! Time sources for entry timestamps.
//!
//! Entries are stamped with nanoseconds since the Unix epoch. Reading the
//! system clock on every put would dominate the cost of a cache hit, so the
//! default source is [`CoarseClock`]: a process-wide counter that a single
//! daemon thread recalibrates from the wall clock once per second and advances
//! by a fixed tick in between.
//!
//! ```text
//!   t = 0ms     store(wall_clock)          calibrate
//!   t = 100ms   fetch_add(100ms)           ┐
//!   ...                                    │ 9 ticks
//!   t = 900ms   fetch_add(100ms)           ┘
//!   t = 1000ms  store(wall_clock)          calibrate
//! ```
//!
//! Readers perform one relaxed atomic load. Between calibrations the value may
//! drift from the wall clock by up to one tick plus scheduler jitter.
//!
//! [`ManualClock`] is a caller-driven source for deterministic tests.

use std::fmt;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

/// Interval between coarse clock increments.
pub const TICK: Duration = Duration::from_millis(100);

/// Increments applied between two wall-clock calibrations.
const TICKS_PER_CALIBRATION: u32 = 9;

/// A source of "now" in nanoseconds since the Unix epoch.
///
/// Implementations must be cheap; the cache calls `now` while holding a
/// shard lock.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> i64;
}

static COARSE_NANOS: AtomicI64 = AtomicI64::new(0);
static REFRESHING: AtomicBool = AtomicBool::new(false);
static START: Once = Once::new();

/// Handle to the process-wide coarse clock.
///
/// Obtain one with [`CoarseClock::start`]; the first call spawns the refresh
/// thread, which runs for the lifetime of the process.
#[derive(Clone, Copy)]
pub struct CoarseClock {
    _started: (),
}

impl CoarseClock {
    /// Returns a handle to the coarse clock, starting the refresh thread on
    /// first use.
    pub fn start() -> Self {
        START.call_once(|| {
            COARSE_NANOS.store(wall_clock_nanos(), Ordering::Relaxed);
            let spawned = thread::Builder::new()
                .name("shardcache-clock".into())
                .spawn(refresh_loop);
            match spawned {
                Ok(_) => {
                    REFRESHING.store(true, Ordering::Release);
                    debug!(tick_ms = TICK.as_millis() as u64, "coarse clock started");
                },
                Err(err) => {
                    warn!(error = %err, "coarse clock thread failed to start, reading the wall clock directly");
                },
            }
        });
        CoarseClock { _started: () }
    }
}

impl Clock for CoarseClock {
    #[inline]
    fn now(&self) -> i64 {
        if REFRESHING.load(Ordering::Acquire) {
            COARSE_NANOS.load(Ordering::Relaxed)
        } else {
            wall_clock_nanos()
        }
    }
}

impl fmt::Debug for CoarseClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoarseClock")
            .field("now", &COARSE_NANOS.load(Ordering::Relaxed))
            .finish()
    }
}

fn refresh_loop() {
    let tick = TICK.as_nanos() as i64;
    loop {
        COARSE_NANOS.store(wall_clock_nanos(), Ordering::Relaxed);
        for _ in 0..TICKS_PER_CALIBRATION {
            thread::sleep(TICK);
            COARSE_NANOS.fetch_add(tick, Ordering::Relaxed);
        }
        thread::sleep(TICK);
    }
}

fn wall_clock_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(1)
        .max(1)
}

/// A clock that only moves when told to.
///
/// ```
/// use std::time::Duration;
/// use shardcache::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1_000);
/// clock.advance(Duration::from_nanos(500));
/// assert_eq!(clock.now(), 1_500);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    nanos: AtomicI64,
}

impl ManualClock {
    /// Creates a clock reading `start` nanoseconds. Values below 1 are raised to 1.
    pub fn new(start: i64) -> Self {
        Self {
            nanos: AtomicI64::new(start.max(1)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as i64, Ordering::SeqCst);
    }

    pub fn set(&self, nanos: i64) {
        self.nanos.store(nanos.max(1), Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> i64 {
        self.nanos.load(Ordering::SeqCst)
    }
}
