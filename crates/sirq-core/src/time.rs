//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing integer `Tick`; one tick is one
//! simulated minute.  Integer time keeps event ordering exact (no
//! floating-point ties that differ between runs) and makes the "all events at
//! the same timestamp" rule of the event engine well defined.
//!
//! A default 24-hour horizon is 1,440 ticks.

use std::fmt;

/// Ticks per simulated hour.
pub const MINUTES_PER_HOUR: u64 = 60;

/// Hours per simulated day; the period of the arrival-rate profile.
pub const HOURS_PER_DAY: u64 = 24;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation time in minutes since the start of the run.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Minutes elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// `self + minutes`, or `None` past the end of representable time.
    #[inline]
    pub fn checked_add(self, minutes: u64) -> Option<Tick> {
        self.0.checked_add(minutes).map(Tick)
    }

    /// Hour of the simulated day, `0..24`.
    #[inline]
    pub fn hour_of_day(self) -> usize {
        ((self.0 / MINUTES_PER_HOUR) % HOURS_PER_DAY) as usize
    }
}

/// Saturates at `u64::MAX`.  `StationConfig::validate` bounds every offset a
/// run adds, so saturation never occurs for a validated configuration.
impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0.saturating_add(rhs))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The event engine's notion of "now".
///
/// Unlike a fixed-step clock, a discrete-event clock jumps straight to the
/// next timestamp that has work.  It never moves backwards.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    now: Tick,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Jump forward to `tick`.
    ///
    /// # Panics
    /// Panics in debug mode if `tick` is earlier than the current time.
    #[inline]
    pub fn advance_to(&mut self, tick: Tick) {
        debug_assert!(tick >= self.now, "clock cannot move backwards ({tick} < {})", self.now);
        self.now = tick;
    }

    /// Break the current time into (day, hour, minute) for human-readable output.
    pub fn elapsed_dhm(&self) -> (u64, u32, u32) {
        let total = self.now.0;
        let days = total / (HOURS_PER_DAY * MINUTES_PER_HOUR);
        let hours = self.now.hour_of_day() as u32;
        let minutes = (total % MINUTES_PER_HOUR) as u32;
        (days, hours, minutes)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (d, h, m) = self.elapsed_dhm();
        write!(f, "{} (day {} {:02}:{:02})", self.now, d, h, m)
    }
}
