//! Point-in-time snapshots shared by every time-based directive in one pass.

use std::fmt::Write as _;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, FixedOffset, Local, TimeZone, Timelike};

use crate::utils::{OutputError, Result};

/// Wall-clock instant broken into local calendar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSnapshot {
    at: DateTime<FixedOffset>,
}

impl TimeSnapshot {
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self { at }
    }

    pub fn epoch(&self) -> i64 {
        self.at.timestamp()
    }

    /// Sub-second fraction, always below one second.
    pub fn nanos(&self) -> u32 {
        self.at.timestamp_subsec_nanos().min(999_999_999)
    }

    pub fn year(&self) -> i32 {
        self.at.year()
    }

    pub fn month(&self) -> u32 {
        self.at.month()
    }

    pub fn day(&self) -> u32 {
        self.at.day()
    }

    pub fn hour(&self) -> u32 {
        self.at.hour()
    }

    pub fn minute(&self) -> u32 {
        self.at.minute()
    }

    pub fn second(&self) -> u32 {
        self.at.second()
    }

    /// Formats with a strftime pattern. Returns `None` when the pattern holds
    /// a directive the formatter does not know.
    pub fn strftime(&self, pattern: &str) -> Option<String> {
        let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return None;
        }

        let mut out = String::new();
        write!(out, "{}", self.at.format_with_items(items.iter())).ok()?;
        Some(out)
    }
}

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Result<TimeSnapshot>;
}

/// The local system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<TimeSnapshot> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| OutputError::ClockUnavailable)?;
        let secs = i64::try_from(since_epoch.as_secs()).map_err(|_| OutputError::ClockUnavailable)?;
        local_snapshot(secs, since_epoch.subsec_nanos())
    }
}

/// Converts a Unix timestamp to local calendar time, failing when the
/// instant has no local representation.
pub fn local_snapshot(secs: i64, nanos: u32) -> Result<TimeSnapshot> {
    Local
        .timestamp_opt(secs, nanos)
        .single()
        .map(|at| TimeSnapshot::new(at.fixed_offset()))
        .ok_or(OutputError::ClockUnavailable)
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub TimeSnapshot);

impl Clock for FixedClock {
    fn now(&self) -> Result<TimeSnapshot> {
        Ok(self.0)
    }
}

/// Lazily captured time for a single formatting pass.
///
/// The clock is read at most once; every later lookup sees the same instant,
/// so `@date` and `@time` in one template always agree.
pub struct PassTime<'c> {
    clock: &'c dyn Clock,
    snapshot: Option<TimeSnapshot>,
}

impl<'c> PassTime<'c> {
    pub fn new(clock: &'c dyn Clock) -> Self {
        Self {
            clock,
            snapshot: None,
        }
    }

    pub fn get(&mut self) -> Result<&TimeSnapshot> {
        if self.snapshot.is_none() {
            self.snapshot = Some(self.clock.now()?);
        }
        self.snapshot.as_ref().ok_or(OutputError::ClockUnavailable)
    }

    pub fn is_captured(&self) -> bool {
        self.snapshot.is_some()
    }
}
