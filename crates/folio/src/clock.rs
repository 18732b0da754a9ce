//! Injectable time source and local wall-clock formatting.

use std::sync::Mutex;

use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, Timelike, Utc};

/// Source of "now" for normalizers and presenters.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current time as epoch milliseconds.
    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Wall clock of the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Timezone used for the "Local Time" line of the presence card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalZone {
    /// Whatever the host is configured with.
    System,
    Fixed(FixedOffset),
}

impl LocalZone {
    /// Build from an optional offset in minutes east of UTC.
    pub fn from_offset_minutes(minutes: Option<i32>) -> Self {
        minutes
            .and_then(|m| FixedOffset::east_opt(m * 60))
            .map(LocalZone::Fixed)
            .unwrap_or(LocalZone::System)
    }

    pub fn localize(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            LocalZone::System => instant.with_timezone(&Local).fixed_offset(),
            LocalZone::Fixed(offset) => instant.with_timezone(offset),
        }
    }
}

/// English ordinal suffix for a day of month.
pub fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

/// Format as e.g. `Monday 19th 3:04 PM`.
pub fn format_local_time(local: &DateTime<FixedOffset>) -> String {
    let day = local.day();
    let (is_pm, hour) = local.hour12();
    format!(
        "{} {}{} {}:{:02} {}",
        local.format("%A"),
        day,
        ordinal_suffix(day),
        hour,
        local.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}
