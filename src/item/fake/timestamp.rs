//! Event time generator.
//!
//! The generated time is always on the current date. The time of day is
//! drawn component by component relative to "now", which is read once per
//! generated value.

use std::fmt;

use clap::ValueEnum;
use rand::Rng;
use time::{
    OffsetDateTime, PrimitiveDateTime, Time, format_description::BorrowedFormatItem,
    macros::format_description,
};

const EVENT_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Source of the current wall-clock time.
pub trait Clock {
    fn now(&self) -> PrimitiveDateTime;
}

/// Reads the local time, or UTC when the local offset cannot be determined.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> PrimitiveDateTime {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        PrimitiveDateTime::new(now.date(), now.time())
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub PrimitiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> PrimitiveDateTime {
        self.0
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimestampMode {
    /// Every component at or below the current one, so never after now.
    #[default]
    BeforeNow,
    /// Every component at or above the current one, so never before now.
    AfterNow,
}

impl fmt::Display for TimestampMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampMode::BeforeNow => f.write_str("before-now"),
            TimestampMode::AfterNow => f.write_str("after-now"),
        }
    }
}

/// Draws a time of day on the date of `now` according to `mode`.
pub fn generate_event_time<R: Rng + ?Sized>(
    rng: &mut R,
    now: PrimitiveDateTime,
    mode: TimestampMode,
) -> PrimitiveDateTime {
    let (hour, minute, second) = (now.hour(), now.minute(), now.second());

    let (hour, minute, second) = match mode {
        TimestampMode::BeforeNow => (
            rng.random_range(0..=hour),
            rng.random_range(0..=minute.saturating_sub(1)),
            rng.random_range(0..=second.saturating_sub(1)),
        ),
        TimestampMode::AfterNow => (
            rng.random_range(hour..=23),
            rng.random_range(minute..=59),
            rng.random_range(second..=59),
        ),
    };

    // Every component is drawn inside its valid range.
    let time = Time::from_hms(hour, minute, second).unwrap_or(Time::MIDNIGHT);
    PrimitiveDateTime::new(now.date(), time)
}

/// Formats to `YYYY-MM-DD HH:MM:SS`.
pub fn format_event_time(value: PrimitiveDateTime) -> String {
    value
        .format(EVENT_TIME_FORMAT)
        .unwrap_or_else(|_| value.to_string())
}
