//! Daily pomodoro counter.
//!
//! Only completed work sessions are counted, and only for the current day.
//! The countdown itself belongs to whatever drives the timer.

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::{codec, BackingStore, StorageKeys};

pub const WORK_SESSION: Duration = Duration::from_secs(25 * 60);
pub const SHORT_BREAK: Duration = Duration::from_secs(5 * 60);
pub const LONG_BREAK: Duration = Duration::from_secs(15 * 60);

/// Work sessions between long breaks.
pub const SESSIONS_PER_CYCLE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionKind {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionKind {
    pub fn duration(&self) -> Duration {
        match self {
            SessionKind::Work => WORK_SESSION,
            SessionKind::ShortBreak => SHORT_BREAK,
            SessionKind::LongBreak => LONG_BREAK,
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionKind::Work => write!(f, "work"),
            SessionKind::ShortBreak => write!(f, "short break"),
            SessionKind::LongBreak => write!(f, "long break"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroStats {
    #[serde(with = "crate::entity::dates::calendar_day")]
    pub date: NaiveDate,
    pub count: u32,
}

impl PomodoroStats {
    pub fn new(date: NaiveDate) -> Self {
        Self { date, count: 0 }
    }

    /// The break that follows the most recent work session.
    pub fn next_break(&self) -> SessionKind {
        if self.count > 0 && self.count % SESSIONS_PER_CYCLE == 0 {
            SessionKind::LongBreak
        } else {
            SessionKind::ShortBreak
        }
    }
}

/// Today's stats. A record from another day (or an unreadable one) is reset
/// to zero and the reset is written back.
pub fn load_today<B: BackingStore>(
    backend: &mut B,
    keys: &StorageKeys,
    today: NaiveDate,
) -> Result<PomodoroStats> {
    let key = keys.pomodoro_stats();
    let stored = match backend.get(&key)? {
        Some(raw) => match codec::deserialize::<PomodoroStats>(&raw) {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "resetting corrupt pomodoro stats");
                None
            }
        },
        None => return Ok(PomodoroStats::new(today)),
    };

    match stored {
        Some(stats) if stats.date == today => Ok(stats),
        _ => {
            let fresh = PomodoroStats::new(today);
            backend.set(&key, &codec::serialize(&fresh)?)?;
            tracing::debug!(date = %today, "new pomodoro day");
            Ok(fresh)
        }
    }
}

/// Count one more completed work session today.
pub fn record_completed<B: BackingStore>(
    backend: &mut B,
    keys: &StorageKeys,
    today: NaiveDate,
) -> Result<PomodoroStats> {
    let mut stats = load_today(backend, keys, today)?;
    stats.count += 1;
    backend.set(&keys.pomodoro_stats(), &codec::serialize(&stats)?)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_counts_within_a_day() {
        let mut backend = MemoryStorage::new();
        let keys = StorageKeys::default();

        assert_eq!(load_today(&mut backend, &keys, day(1)).unwrap().count, 0);
        record_completed(&mut backend, &keys, day(1)).unwrap();
        let stats = record_completed(&mut backend, &keys, day(1)).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(load_today(&mut backend, &keys, day(1)).unwrap().count, 2);

        let raw = backend.get("planner-pomodoro-stats").unwrap().unwrap();
        assert_eq!(raw, r#"{"date":"2024-06-01","count":2}"#);
    }

    #[test]
    fn test_new_day_resets_and_persists() {
        let mut backend = MemoryStorage::new();
        let keys = StorageKeys::default();
        record_completed(&mut backend, &keys, day(1)).unwrap();

        let stats = load_today(&mut backend, &keys, day(2)).unwrap();
        assert_eq!(stats, PomodoroStats::new(day(2)));
        let raw = backend.get("planner-pomodoro-stats").unwrap().unwrap();
        assert!(raw.contains("2024-06-02"));
    }

    #[test]
    fn test_corrupt_stats_reset() {
        let mut backend = MemoryStorage::new();
        let keys = StorageKeys::default();
        backend.set("planner-pomodoro-stats", "{{").unwrap();
        assert_eq!(load_today(&mut backend, &keys, day(3)).unwrap().count, 0);
    }

    #[test]
    fn test_every_fourth_session_earns_long_break() {
        let mut stats = PomodoroStats::new(day(1));
        let breaks: Vec<SessionKind> = (0..8)
            .map(|_| {
                stats.count += 1;
                stats.next_break()
            })
            .collect();
        assert_eq!(breaks[2], SessionKind::ShortBreak);
        assert_eq!(breaks[3], SessionKind::LongBreak);
        assert_eq!(breaks[7], SessionKind::LongBreak);
        assert_eq!(SessionKind::LongBreak.duration(), Duration::from_secs(900));
    }
}
