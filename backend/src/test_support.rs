//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled when running tests or
//! when the `test-support` feature is enabled.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

/// Clock whose reading only moves when a test advances it.
///
/// # Examples
/// ```
/// use mockable::Clock;
/// use todo_backend::test_support::MutableClock;
///
/// let clock = MutableClock::at_fixture_time();
/// let before = clock.utc();
/// clock.advance_seconds(5);
/// assert_eq!((clock.utc() - before).num_seconds(), 5);
/// ```
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Start at 2024-05-01T09:00:00Z.
    pub fn at_fixture_time() -> Self {
        Self::new(fixture_timestamp())
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Deterministic timestamp shared by fixtures.
pub fn fixture_timestamp() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).single() {
        Some(timestamp) => timestamp,
        None => panic!("fixture timestamp is unambiguous"),
    }
}
