//! Time source abstraction.
//!
//! Commands never read the wall clock directly; they ask a [`Clock`] so tests
//! can pin and advance time deterministically.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, SubsecRound, Utc};

/// Sub-second digits kept by `TIMESTAMPTZ` columns.
const STORED_SUBSEC_DIGITS: u16 = 6;

/// Truncates `instant` to microseconds, the precision PostgreSQL stores.
///
/// Instants compared in the domain must survive a round trip through storage
/// unchanged.
pub fn to_stored_precision(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.trunc_subsecs(STORED_SUBSEC_DIGITS)
}

/// Source of the current instant.
///
/// Implementations return instants already truncated with
/// [`to_stored_precision`].
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        to_stored_precision(Utc::now())
    }
}

/// Clock that returns a fixed instant until told otherwise.
///
/// Clones share the same instant, so a test can hand one clone to a service
/// and advance time through another.
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Arc::new(Mutex::new(instant)),
        }
    }

    /// Replaces the current instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.instant.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    /// Moves the current instant forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut guard = self.instant.lock().unwrap_or_else(PoisonError::into_inner);
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        to_stored_precision(*self.instant.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
