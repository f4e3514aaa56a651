use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// A port that provides the **current instant** for the application.
///
/// # Purpose
/// Token issuance and expiry checks read "now" through this trait so that:
///
/// - Session logic does **not** depend on the OS clock directly
/// - Implementations can be swapped (system clock, fixed clock, etc.)
/// - Expiry boundaries can be tested at exact instants
///
/// # Typical Implementations
/// - [`SystemClock`](crate::time::system_clock::SystemClock): the OS clock in UTC
/// - [`FixedClock`]: a settable instant (for testing)
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// A [`Clock`] that returns a settable instant.
///
/// # Example
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use ticket_desk::time::clock::{Clock, FixedClock};
///
/// let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
/// let clock = FixedClock::new(t0);
/// clock.advance(Duration::days(1));
///
/// assert_eq!(clock.now(), t0 + Duration::days(1));
/// ```
#[derive(Debug)]
pub struct FixedClock {
    instant: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Mutex::new(instant),
        }
    }

    /// Replaces the current instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.lock() = instant;
    }

    /// Moves the current instant forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut guard = self.lock();
        *guard += by;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        // A poisoned lock still holds a valid instant.
        self.instant.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.lock()
    }
}
