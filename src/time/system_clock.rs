use chrono::{DateTime, Utc};

use crate::time::clock::Clock;

/// A [`Clock`] implementation backed by the system clock.
///
/// # Responsibility
/// - Selecting the clock is the responsibility of the **composition root**
///   (e.g. `main.rs`).
/// - Token and session logic treat `Clock` as a trusted source.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn system_clock_returns_a_reasonable_instant() {
        let clock = SystemClock::new();

        let before = Utc::now();
        let now = clock.now();
        let after = Utc::now();

        assert!(now.year() >= 2024);
        assert!(before <= now && now <= after);
    }
}
