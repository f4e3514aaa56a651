//! Time sources used by session issuance and expiry checks.

pub mod clock;
pub mod system_clock;

pub use clock::{Clock, FixedClock};
pub use system_clock::SystemClock;
