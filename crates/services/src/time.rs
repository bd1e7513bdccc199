use chrono::{DateTime, Duration, Utc};

/// Time source for session timestamps: the system clock, or a fixed instant
/// for deterministic tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Moves a fixed clock forward. Has no effect on `Clock::System`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a `Clock` fixed at [`FIXED_TEST_TIMESTAMP`], or the system clock
/// if that instant cannot be represented.
#[must_use]
pub fn fixed_clock() -> Clock {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0).map_or(Clock::System, Clock::Fixed)
}
