use std::fmt;

use chrono::{DateTime, Utc};

use super::run_type::RunType;

/// Answers given during one session. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    attempted: u32,
    correct: u32,
    incorrect: u32,
}

impl RunStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, was_correct: bool) {
        self.attempted = self.attempted.saturating_add(1);
        if was_correct {
            self.correct = self.correct.saturating_add(1);
        } else {
            self.incorrect = self.incorrect.saturating_add(1);
        }
    }

    #[must_use]
    pub fn attempted(&self) -> u32 {
        self.attempted
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    /// Share of answers that were correct, 0 before anything is attempted.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            100.0 * f64::from(self.correct) / f64::from(self.attempted)
        }
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Attempted = {}; Correct = {}; Incorrect = {}; Percentage = {:.1}",
            self.attempted,
            self.correct,
            self.incorrect,
            self.percentage()
        )
    }
}

/// Snapshot of a session for reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub run_type: RunType,
    pub started_at: DateTime<Utc>,
    /// `None` while the session is still running.
    pub finished_at: Option<DateTime<Utc>>,
    pub rounds: u32,
    pub stats: RunStats,
}

impl SessionSummary {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}
