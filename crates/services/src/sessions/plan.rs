use rand::rng;
use rand::seq::SliceRandom;

use revise_core::{QuestionList, ScoringConfig};

use super::run_type::RunType;
use super::session::RevisionSession;
use crate::error::SessionError;
use crate::time::Clock;

/// Builds a revision session from a question pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionBuilder {
    run_type: RunType,
    scoring: ScoringConfig,
    clock: Clock,
    shuffle: bool,
}

impl SessionBuilder {
    #[must_use]
    pub fn new(run_type: RunType) -> Self {
        Self {
            run_type,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Enable or disable shuffling the pool before its first sort, so that
    /// questions with equal sort values do not always come up in file order.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Start a session over `questions`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the pool has no questions.
    pub fn build(self, questions: QuestionList) -> Result<RevisionSession, SessionError> {
        let questions = if self.shuffle {
            let mut shuffled = questions.into_vec();
            shuffled.as_mut_slice().shuffle(&mut rng());
            QuestionList::new(shuffled)
        } else {
            questions
        };
        RevisionSession::start(self.run_type, self.scoring, self.clock, questions)
    }
}
