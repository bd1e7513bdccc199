use chrono::{DateTime, Utc};

use revise_core::{Question, QuestionList, ScoringConfig};

use super::run_type::RunType;
use super::stats::{RunStats, SessionSummary};
use crate::error::SessionError;
use crate::time::Clock;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// A run of questions over one pool.
///
/// Every answer is one round: the answered question is updated and every
/// other question in the pool accrues its share of expected exposure. The
/// pool is reordered according to the run type.
#[derive(Debug, Clone)]
pub struct RevisionSession {
    run_type: RunType,
    scoring: ScoringConfig,
    clock: Clock,
    questions: QuestionList,
    cursor: usize,
    passes: u32,
    rounds: u32,
    stats: RunStats,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl RevisionSession {
    pub(crate) fn start(
        run_type: RunType,
        scoring: ScoringConfig,
        clock: Clock,
        mut questions: QuestionList,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        questions.sort_by(&run_type.sorting_key());

        tracing::info!(mode = %run_type, questions = questions.len(), "session started");

        Ok(Self {
            run_type,
            scoring,
            clock,
            questions,
            cursor: 0,
            passes: 1,
            rounds: 0,
            stats: RunStats::new(),
            started_at: clock.now(),
            finished_at: None,
        })
    }

    #[must_use]
    pub fn run_type(&self) -> RunType {
        self.run_type
    }

    /// The question to ask next, or `None` once the session is finished.
    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        if self.is_finished() {
            None
        } else {
            self.questions.get(self.cursor)
        }
    }

    /// 1-based position of the current question within this pass.
    #[must_use]
    pub fn position_in_pass(&self) -> usize {
        self.cursor + 1
    }

    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.questions.len()
    }

    /// Completed and in-progress passes through the pool. Revise sessions
    /// stay on their first pass.
    #[must_use]
    pub fn passes(&self) -> u32 {
        self.passes
    }

    #[must_use]
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    #[must_use]
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionList {
        &self.questions
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Record the answer to the current question and move to the next one.
    ///
    /// Returns the answered question as updated by this round.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the session is finished.
    pub fn answer_current(&mut self, was_correct: bool) -> Result<Question, SessionError> {
        if self.is_finished() {
            return Err(SessionError::Completed);
        }

        self.questions
            .record_answer(self.cursor, was_correct, &self.scoring)?;
        let answered = self
            .questions
            .get(self.cursor)
            .cloned()
            .ok_or(SessionError::Empty)?;

        self.stats.record(was_correct);
        self.rounds = self.rounds.saturating_add(1);
        self.advance();

        tracing::debug!(
            round = self.rounds,
            index = answered.index(),
            was_correct,
            likelihood = answered.likelihood(),
            "answer recorded"
        );
        Ok(answered)
    }

    fn advance(&mut self) {
        if self.run_type.resorts_every_round() {
            self.questions.sort_by(&self.run_type.sorting_key());
            self.cursor = 0;
            return;
        }

        self.cursor += 1;
        if self.cursor >= self.questions.len() {
            self.cursor = 0;
            self.passes = self.passes.saturating_add(1);
            self.questions.sort_by(&self.run_type.sorting_key());
        }
    }

    /// Stop asking questions. Idempotent; the first call fixes the end time.
    pub fn finish(&mut self) -> SessionSummary {
        if self.finished_at.is_none() {
            self.finished_at = Some(self.clock.now());
            tracing::info!(rounds = self.rounds, stats = %self.stats, "session finished");
        }
        self.summary()
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            run_type: self.run_type,
            started_at: self.started_at,
            finished_at: self.finished_at,
            rounds: self.rounds,
            stats: self.stats,
        }
    }

    /// The pool with every update made during the session.
    #[must_use]
    pub fn into_questions(self) -> QuestionList {
        self.questions
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
