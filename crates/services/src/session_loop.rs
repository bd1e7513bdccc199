use std::sync::Arc;

use revise_core::QuestionList;
use storage::QuestionRepository;

use crate::filter::QuestionFilter;
use crate::sessions::{RevisionSession, RunType, SessionBuilder, SessionError, SessionSummary};
use crate::settings::Settings;
use crate::time::Clock;

/// Orchestrates loading a question file, running a session over a filtered
/// pool and writing the results back.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    settings: Settings,
    questions: Arc<dyn QuestionRepository + Send + Sync>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(settings: Settings, questions: Arc<dyn QuestionRepository + Send + Sync>) -> Self {
        Self {
            clock: Clock::default(),
            settings,
            questions,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Load every question from the repository.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if loading fails.
    pub fn load(&self) -> Result<QuestionList, SessionError> {
        Ok(self.questions.load(&self.settings.scoring)?)
    }

    /// Start a session over the questions of `all` that pass `filter`.
    ///
    /// `run_type` and `shuffle` fall back to the session settings when `None`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no question survives the filter.
    pub fn start_session(
        &self,
        all: &QuestionList,
        filter: &QuestionFilter,
        run_type: Option<RunType>,
        shuffle: Option<bool>,
    ) -> Result<RevisionSession, SessionError> {
        let pool = filter.apply(all);
        tracing::debug!(loaded = all.len(), selected = pool.len(), "pool selected");

        SessionBuilder::new(run_type.unwrap_or(self.settings.session.default_mode))
            .with_scoring(self.settings.scoring)
            .with_clock(self.clock)
            .with_shuffle(shuffle.unwrap_or(self.settings.session.shuffle))
            .build(pool)
    }

    /// Finish `session`, copy its updated questions over their counterparts
    /// in `all`, and save `all` when `persist` is set.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if saving fails.
    pub fn finish_session(
        &self,
        all: &mut QuestionList,
        mut session: RevisionSession,
        persist: bool,
    ) -> Result<SessionSummary, SessionError> {
        let summary = session.finish();
        let unmatched = all.merge_updates(&session.into_questions());
        if unmatched > 0 {
            tracing::warn!(unmatched, "session questions missing from the loaded file");
        }
        if persist {
            self.questions.save(all)?;
        }
        Ok(summary)
    }
}
