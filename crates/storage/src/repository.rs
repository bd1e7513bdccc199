use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use revise_core::{QuestionList, ScoringConfig};
use thiserror::Error;

use crate::csv::RowError;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("question file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("first line (headers) \"{found}\" does not match the expected column headers")]
    Header { found: String },

    #[error("line #{line_number} - \"{line}\" - is invalid: {source}")]
    Row {
        line_number: usize,
        line: String,
        #[source]
        source: RowError,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Load/save contract for a question collection.
pub trait QuestionRepository {
    /// Load every question, validating derived values with `config`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the source cannot be read or any row is invalid.
    fn load(&self, config: &ScoringConfig) -> Result<QuestionList, StorageError>;

    /// Replace the stored questions with `questions`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the questions cannot be written.
    fn save(&self, questions: &QuestionList) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<QuestionList>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_questions(questions: QuestionList) -> Self {
        Self {
            questions: Arc::new(Mutex::new(questions)),
        }
    }
}

impl QuestionRepository for InMemoryRepository {
    fn load(&self, _config: &ScoringConfig) -> Result<QuestionList, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, questions: &QuestionList) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *guard = questions.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revise_core::model::{Question, QuestionAttributes};

    fn build_question(index: u32) -> Question {
        let attributes = QuestionAttributes::new(
            &format!("Question {index}"),
            "Algebra",
            "Paper 1",
            "Mathematics",
            "GCSE",
            "Edexcel",
        )
        .unwrap();
        Question::new(index, attributes)
    }

    #[test]
    fn in_memory_round_trips_and_shares_state_between_clones() {
        let repo = InMemoryRepository::new();
        let config = ScoringConfig::default();
        assert!(repo.load(&config).unwrap().is_empty());

        let list = QuestionList::new(vec![build_question(1), build_question(2)]);
        let handle = repo.clone();
        handle.save(&list).unwrap();

        let loaded = repo.load(&config).unwrap();
        assert_eq!(loaded, list);
    }
}
