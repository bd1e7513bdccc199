//! Comma-separated question file: one header line, one question per row.

mod codec;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use revise_core::{QuestionList, ScoringConfig};

pub use codec::RowError;

use crate::repository::{QuestionRepository, StorageError};

/// Exact first line of every question file.
pub const COLUMN_HEADERS: &str = "Index,Title,Topic,Paper or unit,Subject,Qualification level,\
Exam board,Attempted,Correct,Percentage,Expected times asked,Likelihood";

/// What to do when a stored percentage or likelihood disagrees with the
/// value recomputed from the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DerivedValuePolicy {
    /// Fail the load on the first mismatching row.
    Reject,
    /// Keep the recomputed value and log a warning.
    #[default]
    Recompute,
}

/// Parses the full text of a question file.
///
/// # Errors
///
/// Returns `StorageError::Header` if the first line is not [`COLUMN_HEADERS`],
/// or `StorageError::Row` for the first row that fails to parse or validate.
pub fn parse_questions(
    content: &str,
    config: &ScoringConfig,
    policy: DerivedValuePolicy,
) -> Result<QuestionList, StorageError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines: Vec<&str> = content.lines().collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    let Some((header, rows)) = lines.split_first() else {
        return Err(StorageError::Header {
            found: String::new(),
        });
    };
    if header.trim() != COLUMN_HEADERS {
        return Err(StorageError::Header {
            found: (*header).to_owned(),
        });
    }

    let mut questions = Vec::with_capacity(rows.len());
    for (offset, line) in rows.iter().enumerate() {
        let line_number = offset + 2;
        let row_error = |source: RowError| StorageError::Row {
            line_number,
            line: (*line).to_owned(),
            source,
        };

        let draft = codec::parse_row(line).map_err(row_error)?;
        let question = match policy {
            DerivedValuePolicy::Reject => draft
                .validate(config)
                .map_err(|e| row_error(RowError::from(e)))?,
            DerivedValuePolicy::Recompute => {
                let (question, overridden) = draft
                    .validate_recomputing(config)
                    .map_err(|e| row_error(RowError::from(e)))?;
                for mismatch in overridden {
                    tracing::warn!(line_number, %mismatch, "recomputed stored value");
                }
                question
            }
        };
        questions.push(question);
    }

    Ok(QuestionList::new(questions))
}

/// Renders `questions` as file text, header first, every row newline-terminated.
#[must_use]
pub fn render_questions(questions: &QuestionList) -> String {
    let mut out = String::with_capacity(COLUMN_HEADERS.len() + 1 + questions.len() * 96);
    out.push_str(COLUMN_HEADERS);
    out.push('\n');
    for question in questions {
        out.push_str(&codec::format_row(question));
        out.push('\n');
    }
    out
}

/// Question file on disk.
#[derive(Debug, Clone)]
pub struct CsvQuestionFile {
    path: PathBuf,
    policy: DerivedValuePolicy,
}

impl CsvQuestionFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            policy: DerivedValuePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: DerivedValuePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn policy(&self) -> DerivedValuePolicy {
        self.policy
    }

    fn io_error(&self, action: &'static str, source: io::Error) -> StorageError {
        if source.kind() == io::ErrorKind::NotFound {
            StorageError::NotFound {
                path: self.path.clone(),
            }
        } else {
            StorageError::Io {
                action,
                path: self.path.clone(),
                source,
            }
        }
    }
}

impl QuestionRepository for CsvQuestionFile {
    fn load(&self, config: &ScoringConfig) -> Result<QuestionList, StorageError> {
        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error("read", e))?;
        let questions = parse_questions(&content, config, self.policy)?;
        tracing::info!(
            path = %self.path.display(),
            count = questions.len(),
            "loaded questions"
        );
        Ok(questions)
    }

    fn save(&self, questions: &QuestionList) -> Result<(), StorageError> {
        fs::write(&self.path, render_questions(questions))
            .map_err(|e| self.io_error("write", e))?;
        tracing::info!(
            path = %self.path.display(),
            count = questions.len(),
            "saved questions"
        );
        Ok(())
    }
}
