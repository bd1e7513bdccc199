use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::question::QuestionError;

//
// ─── VALID VALUES ──────────────────────────────────────────────────────────────
//

pub const EXAM_BOARDS: &[&str] = &["AQA", "Edexcel", "OCR", "WJEC"];

pub const QUALIFICATION_LEVELS: &[&str] =
    &["A Level", "BTEC Level 2", "BTEC Level 3", "GCSE", "EPQ"];

pub const PAPERS_OR_UNITS: &[&str] = &[
    "Paper 1", "Paper 2", "Paper 3", "Paper 4", "Unit 1", "Unit 2", "Unit 3", "Unit 4",
];

pub const SUBJECTS: &[&str] = &[
    "Art and Design",
    "Biology",
    "Business",
    "Chemistry",
    "Combined Science",
    "Computer Science",
    "Criminology (Certificate)",
    "Criminology (Diploma)",
    "Design and Technology",
    "Drama",
    "Economics",
    "English Literature",
    "English Language",
    "EPQ",
    "Film Studies",
    "Food Technology",
    "French",
    "Further Mathematics",
    "Geography",
    "German",
    "Health and Social Care",
    "History",
    "Law",
    "Mathematics",
    "Media Studies",
    "Music",
    "Philosophy",
    "Physical Education",
    "Physics",
    "Politics",
    "Psychology",
    "Religious Studies",
    "Sociology",
    "Spanish",
    "Sport Science",
    "Statistics",
];

/// Error for names that match no attribute key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("\"{0}\" is not a question attribute")]
pub struct UnknownAttribute(pub String);

//
// ─── CATEGORICAL ATTRIBUTES ────────────────────────────────────────────────────
//

/// Categorical (string-valued) attribute of a question, in file column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestionAttribute {
    Title,
    Topic,
    PaperOrUnit,
    Subject,
    QualificationLevel,
    ExamBoard,
}

impl QuestionAttribute {
    pub const ALL: [QuestionAttribute; 6] = [
        QuestionAttribute::Title,
        QuestionAttribute::Topic,
        QuestionAttribute::PaperOrUnit,
        QuestionAttribute::Subject,
        QuestionAttribute::QualificationLevel,
        QuestionAttribute::ExamBoard,
    ];

    /// Human-readable column label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            QuestionAttribute::Title => "Title",
            QuestionAttribute::Topic => "Topic",
            QuestionAttribute::PaperOrUnit => "Paper or unit",
            QuestionAttribute::Subject => "Subject",
            QuestionAttribute::QualificationLevel => "Qualification level",
            QuestionAttribute::ExamBoard => "Exam board",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            QuestionAttribute::Title => "The title of the question.",
            QuestionAttribute::Topic => "The topic/section to which the question belongs.",
            QuestionAttribute::PaperOrUnit => {
                "The paper, or unit, whose content contains the question."
            }
            QuestionAttribute::Subject => "The subject to which the question belongs.",
            QuestionAttribute::QualificationLevel => {
                "The qualification level to which the question belongs."
            }
            QuestionAttribute::ExamBoard => "The exam board to which the question belongs.",
        }
    }

    /// Closed set of accepted values, or `None` for free text.
    #[must_use]
    pub fn valid_values(self) -> Option<&'static [&'static str]> {
        match self {
            QuestionAttribute::Title | QuestionAttribute::Topic => None,
            QuestionAttribute::PaperOrUnit => Some(PAPERS_OR_UNITS),
            QuestionAttribute::Subject => Some(SUBJECTS),
            QuestionAttribute::QualificationLevel => Some(QUALIFICATION_LEVELS),
            QuestionAttribute::ExamBoard => Some(EXAM_BOARDS),
        }
    }

    /// Free-text attributes match filters case-insensitively.
    #[must_use]
    pub fn is_free_text(self) -> bool {
        self.valid_values().is_none()
    }

    /// Normalizes a raw value and maps it onto its canonical spelling.
    ///
    /// Free-text values only need to be non-blank; closed-set values must
    /// match one of [`Self::valid_values`] ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidAttribute` if no match exists.
    pub fn canonicalize(self, raw: &str) -> Result<String, QuestionError> {
        let value = normalize_text(raw);
        let invalid = || QuestionError::InvalidAttribute {
            attribute: self,
            value: value.to_owned(),
        };

        match self.valid_values() {
            None if value.trim().is_empty() => Err(invalid()),
            None => Ok(value.to_owned()),
            Some(valid) => valid
                .iter()
                .find(|candidate| candidate.to_lowercase() == value.to_lowercase())
                .map(|candidate| (*candidate).to_owned())
                .ok_or_else(invalid),
        }
    }
}

impl fmt::Display for QuestionAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for QuestionAttribute {
    type Err = UnknownAttribute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = name_key(s);
        Self::ALL
            .into_iter()
            .find(|attribute| name_key(attribute.label()) == wanted)
            .ok_or_else(|| UnknownAttribute(s.trim().to_owned()))
    }
}

//
// ─── NUMERIC ATTRIBUTES ────────────────────────────────────────────────────────
//

/// Numeric attribute of a question, in file column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NumericAttribute {
    Index,
    Attempted,
    Correct,
    Percentage,
    ExpectedTimesAsked,
    Likelihood,
}

impl NumericAttribute {
    pub const ALL: [NumericAttribute; 6] = [
        NumericAttribute::Index,
        NumericAttribute::Attempted,
        NumericAttribute::Correct,
        NumericAttribute::Percentage,
        NumericAttribute::ExpectedTimesAsked,
        NumericAttribute::Likelihood,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            NumericAttribute::Index => "Index",
            NumericAttribute::Attempted => "Attempted",
            NumericAttribute::Correct => "Correct",
            NumericAttribute::Percentage => "Percentage",
            NumericAttribute::ExpectedTimesAsked => "Expected times asked",
            NumericAttribute::Likelihood => "Likelihood",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            NumericAttribute::Index => "The position of the question in its file.",
            NumericAttribute::Attempted => "How many times the question has been answered.",
            NumericAttribute::Correct => "How many of those answers were correct.",
            NumericAttribute::Percentage => "The share of answers that were correct.",
            NumericAttribute::ExpectedTimesAsked => {
                "How many times the question would have been asked if every pool it sat in \
                 were asked evenly."
            }
            NumericAttribute::Likelihood => "How urgently the question should be asked next.",
        }
    }

    /// True for values derived from the counters rather than stored.
    #[must_use]
    pub fn is_derived(self) -> bool {
        matches!(self, NumericAttribute::Percentage | NumericAttribute::Likelihood)
    }
}

impl fmt::Display for NumericAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NumericAttribute {
    type Err = UnknownAttribute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = name_key(s);
        Self::ALL
            .into_iter()
            .find(|attribute| name_key(attribute.label()) == wanted)
            .ok_or_else(|| UnknownAttribute(s.trim().to_owned()))
    }
}

//
// ─── TEXT HELPERS ──────────────────────────────────────────────────────────────
//

/// Trims whitespace and strips one pair of wrapping double quotes.
///
/// A value opening with a doubled quote (`""`) keeps its quotes.
#[must_use]
pub fn normalize_text(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2
        && trimmed.starts_with('"')
        && !trimmed.starts_with("\"\"")
        && trimmed.ends_with('"')
    {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// Lowercase, separator-insensitive key used to look up attribute names.
fn name_key(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
