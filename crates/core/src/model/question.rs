use std::fmt;

use thiserror::Error;

use crate::model::attribute::{NumericAttribute, QuestionAttribute};
use crate::scoring::{ScoringConfig, calculate_likelihood, round_2dp};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Which numeric check a value failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericCheck {
    NotFinite,
    Negative,
    OutOfRange,
    CorrectExceedsAttempted,
    DerivedMismatch,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("\"{value}\" is not a valid {attribute}")]
    InvalidAttribute {
        attribute: QuestionAttribute,
        value: String,
    },

    #[error("{reason}")]
    InvalidNumericAttribute {
        attribute: NumericAttribute,
        value: f64,
        check: NumericCheck,
        reason: String,
    },
}

impl QuestionError {
    /// True when a persisted percentage/likelihood disagrees with the value
    /// recomputed from the counters. Callers may choose to overwrite these.
    #[must_use]
    pub fn is_derived_mismatch(&self) -> bool {
        matches!(
            self,
            QuestionError::InvalidNumericAttribute {
                check: NumericCheck::DerivedMismatch,
                ..
            }
        )
    }

    fn numeric(
        attribute: NumericAttribute,
        value: f64,
        check: NumericCheck,
        reason: String,
    ) -> Self {
        QuestionError::InvalidNumericAttribute {
            attribute,
            value,
            check,
            reason,
        }
    }
}

//
// ─── CATEGORICAL VALUES ────────────────────────────────────────────────────────
//

/// The six categorical values of a question, each already canonicalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuestionAttributes {
    title: String,
    topic: String,
    paper_or_unit: String,
    subject: String,
    qualification_level: String,
    exam_board: String,
}

impl QuestionAttributes {
    /// Validates and canonicalizes every categorical value.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidAttribute` for the first value that is
    /// blank (free text) or outside its closed set.
    pub fn new(
        title: &str,
        topic: &str,
        paper_or_unit: &str,
        subject: &str,
        qualification_level: &str,
        exam_board: &str,
    ) -> Result<Self, QuestionError> {
        Ok(Self {
            title: QuestionAttribute::Title.canonicalize(title)?,
            topic: QuestionAttribute::Topic.canonicalize(topic)?,
            paper_or_unit: QuestionAttribute::PaperOrUnit.canonicalize(paper_or_unit)?,
            subject: QuestionAttribute::Subject.canonicalize(subject)?,
            qualification_level: QuestionAttribute::QualificationLevel
                .canonicalize(qualification_level)?,
            exam_board: QuestionAttribute::ExamBoard.canonicalize(exam_board)?,
        })
    }

    #[must_use]
    pub fn get(&self, attribute: QuestionAttribute) -> &str {
        match attribute {
            QuestionAttribute::Title => &self.title,
            QuestionAttribute::Topic => &self.topic,
            QuestionAttribute::PaperOrUnit => &self.paper_or_unit,
            QuestionAttribute::Subject => &self.subject,
            QuestionAttribute::QualificationLevel => &self.qualification_level,
            QuestionAttribute::ExamBoard => &self.exam_board,
        }
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Raw question fields as supplied by a loader, before validation.
///
/// Counters are signed so that negative input can be reported rather than
/// rejected at parse time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionDraft {
    pub index: i64,
    pub title: String,
    pub topic: String,
    pub paper_or_unit: String,
    pub subject: String,
    pub qualification_level: String,
    pub exam_board: String,
    pub attempted: i64,
    pub correct: i64,
    pub percentage: f64,
    pub expected_times_asked: f64,
    pub likelihood: f64,
}

impl QuestionDraft {
    /// Strict validation: every check, including the derived-value checks,
    /// must pass.
    ///
    /// The returned question's percentage and likelihood are recomputed from
    /// the counters, not copied from the draft.
    ///
    /// # Errors
    ///
    /// Returns the first `QuestionError` encountered.
    pub fn validate(self, config: &ScoringConfig) -> Result<Question, QuestionError> {
        self.validate_inner(config, true)
            .map(|(question, _)| question)
    }

    /// Like [`Self::validate`], but percentage/likelihood mismatches are
    /// returned alongside the question instead of failing.
    ///
    /// # Errors
    ///
    /// Returns the first `QuestionError` that is not a derived-value mismatch.
    pub fn validate_recomputing(
        self,
        config: &ScoringConfig,
    ) -> Result<(Question, Vec<QuestionError>), QuestionError> {
        self.validate_inner(config, false)
    }

    fn validate_inner(
        self,
        config: &ScoringConfig,
        reject_mismatch: bool,
    ) -> Result<(Question, Vec<QuestionError>), QuestionError> {
        let attributes = QuestionAttributes::new(
            &self.title,
            &self.topic,
            &self.paper_or_unit,
            &self.subject,
            &self.qualification_level,
            &self.exam_board,
        )?;

        for (attribute, value) in [
            (NumericAttribute::Percentage, self.percentage),
            (NumericAttribute::ExpectedTimesAsked, self.expected_times_asked),
            (NumericAttribute::Likelihood, self.likelihood),
        ] {
            if !value.is_finite() {
                return Err(QuestionError::numeric(
                    attribute,
                    value,
                    NumericCheck::NotFinite,
                    format!("\"{attribute}\" value {value} is not a finite number."),
                ));
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let values = [
            (NumericAttribute::Index, self.index as f64),
            (NumericAttribute::Attempted, self.attempted as f64),
            (NumericAttribute::Correct, self.correct as f64),
            (NumericAttribute::Percentage, self.percentage),
            (NumericAttribute::ExpectedTimesAsked, self.expected_times_asked),
            (NumericAttribute::Likelihood, self.likelihood),
        ];
        for (attribute, value) in values {
            if value < 0.0 {
                return Err(QuestionError::numeric(
                    attribute,
                    value,
                    NumericCheck::Negative,
                    format!("\"{attribute}\" value is less than 0!"),
                ));
            }
        }

        let index = counter(NumericAttribute::Index, self.index)?;
        let attempted = counter(NumericAttribute::Attempted, self.attempted)?;
        let correct = counter(NumericAttribute::Correct, self.correct)?;

        if correct > attempted {
            return Err(QuestionError::numeric(
                NumericAttribute::Correct,
                f64::from(correct),
                NumericCheck::CorrectExceedsAttempted,
                format!(
                    "The \"Correct\" value {correct} is greater than \"Attempted\" value {attempted}."
                ),
            ));
        }

        let mut overridden = Vec::new();

        let expected_percentage = round_2dp(percentage_of(correct, attempted));
        if round_2dp(self.percentage) != expected_percentage {
            let err = QuestionError::numeric(
                NumericAttribute::Percentage,
                self.percentage,
                NumericCheck::DerivedMismatch,
                format!(
                    "The \"Percentage\" value for \"Correct\" = {correct} and \"Attempted\" = \
                     {attempted} should be {expected_percentage}, but the value provided is {}.",
                    self.percentage
                ),
            );
            if reject_mismatch {
                return Err(err);
            }
            overridden.push(err);
        }

        // A 2dp percentage can shift the likelihood across a rounding edge, so
        // the value derived from the counters' exact percentage is accepted too.
        let expected_likelihood = round_2dp(calculate_likelihood(
            attempted,
            self.percentage,
            self.expected_times_asked,
            config,
        ));
        let exact_likelihood = round_2dp(calculate_likelihood(
            attempted,
            percentage_of(correct, attempted),
            self.expected_times_asked,
            config,
        ));
        let supplied_likelihood = round_2dp(self.likelihood);
        if supplied_likelihood != expected_likelihood && supplied_likelihood != exact_likelihood {
            let err = QuestionError::numeric(
                NumericAttribute::Likelihood,
                self.likelihood,
                NumericCheck::DerivedMismatch,
                format!(
                    "The \"Likelihood\" value for \"Attempted\" = {attempted}, \"Percentage\" = \
                     {} and \"Expected times asked\" = {} should be {expected_likelihood}, but \
                     the value provided is {}!",
                    self.percentage, self.expected_times_asked, self.likelihood
                ),
            );
            if reject_mismatch {
                return Err(err);
            }
            overridden.push(err);
        }

        let mut question = Question {
            attributes,
            index,
            attempted,
            correct,
            percentage: 0.0,
            expected_times_asked: self.expected_times_asked,
            likelihood: 0.0,
        };
        question.recompute_percentage();
        question.recompute_likelihood(config);

        Ok((question, overridden))
    }
}

fn counter(attribute: NumericAttribute, value: i64) -> Result<u32, QuestionError> {
    u32::try_from(value).map_err(|_| {
        #[allow(clippy::cast_precision_loss)]
        let as_float = value as f64;
        QuestionError::numeric(
            attribute,
            as_float,
            NumericCheck::OutOfRange,
            format!("\"{attribute}\" value {value} is out of range."),
        )
    })
}

fn percentage_of(correct: u32, attempted: u32) -> f64 {
    if attempted == 0 {
        0.0
    } else {
        100.0 * (f64::from(correct) / f64::from(attempted))
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A revision question and its performance record.
///
/// `percentage` and `likelihood` are always recomputed from `attempted`,
/// `correct` and `expected_times_asked`; nothing sets them directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    attributes: QuestionAttributes,
    index: u32,
    attempted: u32,
    correct: u32,
    percentage: f64,
    expected_times_asked: f64,
    likelihood: f64,
}

impl Question {
    /// Creates a question that has never been asked.
    #[must_use]
    pub fn new(index: u32, attributes: QuestionAttributes) -> Self {
        Self {
            attributes,
            index,
            attempted: 0,
            correct: 0,
            percentage: 0.0,
            expected_times_asked: 0.0,
            likelihood: 0.0,
        }
    }

    #[must_use]
    pub fn attribute(&self, attribute: QuestionAttribute) -> &str {
        self.attributes.get(attribute)
    }

    #[must_use]
    pub fn attributes(&self) -> &QuestionAttributes {
        &self.attributes
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.attribute(QuestionAttribute::Title)
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        self.attribute(QuestionAttribute::Topic)
    }

    #[must_use]
    pub fn paper_or_unit(&self) -> &str {
        self.attribute(QuestionAttribute::PaperOrUnit)
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        self.attribute(QuestionAttribute::Subject)
    }

    #[must_use]
    pub fn qualification_level(&self) -> &str {
        self.attribute(QuestionAttribute::QualificationLevel)
    }

    #[must_use]
    pub fn exam_board(&self) -> &str {
        self.attribute(QuestionAttribute::ExamBoard)
    }

    /// Keyed numeric accessor; counters are widened to `f64`.
    #[must_use]
    pub fn numeric(&self, attribute: NumericAttribute) -> f64 {
        match attribute {
            NumericAttribute::Index => f64::from(self.index),
            NumericAttribute::Attempted => f64::from(self.attempted),
            NumericAttribute::Correct => f64::from(self.correct),
            NumericAttribute::Percentage => self.percentage,
            NumericAttribute::ExpectedTimesAsked => self.expected_times_asked,
            NumericAttribute::Likelihood => self.likelihood,
        }
    }

    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
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
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    #[must_use]
    pub fn expected_times_asked(&self) -> f64 {
        self.expected_times_asked
    }

    #[must_use]
    pub fn likelihood(&self) -> f64 {
        self.likelihood
    }

    /// Same index and categorical values.
    #[must_use]
    pub fn same_identity(&self, other: &Question) -> bool {
        self.index == other.index && self.attributes == other.attributes
    }

    /// Records a correct answer; still counts as an attempt.
    pub(crate) fn answered_correct(&mut self, pool_size: usize, config: &ScoringConfig) {
        self.correct = self.correct.saturating_add(1);
        self.answered_incorrect(pool_size, config);
    }

    /// Records an attempt, then accrues this round's exposure.
    pub(crate) fn answered_incorrect(&mut self, pool_size: usize, config: &ScoringConfig) {
        self.attempted = self.attempted.saturating_add(1);
        self.recompute_percentage();
        self.not_asked(pool_size, config);
    }

    /// Accrues `1 / pool_size` of expected exposure. Only meaningful when
    /// applied to every member of the pool in the same round.
    pub(crate) fn not_asked(&mut self, pool_size: usize, config: &ScoringConfig) {
        #[allow(clippy::cast_precision_loss)]
        let share = 1.0 / pool_size as f64;
        self.expected_times_asked += share;
        self.recompute_likelihood(config);
    }

    fn recompute_percentage(&mut self) {
        self.percentage = percentage_of(self.correct, self.attempted);
    }

    fn recompute_likelihood(&mut self, config: &ScoringConfig) {
        self.likelihood = calculate_likelihood(
            self.attempted,
            self.percentage,
            self.expected_times_asked,
            config,
        );
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({}) question: {}",
            self.exam_board(),
            self.qualification_level(),
            self.subject(),
            self.topic(),
            self.title()
        )
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
