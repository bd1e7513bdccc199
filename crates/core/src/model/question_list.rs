use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::attribute::{NumericAttribute, QuestionAttribute};
use crate::model::question::Question;
use crate::model::sorting::SortingKey;
use crate::scoring::ScoringConfig;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ListError {
    #[error("cannot record an answer in an empty question pool")]
    EmptyPool,

    #[error("question position {position} is out of range for a pool of {len}")]
    PositionOutOfRange { position: usize, len: usize },
}

//
// ─── QUESTION LIST ─────────────────────────────────────────────────────────────
//

/// Ordered pool of questions.
///
/// Sorting and answering mutate the list in place; filtering always returns a
/// new list so the source stays intact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionList {
    questions: Vec<Question>,
}

impl QuestionList {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Question> {
        self.questions.get(position)
    }

    #[must_use]
    pub fn first(&self) -> Option<&Question> {
        self.questions.first()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Question] {
        &self.questions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Question> {
        self.questions
    }

    /// Questions whose `attribute` matches any of `values`.
    ///
    /// Title and Topic match ignoring case; closed-set attributes match
    /// exactly, so callers should canonicalize values first. Each question
    /// appears at most once, in list order.
    #[must_use]
    pub fn select_by_attribute_values<S: AsRef<str>>(
        &self,
        values: &[S],
        attribute: QuestionAttribute,
    ) -> QuestionList {
        self.partition_by(values, attribute, true)
    }

    /// Questions whose `attribute` matches none of `values`.
    #[must_use]
    pub fn exclude_by_attribute_values<S: AsRef<str>>(
        &self,
        values: &[S],
        attribute: QuestionAttribute,
    ) -> QuestionList {
        self.partition_by(values, attribute, false)
    }

    /// Questions whose `attribute` lies in `min..=max`, in list order.
    #[must_use]
    pub fn select_by_numeric_range(
        &self,
        attribute: NumericAttribute,
        min: f64,
        max: f64,
    ) -> QuestionList {
        self.questions
            .iter()
            .filter(|question| {
                let value = question.numeric(attribute);
                min <= value && value <= max
            })
            .cloned()
            .collect()
    }

    /// Largest value of `attribute`, or `None` for an empty list.
    #[must_use]
    pub fn max_value(&self, attribute: NumericAttribute) -> Option<f64> {
        self.questions
            .iter()
            .map(|question| question.numeric(attribute))
            .max_by(f64::total_cmp)
    }

    fn partition_by<S: AsRef<str>>(
        &self,
        values: &[S],
        attribute: QuestionAttribute,
        keep_matching: bool,
    ) -> QuestionList {
        let ignore_case = attribute.is_free_text();
        let wanted: Vec<String> = values
            .iter()
            .map(|v| {
                if ignore_case {
                    v.as_ref().to_lowercase()
                } else {
                    v.as_ref().to_owned()
                }
            })
            .collect();

        self.questions
            .iter()
            .filter(|question| {
                let value = question.attribute(attribute);
                let matched = if ignore_case {
                    let value = value.to_lowercase();
                    wanted.iter().any(|w| *w == value)
                } else {
                    wanted.iter().any(|w| w == value)
                };
                matched == keep_matching
            })
            .cloned()
            .collect()
    }

    /// Stable in-place sort.
    pub fn sort_by(&mut self, key: &SortingKey) -> &mut Self {
        self.questions.sort_by(|a, b| key.compare(a, b));
        self
    }

    /// Plays one round: the question at `position` is answered and every
    /// other question in the pool accrues its share of exposure.
    ///
    /// # Errors
    ///
    /// Returns `ListError::EmptyPool` or `ListError::PositionOutOfRange`
    /// without touching any question.
    pub fn record_answer(
        &mut self,
        position: usize,
        was_correct: bool,
        config: &ScoringConfig,
    ) -> Result<(), ListError> {
        let pool_size = self.questions.len();
        if pool_size == 0 {
            return Err(ListError::EmptyPool);
        }
        if position >= pool_size {
            return Err(ListError::PositionOutOfRange {
                position,
                len: pool_size,
            });
        }

        for (i, question) in self.questions.iter_mut().enumerate() {
            if i != position {
                question.not_asked(pool_size, config);
            } else if was_correct {
                question.answered_correct(pool_size, config);
            } else {
                question.answered_incorrect(pool_size, config);
            }
        }
        Ok(())
    }

    /// Distinct values of `attribute`, sorted.
    #[must_use]
    pub fn values_of(&self, attribute: QuestionAttribute) -> BTreeSet<String> {
        self.questions
            .iter()
            .map(|question| question.attribute(attribute).to_owned())
            .collect()
    }

    /// Copies updated questions back over their counterparts in `self`.
    ///
    /// Each updated question replaces the first not-yet-replaced question of
    /// `self` with the same identity. Returns how many updated questions found
    /// no counterpart.
    pub fn merge_updates(&mut self, updated: &QuestionList) -> usize {
        let mut replaced = vec![false; self.questions.len()];
        let mut unmatched = 0;

        for question in &updated.questions {
            let slot = self
                .questions
                .iter()
                .enumerate()
                .position(|(i, existing)| !replaced[i] && existing.same_identity(question));

            match slot {
                Some(i) => {
                    self.questions[i] = question.clone();
                    replaced[i] = true;
                }
                None => unmatched += 1,
            }
        }
        unmatched
    }
}

impl From<Vec<Question>> for QuestionList {
    fn from(questions: Vec<Question>) -> Self {
        Self::new(questions)
    }
}

impl FromIterator<Question> for QuestionList {
    fn from_iter<T: IntoIterator<Item = Question>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a QuestionList {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
