//! Narrowing a question pool before a session, by categorical values or
//! numeric ranges.

use std::str::FromStr;

use revise_core::QuestionList;
use revise_core::model::{NumericAttribute, QuestionAttribute};

use crate::error::FilterError;

/// Whether a step keeps or removes the matching questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    Keep,
    Remove,
}

//
// ─── VALUE STEP ────────────────────────────────────────────────────────────────
//

/// Keeps or removes questions by categorical value. Values are canonical and
/// distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueStep {
    attribute: QuestionAttribute,
    values: Vec<String>,
    action: FilterAction,
}

impl ValueStep {
    /// Canonicalizes `raw_values` and drops duplicates.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Value` for a value that is not valid for `attribute`.
    pub fn new<S: AsRef<str>>(
        attribute: QuestionAttribute,
        raw_values: &[S],
        action: FilterAction,
    ) -> Result<Self, FilterError> {
        let mut values: Vec<String> = Vec::with_capacity(raw_values.len());
        for raw in raw_values {
            let value = attribute.canonicalize(raw.as_ref())?;
            let duplicate = if attribute.is_free_text() {
                values.iter().any(|v| v.to_lowercase() == value.to_lowercase())
            } else {
                values.contains(&value)
            };
            if !duplicate {
                values.push(value);
            }
        }
        Ok(Self {
            attribute,
            values,
            action,
        })
    }

    /// Parses `attribute=value1,value2`. Nothing after `=` gives a step
    /// that changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `FilterError` for a missing `=`, an unknown attribute or an
    /// invalid value.
    pub fn parse(text: &str, action: FilterAction) -> Result<Self, FilterError> {
        let (name, values) = text
            .split_once('=')
            .ok_or_else(|| FilterError::Malformed(text.to_owned()))?;
        let attribute = QuestionAttribute::from_str(name)?;
        let values: Vec<&str> = values
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();
        Self::new(attribute, &values, action)
    }

    #[must_use]
    pub fn attribute(&self) -> QuestionAttribute {
        self.attribute
    }

    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    #[must_use]
    pub fn action(&self) -> FilterAction {
        self.action
    }

    fn apply(&self, questions: &QuestionList) -> QuestionList {
        match self.action {
            FilterAction::Keep => questions.select_by_attribute_values(&self.values, self.attribute),
            FilterAction::Remove => {
                questions.exclude_by_attribute_values(&self.values, self.attribute)
            }
        }
    }
}

//
// ─── RANGE STEP ────────────────────────────────────────────────────────────────
//

/// Keeps questions whose numeric attribute lies in an inclusive range.
///
/// A missing minimum means 0; a missing maximum means the largest value in
/// the list being filtered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeStep {
    attribute: NumericAttribute,
    min: Option<f64>,
    max: Option<f64>,
}

impl RangeStep {
    /// # Errors
    ///
    /// Returns `FilterError::Inverted` when both bounds are given and
    /// `min > max`.
    pub fn new(
        attribute: NumericAttribute,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<Self, FilterError> {
        match (min, max) {
            (Some(min), Some(max)) if min > max => Err(FilterError::Inverted { min, max }),
            _ => Ok(Self {
                attribute,
                min,
                max,
            }),
        }
    }

    /// Parses `attribute=min..max`; either bound may be left out.
    ///
    /// # Errors
    ///
    /// Returns `FilterError` for a missing `=` or `..`, an unknown numeric
    /// attribute, a bound that is not a number, or an inverted range.
    pub fn parse(text: &str) -> Result<Self, FilterError> {
        let malformed = || FilterError::MalformedRange(text.to_owned());
        let (name, range) = text.split_once('=').ok_or_else(malformed)?;
        let (min, max) = range.split_once("..").ok_or_else(malformed)?;
        let attribute = NumericAttribute::from_str(name)?;
        Self::new(attribute, parse_bound(min)?, parse_bound(max)?)
    }

    #[must_use]
    pub fn attribute(&self) -> NumericAttribute {
        self.attribute
    }

    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.max
    }

    fn apply(&self, questions: &QuestionList) -> QuestionList {
        let min = self.min.unwrap_or(0.0);
        let Some(max) = self.max.or_else(|| questions.max_value(self.attribute)) else {
            return questions.clone();
        };
        questions.select_by_numeric_range(self.attribute, min, max)
    }
}

fn parse_bound(raw: &str) -> Result<Option<f64>, FilterError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(FilterError::Bound(raw.to_owned())),
    }
}

//
// ─── FILTER ────────────────────────────────────────────────────────────────────
//

/// One step of a [`QuestionFilter`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterStep {
    Values(ValueStep),
    Range(RangeStep),
}

impl FilterStep {
    /// Range steps only ever keep.
    #[must_use]
    pub fn action(&self) -> FilterAction {
        match self {
            FilterStep::Values(step) => step.action(),
            FilterStep::Range(_) => FilterAction::Keep,
        }
    }

    /// A value step with no values leaves the pool untouched.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self, FilterStep::Values(step) if step.values.is_empty())
    }

    fn apply(&self, questions: &QuestionList) -> QuestionList {
        match self {
            FilterStep::Values(step) => step.apply(questions),
            FilterStep::Range(step) => step.apply(questions),
        }
    }

    fn describe(&self) -> String {
        match self {
            FilterStep::Values(step) => step.attribute.to_string(),
            FilterStep::Range(step) => step.attribute.to_string(),
        }
    }
}

impl From<ValueStep> for FilterStep {
    fn from(step: ValueStep) -> Self {
        FilterStep::Values(step)
    }
}

impl From<RangeStep> for FilterStep {
    fn from(step: RangeStep) -> Self {
        FilterStep::Range(step)
    }
}

/// Ordered filter steps applied one after another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionFilter {
    steps: Vec<FilterStep>,
}

impl QuestionFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: impl Into<FilterStep>) -> &mut Self {
        self.steps.push(step.into());
        self
    }

    /// Adds a step keeping questions whose `attribute` is one of `values`.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Value` for an invalid value.
    pub fn keep<S: AsRef<str>>(
        mut self,
        attribute: QuestionAttribute,
        values: &[S],
    ) -> Result<Self, FilterError> {
        self.push(ValueStep::new(attribute, values, FilterAction::Keep)?);
        Ok(self)
    }

    /// Adds a step removing questions whose `attribute` is one of `values`.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Value` for an invalid value.
    pub fn remove<S: AsRef<str>>(
        mut self,
        attribute: QuestionAttribute,
        values: &[S],
    ) -> Result<Self, FilterError> {
        self.push(ValueStep::new(attribute, values, FilterAction::Remove)?);
        Ok(self)
    }

    /// Adds a step keeping questions whose `attribute` lies in `min..=max`.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Inverted` when `min > max`.
    pub fn within(
        mut self,
        attribute: NumericAttribute,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<Self, FilterError> {
        self.push(RangeStep::new(attribute, min, max)?);
        Ok(self)
    }

    #[must_use]
    pub fn steps(&self) -> &[FilterStep] {
        &self.steps
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.iter().all(FilterStep::is_noop)
    }

    /// Runs every step in order and returns the surviving questions.
    #[must_use]
    pub fn apply(&self, questions: &QuestionList) -> QuestionList {
        let mut current = questions.clone();
        for step in self.steps.iter().filter(|step| !step.is_noop()) {
            current = step.apply(&current);
            tracing::debug!(
                attribute = %step.describe(),
                action = ?step.action(),
                remaining = current.len(),
                "filter step applied"
            );
        }
        current
    }
}
