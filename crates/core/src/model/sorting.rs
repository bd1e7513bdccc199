use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::attribute::{NumericAttribute, QuestionAttribute};
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SortKeyError {
    #[error("\"{0}\" is neither a question attribute nor a numeric attribute")]
    Unknown(String),
}

/// The attribute a list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    Attribute(QuestionAttribute),
    Numeric(NumericAttribute),
}

impl SortField {
    /// Ascending comparison of two questions on this field.
    #[must_use]
    pub fn compare(self, a: &Question, b: &Question) -> Ordering {
        match self {
            SortField::Attribute(attribute) => a.attribute(attribute).cmp(b.attribute(attribute)),
            SortField::Numeric(attribute) => a.numeric(attribute).total_cmp(&b.numeric(attribute)),
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SortField::Attribute(attribute) => attribute.label(),
            SortField::Numeric(attribute) => attribute.label(),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortField {
    type Err = SortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(attribute) = s.parse::<QuestionAttribute>() {
            return Ok(SortField::Attribute(attribute));
        }
        if let Ok(attribute) = s.parse::<NumericAttribute>() {
            return Ok(SortField::Numeric(attribute));
        }
        Err(SortKeyError::Unknown(s.trim().to_owned()))
    }
}

impl From<QuestionAttribute> for SortField {
    fn from(attribute: QuestionAttribute) -> Self {
        SortField::Attribute(attribute)
    }
}

impl From<NumericAttribute> for SortField {
    fn from(attribute: NumericAttribute) -> Self {
        SortField::Numeric(attribute)
    }
}

/// Field plus direction for sorting or displaying a question list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortingKey {
    field: SortField,
    reverse: bool,
}

impl SortingKey {
    #[must_use]
    pub fn new(field: impl Into<SortField>, reverse: bool) -> Self {
        Self {
            field: field.into(),
            reverse,
        }
    }

    #[must_use]
    pub fn ascending(field: impl Into<SortField>) -> Self {
        Self::new(field, false)
    }

    /// Highest likelihood first.
    #[must_use]
    pub fn revise() -> Self {
        Self::new(NumericAttribute::Likelihood, true)
    }

    /// File order by index.
    #[must_use]
    pub fn test() -> Self {
        Self::ascending(NumericAttribute::Index)
    }

    #[must_use]
    pub fn field(&self) -> SortField {
        self.field
    }

    #[must_use]
    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    pub fn set_reverse(&mut self, reverse: bool) {
        self.reverse = reverse;
    }

    /// Comparison honouring the direction flag.
    #[must_use]
    pub fn compare(&self, a: &Question, b: &Question) -> Ordering {
        let ordering = self.field.compare(a, b);
        if self.reverse {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

impl FromStr for SortingKey {
    type Err = SortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<SortField>().map(|field| Self::new(field, false))
    }
}

impl fmt::Display for SortingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.reverse { "descending" } else { "ascending" };
        write!(f, "{} ({direction})", self.field)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_either_attribute_kind() {
        assert_eq!(
            "topic".parse::<SortingKey>().unwrap().field(),
            SortField::Attribute(QuestionAttribute::Topic)
        );
        assert_eq!(
            "Likelihood".parse::<SortingKey>().unwrap().field(),
            SortField::Numeric(NumericAttribute::Likelihood)
        );
        assert_eq!(
            "difficulty".parse::<SortingKey>().unwrap_err(),
            SortKeyError::Unknown("difficulty".into())
        );
    }

    #[test]
    fn presets_and_reverse_flag() {
        let mut key = SortingKey::revise();
        assert!(key.is_reverse());
        assert_eq!(key.field(), SortField::Numeric(NumericAttribute::Likelihood));
        key.set_reverse(false);
        assert!(!key.is_reverse());

        assert_eq!(SortingKey::test().to_string(), "Index (ascending)");
    }
}
