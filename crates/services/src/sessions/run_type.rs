use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use revise_core::SortingKey;

use crate::error::RunTypeError;

/// How questions are ordered and picked during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum RunType {
    /// Re-sort by likelihood before every round and ask the top question.
    #[default]
    Revise,
    /// Ask every question once per pass in index order.
    Test,
    /// Ask every question once per pass in the order of a chosen key.
    Custom(SortingKey),
}

impl RunType {
    /// The order questions are asked in.
    #[must_use]
    pub fn sorting_key(&self) -> SortingKey {
        match self {
            RunType::Revise => SortingKey::revise(),
            RunType::Test => SortingKey::test(),
            RunType::Custom(key) => *key,
        }
    }

    /// Whether the pool is re-sorted after every answer rather than once per pass.
    #[must_use]
    pub fn resorts_every_round(&self) -> bool {
        matches!(self, RunType::Revise)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            RunType::Revise => "revise",
            RunType::Test => "test",
            RunType::Custom(_) => "custom",
        }
    }
}

impl fmt::Display for RunType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunType::Custom(key) => write!(f, "custom, by {key}"),
            other => f.write_str(other.name()),
        }
    }
}

/// Parses `revise`, `test` or `custom`. A parsed custom run orders by index
/// until a key is supplied.
impl FromStr for RunType {
    type Err = RunTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "revise" => Ok(RunType::Revise),
            "test" => Ok(RunType::Test),
            "custom" => Ok(RunType::Custom(SortingKey::test())),
            _ => Err(RunTypeError::Unknown(s.trim().to_owned())),
        }
    }
}

impl TryFrom<String> for RunType {
    type Error = RunTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revise_core::model::{NumericAttribute, QuestionAttribute, SortField};

    #[test]
    fn parses_names_ignoring_case() {
        assert_eq!("Revise".parse::<RunType>().unwrap(), RunType::Revise);
        assert_eq!(" TEST ".parse::<RunType>().unwrap(), RunType::Test);
        assert_eq!(
            "custom".parse::<RunType>().unwrap(),
            RunType::Custom(SortingKey::test())
        );
        assert_eq!(
            "cram".parse::<RunType>().unwrap_err(),
            RunTypeError::Unknown("cram".into())
        );
    }

    #[test]
    fn sorting_keys_per_mode() {
        let revise = RunType::Revise.sorting_key();
        assert!(revise.is_reverse());
        assert_eq!(
            revise.field(),
            SortField::Numeric(NumericAttribute::Likelihood)
        );
        assert!(RunType::Revise.resorts_every_round());

        assert_eq!(RunType::Test.sorting_key(), SortingKey::test());
        assert!(!RunType::Test.resorts_every_round());

        let key = SortingKey::new(QuestionAttribute::Topic, true);
        assert_eq!(RunType::Custom(key).sorting_key(), key);
        assert_eq!(
            RunType::Custom(key).to_string(),
            "custom, by Topic (descending)"
        );
    }
}
