#![forbid(unsafe_code)]

pub mod model;
pub mod scoring;

pub use model::{
    NumericAttribute, Question, QuestionAttribute, QuestionDraft, QuestionError, QuestionList,
    SortingKey,
};
pub use scoring::{ScoringConfig, ScoringError, calculate_likelihood};
