mod attribute;
mod question;
mod question_list;
mod sorting;

pub use attribute::{
    EXAM_BOARDS, NumericAttribute, PAPERS_OR_UNITS, QUALIFICATION_LEVELS, QuestionAttribute,
    SUBJECTS, UnknownAttribute, normalize_text,
};
pub use question::{NumericCheck, Question, QuestionAttributes, QuestionDraft, QuestionError};
pub use question_list::{ListError, QuestionList};
pub use sorting::{SortField, SortKeyError, SortingKey};
