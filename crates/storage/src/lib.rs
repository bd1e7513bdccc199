#![forbid(unsafe_code)]

pub mod csv;
pub mod repository;

pub use csv::{COLUMN_HEADERS, CsvQuestionFile, DerivedValuePolicy, RowError};
pub use repository::{InMemoryRepository, QuestionRepository, StorageError};
