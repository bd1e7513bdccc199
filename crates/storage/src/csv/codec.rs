//! Row-level encoding of the question file format.

use revise_core::QuestionDraft;
use revise_core::model::{Question, QuestionAttribute, QuestionError};
use revise_core::scoring::round_2dp;
use thiserror::Error;

pub(crate) const FIELD_COUNT: usize = 12;

/// Why a single row could not be turned into a question.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum RowError {
    #[error("has {found} fields, expected {expected}")]
    FieldCount { found: usize, expected: usize },

    #[error("value of field \"{column}\" (\"{raw}\") is not an integer")]
    NotInteger { column: &'static str, raw: String },

    #[error("value of field \"{column}\" (\"{raw}\") is not a number")]
    NotNumber { column: &'static str, raw: String },

    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// Splits a row on commas that sit outside double quotes.
pub(crate) fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::with_capacity(FIELD_COUNT);
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(&line[start..]);
    fields
}

/// Removes quoting added by [`escape_field`].
pub(crate) fn unescape_field(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].replace("\"\"", "\"")
    } else {
        trimmed.to_owned()
    }
}

/// Quotes a categorical value when it would not survive a plain write.
pub(crate) fn escape_field(value: &str) -> String {
    let needs_quotes = value.contains([',', '"'])
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace);
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

fn parse_integer(column: &'static str, raw: &str) -> Result<i64, RowError> {
    raw.trim().parse().map_err(|_| RowError::NotInteger {
        column,
        raw: raw.to_owned(),
    })
}

fn parse_number(column: &'static str, raw: &str) -> Result<f64, RowError> {
    raw.trim().parse().map_err(|_| RowError::NotNumber {
        column,
        raw: raw.to_owned(),
    })
}

/// Parses one data row into an unvalidated draft.
pub(crate) fn parse_row(line: &str) -> Result<QuestionDraft, RowError> {
    if line.trim().is_empty() {
        return Err(RowError::FieldCount {
            found: 0,
            expected: FIELD_COUNT,
        });
    }

    let fields = split_fields(line);
    let [
        index,
        title,
        topic,
        paper_or_unit,
        subject,
        qualification_level,
        exam_board,
        attempted,
        correct,
        percentage,
        expected_times_asked,
        likelihood,
    ] = fields.as_slice()
    else {
        return Err(RowError::FieldCount {
            found: fields.len(),
            expected: FIELD_COUNT,
        });
    };

    Ok(QuestionDraft {
        index: parse_integer("index", index)?,
        title: unescape_field(title),
        topic: unescape_field(topic),
        paper_or_unit: unescape_field(paper_or_unit),
        subject: unescape_field(subject),
        qualification_level: unescape_field(qualification_level),
        exam_board: unescape_field(exam_board),
        attempted: parse_integer("attempted", attempted)?,
        correct: parse_integer("correct", correct)?,
        percentage: parse_number("percentage", percentage)?,
        expected_times_asked: parse_number("expected times asked", expected_times_asked)?,
        likelihood: parse_number("likelihood", likelihood)?,
    })
}

/// Renders one question as a data row (no line terminator).
pub(crate) fn format_row(question: &Question) -> String {
    let mut fields = Vec::with_capacity(FIELD_COUNT);
    fields.push(question.index().to_string());
    fields.extend(
        QuestionAttribute::ALL
            .iter()
            .map(|attribute| escape_field(question.attribute(*attribute))),
    );
    fields.push(question.attempted().to_string());
    fields.push(question.correct().to_string());
    fields.push(format_2dp(question.percentage()));
    fields.push(format_exposure(question.expected_times_asked()));
    fields.push(format_2dp(question.likelihood()));
    fields.join(",")
}

/// Two-decimal text that reads back to the same value [`round_2dp`] gives.
pub(crate) fn format_2dp(value: f64) -> String {
    format!("{:.2}", round_2dp(value))
}

/// Writes exposure without loss. Values exact at two decimals keep that form.
pub(crate) fn format_exposure(value: f64) -> String {
    let short = format!("{value:.2}");
    if short.parse::<f64>().is_ok_and(|parsed| parsed == value) {
        short
    } else {
        value.to_string()
    }
}
