//! The `revise validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use revise_core::model::QuestionAttribute;
use storage::{CsvQuestionFile, DerivedValuePolicy, QuestionRepository};

use super::load_settings;

pub fn execute(config: Option<PathBuf>, file: PathBuf, strict: bool) -> Result<()> {
    let settings = load_settings(config.as_deref())?;
    let policy = if strict {
        DerivedValuePolicy::Reject
    } else {
        DerivedValuePolicy::Recompute
    };

    let questions = CsvQuestionFile::new(&file)
        .with_policy(policy)
        .load(&settings.scoring)
        .with_context(|| format!("{} is not a valid question file", file.display()))?;

    println!("{}: {} questions", file.display(), questions.len());
    for attribute in [
        QuestionAttribute::Subject,
        QuestionAttribute::QualificationLevel,
        QuestionAttribute::ExamBoard,
    ] {
        let values: Vec<String> = questions.values_of(attribute).into_iter().collect();
        if !values.is_empty() {
            println!("  {attribute}: {}", values.join(", "));
        }
    }
    println!("Question file valid.");
    Ok(())
}
