//! The `revise list` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use revise_core::model::{NumericAttribute, QuestionAttribute};
use revise_core::scoring::LikelihoodBreakdown;
use revise_core::{QuestionList, ScoringConfig, SortingKey};
use storage::{CsvQuestionFile, QuestionRepository};

use super::{build_filter, load_settings};
use crate::PoolArgs;

pub struct ListOptions {
    pub sort: Option<SortingKey>,
    pub desc: bool,
    pub breakdown: bool,
    pub pool: PoolArgs,
}

pub fn execute(config: Option<PathBuf>, file: PathBuf, options: ListOptions) -> Result<()> {
    let settings = load_settings(config.as_deref())?;
    let filter = build_filter(&options.pool)?;

    let all = CsvQuestionFile::new(&file)
        .load(&settings.scoring)
        .with_context(|| format!("failed to load {}", file.display()))?;

    let mut selected = filter.apply(&all);
    let mut key = options.sort.unwrap_or_else(SortingKey::test);
    key.set_reverse(options.desc);
    selected.sort_by(&key);

    let scoring = options.breakdown.then_some(&settings.scoring);
    println!("{}", render_table(&selected, scoring));
    println!(
        "{} of {} questions, ordered by {key}",
        selected.len(),
        all.len()
    );
    Ok(())
}

/// With `breakdown`, two extra columns show the likelihood's components.
fn render_table(questions: &QuestionList, breakdown: Option<&ScoringConfig>) -> Table {
    let mut table = Table::new();
    let mut header: Vec<&str> = vec![NumericAttribute::Index.label()];
    header.extend(QuestionAttribute::ALL.iter().map(|a| a.label()));
    header.extend(
        NumericAttribute::ALL
            .iter()
            .filter(|a| **a != NumericAttribute::Index)
            .map(|a| a.label()),
    );
    if breakdown.is_some() {
        header.extend(["Wrongness", "Overdue"]);
    }
    table.set_header(header);

    for question in questions {
        let mut row = vec![Cell::new(question.index())];
        row.extend(
            QuestionAttribute::ALL
                .iter()
                .map(|a| Cell::new(question.attribute(*a))),
        );
        row.push(Cell::new(question.attempted()));
        row.push(Cell::new(question.correct()));
        row.push(Cell::new(format!("{:.2}", question.percentage())));
        row.push(Cell::new(format!("{:.2}", question.expected_times_asked())));
        row.push(Cell::new(format!("{:.2}", question.likelihood())));

        if let Some(config) = breakdown {
            match LikelihoodBreakdown::compute(
                question.attempted(),
                question.percentage(),
                question.expected_times_asked(),
                config,
            ) {
                Some(parts) => {
                    row.push(Cell::new(format!("{:.2}", parts.wrongness)));
                    row.push(Cell::new(format!("{:.2}", parts.overdue)));
                }
                None => row.extend([Cell::new("-"), Cell::new("-")]),
            }
        }
        table.add_row(row);
    }
    table
}
