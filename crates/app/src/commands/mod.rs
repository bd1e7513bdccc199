pub mod attributes;
pub mod list;
pub mod run;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use services::{FilterAction, QuestionFilter, RangeStep, Settings, ValueStep};

use crate::PoolArgs;

pub(crate) fn load_settings(path: Option<&Path>) -> Result<Settings> {
    Settings::load(path).context("failed to load settings")
}

/// Keep steps first, then remove steps, then ranges, each in command-line order.
pub(crate) fn build_filter(pool: &PoolArgs) -> Result<QuestionFilter> {
    let mut filter = QuestionFilter::new();
    let steps = pool
        .keep
        .iter()
        .map(|arg| (arg, FilterAction::Keep))
        .chain(pool.remove.iter().map(|arg| (arg, FilterAction::Remove)));
    for (arg, action) in steps {
        let step = ValueStep::parse(arg, action)
            .with_context(|| format!("invalid filter \"{arg}\""))?;
        filter.push(step);
    }
    for arg in &pool.range {
        let step =
            RangeStep::parse(arg).with_context(|| format!("invalid range \"{arg}\""))?;
        filter.push(step);
    }
    Ok(filter)
}
