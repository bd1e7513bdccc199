//! The `revise attributes` command.

use anyhow::{Result, bail};
use comfy_table::Table;
use revise_core::model::{NumericAttribute, QuestionAttribute};

pub fn execute(name: Option<&str>) -> Result<()> {
    match name {
        None => println!("{}", overview()),
        Some(name) => println!("{}", detail(name)?),
    }
    Ok(())
}

fn overview() -> Table {
    let mut table = Table::new();
    table.set_header(["Attribute", "Kind", "Description"]);
    for attribute in QuestionAttribute::ALL {
        let kind = if attribute.is_free_text() {
            "free text"
        } else {
            "fixed values"
        };
        table.add_row([attribute.label(), kind, attribute.description()]);
    }
    for attribute in NumericAttribute::ALL {
        let kind = if attribute.is_derived() {
            "derived"
        } else {
            "stored"
        };
        table.add_row([attribute.label(), kind, attribute.description()]);
    }
    table
}

fn detail(name: &str) -> Result<String> {
    if let Ok(attribute) = name.parse::<QuestionAttribute>() {
        let mut text = format!("{attribute}: {}", attribute.description());
        match attribute.valid_values() {
            Some(values) => {
                for value in values {
                    text.push_str("\n  ");
                    text.push_str(value);
                }
            }
            None => text.push_str("\nAny non-blank text."),
        }
        return Ok(text);
    }
    if let Ok(attribute) = name.parse::<NumericAttribute>() {
        let origin = if attribute.is_derived() {
            "Recomputed from the other columns whenever a question changes."
        } else {
            "Read from the question file and updated by runs."
        };
        return Ok(format!("{attribute}: {}\n{origin}", attribute.description()));
    }
    bail!("\"{name}\" is not a question attribute")
}
