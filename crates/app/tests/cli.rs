//! CLI integration tests using assert_cmd.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const HEADER: &str = "Index,Title,Topic,Paper or unit,Subject,Qualification level,Exam board,\
Attempted,Correct,Percentage,Expected times asked,Likelihood";

fn revise() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("revise").unwrap();
    cmd.env_remove("REVISE_CONFIG").env("RUST_LOG", "off");
    cmd
}

fn write_questions(dir: &Path) -> PathBuf {
    let path = dir.join("questions.csv");
    fs::write(
        &path,
        format!(
            "{HEADER}\n\
             0,Cell structure,Cells,Paper 1,Biology,GCSE,AQA,0,0,0.00,0.00,0.00\n\
             1,Newton's laws,Forces,Paper 2,Physics,GCSE,AQA,0,0,0.00,0.00,0.00\n\
             2,\"Ionic, covalent and metallic\",Bonding,Paper 1,Chemistry,GCSE,OCR,0,0,0.00,0.00,0.00\n"
        ),
    )
    .unwrap();
    path
}

#[test]
fn validate_reports_question_count() {
    let dir = TempDir::new().unwrap();
    let file = write_questions(dir.path());

    revise()
        .current_dir(dir.path())
        .arg("validate")
        .arg(&file)
        .arg("--strict")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 questions"))
        .stdout(predicate::str::contains("Biology, Chemistry, Physics"))
        .stdout(predicate::str::contains("Question file valid."));
}

#[test]
fn validate_rejects_bad_rows() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("bad.csv");
    fs::write(
        &file,
        format!("{HEADER}\n0,Cell structure,Cells,Paper 1,Biology,GCSE,AQA,1,2,200.00,1.00,0.00\n"),
    )
    .unwrap();

    revise()
        .current_dir(dir.path())
        .arg("validate")
        .arg(&file)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("line #2"));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    revise()
        .current_dir(dir.path())
        .arg("validate")
        .arg("nonexistent.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn list_filters_and_sorts() {
    let dir = TempDir::new().unwrap();
    let file = write_questions(dir.path());

    revise()
        .current_dir(dir.path())
        .arg("list")
        .arg(&file)
        .arg("--keep")
        .arg("exam board=aqa")
        .arg("--sort")
        .arg("topic")
        .arg("--desc")
        .assert()
        .success()
        .stdout(predicate::str::contains("Newton's laws"))
        .stdout(predicate::str::contains("Bonding").not())
        .stdout(predicate::str::contains("2 of 3 questions, ordered by Topic (descending)"));
}

#[test]
fn run_records_answers_and_saves() {
    let dir = TempDir::new().unwrap();
    let file = write_questions(dir.path());

    revise()
        .current_dir(dir.path())
        .arg("run")
        .arg(&file)
        .arg("--mode")
        .arg("test")
        .write_stdin("y\nn\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1 of 3 (pass 1)"))
        .stdout(predicate::str::contains(
            "Attempted = 2; Correct = 1; Incorrect = 1; Percentage = 50.0",
        ))
        .stdout(predicate::str::contains("Saved 3 questions"));

    let content = fs::read_to_string(&file).unwrap();
    let rows: Vec<&str> = content.lines().collect();
    assert_eq!(rows[0], HEADER);
    assert!(rows[1].starts_with("0,Cell structure,Cells,Paper 1,Biology,GCSE,AQA,1,1,100.00,0.6666666666666666,"));
    assert!(rows[2].starts_with("1,Newton's laws,Forces,Paper 2,Physics,GCSE,AQA,1,0,0.00,0.6666666666666666,"));
    assert!(rows[3].starts_with("2,\"Ionic, covalent and metallic\",Bonding,"));
}

#[test]
fn dry_run_leaves_file_unchanged() {
    let dir = TempDir::new().unwrap();
    let file = write_questions(dir.path());
    let before = fs::read_to_string(&file).unwrap();

    revise()
        .current_dir(dir.path())
        .arg("run")
        .arg(&file)
        .arg("--rounds")
        .arg("2")
        .arg("--dry-run")
        .write_stdin("y\ny\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Finished after 2 rounds"))
        .stdout(predicate::str::contains("Dry run"));

    assert_eq!(fs::read_to_string(&file).unwrap(), before);
}

#[test]
fn run_with_empty_selection_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_questions(dir.path());

    revise()
        .current_dir(dir.path())
        .arg("run")
        .arg(&file)
        .arg("--keep")
        .arg("subject=Mathematics")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no questions available"));
}

#[test]
fn invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = write_questions(dir.path());
    fs::write(
        dir.path().join("revise.toml"),
        "[scoring]\npercentage_offset = 0.0\nabsolute_offset = 0.0\n",
    )
    .unwrap();

    revise()
        .current_dir(dir.path())
        .arg("list")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load settings"));
}

#[test]
fn list_range_and_breakdown() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("answered.csv");
    fs::write(
        &file,
        format!(
            "{HEADER}\n\
             0,Cell structure,Cells,Paper 1,Biology,GCSE,AQA,0,0,0.00,0.00,0.00\n\
             1,Newton's laws,Forces,Paper 2,Physics,GCSE,AQA,2,1,50.00,0.00,0.00\n\
             2,Moles,Amount of substance,Paper 1,Chemistry,GCSE,OCR,4,4,100.00,0.00,0.00\n"
        ),
    )
    .unwrap();

    revise()
        .current_dir(dir.path())
        .arg("list")
        .arg(&file)
        .arg("--range")
        .arg("attempted=1..")
        .arg("--breakdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("Newton's laws"))
        .stdout(predicate::str::contains("Moles"))
        .stdout(predicate::str::contains("Cell structure").not())
        .stdout(predicate::str::contains("Overdue"))
        .stdout(predicate::str::contains("2 of 3 questions"));

    revise()
        .current_dir(dir.path())
        .arg("list")
        .arg(&file)
        .arg("--range")
        .arg("attempted=3..1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid range"));
}

#[test]
fn attributes_describes_and_lists_values() {
    revise()
        .arg("attributes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Qualification level"))
        .stdout(predicate::str::contains("derived"));

    revise()
        .arg("attributes")
        .arg("exam board")
        .assert()
        .success()
        .stdout(predicate::str::contains("Edexcel"));

    revise()
        .arg("attributes")
        .arg("colour")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a question attribute"));
}
