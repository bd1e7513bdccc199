use std::fs;

use revise_core::model::{NumericCheck, Question, QuestionAttributes, QuestionError};
use revise_core::scoring::round_2dp;
use revise_core::{QuestionList, ScoringConfig, calculate_likelihood};
use storage::{
    COLUMN_HEADERS, CsvQuestionFile, DerivedValuePolicy, QuestionRepository, RowError,
    StorageError,
};
use tempfile::tempdir;

fn build_question(index: u32, title: &str) -> Question {
    let attributes =
        QuestionAttributes::new(title, "Cell biology", "Paper 1", "Biology", "GCSE", "AQA")
            .unwrap();
    Question::new(index, attributes)
}

#[test]
fn answered_questions_survive_a_save_and_strict_reload() {
    let dir = tempdir().unwrap();
    let file = CsvQuestionFile::new(dir.path().join("questions.csv"))
        .with_policy(DerivedValuePolicy::Reject);
    let config = ScoringConfig::default();

    let mut list = QuestionList::new(vec![
        build_question(0, "Cells, tissues and organs"),
        build_question(1, "The \"powerhouse\" of the cell"),
    ]);
    list.record_answer(0, true, &config).unwrap();
    list.record_answer(0, false, &config).unwrap();
    list.record_answer(1, true, &config).unwrap();
    file.save(&list).unwrap();

    let loaded = file.load(&config).unwrap();
    assert_eq!(loaded.len(), 2);

    let first = loaded.get(0).unwrap();
    assert_eq!(first.title(), "Cells, tissues and organs");
    assert_eq!(first.attempted(), 2);
    assert_eq!(first.correct(), 1);
    assert_eq!(first.percentage(), 50.0);
    assert_eq!(first.expected_times_asked(), 1.5);

    let second = loaded.get(1).unwrap();
    assert_eq!(second.title(), "The \"powerhouse\" of the cell");
    assert_eq!(second.percentage(), 100.0);
    assert_eq!(
        second.likelihood(),
        calculate_likelihood(1, 100.0, 1.5, &config)
    );

    for (saved, reloaded) in list.iter().zip(loaded.iter()) {
        assert!(saved.same_identity(reloaded));
    }
}

#[test]
fn thirds_of_a_pool_survive_a_save_and_strict_reload() {
    let dir = tempdir().unwrap();
    let file = CsvQuestionFile::new(dir.path().join("questions.csv"))
        .with_policy(DerivedValuePolicy::Reject);
    let config = ScoringConfig::default();

    let mut list = QuestionList::new(vec![
        build_question(0, "Osmosis"),
        build_question(1, "Diffusion"),
        build_question(2, "Active transport"),
    ]);
    for (position, was_correct) in [
        (0, true),
        (1, false),
        (0, true),
        (0, false),
        (2, true),
        (1, true),
        (0, true),
        (2, false),
        (0, true),
    ] {
        list.record_answer(position, was_correct, &config).unwrap();
        file.save(&list).unwrap();
        let loaded = file.load(&config).unwrap();
        assert_eq!(loaded.len(), 3);
        for (saved, reloaded) in list.iter().zip(loaded.iter()) {
            assert!(saved.same_identity(reloaded));
            assert_eq!(saved.attempted(), reloaded.attempted());
            assert_eq!(saved.correct(), reloaded.correct());
            assert_eq!(saved.expected_times_asked(), reloaded.expected_times_asked());
            assert_eq!(round_2dp(saved.likelihood()), round_2dp(reloaded.likelihood()));
        }
    }
    assert_eq!(list.get(0).unwrap().attempted(), 5);
}

#[test]
fn saved_file_starts_with_column_headers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("questions.csv");
    let file = CsvQuestionFile::new(&path);

    file.save(&QuestionList::new(vec![build_question(3, "Osmosis")]))
        .unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some(COLUMN_HEADERS));
    assert_eq!(
        lines.next(),
        Some("3,Osmosis,Cell biology,Paper 1,Biology,GCSE,AQA,0,0,0.00,0.00,0.00")
    );
    assert_eq!(lines.next(), None);
    assert!(content.ends_with('\n'));
}

#[test]
fn stale_likelihood_is_recomputed_or_rejected_by_policy() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("questions.csv");
    fs::write(
        &path,
        format!("{COLUMN_HEADERS}\n0,Osmosis,Cell biology,Paper 1,Biology,GCSE,AQA,1,1,100.00,1.00,99.00\n"),
    )
    .unwrap();
    let config = ScoringConfig::default();

    let lenient = CsvQuestionFile::new(&path);
    assert_eq!(lenient.policy(), DerivedValuePolicy::Recompute);
    let loaded = lenient.load(&config).unwrap();
    assert_eq!(
        loaded.get(0).unwrap().likelihood(),
        calculate_likelihood(1, 100.0, 1.0, &config)
    );

    let strict = CsvQuestionFile::new(&path).with_policy(DerivedValuePolicy::Reject);
    let err = strict.load(&config).unwrap_err();
    match err {
        StorageError::Row {
            line_number,
            source: RowError::Question(QuestionError::InvalidNumericAttribute { check, .. }),
            ..
        } => {
            assert_eq!(line_number, 2);
            assert_eq!(check, NumericCheck::DerivedMismatch);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_rows_report_their_line_number() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("questions.csv");
    fs::write(
        &path,
        format!(
            "{COLUMN_HEADERS}\n\
             0,Osmosis,Cell biology,Paper 1,Biology,GCSE,AQA,0,0,0.00,0.00,0.00\n\
             1,Diffusion,Cell biology,Paper 1,Biology,GCSE,AQA,1,2,200.00,1.00,0.00\n"
        ),
    )
    .unwrap();

    let err = CsvQuestionFile::new(&path)
        .load(&ScoringConfig::default())
        .unwrap_err();
    match err {
        StorageError::Row {
            line_number,
            line,
            source: RowError::Question(QuestionError::InvalidNumericAttribute { check, .. }),
        } => {
            assert_eq!(line_number, 3);
            assert!(line.starts_with("1,Diffusion"));
            assert_eq!(check, NumericCheck::CorrectExceedsAttempted);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_exam_board_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("questions.csv");
    fs::write(
        &path,
        format!("{COLUMN_HEADERS}\n0,Osmosis,Cell biology,Paper 1,Biology,GCSE,Nowhere,0,0,0.00,0.00,0.00\n"),
    )
    .unwrap();

    let err = CsvQuestionFile::new(&path)
        .load(&ScoringConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Row {
            line_number: 2,
            source: RowError::Question(QuestionError::InvalidAttribute { .. }),
            ..
        }
    ));
}

#[test]
fn missing_file_and_bad_header_are_distinct_errors() {
    let dir = tempdir().unwrap();
    let missing = CsvQuestionFile::new(dir.path().join("absent.csv"));
    assert!(matches!(
        missing.load(&ScoringConfig::default()),
        Err(StorageError::NotFound { .. })
    ));

    let path = dir.path().join("headers.csv");
    fs::write(&path, "Index,Title,Topic\n").unwrap();
    assert!(matches!(
        CsvQuestionFile::new(&path).load(&ScoringConfig::default()),
        Err(StorageError::Header { .. })
    ));
}
