use std::sync::Arc;

use revise_core::model::{QuestionAttribute, QuestionAttributes};
use revise_core::{Question, QuestionList, ScoringConfig};
use services::time::fixed_clock;
use services::{QuestionFilter, RunType, SessionLoopService, Settings};
use storage::{CsvQuestionFile, DerivedValuePolicy, InMemoryRepository, QuestionRepository};

fn build_question(index: u32, subject: &str) -> Question {
    let attributes = QuestionAttributes::new(
        &format!("Q{index}"),
        "Mixed",
        "Paper 1",
        subject,
        "GCSE",
        "AQA",
    )
    .unwrap();
    Question::new(index, attributes)
}

fn seed() -> QuestionList {
    QuestionList::new(vec![
        build_question(0, "Biology"),
        build_question(1, "Physics"),
        build_question(2, "Biology"),
    ])
}

#[test]
fn filtered_session_writes_back_only_the_pool() {
    let repo = InMemoryRepository::with_questions(seed());
    let loop_svc = SessionLoopService::new(Settings::default(), Arc::new(repo.clone()))
        .with_clock(fixed_clock());

    let mut all = loop_svc.load().unwrap();
    let filter = QuestionFilter::new()
        .keep(QuestionAttribute::Subject, &["biology"])
        .unwrap();
    let mut session = loop_svc
        .start_session(&all, &filter, Some(RunType::Test), Some(false))
        .unwrap();
    assert_eq!(session.pool_size(), 2);

    while session.rounds() < 2 {
        session.answer_current(true).unwrap();
    }
    let summary = loop_svc.finish_session(&mut all, session, true).unwrap();
    assert_eq!(summary.rounds, 2);
    assert_eq!(summary.stats.correct(), 2);
    assert!(summary.is_finished());

    let saved = repo.load(&ScoringConfig::default()).unwrap();
    let attempted: Vec<u32> = saved.iter().map(Question::attempted).collect();
    assert_eq!(attempted, vec![1, 0, 1]);
    let physics = saved.get(1).unwrap();
    assert_eq!(physics.expected_times_asked(), 0.0);
    assert_eq!(saved.get(0).unwrap().expected_times_asked(), 1.0);
}

#[test]
fn dry_run_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("questions.csv");
    let file = CsvQuestionFile::new(&path).with_policy(DerivedValuePolicy::Reject);
    file.save(&seed()).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    let loop_svc = SessionLoopService::new(Settings::default(), Arc::new(file));
    let mut all = loop_svc.load().unwrap();
    let mut session = loop_svc
        .start_session(&all, &QuestionFilter::new(), None, None)
        .unwrap();
    session.answer_current(false).unwrap();
    loop_svc.finish_session(&mut all, session, false).unwrap();

    assert_eq!(all.iter().map(Question::attempted).sum::<u32>(), 1);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn empty_selection_cannot_start() {
    let loop_svc = SessionLoopService::new(
        Settings::default(),
        Arc::new(InMemoryRepository::with_questions(seed())),
    );
    let all = loop_svc.load().unwrap();
    let filter = QuestionFilter::new()
        .keep(QuestionAttribute::Subject, &["Chemistry"])
        .unwrap();
    assert!(matches!(
        loop_svc.start_session(&all, &filter, None, None),
        Err(services::SessionError::Empty)
    ));
}
