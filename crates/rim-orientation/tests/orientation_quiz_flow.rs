//! End-to-end quiz runs over the bundled catalogs, through the public service
//! facade and the CSV result log.

use std::io::Cursor;
use std::sync::Arc;

use rim_orientation::catalog::{CsvResultSink, ProgramCatalog, QuestionCatalog};
use rim_orientation::orientation::{
    AnswerWeight, Dimension, InMemorySessionStore, OrientationService, ProgramMatcher,
    ProfileCode, ProgramRecord, QuizSession, SessionId,
};

const QUESTIONS: &[u8] = include_bytes!("../../../data/questions.csv");
const PROGRAMS: &[u8] = include_bytes!("../../../data/programs.csv");

fn weight_for(dimension: Dimension) -> AnswerWeight {
    match dimension {
        Dimension::Realistic => AnswerWeight::ALot,
        Dimension::Investigative => AnswerWeight::ALittle,
        _ => AnswerWeight::NotAtAll,
    }
}

fn programs() -> Vec<ProgramRecord> {
    ProgramCatalog::from_reader(Cursor::new(PROGRAMS)).expect("programs parse")
}

#[test]
fn realistic_respondent_gets_technical_programs() {
    let questions = QuestionCatalog::from_reader(Cursor::new(QUESTIONS)).expect("questions parse");
    let mut session = QuizSession::new(SessionId("quiz-flow".to_string()), questions.into())
        .expect("session starts");

    while let Some(dimension) = session.current_question().map(|question| question.dimension) {
        session
            .record_answer(dimension, weight_for(dimension))
            .expect("answer accepted");
    }

    assert_eq!(session.scores().get(Dimension::Realistic), 6);
    assert_eq!(session.scores().get(Dimension::Investigative), 3);
    let profile = session.compute_profile().expect("complete");
    assert_eq!(profile.to_string(), "RIA");

    let matches = session.get_matches(&programs(), 5, 0).expect("complete");
    let distances: Vec<u32> = matches.iter().map(|m| m.distance).collect();
    assert_eq!(distances, vec![1, 2, 2, 3, 3]);
    assert_eq!(matches[0].name, "Agronomie");
    assert!(matches[1..3]
        .iter()
        .all(|m| m.name == "Génie électrique" || m.name == "Pêche et océanographie"));
}

#[test]
fn duplicate_and_unusable_rows_never_surface() {
    let profile: ProfileCode = "IRC".parse().expect("valid profile");
    let catalog = programs();

    let matches = ProgramMatcher::new(&catalog).matches(&profile, 100, 3);

    assert_eq!(matches.len(), 28);
    let informatique = matches
        .iter()
        .filter(|m| m.name == "Informatique")
        .count();
    assert_eq!(informatique, 1);
    assert_eq!(matches[0].name, "Informatique");
    assert_eq!(matches[0].distance, 0);
    assert!(matches.iter().all(|m| m.name != "Tourisme et hôtellerie"));
    assert!(matches
        .windows(2)
        .all(|pair| pair[0].distance <= pair[1].distance));
}

#[test]
fn completed_quiz_is_logged_to_csv() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("results.csv");
    let questions = QuestionCatalog::from_reader(Cursor::new(QUESTIONS)).expect("questions parse");
    let service = OrientationService::new(
        questions,
        programs(),
        Arc::new(InMemorySessionStore::default()),
        Arc::new(CsvResultSink::new(&path)),
    )
    .expect("service builds");

    let mut view = service.start().expect("session starts");
    let id = view.session_id.clone();
    while let Some(question) = view.question.take() {
        let outcome = service
            .answer(&id, weight_for(question.dimension))
            .expect("answer accepted");
        assert!(outcome.persistence_warning.is_none());
        view.question = outcome.next_question;
    }

    let logged = std::fs::read_to_string(&path).expect("results written");
    let lines: Vec<&str> = logged.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with(&format!("{id},RIA,")));

    let first = service.matches(&id).expect("matches");
    let second = service.regenerate(&id).expect("regenerated");
    assert_eq!(second.seed, first.seed + 1);
    let tiers = |view: &rim_orientation::orientation::MatchesView| {
        view.matches.iter().map(|m| m.distance).collect::<Vec<_>>()
    };
    assert_eq!(tiers(&first), tiers(&second));
}
