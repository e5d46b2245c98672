use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::orientation::domain::{Dimension, ProfileCode, ProgramRecord, Question};
use crate::orientation::repository::{
    CompletedResult, InMemoryResultSink, InMemorySessionStore, ResultSink, ResultSinkError,
};
use crate::orientation::service::OrientationService;
use crate::orientation::session::{QuizSession, SessionId};

pub(super) fn profile(code: &str) -> ProfileCode {
    code.parse().expect("valid profile code")
}

pub(super) fn question(order: u32, dimension: Dimension) -> Question {
    Question {
        display_order: order,
        text: format!("Question {order} ({})", dimension.label()),
        translation: Some(format!("سؤال {order}")),
        dimension,
    }
}

/// One question per dimension in canonical order.
pub(super) fn questions() -> Vec<Question> {
    Dimension::ALL
        .iter()
        .enumerate()
        .map(|(index, dimension)| question(index as u32 + 1, *dimension))
        .collect()
}

pub(super) fn session() -> QuizSession {
    QuizSession::new(SessionId("quiz-test".to_string()), questions().into())
        .expect("non-empty questionnaire")
}

/// Catalog scored against an RIA profile: five programs at distance 0,
/// one at 3, one at 9, one at 15, and one unusable code.
pub(super) fn catalog() -> Vec<ProgramRecord> {
    vec![
        ProgramRecord::new("Informatique", "ISCAE", "RIA"),
        ProgramRecord::new("Génie civil", "ESP", "RIA"),
        ProgramRecord::new("Mathématiques", "FST", "RIA"),
        ProgramRecord::new("Physique", "FST", "RI"),
        ProgramRecord::new("Mécanique", "ESP", "R"),
        ProgramRecord::new("Architecture", "ESP", "RAI"),
        ProgramRecord::new("Gestion", "ISCAE", "CE"),
        ProgramRecord::new("Droit", "FacDroit", "SE"),
        ProgramRecord::new("Inconnu", "Nulle part", "XYZ"),
    ]
}

pub(super) fn build_service() -> (
    OrientationService<InMemorySessionStore, InMemoryResultSink>,
    InMemorySessionStore,
    InMemoryResultSink,
) {
    let sessions = InMemorySessionStore::default();
    let results = InMemoryResultSink::default();
    let service = OrientationService::new(
        questions(),
        catalog(),
        Arc::new(sessions.clone()),
        Arc::new(results.clone()),
    )
    .expect("service builds");
    (service, sessions, results)
}

#[derive(Default)]
pub(super) struct FailingSink;

impl ResultSink for FailingSink {
    fn persist_result(&self, _result: &CompletedResult) -> Result<(), ResultSinkError> {
        Err(ResultSinkError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body readable");
    serde_json::from_slice(&body).expect("valid json")
}
