use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

use super::domain::{AnswerWeight, ScoreMap};
use super::matching::MAX_MATCH_COUNT;
use super::repository::{ResultSink, SessionStore};
use super::service::{AnswerOutcome, MatchesView, OrientationService, ProfileView, SessionView};
use super::session::SessionId;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerRequest {
    pub(crate) weight: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoresRequest {
    pub(crate) scores: ScoreMap,
    #[serde(default)]
    pub(crate) seed: u64,
    #[serde(default)]
    pub(crate) count: Option<usize>,
}

/// Router builder exposing the quiz and matching endpoints.
pub fn orientation_router<S, P>(service: Arc<OrientationService<S, P>>) -> Router
where
    S: SessionStore + 'static,
    P: ResultSink + 'static,
{
    Router::new()
        .route("/api/v1/orientation/sessions", post(start_handler::<S, P>))
        .route(
            "/api/v1/orientation/sessions/:session_id",
            delete(close_handler::<S, P>),
        )
        .route(
            "/api/v1/orientation/sessions/:session_id/question",
            get(question_handler::<S, P>),
        )
        .route(
            "/api/v1/orientation/sessions/:session_id/answers",
            post(answer_handler::<S, P>),
        )
        .route(
            "/api/v1/orientation/sessions/:session_id/profile",
            get(profile_handler::<S, P>),
        )
        .route(
            "/api/v1/orientation/sessions/:session_id/matches",
            get(matches_handler::<S, P>),
        )
        .route(
            "/api/v1/orientation/sessions/:session_id/regenerate",
            post(regenerate_handler::<S, P>),
        )
        .route(
            "/api/v1/orientation/sessions/:session_id/reset",
            post(reset_handler::<S, P>),
        )
        .route("/api/v1/orientation/profile", post(scores_handler::<S, P>))
        .with_state(service)
}

pub(crate) async fn start_handler<S, P>(
    State(service): State<Arc<OrientationService<S, P>>>,
) -> Result<(StatusCode, Json<SessionView>), AppError>
where
    S: SessionStore + 'static,
    P: ResultSink + 'static,
{
    let view = service.start()?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub(crate) async fn close_handler<S, P>(
    State(service): State<Arc<OrientationService<S, P>>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError>
where
    S: SessionStore + 'static,
    P: ResultSink + 'static,
{
    service.close(&SessionId(session_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn question_handler<S, P>(
    State(service): State<Arc<OrientationService<S, P>>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, AppError>
where
    S: SessionStore + 'static,
    P: ResultSink + 'static,
{
    Ok(Json(service.current(&SessionId(session_id))?))
}

pub(crate) async fn answer_handler<S, P>(
    State(service): State<Arc<OrientationService<S, P>>>,
    Path(session_id): Path<String>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerOutcome>, AppError>
where
    S: SessionStore + 'static,
    P: ResultSink + 'static,
{
    let weight = AnswerWeight::try_from(request.weight)
        .map_err(|err| AppError::InvalidRequest(err.to_string()))?;
    Ok(Json(service.answer(&SessionId(session_id), weight)?))
}

pub(crate) async fn profile_handler<S, P>(
    State(service): State<Arc<OrientationService<S, P>>>,
    Path(session_id): Path<String>,
) -> Result<Json<ProfileView>, AppError>
where
    S: SessionStore + 'static,
    P: ResultSink + 'static,
{
    Ok(Json(service.profile(&SessionId(session_id))?))
}

pub(crate) async fn matches_handler<S, P>(
    State(service): State<Arc<OrientationService<S, P>>>,
    Path(session_id): Path<String>,
) -> Result<Json<MatchesView>, AppError>
where
    S: SessionStore + 'static,
    P: ResultSink + 'static,
{
    Ok(Json(service.matches(&SessionId(session_id))?))
}

pub(crate) async fn regenerate_handler<S, P>(
    State(service): State<Arc<OrientationService<S, P>>>,
    Path(session_id): Path<String>,
) -> Result<Json<MatchesView>, AppError>
where
    S: SessionStore + 'static,
    P: ResultSink + 'static,
{
    Ok(Json(service.regenerate(&SessionId(session_id))?))
}

pub(crate) async fn reset_handler<S, P>(
    State(service): State<Arc<OrientationService<S, P>>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, AppError>
where
    S: SessionStore + 'static,
    P: ResultSink + 'static,
{
    Ok(Json(service.reset(&SessionId(session_id))?))
}

pub(crate) async fn scores_handler<S, P>(
    State(service): State<Arc<OrientationService<S, P>>>,
    Json(request): Json<ScoresRequest>,
) -> Result<Json<MatchesView>, AppError>
where
    S: SessionStore + 'static,
    P: ResultSink + 'static,
{
    if let Some(count) = request.count {
        if count == 0 || count > MAX_MATCH_COUNT {
            return Err(AppError::InvalidRequest(format!(
                "count must be between 1 and {MAX_MATCH_COUNT}, got {count}"
            )));
        }
    }

    Ok(Json(service.evaluate_scores(
        request.scores,
        request.count,
        request.seed,
    )))
}
