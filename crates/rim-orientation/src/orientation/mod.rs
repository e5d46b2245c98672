//! RIASEC quiz core: answer scoring, profile derivation, and program matching.
//!
//! [`scoring`] and [`matching`] are pure functions over explicit inputs. The
//! session, service and router layers wrap them with per-respondent state,
//! storage hooks and HTTP endpoints.

pub mod domain;
pub mod matching;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use domain::{
    AnswerWeight, Dimension, InvalidAnswerWeight, InvalidDimension, MatchResult, ProfileCode,
    ProgramCode, ProgramRecord, Question, ScoreMap,
};
pub use matching::{
    circular_distance, score_catalog, score_distance, select_top, ProgramMatcher,
    DEFAULT_MATCH_COUNT, LETTER_WEIGHTS, MAX_MATCH_COUNT,
};
pub use repository::{
    CompletedResult, InMemoryResultSink, InMemorySessionStore, ResultSink, ResultSinkError,
    SessionStore, SessionStoreError, DEFAULT_SESSION_IDLE_TIMEOUT,
};
pub use router::orientation_router;
pub use scoring::{compute_profile, ScoreAccumulator};
pub use service::{
    AnswerOutcome, MatchesView, OrientationService, OrientationServiceError, ProfileView,
    QuestionView, SessionView,
};
pub use session::{Progress, QuizSession, SessionError, SessionId};
