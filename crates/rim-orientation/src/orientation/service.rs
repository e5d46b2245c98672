use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    AnswerWeight, Dimension, MatchResult, ProfileCode, ProgramRecord, Question, ScoreMap,
};
use super::matching::{ProgramMatcher, DEFAULT_MATCH_COUNT};
use super::repository::{CompletedResult, ResultSink, SessionStore, SessionStoreError};
use super::scoring::compute_profile;
use super::session::{Progress, QuizSession, SessionError, SessionId};

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("quiz-{id:06}"))
}

/// Service composing the question set, program catalog, session store and
/// result sink.
pub struct OrientationService<S, P> {
    questions: Arc<[Question]>,
    programs: Arc<[ProgramRecord]>,
    sessions: Arc<S>,
    results: Arc<P>,
    match_count: usize,
}

impl<S, P> OrientationService<S, P>
where
    S: SessionStore + 'static,
    P: ResultSink + 'static,
{
    pub fn new(
        questions: Vec<Question>,
        programs: Vec<ProgramRecord>,
        sessions: Arc<S>,
        results: Arc<P>,
    ) -> Result<Self, OrientationServiceError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyQuestionnaire.into());
        }

        Ok(Self {
            questions: questions.into(),
            programs: programs.into(),
            sessions,
            results,
            match_count: DEFAULT_MATCH_COUNT,
        })
    }

    pub fn with_match_count(mut self, match_count: usize) -> Self {
        self.match_count = match_count;
        self
    }

    pub fn match_count(&self) -> usize {
        self.match_count
    }

    pub fn programs(&self) -> &[ProgramRecord] {
        &self.programs
    }

    /// Open a fresh session positioned on the first question.
    pub fn start(&self) -> Result<SessionView, OrientationServiceError> {
        let session = QuizSession::new(next_session_id(), self.questions.clone())?;
        let view = SessionView::from_session(&session);
        self.sessions.insert(session)?;
        info!(
            session_id = %view.session_id,
            total = view.progress.total,
            "quiz session started"
        );
        Ok(view)
    }

    pub fn current(&self, id: &SessionId) -> Result<SessionView, OrientationServiceError> {
        let session = self.load(id)?;
        Ok(SessionView::from_session(&session))
    }

    /// Record an answer for the current question. The answer that completes
    /// the quiz also persists the final profile; a persistence failure is
    /// reported in the outcome rather than failing the call.
    pub fn answer(
        &self,
        id: &SessionId,
        weight: AnswerWeight,
    ) -> Result<AnswerOutcome, OrientationServiceError> {
        let mut session = self.load(id)?;
        let progress = session.answer(weight)?;
        self.sessions.update(session.clone())?;

        let mut profile = None;
        let mut persistence_warning = None;
        if progress.is_complete() {
            let code = session.compute_profile()?;
            info!(session_id = %id, profile = %code, "quiz completed");
            if let Err(err) = self
                .results
                .persist_result(&CompletedResult::new(id.clone(), code))
            {
                warn!(session_id = %id, error = %err, "failed to persist quiz result");
                persistence_warning = Some(format!("result could not be saved: {err}"));
            }
            profile = Some(code);
        }

        Ok(AnswerOutcome {
            session_id: id.clone(),
            progress,
            next_question: session.current_question().map(|question| {
                QuestionView::new(question, progress.answered, progress.total)
            }),
            profile,
            persistence_warning,
        })
    }

    pub fn profile(&self, id: &SessionId) -> Result<ProfileView, OrientationServiceError> {
        let session = self.load(id)?;
        let profile = session.compute_profile()?;
        Ok(ProfileView::new(id.clone(), profile, *session.scores()))
    }

    /// Top matches for the session's current seed.
    pub fn matches(&self, id: &SessionId) -> Result<MatchesView, OrientationServiceError> {
        let session = self.load(id)?;
        self.matches_for(&session)
    }

    /// Bump the session seed so equal-distance programs come back in a new
    /// order.
    pub fn regenerate(&self, id: &SessionId) -> Result<MatchesView, OrientationServiceError> {
        let mut session = self.load(id)?;
        session.compute_profile()?;
        let seed = session.regenerate();
        self.sessions.update(session.clone())?;
        info!(session_id = %id, seed, "regenerating suggestions");
        self.matches_for(&session)
    }

    pub fn reset(&self, id: &SessionId) -> Result<SessionView, OrientationServiceError> {
        let mut session = self.load(id)?;
        session.reset();
        self.sessions.update(session.clone())?;
        info!(session_id = %id, "quiz session reset");
        Ok(SessionView::from_session(&session))
    }

    /// Drop a session from the store once the respondent is done with it.
    pub fn close(&self, id: &SessionId) -> Result<(), OrientationServiceError> {
        self.sessions.remove(id)?;
        info!(session_id = %id, "quiz session closed");
        Ok(())
    }

    /// Stateless variant used when the caller already holds final scores.
    pub fn evaluate_scores(
        &self,
        scores: ScoreMap,
        count: Option<usize>,
        seed: u64,
    ) -> MatchesView {
        let profile = compute_profile(&scores);
        let count = count.unwrap_or(self.match_count);
        MatchesView {
            session_id: None,
            profile,
            scores,
            seed,
            matches: ProgramMatcher::new(&self.programs).matches(&profile, count, seed),
        }
    }

    fn matches_for(&self, session: &QuizSession) -> Result<MatchesView, OrientationServiceError> {
        let profile = session.compute_profile()?;
        let seed = session.seed();
        let matches = session.get_matches(&self.programs, self.match_count, seed)?;
        Ok(MatchesView {
            session_id: Some(session.id().clone()),
            profile,
            scores: *session.scores(),
            seed,
            matches,
        })
    }

    fn load(&self, id: &SessionId) -> Result<QuizSession, OrientationServiceError> {
        let session = self
            .sessions
            .fetch(id)?
            .ok_or(SessionStoreError::NotFound)?;
        Ok(session)
    }
}

/// Question as shown to the respondent; `number` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub number: usize,
    pub total: usize,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    pub dimension: Dimension,
}

impl QuestionView {
    pub fn new(question: &Question, index: usize, total: usize) -> Self {
        Self {
            number: index + 1,
            total,
            text: question.text.clone(),
            translation: question.translation.clone(),
            dimension: question.dimension,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub progress: Progress,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
}

impl SessionView {
    pub fn from_session(session: &QuizSession) -> Self {
        let progress = session.progress();
        Self {
            session_id: session.id().clone(),
            progress,
            complete: session.is_complete(),
            question: session
                .current_question()
                .map(|question| QuestionView::new(question, progress.answered, progress.total)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub session_id: SessionId,
    pub progress: Progress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence_warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileView {
    pub session_id: SessionId,
    pub profile: ProfileCode,
    pub labels: Vec<&'static str>,
    pub scores: ScoreMap,
}

impl ProfileView {
    pub fn new(session_id: SessionId, profile: ProfileCode, scores: ScoreMap) -> Self {
        Self {
            session_id,
            profile,
            labels: profile
                .letters()
                .iter()
                .map(|dimension| dimension.label())
                .collect(),
            scores,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchesView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    pub profile: ProfileCode,
    pub scores: ScoreMap,
    pub seed: u64,
    pub matches: Vec<MatchResult>,
}

/// Error raised by the orientation service.
#[derive(Debug, thiserror::Error)]
pub enum OrientationServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Store(#[from] SessionStoreError),
}
