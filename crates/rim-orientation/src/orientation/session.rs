use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::{
    AnswerWeight, Dimension, MatchResult, ProfileCode, ProgramRecord, Question, ScoreMap,
};
use super::matching::ProgramMatcher;
use super::scoring::ScoreAccumulator;

/// Identifier handed to the presentation layer for an in-progress quiz.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("the questionnaire has no questions")]
    EmptyQuestionnaire,
    #[error("every question has already been answered")]
    QuizComplete,
    #[error("answered {answered} of {total} questions; finish the quiz first")]
    Incomplete { answered: usize, total: usize },
    #[error("expected an answer for dimension {expected}, got {actual}")]
    DimensionMismatch {
        expected: Dimension,
        actual: Dimension,
    },
}

/// One respondent's walk through the questionnaire. Owns its scores; the
/// question list is shared read-only between sessions.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: SessionId,
    questions: Arc<[Question]>,
    accumulator: ScoreAccumulator,
    seed: u64,
    revision: u64,
}

impl QuizSession {
    pub fn new(id: SessionId, questions: Arc<[Question]>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyQuestionnaire);
        }

        Ok(Self {
            id,
            questions,
            accumulator: ScoreAccumulator::new(),
            seed: 0,
            revision: 0,
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn answered(&self) -> usize {
        self.accumulator.answers()
    }

    pub fn is_complete(&self) -> bool {
        self.answered() >= self.total_questions()
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Next unanswered question, or `None` once the quiz is complete.
    pub fn current_question(&self) -> Option<&Question> {
        self.question(self.answered())
    }

    /// Records `weight` for the current question. The dimension must be the
    /// current question's dimension.
    pub fn record_answer(
        &mut self,
        dimension: Dimension,
        weight: AnswerWeight,
    ) -> Result<Progress, SessionError> {
        let expected = self
            .current_question()
            .map(|question| question.dimension)
            .ok_or(SessionError::QuizComplete)?;
        if expected != dimension {
            return Err(SessionError::DimensionMismatch {
                expected,
                actual: dimension,
            });
        }

        self.accumulator.record_answer(dimension, weight);
        Ok(self.progress())
    }

    /// Answers the current question, whatever its dimension.
    pub fn answer(&mut self, weight: AnswerWeight) -> Result<Progress, SessionError> {
        let dimension = self
            .current_question()
            .map(|question| question.dimension)
            .ok_or(SessionError::QuizComplete)?;
        self.record_answer(dimension, weight)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            answered: self.answered(),
            total: self.total_questions(),
        }
    }

    pub fn scores(&self) -> &ScoreMap {
        self.accumulator.scores()
    }

    pub fn compute_profile(&self) -> Result<ProfileCode, SessionError> {
        if !self.is_complete() {
            return Err(SessionError::Incomplete {
                answered: self.answered(),
                total: self.total_questions(),
            });
        }
        Ok(self.accumulator.profile())
    }

    pub fn get_matches(
        &self,
        catalog: &[ProgramRecord],
        count: usize,
        seed: u64,
    ) -> Result<Vec<MatchResult>, SessionError> {
        let profile = self.compute_profile()?;
        Ok(ProgramMatcher::new(catalog).matches(&profile, count, seed))
    }

    /// Seed used for the "other suggestions" view.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn regenerate(&mut self) -> u64 {
        self.seed = self.seed.wrapping_add(1);
        self.seed
    }

    /// Write counter maintained by the session store.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_revision(&mut self, revision: u64) {
        self.revision = revision;
    }

    pub fn reset(&mut self) {
        self.accumulator.reset();
        self.seed = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.answered >= self.total
    }
}
