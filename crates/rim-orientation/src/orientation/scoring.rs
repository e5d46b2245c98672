use super::domain::{AnswerWeight, Dimension, ProfileCode, ScoreMap};

/// Folds answer events into a [`ScoreMap`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreAccumulator {
    scores: ScoreMap,
    answers: usize,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_answer(&mut self, dimension: Dimension, weight: AnswerWeight) {
        self.scores.add(dimension, weight.points());
        self.answers += 1;
    }

    pub fn scores(&self) -> &ScoreMap {
        &self.scores
    }

    pub fn answers(&self) -> usize {
        self.answers
    }

    pub fn profile(&self) -> ProfileCode {
        compute_profile(&self.scores)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Ranks dimensions by score, highest first, breaking ties by canonical
/// R-I-A-S-E-C order, and returns the top three.
pub fn compute_profile(scores: &ScoreMap) -> ProfileCode {
    let mut ranked: Vec<(Dimension, u32)> = scores.entries().collect();
    ranked.sort_by(|(left_dim, left_score), (right_dim, right_score)| {
        right_score
            .cmp(left_score)
            .then_with(|| left_dim.rank().cmp(&right_dim.rank()))
    });

    match ProfileCode::new(ranked[0].0, ranked[1].0, ranked[2].0) {
        Some(profile) => profile,
        None => unreachable!("score map entries are six distinct dimensions"),
    }
}
