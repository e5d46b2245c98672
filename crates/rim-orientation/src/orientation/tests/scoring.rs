use super::common::*;
use crate::orientation::domain::{AnswerWeight, Dimension, ScoreMap};
use crate::orientation::scoring::{compute_profile, ScoreAccumulator};

fn scores(entries: &[(Dimension, u32)]) -> ScoreMap {
    entries.iter().copied().collect()
}

#[test]
fn equal_scores_resolve_in_canonical_order() {
    let map = scores(&[
        (Dimension::Realistic, 2),
        (Dimension::Investigative, 2),
        (Dimension::Artistic, 2),
    ]);

    assert_eq!(compute_profile(&map), profile("RIA"));
}

#[test]
fn empty_scores_yield_the_first_three_dimensions() {
    assert_eq!(compute_profile(&ScoreMap::new()), profile("RIA"));
}

#[test]
fn higher_scores_win_over_canonical_order() {
    let map = scores(&[
        (Dimension::Conventional, 5),
        (Dimension::Enterprising, 5),
        (Dimension::Social, 1),
    ]);

    assert_eq!(compute_profile(&map), profile("ECS"));
}

#[test]
fn zero_scores_fill_remaining_slots_canonically() {
    let map = scores(&[(Dimension::Realistic, 4), (Dimension::Investigative, 3)]);

    assert_eq!(compute_profile(&map), profile("RIA"));
}

#[test]
fn profile_does_not_depend_on_answer_order() {
    let answers = [
        (Dimension::Social, AnswerWeight::ALot),
        (Dimension::Artistic, AnswerWeight::ALittle),
        (Dimension::Social, AnswerWeight::ALittle),
        (Dimension::Conventional, AnswerWeight::ALot),
        (Dimension::Artistic, AnswerWeight::ALot),
        (Dimension::Realistic, AnswerWeight::NotAtAll),
    ];

    let mut forward = ScoreAccumulator::new();
    for (dimension, weight) in answers {
        forward.record_answer(dimension, weight);
    }
    let mut backward = ScoreAccumulator::new();
    for (dimension, weight) in answers.iter().rev() {
        backward.record_answer(*dimension, *weight);
    }

    assert_eq!(forward.scores(), backward.scores());
    assert_eq!(forward.profile(), backward.profile());
    // S=3, A=3 tie broken by canonical order, then C=2.
    assert_eq!(forward.profile(), profile("ASC"));
}

#[test]
fn not_at_all_counts_as_answered_without_points() {
    let mut accumulator = ScoreAccumulator::new();
    accumulator.record_answer(Dimension::Enterprising, AnswerWeight::NotAtAll);

    assert_eq!(accumulator.answers(), 1);
    assert_eq!(accumulator.scores().total(), 0);
}

#[test]
fn reset_clears_scores_and_answers() {
    let mut accumulator = ScoreAccumulator::new();
    accumulator.record_answer(Dimension::Investigative, AnswerWeight::ALot);
    accumulator.reset();

    assert_eq!(accumulator, ScoreAccumulator::new());
    assert!(accumulator.scores().entries().all(|(_, points)| points == 0));
}

#[test]
fn score_map_always_lists_six_dimensions() {
    let map = scores(&[(Dimension::Social, 7)]);
    let entries: Vec<_> = map.entries().collect();

    assert_eq!(entries.len(), 6);
    assert_eq!(entries[3], (Dimension::Social, 7));
}

#[test]
fn score_map_serializes_as_letter_keyed_object() {
    let map = scores(&[(Dimension::Realistic, 4), (Dimension::Investigative, 3)]);
    let value = serde_json::to_value(map).expect("serializes");

    assert_eq!(
        value,
        serde_json::json!({"R": 4, "I": 3, "A": 0, "S": 0, "E": 0, "C": 0})
    );
    let back: ScoreMap = serde_json::from_value(value).expect("deserializes");
    assert_eq!(back, map);
}
