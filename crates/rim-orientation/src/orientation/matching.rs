use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use super::domain::{Dimension, MatchResult, ProfileCode, ProgramCode, ProgramRecord};

pub const DEFAULT_MATCH_COUNT: usize = 5;

/// Largest suggestion count a caller may request over HTTP.
pub const MAX_MATCH_COUNT: usize = 100;

/// Per-position weights: first code letter against the dominant profile
/// letter, and so on.
pub const LETTER_WEIGHTS: [u32; 3] = [3, 2, 1];

/// Distance between two dimensions around the RIASEC hexagon, in `0..=3`.
pub fn circular_distance(a: Dimension, b: Dimension) -> u32 {
    let diff = a.rank().abs_diff(b.rank()) as u32;
    diff.min(Dimension::ALL.len() as u32 - diff)
}

/// Weighted distance of a program code from a profile. Positions the code
/// does not supply contribute nothing.
pub fn score_distance(code: &ProgramCode, profile: &ProfileCode) -> u32 {
    code.letters()
        .iter()
        .zip(profile.letters())
        .zip(LETTER_WEIGHTS)
        .map(|((letter, target), weight)| circular_distance(*letter, target) * weight)
        .sum()
}

/// Scores every record with a valid code. Invalid codes are skipped.
pub fn score_catalog(records: &[ProgramRecord], profile: &ProfileCode) -> Vec<MatchResult> {
    records
        .iter()
        .filter_map(|record| {
            let Some(code) = record.parsed_code() else {
                debug!(
                    name = %record.name,
                    institution = %record.institution,
                    code = %record.code,
                    "skipping program with invalid RIASEC code"
                );
                return None;
            };
            let distance = score_distance(&code, profile);
            Some(MatchResult {
                name: record.name.clone(),
                institution: record.institution.clone(),
                code,
                distance,
            })
        })
        .collect()
}

/// Picks up to `count` results, closest tier first. Duplicated
/// `(name, institution)` pairs keep their lowest distance. Order inside a
/// tier comes from a ChaCha stream keyed by `seed` and the tier distance, so
/// the same seed always reproduces the same list.
pub fn select_top(candidates: Vec<MatchResult>, count: usize, seed: u64) -> Vec<MatchResult> {
    if count == 0 {
        return Vec::new();
    }

    let mut unique: BTreeMap<(String, String), MatchResult> = BTreeMap::new();
    for candidate in candidates {
        match unique.entry((candidate.name.clone(), candidate.institution.clone())) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            Entry::Occupied(mut slot) => {
                if candidate.distance < slot.get().distance {
                    slot.insert(candidate);
                }
            }
        }
    }

    let unique_len = unique.len();
    let mut tiers: BTreeMap<u32, Vec<MatchResult>> = BTreeMap::new();
    for candidate in unique.into_values() {
        tiers.entry(candidate.distance).or_default().push(candidate);
    }

    let mut selected = Vec::with_capacity(count.min(unique_len));
    for (distance, mut tier) in tiers {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        rng.set_stream(u64::from(distance));
        tier.shuffle(&mut rng);

        let needed = count - selected.len();
        selected.extend(tier.into_iter().take(needed));
        if selected.len() == count {
            break;
        }
    }

    selected
}

/// Read-only view over a program catalog.
#[derive(Debug, Clone)]
pub struct ProgramMatcher<'a> {
    catalog: &'a [ProgramRecord],
}

impl<'a> ProgramMatcher<'a> {
    pub fn new(catalog: &'a [ProgramRecord]) -> Self {
        Self { catalog }
    }

    pub fn matches(&self, profile: &ProfileCode, count: usize, seed: u64) -> Vec<MatchResult> {
        select_top(score_catalog(self.catalog, profile), count, seed)
    }
}
