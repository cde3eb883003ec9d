//! Joins shallow and deep scores into per-depth-pair observation sets.
//!
//! A score pair is only meaningful when both searches ran on the same
//! position, i.e. in the same game at the same phase. The aggregator
//! therefore groups one phase's samples by game and, per configured
//! depth pair, joins the score recorded at the deep depth with the
//! score recorded at the shallow depth within that game. Games
//! missing either depth contribute nothing to that pair.

use std::collections::BTreeMap;

use crate::depth_pair::{DepthPair, Slot};
use crate::sample::Sample;
use crate::types::{Depth, GameId, Score};

/// Observations for one (deep, shallow, slot) pair at one phase:
/// (shallow_score, deep_score) points, ordered by game id.
#[derive(Clone, Debug)]
pub struct ObservationSet {
    pub pair: DepthPair,
    pub points: Vec<(Score, Score)>,
}

impl ObservationSet {
    fn new(pair: DepthPair) -> Self {
        ObservationSet {
            pair,
            points: Vec::new(),
        }
    }
}

/// A second score seen for the same (game, depth). The first score is
/// kept; the collision is a data-quality signal, not a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DuplicateScore {
    pub game_id: GameId,
    pub depth: Depth,
    pub kept: Score,
    pub ignored: Score,
}

/// Result of aggregating one phase: observation sets in catalogue
/// order plus any duplicate-score anomalies encountered.
#[derive(Clone, Debug)]
pub struct Aggregation {
    pub sets: Vec<ObservationSet>,
    pub duplicates: Vec<DuplicateScore>,
}

impl Aggregation {
    /// Looks up the observation set for a (deep depth, slot) key.
    pub fn get(&self, deep: Depth, slot: Slot) -> Option<&ObservationSet> {
        self.sets
            .iter()
            .find(|s| s.pair.deep == deep && s.pair.slot == slot)
    }
}

/// Builds per-depth-pair observation sets from one phase's samples.
///
/// Games are visited in ascending id order and depths within a game in
/// ascending depth order, so the output does not depend on input row
/// order (beyond the documented first-wins duplicate policy).
pub fn aggregate<'a, I>(samples: I, pairs: &[DepthPair]) -> Aggregation
where
    I: IntoIterator<Item = &'a Sample>,
{
    let mut games: BTreeMap<GameId, BTreeMap<Depth, Score>> = BTreeMap::new();
    let mut duplicates = Vec::new();

    for sample in samples {
        let scores = games.entry(sample.game_id).or_default();
        if let Some(&kept) = scores.get(&sample.depth) {
            duplicates.push(DuplicateScore {
                game_id: sample.game_id,
                depth: sample.depth,
                kept,
                ignored: sample.score,
            });
        } else {
            scores.insert(sample.depth, sample.score);
        }
    }

    let mut sets: Vec<ObservationSet> = pairs.iter().map(|&p| ObservationSet::new(p)).collect();

    for scores in games.values() {
        for set in sets.iter_mut() {
            if let (Some(&shallow), Some(&deep)) = (
                scores.get(&set.pair.shallow),
                scores.get(&set.pair.deep),
            ) {
                set.points.push((shallow, deep));
            }
        }
    }

    Aggregation { sets, duplicates }
}
