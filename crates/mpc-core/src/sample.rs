//! Raw score sample storage and loading.
//!
//! The input is the CSV written by the self-play sampling tool: one
//! row per (game, phase, depth) actually searched, carrying the score
//! that search returned. The store keeps the rows as typed records
//! and exposes filtered iteration by phase; reconstructing the
//! shallow/deep pairing is the aggregator's job.

use std::io::BufRead;

use crate::error::{CalibrationError, Result};
use crate::types::{Depth, GameId, Phase, Score};

/// One raw input row: a single score recorded at a single depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sample {
    /// Self-play game this score was recorded in.
    pub game_id: GameId,
    /// Empty-square count at the sampled position.
    pub phase: Phase,
    /// Search depth the score was obtained at.
    pub depth: Depth,
    /// Score returned by the search.
    pub score: Score,
}

/// Read-only store of raw samples.
#[derive(Clone, Debug, Default)]
pub struct SampleStore {
    samples: Vec<Sample>,
}

/// Required input columns, located by name in the header line.
const REQUIRED_COLUMNS: [&str; 4] = ["game_id", "game_phase", "depth", "score"];

impl SampleStore {
    /// Parses CSV input into a store.
    ///
    /// The first line must be a header naming at least the columns
    /// `game_id`, `game_phase`, `depth` and `score`; column order is
    /// free and extra columns (the generator also emits a `diff`
    /// column) are ignored. Any missing column or unparsable row is
    /// fatal.
    pub fn load<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines().enumerate();

        let header = loop {
            match lines.next() {
                Some((line_no, line)) => {
                    let line = line.map_err(|e| CalibrationError::MalformedRow {
                        line: line_no + 1,
                        reason: e.to_string(),
                    })?;
                    if !line.trim().is_empty() {
                        break line;
                    }
                }
                None => return Err(CalibrationError::MissingColumn(REQUIRED_COLUMNS[0])),
            }
        };

        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        let mut indices = [0usize; REQUIRED_COLUMNS.len()];
        for (i, &name) in REQUIRED_COLUMNS.iter().enumerate() {
            indices[i] = columns
                .iter()
                .position(|&c| c == name)
                .ok_or(CalibrationError::MissingColumn(name))?;
        }
        let [id_col, phase_col, depth_col, score_col] = indices;

        let mut samples = Vec::new();
        for (line_no, line) in lines {
            let line = line.map_err(|e| CalibrationError::MalformedRow {
                line: line_no + 1,
                reason: e.to_string(),
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != columns.len() {
                return Err(CalibrationError::MalformedRow {
                    line: line_no + 1,
                    reason: format!("expected {} fields, found {}", columns.len(), fields.len()),
                });
            }

            samples.push(Sample {
                game_id: parse_field(fields[id_col], "game_id", line_no + 1)?,
                phase: parse_field(fields[phase_col], "game_phase", line_no + 1)?,
                depth: parse_field(fields[depth_col], "depth", line_no + 1)?,
                score: parse_field(fields[score_col], "score", line_no + 1)?,
            });
        }

        Ok(SampleStore { samples })
    }

    /// Wraps already-typed records, for tests and non-CSV producers.
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        SampleStore { samples }
    }

    /// Number of stored samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterates over all samples recorded at the given phase.
    /// Phases with no data yield an empty iterator, not an error.
    pub fn by_phase(&self, phase: Phase) -> impl Iterator<Item = &Sample> {
        self.samples.iter().filter(move |s| s.phase == phase)
    }
}

fn parse_field<T: std::str::FromStr>(field: &str, name: &str, line: usize) -> Result<T> {
    field.parse().map_err(|_| CalibrationError::MalformedRow {
        line,
        reason: format!("invalid {name} value '{field}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "\
game_id,game_phase,depth,score
1,40,3,5
1,40,9,12
2,40,3,7
2,39,9,-16
";

    #[test]
    fn test_load() {
        let store = SampleStore::load(INPUT.as_bytes()).unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(
            store.by_phase(40).next(),
            Some(&Sample {
                game_id: 1,
                phase: 40,
                depth: 3,
                score: 5,
            })
        );
    }

    #[test]
    fn test_load_reordered_and_extra_columns() {
        let input = "\
game_phase,score,depth,diff,game_id
40,12,9,7,1
";
        let store = SampleStore::load(input.as_bytes()).unwrap();
        assert_eq!(store.len(), 1);
        let sample = store.by_phase(40).next().unwrap();
        assert_eq!(sample.game_id, 1);
        assert_eq!(sample.depth, 9);
        assert_eq!(sample.score, 12);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let input = "game_id,game_phase,depth\n1,40,3\n";
        match SampleStore::load(input.as_bytes()) {
            Err(CalibrationError::MissingColumn("score")) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_row_is_fatal() {
        let input = "game_id,game_phase,depth,score\n1,40,three,5\n";
        match SampleStore::load(input.as_bytes()) {
            Err(CalibrationError::MalformedRow { line: 2, .. }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_short_row_is_fatal() {
        let input = "game_id,game_phase,depth,score\n1,40,3\n";
        assert!(SampleStore::load(input.as_bytes()).is_err());
    }

    #[test]
    fn test_wide_row_is_fatal() {
        let input = "game_id,game_phase,depth,score\n1,40,3,5,7\n";
        match SampleStore::load(input.as_bytes()) {
            Err(CalibrationError::MalformedRow { line: 2, .. }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_negative_scores_parse() {
        let store = SampleStore::load(INPUT.as_bytes()).unwrap();
        assert_eq!(store.by_phase(39).next().unwrap().score, -16);
    }

    #[test]
    fn test_empty_phase_is_not_an_error() {
        let store = SampleStore::load(INPUT.as_bytes()).unwrap();
        assert_eq!(store.by_phase(10).count(), 0);
    }
}
