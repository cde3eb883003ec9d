//! End-to-end calibration: store -> aggregate -> fit -> table.
//!
//! Phases are independent, so [`calibrate_phase`] is a pure function
//! of the store and may be fanned out across workers; [`calibrate`]
//! runs them sequentially and is correct by construction. Either way
//! the table is assembled by phase value after all phases finish, so
//! completion order never changes the result.

use crate::aggregate::aggregate;
use crate::config::CalibrationConfig;
use crate::error::Result;
use crate::fit::{MpcModel, fit};
use crate::sample::SampleStore;
use crate::table::MpcTable;
use crate::types::Phase;

/// Fit results for one phase, in catalogue order.
#[derive(Clone, Debug)]
pub struct PhaseModels {
    pub phase: Phase,
    pub models: Vec<MpcModel>,
    /// Duplicate-score anomalies seen while aggregating this phase.
    pub duplicate_scores: usize,
}

impl PhaseModels {
    /// Coverage summary for operator output.
    pub fn report(&self) -> PhaseReport {
        PhaseReport {
            phase: self.phase,
            invalid_cells: self.models.iter().filter(|m| !m.valid).count(),
            duplicate_scores: self.duplicate_scores,
        }
    }
}

/// Per-phase coverage: how many cells lacked the data for a valid fit
/// and how many duplicate scores were dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: Phase,
    pub invalid_cells: usize,
    pub duplicate_scores: usize,
}

/// The complete calibration output: the dense table plus per-phase
/// coverage reports in phase order.
#[derive(Clone, Debug)]
pub struct Calibration {
    pub table: MpcTable,
    pub reports: Vec<PhaseReport>,
}

/// Aggregates and fits all configured depth pairs for one phase.
pub fn calibrate_phase(
    store: &SampleStore,
    phase: Phase,
    config: &CalibrationConfig,
) -> PhaseModels {
    let agg = aggregate(store.by_phase(phase), &config.pairs);
    let models = agg
        .sets
        .iter()
        .map(|set| fit(set, config.min_samples))
        .collect();
    PhaseModels {
        phase,
        models,
        duplicate_scores: agg.duplicates.len(),
    }
}

/// Runs the whole pipeline over the configured phase range.
///
/// Fails only on structural problems (invalid configuration); thin
/// data degrades to invalid cells, visible in the reports.
pub fn calibrate(store: &SampleStore, config: &CalibrationConfig) -> Result<Calibration> {
    config.validate()?;

    let phase_results: Vec<PhaseModels> = (config.phase_min..=config.phase_max)
        .map(|phase| calibrate_phase(store, phase, config))
        .collect();

    let reports = phase_results.iter().map(PhaseModels::report).collect();
    let table = MpcTable::assemble(
        phase_results.into_iter().map(|r| (r.phase, r.models)),
        config,
    )?;

    Ok(Calibration { table, reports })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth_pair::{DepthPair, Slot};
    use crate::sample::Sample;

    fn store() -> SampleStore {
        SampleStore::from_samples(vec![
            Sample { game_id: 1, phase: 10, depth: 3, score: 5 },
            Sample { game_id: 1, phase: 10, depth: 9, score: 12 },
            Sample { game_id: 2, phase: 10, depth: 3, score: 7 },
            Sample { game_id: 2, phase: 10, depth: 9, score: 16 },
        ])
    }

    fn config() -> CalibrationConfig {
        CalibrationConfig {
            pairs: vec![DepthPair::new(9, 3, Slot::Slot0)],
            min_samples: 1,
            phase_min: 9,
            phase_max: 11,
        }
    }

    #[test]
    fn test_calibrate_phase() {
        let result = calibrate_phase(&store(), 10, &config());
        assert_eq!(result.models.len(), 1);
        let model = &result.models[0];
        assert!(model.valid);
        assert_eq!(model.slope, 2.0);
        assert_eq!(model.bias, 2.0);
        assert_eq!(result.duplicate_scores, 0);
    }

    #[test]
    fn test_calibrate_covers_empty_phases() {
        let calibration = calibrate(&store(), &config()).unwrap();
        assert!(calibration.table.get(10, 0).valid);
        assert!(!calibration.table.get(9, 0).valid);
        assert!(!calibration.table.get(11, 0).valid);
        assert_eq!(
            calibration.reports,
            vec![
                PhaseReport { phase: 9, invalid_cells: 1, duplicate_scores: 0 },
                PhaseReport { phase: 10, invalid_cells: 0, duplicate_scores: 0 },
                PhaseReport { phase: 11, invalid_cells: 1, duplicate_scores: 0 },
            ]
        );
    }

    #[test]
    fn test_calibrate_rejects_invalid_config() {
        let bad = CalibrationConfig {
            pairs: vec![DepthPair::new(3, 3, Slot::Slot0)],
            ..config()
        };
        assert!(calibrate(&store(), &bad).is_err());
    }

    #[test]
    fn test_duplicate_counted_in_report() {
        let mut samples: Vec<Sample> = store().by_phase(10).copied().collect();
        samples.push(Sample { game_id: 1, phase: 10, depth: 3, score: 99 });
        let store = SampleStore::from_samples(samples);

        let calibration = calibrate(&store, &config()).unwrap();
        assert_eq!(calibration.reports[1].duplicate_scores, 1);
        // First score wins: the fit is unchanged.
        assert_eq!(calibration.table.get(10, 0).slope, 2.0);
    }
}
