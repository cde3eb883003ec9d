//! Calibration run configuration.

use crate::depth_pair::{
    DEPTH_PAIRS, DepthPair, MPC_DEEP_MAX, MPC_DEEP_MIN, MPC_NB_TRY, MPC_SHALLOW_MAX,
    MPC_SHALLOW_MIN, Slot,
};
use crate::error::{CalibrationError, Result};
use crate::types::Phase;

/// Default minimum number of matched samples required before a
/// regression is trusted. Below this the cell is marked invalid.
pub const MIN_SAMPLES: usize = 30;

/// Configuration injected into every pipeline stage.
///
/// The default covers the full production setup: the complete
/// depth-pair catalogue, the default sample threshold and the fixed
/// phase range 0..=59 the search engine indexes with. Tests substitute
/// smaller catalogues and ranges.
#[derive(Clone, Debug)]
pub struct CalibrationConfig {
    /// Depth pairs to calibrate, in table encoding order.
    pub pairs: Vec<DepthPair>,
    /// Minimum matched-sample count for a valid fit.
    pub min_samples: usize,
    /// First phase emitted in the table.
    pub phase_min: Phase,
    /// Last phase emitted in the table (inclusive).
    pub phase_max: Phase,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        CalibrationConfig {
            pairs: DEPTH_PAIRS.to_vec(),
            min_samples: MIN_SAMPLES,
            phase_min: 0,
            phase_max: 59,
        }
    }
}

impl CalibrationConfig {
    /// Number of phases the emitted table covers.
    pub fn num_phases(&self) -> usize {
        (self.phase_max - self.phase_min + 1) as usize
    }

    /// Checks the invariants the table's positional indexing relies
    /// on. Violations are fatal: a table built from a bad catalogue
    /// would desynchronize the consumer.
    pub fn validate(&self) -> Result<()> {
        if self.phase_min > self.phase_max {
            return Err(CalibrationError::InvalidConfig(format!(
                "empty phase range {}..={}",
                self.phase_min, self.phase_max
            )));
        }
        if self.pairs.is_empty() {
            return Err(CalibrationError::InvalidConfig(
                "depth-pair catalogue is empty".to_string(),
            ));
        }

        for pair in self.pairs.iter() {
            if pair.shallow < MPC_SHALLOW_MIN || pair.shallow > MPC_SHALLOW_MAX {
                return Err(CalibrationError::InvalidConfig(format!(
                    "shallow depth {} outside {MPC_SHALLOW_MIN}..={MPC_SHALLOW_MAX}",
                    pair.shallow
                )));
            }
            if pair.deep < MPC_DEEP_MIN || pair.deep > MPC_DEEP_MAX {
                return Err(CalibrationError::InvalidConfig(format!(
                    "deep depth {} outside {MPC_DEEP_MIN}..={MPC_DEEP_MAX}",
                    pair.deep
                )));
            }
            if pair.shallow >= pair.deep {
                return Err(CalibrationError::InvalidConfig(format!(
                    "shallow depth {} not below deep depth {}",
                    pair.shallow, pair.deep
                )));
            }
        }

        for (i, pair) in self.pairs.iter().enumerate() {
            let same_deep = self.pairs.iter().filter(|p| p.deep == pair.deep);
            if same_deep.count() > MPC_NB_TRY {
                return Err(CalibrationError::InvalidConfig(format!(
                    "more than {MPC_NB_TRY} slots for deep depth {}",
                    pair.deep
                )));
            }
            if self.pairs[..i]
                .iter()
                .any(|p| p.deep == pair.deep && p.slot == pair.slot)
            {
                return Err(CalibrationError::InvalidConfig(format!(
                    "duplicate (deep {}, slot {}) in catalogue",
                    pair.deep,
                    pair.slot.as_u8()
                )));
            }
            // Slot1 must follow a declared Slot0 so the encoder's
            // slot-0-then-slot-1 ordering holds by construction.
            if pair.slot == Slot::Slot1
                && !self.pairs[..i]
                    .iter()
                    .any(|p| p.deep == pair.deep && p.slot == Slot::Slot0)
            {
                return Err(CalibrationError::InvalidConfig(format!(
                    "slot 1 for deep depth {} declared before slot 0",
                    pair.deep
                )));
            }
        }

        Ok(())
    }
}
