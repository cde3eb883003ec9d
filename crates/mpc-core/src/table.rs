//! Dense MPC table assembly and serialization.
//!
//! The search engine indexes the table purely by position: phase
//! ascending on the outside, then the depth-pair catalogue in its
//! declared order (which already places slot 0 before slot 1 for deep
//! depths carrying two slots). Every configured phase occupies a full
//! stride of cells even when no data exists for it; missing data shows
//! up as explicit invalid cells, never as a shorter table.

use std::io::{self, Write};

use crate::config::CalibrationConfig;
use crate::depth_pair::{DepthPair, Slot};
use crate::error::{CalibrationError, Result};
use crate::fit::MpcModel;
use crate::types::{Depth, Phase};

/// The assembled calibration table, phase-major, catalogue order
/// within each phase.
#[derive(Clone, Debug)]
pub struct MpcTable {
    phase_min: Phase,
    phase_max: Phase,
    pairs: Vec<DepthPair>,
    cells: Vec<MpcModel>,
}

impl MpcTable {
    /// Assembles per-phase fit results into the dense table.
    ///
    /// Results may arrive in any order; each is placed by its phase
    /// value. Phases in the configured range with no result become
    /// rows of invalid cells. A result outside the range, a duplicate
    /// phase, or a model row of the wrong width is fatal: any of them
    /// would corrupt the positional indexing contract.
    pub fn assemble<I>(results: I, config: &CalibrationConfig) -> Result<MpcTable>
    where
        I: IntoIterator<Item = (Phase, Vec<MpcModel>)>,
    {
        let num_pairs = config.pairs.len();
        let mut cells = vec![MpcModel::invalid(0); config.num_phases() * num_pairs];
        let mut filled = vec![false; config.num_phases()];

        for (phase, models) in results {
            if phase < config.phase_min || phase > config.phase_max {
                return Err(CalibrationError::PhaseOutOfRange {
                    phase,
                    min: config.phase_min,
                    max: config.phase_max,
                });
            }
            if models.len() != num_pairs {
                return Err(CalibrationError::InvalidConfig(format!(
                    "phase {} produced {} models, expected {}",
                    phase,
                    models.len(),
                    num_pairs
                )));
            }
            let row = (phase - config.phase_min) as usize;
            if filled[row] {
                return Err(CalibrationError::InvalidConfig(format!(
                    "duplicate results for phase {phase}"
                )));
            }
            filled[row] = true;
            cells[row * num_pairs..(row + 1) * num_pairs].copy_from_slice(&models);
        }

        Ok(MpcTable {
            phase_min: config.phase_min,
            phase_max: config.phase_max,
            pairs: config.pairs.clone(),
            cells,
        })
    }

    /// First phase covered by the table.
    pub fn phase_min(&self) -> Phase {
        self.phase_min
    }

    /// Last phase covered by the table (inclusive).
    pub fn phase_max(&self) -> Phase {
        self.phase_max
    }

    /// The catalogue the table was built against.
    pub fn pairs(&self) -> &[DepthPair] {
        &self.pairs
    }

    /// Cell at (phase, catalogue index).
    ///
    /// # Panics
    ///
    /// Panics if `phase` is outside the table range or `pair_index`
    /// outside the catalogue.
    pub fn get(&self, phase: Phase, pair_index: usize) -> &MpcModel {
        assert!(phase >= self.phase_min && phase <= self.phase_max);
        assert!(pair_index < self.pairs.len());
        let row = (phase - self.phase_min) as usize;
        &self.cells[row * self.pairs.len() + pair_index]
    }

    /// Cell for a (phase, deep depth, slot) key, if that key is in
    /// the catalogue and the phase is covered.
    pub fn lookup(&self, phase: Phase, deep: Depth, slot: Slot) -> Option<&MpcModel> {
        if phase < self.phase_min || phase > self.phase_max {
            return None;
        }
        self.pairs
            .iter()
            .position(|p| p.deep == deep && p.slot == slot)
            .map(|i| self.get(phase, i))
    }

    /// Writes the table as CSV, one row per cell in canonical order.
    ///
    /// The per-cell field order `slope, bias, sigma, valid` is the
    /// consumer contract; fixed 10-decimal formatting makes identical
    /// inputs produce byte-identical output.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(b"phase,deep_depth,shallow_depth,slot,slope,bias,sigma,valid,samples\n")?;
        for phase in self.phase_min..=self.phase_max {
            for (i, pair) in self.pairs.iter().enumerate() {
                let cell = self.get(phase, i);
                writeln!(
                    writer,
                    "{},{},{},{},{:.10},{:.10},{:.10},{},{}",
                    phase,
                    pair.deep,
                    pair.shallow,
                    pair.slot.as_u8(),
                    cell.slope,
                    cell.bias,
                    cell.sigma,
                    cell.valid as u8,
                    cell.sample_count
                )?;
            }
        }
        Ok(())
    }

    /// Writes the table as a Rust const array, one `MpcCell` literal
    /// per cell in the same canonical order, for compiling the
    /// parameters straight into the search engine.
    pub fn write_rust_source<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "// Generated by calibrate. Do not edit.")?;
        writeln!(writer, "#[rustfmt::skip]")?;
        writeln!(
            writer,
            "pub const MPC_TABLE: [[MpcCell; {}]; {}] = [",
            self.pairs.len(),
            self.phase_max - self.phase_min + 1
        )?;
        for phase in self.phase_min..=self.phase_max {
            writeln!(writer, "    [ // phase {phase}")?;
            for (i, pair) in self.pairs.iter().enumerate() {
                let cell = self.get(phase, i);
                writeln!(
                    writer,
                    "        MpcCell {{ shallow: {}, slope: {:.10}, bias: {:.10}, sigma: {:.10}, valid: {} }},",
                    pair.shallow, cell.slope, cell.bias, cell.sigma, cell.valid
                )?;
            }
            writeln!(writer, "    ],")?;
        }
        writeln!(writer, "];")?;
        Ok(())
    }
}
