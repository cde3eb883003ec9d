//! Multi-ProbCut calibration tool.
//!
//! Reads the raw sample CSV produced by the self-play sampling run,
//! fits one prediction model per (phase, depth pair, slot) and writes
//! the dense parameter table the search engine loads. Phases are
//! independent, so the fitting fans out across a thread pool.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use mpc_core::config::{CalibrationConfig, MIN_SAMPLES};
use mpc_core::pipeline::{PhaseModels, calibrate_phase};
use mpc_core::sample::SampleStore;
use mpc_core::table::MpcTable;

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Input CSV of raw (game, phase, depth, score) samples
    #[arg(short, long)]
    input: PathBuf,

    /// Output file for the encoded table
    #[arg(short, long)]
    output: PathBuf,

    /// Minimum matched samples per cell for a valid fit
    #[arg(long, default_value_t = MIN_SAMPLES)]
    min_samples: usize,

    /// Emit a Rust const table instead of CSV
    #[arg(long, default_value = "false")]
    rust_source: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let input_file = File::open(&args.input)
        .with_context(|| format!("Failed to open input file '{}'", args.input.display()))?;
    let store = SampleStore::load(BufReader::new(input_file))?;
    println!("Loaded {} samples", store.len());

    let config = CalibrationConfig {
        min_samples: args.min_samples,
        ..Default::default()
    };
    config.validate()?;

    let pb = ProgressBar::new(config.num_phases() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] phases {pos}/{len} ETA:{eta_precise}",
        )?
        .progress_chars("#>-"),
    );
    let phase_results: Vec<PhaseModels> = (config.phase_min..=config.phase_max)
        .into_par_iter()
        .map(|phase| {
            let result = calibrate_phase(&store, phase, &config);
            pb.inc(1);
            result
        })
        .collect();
    pb.finish_and_clear();

    let mut duplicate_total = 0;
    for result in phase_results.iter() {
        let report = result.report();
        duplicate_total += report.duplicate_scores;
        println!(
            "Phase {:>2}: {:>2}/{} invalid cells",
            report.phase,
            report.invalid_cells,
            config.pairs.len()
        );
    }
    if duplicate_total > 0 {
        println!("Warning: {duplicate_total} duplicate scores ignored (first occurrence kept)");
    }

    let table = MpcTable::assemble(
        phase_results.into_iter().map(|r| (r.phase, r.models)),
        &config,
    )?;

    let output_file = File::create(&args.output)
        .with_context(|| format!("Failed to create output file '{}'", args.output.display()))?;
    let mut writer = BufWriter::new(output_file);
    if args.rust_source {
        table.write_rust_source(&mut writer)?;
    } else {
        table.write_csv(&mut writer)?;
    }
    writer.flush()?;

    println!(
        "Calibration table written to '{}' ({} phases x {} depth pairs)",
        args.output.display(),
        config.num_phases(),
        config.pairs.len()
    );
    Ok(())
}
