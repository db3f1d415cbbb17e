// ─────────────────────────────────────────────────────────────────────
// SF Collapse — Command-Line Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `sfcollapse <config.json>`: evolve the configured initial data and write
//! the central-value time series `time phi_0 alpha_0 max_a`.

use collapse_core::evolution::Evolution;
use collapse_types::config::SimulationConfig;
use collapse_types::error::CollapseResult;
use collapse_types::state::StepReport;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::process::ExitCode;

fn write_row<W: Write>(out: &mut W, time: f64, phi_0: f64, alpha_0: f64, max_a: f64) -> CollapseResult<()> {
    writeln!(out, "{time:.15e} {phi_0:.15e} {alpha_0:.15e} {max_a:.15e}")?;
    Ok(())
}

fn run(path: &str) -> CollapseResult<()> {
    let config = SimulationConfig::from_file(path)?;
    let mut evolution = Evolution::from_config(&config)?;

    let grid = evolution.grid();
    log::info!(
        "{}: N = {}, coord = {:?}, dx = {:.5e}, dt = {:.5e}",
        config.run_name,
        grid.num_points,
        grid.coord,
        grid.dx,
        grid.dt
    );

    let mut out = BufWriter::new(File::create(&config.evolution.output_file)?);
    writeln!(out, "# time phi_0 alpha_0 max_a")?;
    let max_a = evolution
        .metric()
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    write_row(
        &mut out,
        evolution.time(),
        evolution.scalar_field()[0],
        evolution.lapse()[0],
        max_a,
    )?;

    let output_every = config.evolution.output_every;
    let mut total_failures = 0usize;
    evolution.run(config.evolution.num_steps, |report: &StepReport, _| {
        total_failures += report.newton_failures;
        if report.step % output_every == 0 {
            log::info!(
                "Step {} | t = {:.6e} | phi_0 = {:+.6e} | alpha_0 = {:.6e} | max a = {:.6e}",
                report.step,
                report.time,
                report.central_phi,
                report.central_lapse,
                report.max_metric
            );
            write_row(
                &mut out,
                report.time,
                report.central_phi,
                report.central_lapse,
                report.max_metric,
            )?;
        }
        Ok(())
    })?;
    out.flush()?;

    if total_failures > 0 {
        log::warn!("{total_failures} constraint points did not converge during the run");
    }
    log::info!(
        "Evolved {} steps, t = {:.6e}; output in {}",
        evolution.step_index(),
        evolution.time(),
        config.evolution.output_file
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: sfcollapse <config.json>");
        return ExitCode::from(2);
    };

    match run(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("(sfcollapse ERROR) {e}");
            ExitCode::FAILURE
        }
    }
}
