// ─────────────────────────────────────────────────────────────────────
// SF Collapse — Lapse Rescaling
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Global normalization of the lapse by κ = extremum of a/α.
//!
//! Every invocation appends one line `initial_kappa final_kappa` to the
//! rescaling log.

use collapse_types::config::RescalingMode;
use collapse_types::error::{CollapseError, CollapseResult};
use ndarray::Array1;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// (a_0/α_0, extremum of a_j/α_j over the grid).
pub fn rescaling_factor(a: &Array1<f64>, alpha: &Array1<f64>, mode: RescalingMode) -> (f64, f64) {
    let initial = a[0] / alpha[0];
    let kappa = a
        .iter()
        .zip(alpha.iter())
        .skip(1)
        .map(|(&a_j, &alpha_j)| a_j / alpha_j)
        .fold(initial, |acc, ratio| match mode {
            RescalingMode::Minimum => acc.min(ratio),
            RescalingMode::Maximum => acc.max(ratio),
        });
    (initial, kappa)
}

#[derive(Debug, Clone)]
pub struct LapseRescaler {
    mode: RescalingMode,
    log_path: PathBuf,
}

impl LapseRescaler {
    /// The maximum mode is only valid for the phantom sign epsilon = -1.
    pub fn new(mode: RescalingMode, epsilon: f64, log_path: impl Into<PathBuf>) -> CollapseResult<Self> {
        if mode == RescalingMode::Maximum && epsilon != -1.0 {
            return Err(CollapseError::InvalidRescaling { epsilon });
        }
        Ok(LapseRescaler {
            mode,
            log_path: log_path.into(),
        })
    }

    pub fn mode(&self) -> RescalingMode {
        self.mode
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Multiply α by κ in place and return κ.
    pub fn rescale(&self, a: &Array1<f64>, alpha: &mut Array1<f64>) -> CollapseResult<f64> {
        let (initial, kappa) = rescaling_factor(a, alpha, self.mode);
        self.append_record(initial, kappa)?;
        alpha.mapv_inplace(|v| v * kappa);
        log::debug!("lapse rescaled: kappa_0 = {initial:.6e}, kappa = {kappa:.6e}");
        Ok(kappa)
    }

    fn append_record(&self, initial: f64, kappa: f64) -> CollapseResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{initial:.15e} {kappa:.15e}")?;
        file.flush()?;
        Ok(())
    }
}
