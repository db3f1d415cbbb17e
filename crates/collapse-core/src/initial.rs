// ─────────────────────────────────────────────────────────────────────
// SF Collapse — Initial Data
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Time-symmetric initial data (Π = 0) for the selected φ profile, with the
//! geometry solved consistently from the constraint and slicing conditions.

use crate::constraint::solve_metric;
use crate::rescale::LapseRescaler;
use crate::slicing::solve_lapse;
use collapse_types::config::{InitialProfile, NewtonConfig, PhysicalParams};
use collapse_types::error::CollapseResult;
use collapse_types::grid::GridParameters;
use collapse_types::state::FieldSet;

fn sech2(u: f64) -> f64 {
    let c = u.cosh();
    1.0 / (c * c)
}

fn gaussian(r: f64, amplitude: f64, center: f64, width: f64) -> (f64, f64) {
    let u = (r - center) / width;
    let value = amplitude * (-u * u).exp();
    (value, -2.0 * (r - center) / (width * width) * value)
}

/// φ(r) and its analytic radial derivative Φ(r).
pub fn profile_value(params: &PhysicalParams, r: f64) -> (f64, f64) {
    let p = params.pulse;
    match params.profile {
        InitialProfile::GaussianShell => {
            let q = params.second_pulse;
            let (v1, d1) = gaussian(r, p.amplitude, p.center, p.width);
            let (v2, d2) = gaussian(r, q.amplitude, q.center, q.width);
            (v1 + v2, d1 + d2)
        }
        InitialProfile::GaussianShellR3 => {
            let u = (r - p.center) / p.width;
            let envelope = p.amplitude * (-u * u).exp();
            let value = r.powi(3) * envelope;
            let deriv = r * r * envelope * (3.0 - 2.0 * r * (r - p.center) / (p.width * p.width));
            (value, deriv)
        }
        InitialProfile::TanhShell => {
            let u = (r - p.center).powi(2) / (p.width * p.width);
            let value = p.amplitude * (1.0 - u.tanh());
            let deriv = -p.amplitude * sech2(u) * 2.0 * (r - p.center) / (p.width * p.width);
            (value, deriv)
        }
        InitialProfile::DoubleTanhShell => {
            let inner = (r - p.center) / p.width;
            let outer = (r - params.second_pulse.center) / p.width;
            let value = 0.5 * p.amplitude * (inner.tanh() - outer.tanh());
            let deriv = 0.5 * p.amplitude * (sech2(inner) - sech2(outer)) / p.width;
            (value, deriv)
        }
    }
}

/// Populate the previous level of every field.
///
/// φ from the profile, Φ from its derivative (zero at the origin), Π = 0;
/// a from the constraint with each point seeded by its inner neighbour; α
/// from polar slicing; then one rescaling pass if a rescaler is given.
/// Returns the number of constraint points that failed to converge.
pub fn set_initial_data(
    grid: &GridParameters,
    params: &PhysicalParams,
    newton: &NewtonConfig,
    rescaler: Option<&LapseRescaler>,
    fields: &mut FieldSet,
) -> CollapseResult<usize> {
    {
        let phi = fields.phi.previous_mut();
        for (j, &r) in grid.r.iter().enumerate() {
            phi[j] = profile_value(params, r).0;
        }
    }
    {
        let big_phi = fields.big_phi.previous_mut();
        big_phi[0] = 0.0;
        for j in 1..grid.num_points {
            big_phi[j] = profile_value(params, grid.r[j]).1;
        }
    }
    fields.pi.previous_mut().fill(0.0);

    let failures = solve_metric(
        grid,
        params,
        newton,
        fields.big_phi.previous(),
        fields.pi.previous(),
        None,
        fields.a.previous_mut(),
    );
    solve_lapse(
        grid,
        params.cosmological_constant,
        fields.a.previous(),
        fields.alpha.previous_mut(),
    );

    if let Some(rescaler) = rescaler {
        rescaler.rescale(fields.a.previous(), fields.alpha.previous_mut())?;
    }

    if failures > 0 {
        log::warn!("initial constraint solve: {failures} points did not converge");
    }
    Ok(failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use collapse_types::config::PulseConfig;
    use collapse_types::grid::CoordSystem;

    fn pulse(amplitude: f64, width: f64, center: f64) -> PulseConfig {
        PulseConfig {
            amplitude,
            width,
            center,
        }
    }

    fn numeric_derivative(params: &PhysicalParams, r: f64) -> f64 {
        let h = 1e-6;
        (profile_value(params, r + h).0 - profile_value(params, r - h).0) / (2.0 * h)
    }

    #[test]
    fn test_profile_derivatives_match_finite_differences() {
        let mut double = PhysicalParams::new(InitialProfile::DoubleTanhShell, pulse(0.3, 0.7, 3.0));
        double.second_pulse = pulse(0.0, 1.0, 6.0);
        let mut two_gaussians = PhysicalParams::new(InitialProfile::GaussianShell, pulse(0.1, 1.0, 4.0));
        two_gaussians.second_pulse = pulse(-0.05, 0.5, 8.0);
        let cases = [
            PhysicalParams::new(InitialProfile::GaussianShell, pulse(0.1, 1.5, 5.0)),
            two_gaussians,
            PhysicalParams::new(InitialProfile::GaussianShellR3, pulse(0.01, 1.0, 3.0)),
            PhysicalParams::new(InitialProfile::TanhShell, pulse(0.2, 2.0, 4.0)),
            double,
        ];
        for params in cases {
            for r in [0.3, 1.0, 2.5, 4.2, 7.7] {
                let analytic = profile_value(&params, r).1;
                let numeric = numeric_derivative(&params, r);
                assert!(
                    (analytic - numeric).abs() < 1e-6,
                    "{:?} at r = {r}: {analytic} vs {numeric}",
                    params.profile
                );
            }
        }
    }

    #[test]
    fn test_gaussian_peak_value() {
        let params = PhysicalParams::new(InitialProfile::GaussianShell, pulse(0.01, 1.0, 5.0));
        let (value, deriv) = profile_value(&params, 5.0);
        assert!((value - 0.01).abs() < 1e-15);
        assert_eq!(deriv, 0.0);
    }

    #[test]
    fn test_vacuum_initial_data_is_flat() {
        let grid = GridParameters::new(64, CoordSystem::Spherical, 10.0, 0.5).unwrap();
        let params = PhysicalParams::new(InitialProfile::GaussianShell, pulse(0.0, 1.0, 5.0));
        let mut fields = FieldSet::new(64);
        let failures =
            set_initial_data(&grid, &params, &NewtonConfig::default(), None, &mut fields).unwrap();
        assert_eq!(failures, 0);
        assert!(fields.phi.previous().iter().all(|&v| v == 0.0));
        assert!(fields.a.previous().iter().all(|&v| (v - 1.0).abs() < 1e-12));
        assert!(fields.alpha.previous().iter().all(|&v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_origin_values() {
        let grid = GridParameters::new(100, CoordSystem::Spherical, 9.9, 0.5).unwrap();
        let params = PhysicalParams::new(InitialProfile::GaussianShell, pulse(0.01, 1.0, 5.0));
        let mut fields = FieldSet::new(100);
        set_initial_data(&grid, &params, &NewtonConfig::default(), None, &mut fields).unwrap();
        assert_eq!(fields.big_phi.previous()[0], 0.0);
        assert_eq!(fields.a.previous()[0], 1.0);
        assert_eq!(fields.alpha.previous()[0], 1.0);
        assert!(fields.pi.previous().iter().all(|&v| v == 0.0));
        // A normal field shell raises a above 1 outside it.
        assert!(fields.a.previous()[99] > 1.0);
    }

    #[test]
    fn test_initial_rescaling_normalizes_lapse() {
        let grid = GridParameters::new(100, CoordSystem::Spherical, 9.9, 0.5).unwrap();
        let params = PhysicalParams::new(InitialProfile::GaussianShell, pulse(0.05, 1.0, 5.0));
        let path = std::env::temp_dir().join(format!("sfcollapse_initial_{}.dat", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let rescaler = LapseRescaler::new(
            collapse_types::config::RescalingMode::Minimum,
            1.0,
            &path,
        )
        .unwrap();
        let mut fields = FieldSet::new(100);
        set_initial_data(&grid, &params, &NewtonConfig::default(), Some(&rescaler), &mut fields)
            .unwrap();
        let a = fields.a.previous();
        let alpha = fields.alpha.previous();
        let min_ratio = a
            .iter()
            .zip(alpha.iter())
            .map(|(x, y)| x / y)
            .fold(f64::INFINITY, f64::min);
        assert!((min_ratio - 1.0).abs() < 1e-12);
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 1);
        let _ = std::fs::remove_file(&path);
    }
}
