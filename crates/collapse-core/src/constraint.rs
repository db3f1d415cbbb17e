// ─────────────────────────────────────────────────────────────────────
// SF Collapse — Hamiltonian Constraint
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Pointwise Newton–Raphson solve of the discretized Hamiltonian constraint.
//!
//! With A = ln(a) and midpoint values between j-1 and j:
//!
//! f(A) = (A - A_{j-1})/dx + (r'/2r)·exp(A + A_{j-1})·(1 - Λr²) - r'/2r - 2πε·r·r'·(Φ² + Π²)
//!
//! Each point needs the freshly solved a_{j-1}, so the sweep runs from the
//! origin outward and cannot be parallelized across j.

use collapse_types::config::{NewtonConfig, PhysicalParams};
use collapse_types::grid::GridParameters;
use ndarray::Array1;
use std::f64::consts::PI;

/// Result of one pointwise constraint solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSolution {
    pub a: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Midpoint coefficients of the constraint between j-1 and j.
#[derive(Debug, Clone, Copy)]
struct ConstraintStencil {
    half_invr: f64,
    cosmological: f64,
    matter: f64,
}

impl ConstraintStencil {
    fn at(
        j: usize,
        grid: &GridParameters,
        params: &PhysicalParams,
        big_phi: &Array1<f64>,
        pi: &Array1<f64>,
    ) -> Self {
        let mid = grid.coord.midpoint(0.5 * (grid.x[j] + grid.x[j - 1]));
        let avg_phi = 0.5 * (big_phi[j] + big_phi[j - 1]);
        let avg_pi = 0.5 * (pi[j] + pi[j - 1]);
        ConstraintStencil {
            half_invr: mid.half_inverse_radius(),
            cosmological: 1.0 - params.cosmological_constant * mid.radius * mid.radius,
            matter: 2.0
                * params.epsilon
                * PI
                * mid.radius
                * mid.jacobian
                * (avg_phi * avg_phi + avg_pi * avg_pi),
        }
    }

    /// (f, df/dA) at the unknown `a_log` given the solved neighbour `a_prev_log`.
    fn residual(&self, a_log: f64, a_prev_log: f64, inv_dx: f64) -> (f64, f64) {
        let curvature = self.half_invr * (a_log + a_prev_log).exp() * self.cosmological;
        let f = inv_dx * (a_log - a_prev_log) + curvature - self.half_invr - self.matter;
        let df = inv_dx + curvature;
        (f, df)
    }
}

/// Solve for a_j given a_{j-1} and Φ, Π at the target time level.
///
/// `guess` seeds the iteration (normally a_j from the previous time step);
/// a non-positive or non-finite guess falls back to a_{j-1}. Running out of
/// iterations is not an error: a warning is logged and the last iterate is
/// returned.
#[allow(clippy::too_many_arguments)]
pub fn solve_metric_point(
    j: usize,
    grid: &GridParameters,
    params: &PhysicalParams,
    newton: &NewtonConfig,
    big_phi: &Array1<f64>,
    pi: &Array1<f64>,
    a_prev: f64,
    guess: f64,
) -> PointSolution {
    let stencil = ConstraintStencil::at(j, grid, params, big_phi, pi);
    let a_prev_log = a_prev.ln();
    let mut a_log = if guess.is_finite() && guess > 0.0 {
        guess.ln()
    } else {
        a_prev_log
    };

    let mut iterations = 0;
    let mut converged = false;
    while iterations < newton.max_iterations {
        iterations += 1;
        let (f, df) = stencil.residual(a_log, a_prev_log, grid.inv_dx);
        let delta = (f / df).clamp(-newton.max_step, newton.max_step);
        if !delta.is_finite() {
            break;
        }
        a_log -= delta;
        if delta.abs() <= newton.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        log::warn!(
            "Newton's method did not converge to a root! j = {} | iter = {}",
            j,
            iterations
        );
    }

    PointSolution {
        a: a_log.exp(),
        iterations,
        converged,
    }
}

/// Solve the constraint on the whole grid, writing into `a`.
///
/// a[0] = 1 is imposed at the origin. `guess` supplies per-point Newton seeds;
/// without it each point starts from its solved inner neighbour.
/// Returns the number of points that exhausted the iteration budget.
pub fn solve_metric(
    grid: &GridParameters,
    params: &PhysicalParams,
    newton: &NewtonConfig,
    big_phi: &Array1<f64>,
    pi: &Array1<f64>,
    guess: Option<&Array1<f64>>,
    a: &mut Array1<f64>,
) -> usize {
    a[0] = 1.0;
    let mut failures = 0;
    for j in 1..grid.num_points {
        let seed = guess.map_or(a[j - 1], |g| g[j]);
        let solution = solve_metric_point(j, grid, params, newton, big_phi, pi, a[j - 1], seed);
        if !solution.converged {
            failures += 1;
        }
        a[j] = solution.a;
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use collapse_types::config::{InitialProfile, PulseConfig};
    use collapse_types::grid::CoordSystem;

    fn params(epsilon: f64, lambda: f64) -> PhysicalParams {
        PhysicalParams {
            epsilon,
            cosmological_constant: lambda,
            ..PhysicalParams::new(InitialProfile::GaussianShell, PulseConfig::default())
        }
    }

    fn grids() -> Vec<GridParameters> {
        vec![
            GridParameters::new(100, CoordSystem::Spherical, 9.9, 0.5).unwrap(),
            GridParameters::new(
                200,
                CoordSystem::SinhSpherical {
                    amplitude: 20.0,
                    width: 0.2,
                },
                0.0,
                0.5,
            )
            .unwrap(),
        ]
    }

    #[test]
    fn test_flat_space_at_first_point() {
        for grid in grids() {
            let zeros = Array1::zeros(grid.num_points);
            let sol = solve_metric_point(
                1,
                &grid,
                &params(1.0, 0.0),
                &NewtonConfig::default(),
                &zeros,
                &zeros,
                1.0,
                1.0,
            );
            assert!(sol.converged);
            assert!((sol.a - 1.0).abs() < 1e-10, "{:?}: a = {}", grid.coord, sol.a);
        }
    }

    #[test]
    fn test_flat_space_full_sweep() {
        for grid in grids() {
            let zeros = Array1::zeros(grid.num_points);
            let mut a = Array1::zeros(grid.num_points);
            let failures = solve_metric(
                &grid,
                &params(1.0, 0.0),
                &NewtonConfig::default(),
                &zeros,
                &zeros,
                None,
                &mut a,
            );
            assert_eq!(failures, 0);
            assert!(a.iter().all(|&v| (v - 1.0).abs() < 1e-10));
        }
    }

    #[test]
    fn test_solution_satisfies_residual() {
        let grid = &grids()[0];
        let big_phi = Array1::from_shape_fn(grid.num_points, |j| 0.05 * (grid.r[j] - 3.0).sin());
        let pi = Array1::from_shape_fn(grid.num_points, |j| 0.02 * grid.r[j].cos());
        let p = params(1.0, 0.0);
        let newton = NewtonConfig::default();
        let sol = solve_metric_point(10, grid, &p, &newton, &big_phi, &pi, 1.001, 1.001);
        assert!(sol.converged);
        let stencil = ConstraintStencil::at(10, grid, &p, &big_phi, &pi);
        let (f, _) = stencil.residual(sol.a.ln(), 1.001_f64.ln(), grid.inv_dx);
        assert!(f.abs() < 1e-7, "residual {f}");
    }

    #[test]
    fn test_matter_increases_metric_and_phantom_decreases_it() {
        let grid = &grids()[0];
        let big_phi = Array1::from_elem(grid.num_points, 0.1);
        let pi = Array1::zeros(grid.num_points);
        let newton = NewtonConfig::default();
        let normal = solve_metric_point(20, grid, &params(1.0, 0.0), &newton, &big_phi, &pi, 1.0, 1.0);
        let phantom =
            solve_metric_point(20, grid, &params(-1.0, 0.0), &newton, &big_phi, &pi, 1.0, 1.0);
        assert!(normal.a > 1.0, "normal field a = {}", normal.a);
        assert!(phantom.a < 1.0, "phantom field a = {}", phantom.a);
    }

    #[test]
    fn test_positive_cosmological_constant_raises_metric() {
        let grid = &grids()[0];
        let zeros = Array1::zeros(grid.num_points);
        let newton = NewtonConfig::default();
        let sol = solve_metric_point(50, grid, &params(1.0, 1e-3), &newton, &zeros, &zeros, 1.0, 1.0);
        assert!(sol.converged);
        assert!(sol.a > 1.0);
    }

    #[test]
    fn test_guess_does_not_change_converged_root() {
        let grid = &grids()[0];
        let big_phi = Array1::from_elem(grid.num_points, 0.05);
        let zeros = Array1::zeros(grid.num_points);
        let p = params(1.0, 0.0);
        let newton = NewtonConfig::default();
        let from_prev = solve_metric_point(30, grid, &p, &newton, &big_phi, &zeros, 1.01, 1.01);
        let from_guess = solve_metric_point(30, grid, &p, &newton, &big_phi, &zeros, 1.01, 1.05);
        let from_bad = solve_metric_point(30, grid, &p, &newton, &big_phi, &zeros, 1.01, -3.0);
        assert!((from_prev.a - from_guess.a).abs() < 1e-9);
        assert_eq!(from_prev, from_bad);
    }

    #[test]
    fn test_non_convergence_returns_finite_value() {
        let grid = &grids()[0];
        let big_phi = Array1::from_elem(grid.num_points, 1.0e3);
        let zeros = Array1::zeros(grid.num_points);
        let newton = NewtonConfig::default();
        let sol = solve_metric_point(40, grid, &params(1.0, 0.0), &newton, &big_phi, &zeros, 1.0, 1.0);
        assert!(!sol.converged);
        assert_eq!(sol.iterations, newton.max_iterations);
        assert!(sol.a.is_finite() && sol.a > 0.0, "a = {}", sol.a);
    }

    #[test]
    fn test_sinh_matter_term_closed_form() {
        let (amp, width) = (15.0, 0.2);
        let grid = GridParameters::new(
            150,
            CoordSystem::SinhSpherical {
                amplitude: amp,
                width,
            },
            0.0,
            0.5,
        )
        .unwrap();
        let big_phi = Array1::from_shape_fn(150, |j| 0.03 * (grid.r[j] - 5.0).sin());
        let pi = Array1::from_shape_fn(150, |j| 0.05 * (-(grid.r[j] - 4.0).powi(2)).exp());
        let newton = NewtonConfig::default();

        for epsilon in [1.0, -1.0] {
            let p = params(epsilon, 0.0);
            let mut a = Array1::zeros(150);
            let failures = solve_metric(&grid, &p, &newton, &big_phi, &pi, None, &mut a);
            assert_eq!(failures, 0);

            for j in [20usize, 75, 140] {
                let xm = 0.5 * (grid.x[j] + grid.x[j - 1]);
                let (sh, ch) = ((xm / width).sinh(), (xm / width).cosh());
                let half_invr = 0.5 * ch / (width * sh);
                let avg_phi = 0.5 * (big_phi[j] + big_phi[j - 1]);
                let avg_pi = 0.5 * (pi[j] + pi[j - 1]);
                let matter = 2.0 * PI * epsilon * amp * amp / width * sh * ch
                    / (1.0 / width).sinh().powi(2)
                    * (avg_phi * avg_phi + avg_pi * avg_pi);
                let (big_a, big_a0) = (a[j].ln(), a[j - 1].ln());
                let residual = grid.inv_dx * (big_a - big_a0)
                    + half_invr * ((big_a + big_a0).exp() - 1.0)
                    - matter;
                assert!(
                    residual.abs() < 1e-7 * (1.0 + matter.abs()),
                    "epsilon {epsilon}, j = {j}: residual {residual}"
                );
                assert!(matter != 0.0);
            }
        }
    }
}
