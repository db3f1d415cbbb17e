// ─────────────────────────────────────────────────────────────────────
// SF Collapse — Polar Slicing
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Lapse from the polar slicing condition, integrated outward from α_0 = 1.
//!
//! Midpoint discretization with b = a_j + a_{j-1}, c = a_j - a_{j-1}:
//!   d = (1 - ¼b²(1 - Λr²)) / (2 r/r') - c/(b·dx)
//!   α_j = α_{j-1} (1 - d·dx) / (1 + d·dx)

use collapse_types::grid::GridParameters;
use ndarray::Array1;

/// α_j from α_{j-1} and the already-solved metric at j-1 and j.
pub fn lapse_point(
    j: usize,
    grid: &GridParameters,
    cosmological_constant: f64,
    a: &Array1<f64>,
    alpha_prev: f64,
) -> f64 {
    let b = a[j] + a[j - 1];
    let c = a[j] - a[j - 1];
    let mid = grid.coord.midpoint(0.5 * (grid.x[j] + grid.x[j - 1]));
    let cosmological = 1.0 - cosmological_constant * mid.radius * mid.radius;
    let d = (1.0 - 0.25 * b * b * cosmological) / (2.0 * mid.slicing_radius())
        - grid.inv_dx * c / b;
    alpha_prev * (1.0 - d * grid.dx) / (1.0 + d * grid.dx)
}

/// Integrate the lapse over the whole grid; α_0 = 1 before any rescaling.
pub fn solve_lapse(
    grid: &GridParameters,
    cosmological_constant: f64,
    a: &Array1<f64>,
    alpha: &mut Array1<f64>,
) {
    alpha[0] = 1.0;
    for j in 1..grid.num_points {
        alpha[j] = lapse_point(j, grid, cosmological_constant, a, alpha[j - 1]);
    }
}
