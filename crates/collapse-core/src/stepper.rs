// ─────────────────────────────────────────────────────────────────────
// SF Collapse — Hyperbolic Stepper
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Interior update of the matter fields φ, Φ, Π.
//!
//! Φ and Π use a leapfrog (previous level + coefficient × centred RHS at the
//! current level); φ uses a two-level Adams–Bashforth rule. The first two
//! steps use reduced coefficients so the scheme starts from a single level.
//! Every interior point reads only the previous and current levels, so the
//! update is parallelized over grid points with rayon.

use collapse_types::grid::GridParameters;
use collapse_types::state::FieldSet;
use ndarray::Array1;
use rayon::prelude::*;

/// Time-step multipliers for step index n.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepCoefficients {
    /// Adams–Bashforth coefficient for φ: ½dt at n = 0, dt afterwards.
    pub phi: f64,
    /// Leapfrog coefficient for Φ, Π: ½dt, dt, then 2dt from n = 2.
    pub leapfrog: f64,
}

impl StepCoefficients {
    pub fn for_step(n: usize, dt: f64) -> Self {
        let leapfrog = match n {
            0 => 0.5 * dt,
            1 => dt,
            _ => 2.0 * dt,
        };
        let phi = if n == 0 { 0.5 * dt } else { dt };
        StepCoefficients { phi, leapfrog }
    }
}

/// Read-only view of one time level.
#[derive(Clone, Copy)]
struct Level<'a> {
    phi: &'a Array1<f64>,
    big_phi: &'a Array1<f64>,
    pi: &'a Array1<f64>,
    a: &'a Array1<f64>,
    alpha: &'a Array1<f64>,
}

impl Level<'_> {
    /// αΠ/a, the flux appearing in ∂_t φ and ∂_t Φ.
    fn momentum_flux(&self, j: usize) -> f64 {
        self.alpha[j] * self.pi[j] / self.a[j]
    }

    /// αΦ/a, the flux appearing in ∂_t Π.
    fn gradient_flux(&self, j: usize) -> f64 {
        self.alpha[j] * self.big_phi[j] / self.a[j]
    }
}

fn advance_phi(j: usize, coeffs: &StepCoefficients, prev: &Level, cur: &Level) -> f64 {
    cur.phi[j] + coeffs.phi * (1.5 * cur.momentum_flux(j) - 0.5 * prev.momentum_flux(j))
}

/// New (φ, Φ, Π) at an interior point 1 ≤ j ≤ N-2.
fn interior_point(
    j: usize,
    grid: &GridParameters,
    coeffs: &StepCoefficients,
    prev: &Level,
    cur: &Level,
) -> (f64, f64, f64) {
    let coord = &grid.coord;
    let x = &grid.x;

    let phi = advance_phi(j, coeffs, prev, cur);

    let rhs_big_phi = coord.gradient(
        x[j],
        grid.inv_dx,
        cur.momentum_flux(j - 1),
        cur.momentum_flux(j + 1),
    );
    let big_phi = prev.big_phi[j] + coeffs.leapfrog * rhs_big_phi;

    let weighted = |k: usize| coord.shape_factor(x[k]) * cur.gradient_flux(k);
    let rhs_pi = coord.divergence(
        x[j - 1],
        x[j],
        x[j + 1],
        grid.inv_dx,
        weighted(j - 1),
        weighted(j + 1),
    );
    let pi = prev.pi[j] + coeffs.leapfrog * rhs_pi;

    (phi, big_phi, pi)
}

/// Fill the next level of φ, Φ, Π at 1 ≤ j ≤ N-2, and φ at the origin.
///
/// Φ, Π at j = 0 and all of j = N-1 are left to the boundary module.
pub fn advance_matter(n: usize, grid: &GridParameters, fields: &mut FieldSet) {
    let coeffs = StepCoefficients::for_step(n, grid.dt);
    let num_points = grid.num_points;

    let (phi_prev, phi_cur, phi_next) = fields.phi.split_mut();
    let (big_phi_prev, big_phi_cur, big_phi_next) = fields.big_phi.split_mut();
    let (pi_prev, pi_cur, pi_next) = fields.pi.split_mut();
    let prev = Level {
        phi: phi_prev,
        big_phi: big_phi_prev,
        pi: pi_prev,
        a: fields.a.previous(),
        alpha: fields.alpha.previous(),
    };
    let cur = Level {
        phi: phi_cur,
        big_phi: big_phi_cur,
        pi: pi_cur,
        a: fields.a.current(),
        alpha: fields.alpha.current(),
    };

    let updates: Vec<(f64, f64, f64)> = (1..num_points - 1)
        .into_par_iter()
        .map(|j| interior_point(j, grid, &coeffs, &prev, &cur))
        .collect();

    for (j, (phi, big_phi, pi)) in (1..num_points - 1).zip(updates) {
        phi_next[j] = phi;
        big_phi_next[j] = big_phi;
        pi_next[j] = pi;
    }
    phi_next[0] = advance_phi(0, &coeffs, &prev, &cur);
}
