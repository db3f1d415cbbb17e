// ─────────────────────────────────────────────────────────────────────
// SF Collapse — Boundary Conditions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Origin regularity and the outgoing-radiation condition at the outer edge.

use crate::stepper::StepCoefficients;
use collapse_types::grid::GridParameters;
use collapse_types::state::FieldSet;

/// Φ is odd and Π even about r = 0: Φ_0 = 0 and Π_0 from a quadratic fit
/// through Π_1, Π_2.
pub fn apply_origin_regularity(fields: &mut FieldSet) {
    fields.big_phi.next_mut()[0] = 0.0;
    let pi = fields.pi.next_mut();
    pi[0] = (4.0 * pi[1] - pi[2]) / 3.0;
}

/// Sommerfeld condition ∂_t φ + ∂_r φ + φ/r = 0 at j = N-1.
///
/// Must run after the interior update: Φ at the edge is differentiated from
/// the freshly advanced φ at N-1, N-2, N-3. Reads a, α only at the current
/// level.
pub fn apply_outgoing_radiation(n: usize, grid: &GridParameters, fields: &mut FieldSet) {
    let coef = StepCoefficients::for_step(n, grid.dt).leapfrog;
    let coord = &grid.coord;
    let x = &grid.x;
    let edge = grid.outer_index();

    let rhs_pi = {
        let a = fields.a.current();
        let alpha = fields.alpha.current();
        let big_phi = fields.big_phi.current();
        let weighted = |k: usize| coord.shape_factor(x[k]) * alpha[k] * big_phi[k] / a[k];
        coord.backward_divergence(
            x[edge - 2],
            x[edge],
            grid.inv_dx,
            weighted(edge),
            weighted(edge - 1),
            weighted(edge - 2),
        )
    };

    let (phi_prev, phi_cur, phi_next) = fields.phi.split_mut();
    let rhs_phi = -phi_cur[edge] / grid.r[edge]
        - coord.backward_gradient(
            x[edge],
            grid.inv_dx,
            phi_cur[edge],
            phi_cur[edge - 1],
            phi_cur[edge - 2],
        );
    phi_next[edge] = phi_prev[edge] + coef * rhs_phi;

    fields.big_phi.next_mut()[edge] = coord.backward_gradient(
        x[edge],
        grid.inv_dx,
        phi_next[edge],
        phi_next[edge - 1],
        phi_next[edge - 2],
    );

    let (pi_prev, _, pi_next) = fields.pi.split_mut();
    pi_next[edge] = pi_prev[edge] + coef * rhs_pi;
}
