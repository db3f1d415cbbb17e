// ─────────────────────────────────────────────────────────────────────
// SF Collapse — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Newton tolerance on |ΔA| for the Hamiltonian constraint, A = ln(a).
pub const NEWTON_TOL: f64 = 1e-10;

/// Newton iteration budget per grid point.
pub const NEWTON_MAX_ITER: usize = 10;

/// Largest Newton update of A = ln(a) accepted in a single iteration.
/// Keeps exp(A) finite when the iteration runs away.
pub const NEWTON_MAX_STEP: f64 = 1.0;

/// Default Courant factor: dt = courant * (smallest radial spacing).
pub const COURANT_DEFAULT: f64 = 0.5;

/// Smallest grid that still fits the 3-point one-sided outer stencil
/// plus one interior point.
pub const MIN_GRID_POINTS: usize = 4;

/// Default file receiving one `<initial_kappa> <final_kappa>` line per rescaling.
pub const RESCALING_LOG_DEFAULT: &str = "rescaling_values.dat";
