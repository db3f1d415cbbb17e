// ─────────────────────────────────────────────────────────────────────
// SF Collapse — Grid
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Radial coordinate mappings and the precomputed 1D grid.
//!
//! The computational coordinate x is uniform, x_j = j·dx, with x_0 = 0 at
//! the origin and x_{N-1} at the outer boundary. Every finite-difference
//! formula that depends on the mapping goes through [`CoordSystem`], so the
//! solvers are written once for both mappings.

use crate::constants::MIN_GRID_POINTS;
use crate::error::{CollapseError, CollapseResult};
use ndarray::Array1;

/// Radial coordinate mapping r(x).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordSystem {
    /// r = x, x ∈ [0, r_max].
    Spherical,
    /// r = A sinh(x/W) / sinh(1/W), x ∈ [0, 1].
    /// Clusters resolution near the origin; r(1) = A.
    SinhSpherical { amplitude: f64, width: f64 },
}

/// Mapping quantities evaluated at a cell midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Midpoint {
    /// Physical radius r(x_mid).
    pub radius: f64,
    /// dr/dx at x_mid.
    pub jacobian: f64,
}

impl Midpoint {
    /// r'/(2r): coefficient of the (a² - 1) term in the Hamiltonian constraint.
    pub fn half_inverse_radius(&self) -> f64 {
        0.5 * self.jacobian / self.radius
    }

    /// r/r': the effective radius entering the polar slicing recurrence.
    pub fn slicing_radius(&self) -> f64 {
        self.radius / self.jacobian
    }
}

impl CoordSystem {
    /// Parse a coordinate-system tag from configuration.
    pub fn parse(tag: &str, amplitude: f64, width: f64) -> CollapseResult<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "spherical" => Ok(CoordSystem::Spherical),
            "sinh_spherical" | "sinhspherical" => {
                if !amplitude.is_finite() || amplitude <= 0.0 {
                    return Err(CollapseError::ConfigError(format!(
                        "sinh_amplitude must be finite and > 0, got {amplitude}"
                    )));
                }
                if !width.is_finite() || width <= 0.0 {
                    return Err(CollapseError::ConfigError(format!(
                        "sinh_width must be finite and > 0, got {width}"
                    )));
                }
                Ok(CoordSystem::SinhSpherical { amplitude, width })
            }
            other => Err(CollapseError::UnsupportedCoordSystem(other.to_string())),
        }
    }

    /// 1/W for the compactified mapping.
    pub fn inverse_width(&self) -> Option<f64> {
        match *self {
            CoordSystem::Spherical => None,
            CoordSystem::SinhSpherical { width, .. } => Some(1.0 / width),
        }
    }

    /// Upper end of the computational domain.
    pub fn x_max(&self, r_max: f64) -> f64 {
        match self {
            CoordSystem::Spherical => r_max,
            CoordSystem::SinhSpherical { .. } => 1.0,
        }
    }

    /// Physical radius r(x).
    pub fn radius(&self, x: f64) -> f64 {
        match *self {
            CoordSystem::Spherical => x,
            CoordSystem::SinhSpherical { amplitude, width } => {
                amplitude * (x / width).sinh() / (1.0 / width).sinh()
            }
        }
    }

    /// dr/dx.
    pub fn jacobian(&self, x: f64) -> f64 {
        match *self {
            CoordSystem::Spherical => 1.0,
            CoordSystem::SinhSpherical { amplitude, width } => {
                amplitude * (x / width).cosh() / (width * (1.0 / width).sinh())
            }
        }
    }

    /// Volume-element weight: r² (Spherical) or sinh²(x/W) (SinhSpherical).
    /// The two agree up to a constant factor.
    pub fn shape_factor(&self, x: f64) -> f64 {
        match *self {
            CoordSystem::Spherical => x * x,
            CoordSystem::SinhSpherical { width, .. } => (x / width).sinh().powi(2),
        }
    }

    pub fn midpoint(&self, x_mid: f64) -> Midpoint {
        Midpoint {
            radius: self.radius(x_mid),
            jacobian: self.jacobian(x_mid),
        }
    }

    /// Centred ∂_r f at x_j from the neighbours f_{j-1}, f_{j+1}.
    pub fn gradient(&self, x_j: f64, inv_dx: f64, f_jm1: f64, f_jp1: f64) -> f64 {
        0.5 * inv_dx * (f_jp1 - f_jm1) / self.jacobian(x_j)
    }

    /// Backward 3-point ∂_r f at x_j from f_j, f_{j-1}, f_{j-2}.
    pub fn backward_gradient(&self, x_j: f64, inv_dx: f64, f_j: f64, f_jm1: f64, f_jm2: f64) -> f64 {
        0.5 * inv_dx * (3.0 * f_j - 4.0 * f_jm1 + f_jm2) / self.jacobian(x_j)
    }

    /// Centred spherical divergence (1/S) ∂_r g at x_j, where g = S·f has
    /// already been weighted with [`Self::shape_factor`].
    ///
    /// The Spherical form is the volume-weighted 3(g_{j+1} - g_{j-1})/(r³_{j+1} - r³_{j-1}).
    pub fn divergence(
        &self,
        x_jm1: f64,
        x_j: f64,
        x_jp1: f64,
        inv_dx: f64,
        g_jm1: f64,
        g_jp1: f64,
    ) -> f64 {
        match self {
            CoordSystem::Spherical => {
                3.0 * (g_jp1 - g_jm1) / (x_jp1.powi(3) - x_jm1.powi(3))
            }
            CoordSystem::SinhSpherical { .. } => {
                0.5 * inv_dx * (g_jp1 - g_jm1) / (self.jacobian(x_j) * self.shape_factor(x_j))
            }
        }
    }

    /// One-sided counterpart of [`Self::divergence`] at the outer edge.
    pub fn backward_divergence(
        &self,
        x_jm2: f64,
        x_j: f64,
        inv_dx: f64,
        g_j: f64,
        g_jm1: f64,
        g_jm2: f64,
    ) -> f64 {
        let stencil = 3.0 * g_j - 4.0 * g_jm1 + g_jm2;
        match self {
            CoordSystem::Spherical => 3.0 * stencil / (x_j.powi(3) - x_jm2.powi(3)),
            CoordSystem::SinhSpherical { .. } => {
                0.5 * inv_dx * stencil / (self.jacobian(x_j) * self.shape_factor(x_j))
            }
        }
    }
}

/// Immutable per-run grid: index 0 is the origin, index N-1 the outer boundary.
#[derive(Debug, Clone)]
pub struct GridParameters {
    pub num_points: usize,
    pub coord: CoordSystem,
    pub dx: f64,
    pub inv_dx: f64,
    pub dt: f64,
    /// Computational coordinate x_j.
    pub x: Array1<f64>,
    /// Physical radius r(x_j).
    pub r: Array1<f64>,
}

impl GridParameters {
    /// Build the grid. `r_max` is only used by the Spherical mapping; the
    /// time step is `courant` times the innermost physical spacing.
    pub fn new(
        num_points: usize,
        coord: CoordSystem,
        r_max: f64,
        courant: f64,
    ) -> CollapseResult<Self> {
        if num_points < MIN_GRID_POINTS {
            return Err(CollapseError::ConfigError(format!(
                "grid requires at least {MIN_GRID_POINTS} points, got {num_points}"
            )));
        }
        if !courant.is_finite() || courant <= 0.0 {
            return Err(CollapseError::ConfigError(format!(
                "courant factor must be finite and > 0, got {courant}"
            )));
        }
        if coord == CoordSystem::Spherical && (!r_max.is_finite() || r_max <= 0.0) {
            return Err(CollapseError::ConfigError(format!(
                "r_max must be finite and > 0, got {r_max}"
            )));
        }

        let x_max = coord.x_max(r_max);
        let dx = x_max / (num_points - 1) as f64;
        let x = Array1::from_shape_fn(num_points, |j| j as f64 * dx);
        let r = x.mapv(|xj| coord.radius(xj));
        let dt = courant * (r[1] - r[0]);

        Ok(GridParameters {
            num_points,
            coord,
            dx,
            inv_dx: 1.0 / dx,
            dt,
            x,
            r,
        })
    }

    /// Index J of the outer boundary.
    pub fn outer_index(&self) -> usize {
        self.num_points - 1
    }
}
