// ─────────────────────────────────────────────────────────────────────
// SF Collapse — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::{
    COURANT_DEFAULT, NEWTON_MAX_ITER, NEWTON_MAX_STEP, NEWTON_TOL, RESCALING_LOG_DEFAULT,
};
use crate::error::{CollapseError, CollapseResult};
use crate::grid::{CoordSystem, GridParameters};
use serde::{Deserialize, Serialize};

/// Top-level run configuration, loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_run_name")]
    pub run_name: String,
    pub grid: GridConfig,
    pub physics: PhysicsConfig,
    pub evolution: EvolutionConfig,
    #[serde(default)]
    pub newton: NewtonConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub num_points: usize,
    /// "spherical" or "sinh_spherical"
    pub coord_system: String,
    /// Outer radius of the Spherical mapping.
    #[serde(default)]
    pub r_max: f64,
    /// Outer radius A of the SinhSpherical mapping.
    #[serde(default)]
    pub sinh_amplitude: f64,
    /// Clustering width W of the SinhSpherical mapping.
    #[serde(default)]
    pub sinh_width: f64,
    #[serde(default = "default_courant")]
    pub courant: f64,
}

/// Amplitude, width and centre of one radial pulse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulseConfig {
    pub amplitude: f64,
    pub width: f64,
    pub center: f64,
}

impl Default for PulseConfig {
    fn default() -> Self {
        PulseConfig {
            amplitude: 0.0,
            width: 1.0,
            center: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// "gaussian_shell", "gaussian_shell_r3", "tanh_shell" or "double_tanh_shell"
    pub profile: String,
    pub pulse: PulseConfig,
    /// Second Gaussian pulse, or the outer wall of the double tanh shell.
    #[serde(default)]
    pub second_pulse: PulseConfig,
    /// +1 for a normal field, -1 for a phantom field.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default)]
    pub cosmological_constant: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub num_steps: usize,
    #[serde(default = "default_true")]
    pub lapse_rescaling: bool,
    /// Rescale with the maximum of a/α instead of the minimum (phantom fields only).
    #[serde(default)]
    pub invert_rescaling: bool,
    /// Rescale every this many steps; 0 disables rescaling during evolution.
    #[serde(default = "default_one")]
    pub rescale_every: usize,
    #[serde(default = "default_rescaling_log")]
    pub rescaling_log: String,
    #[serde(default = "default_one")]
    pub output_every: usize,
    #[serde(default = "default_output_file")]
    pub output_file: String,
}

/// Newton–Raphson settings for the pointwise Hamiltonian constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewtonConfig {
    #[serde(default = "default_newton_tol")]
    pub tolerance: f64,
    /// Total Newton updates per grid point, counting the first. A point
    /// that exhausts the budget reports exactly this many iterations.
    #[serde(default = "default_newton_max_iter")]
    pub max_iterations: usize,
    #[serde(default = "default_newton_max_step")]
    pub max_step: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        NewtonConfig {
            tolerance: NEWTON_TOL,
            max_iterations: NEWTON_MAX_ITER,
            max_step: NEWTON_MAX_STEP,
        }
    }
}

fn default_run_name() -> String {
    "sfcollapse".to_string()
}
fn default_courant() -> f64 {
    COURANT_DEFAULT
}
fn default_epsilon() -> f64 {
    1.0
}
fn default_true() -> bool {
    true
}
fn default_one() -> usize {
    1
}
fn default_rescaling_log() -> String {
    RESCALING_LOG_DEFAULT.to_string()
}
fn default_output_file() -> String {
    "central_values.dat".to_string()
}
fn default_newton_tol() -> f64 {
    NEWTON_TOL
}
fn default_newton_max_iter() -> usize {
    NEWTON_MAX_ITER
}
fn default_newton_max_step() -> f64 {
    NEWTON_MAX_STEP
}

/// Closed-form initial profile for φ(r, 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialProfile {
    /// φ0 exp(-(r-r0)²/δ²), plus an optional second pulse.
    GaussianShell,
    /// φ0 r³ exp(-(r-r0)²/δ²); regular at the origin.
    GaussianShellR3,
    /// φ0 (1 - tanh((r-r0)²/δ²)).
    TanhShell,
    /// ½ φ0 (tanh((r-r01)/δ) - tanh((r-r02)/δ)).
    DoubleTanhShell,
}

impl InitialProfile {
    pub fn parse(tag: &str) -> CollapseResult<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "gaussian_shell" => Ok(InitialProfile::GaussianShell),
            "gaussian_shell_r3" | "gaussian_shell_v2" => Ok(InitialProfile::GaussianShellR3),
            "tanh_shell" => Ok(InitialProfile::TanhShell),
            "double_tanh_shell" => Ok(InitialProfile::DoubleTanhShell),
            other => Err(CollapseError::UnsupportedProfile(other.to_string())),
        }
    }
}

/// Which extremum of a/α normalizes the lapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescalingMode {
    /// κ = min a/α; normal fields.
    Minimum,
    /// κ = max a/α; phantom fields only.
    Maximum,
}

impl RescalingMode {
    /// The inverted (maximum) mode requires epsilon == -1 exactly.
    pub fn select(invert: bool, epsilon: f64) -> CollapseResult<Self> {
        if !invert {
            return Ok(RescalingMode::Minimum);
        }
        if epsilon != -1.0 {
            return Err(CollapseError::InvalidRescaling { epsilon });
        }
        Ok(RescalingMode::Maximum)
    }
}

/// Validated physical parameters consumed by the evolution engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalParams {
    pub profile: InitialProfile,
    pub pulse: PulseConfig,
    pub second_pulse: PulseConfig,
    pub epsilon: f64,
    pub cosmological_constant: f64,
}

impl PhysicalParams {
    /// Normal field, no cosmological constant, single pulse.
    pub fn new(profile: InitialProfile, pulse: PulseConfig) -> Self {
        PhysicalParams {
            profile,
            pulse,
            second_pulse: PulseConfig::default(),
            epsilon: 1.0,
            cosmological_constant: 0.0,
        }
    }
}

impl PhysicsConfig {
    pub fn params(&self) -> CollapseResult<PhysicalParams> {
        let profile = InitialProfile::parse(&self.profile)?;
        if self.epsilon != 1.0 && self.epsilon != -1.0 {
            return Err(CollapseError::ConfigError(format!(
                "epsilon must be +1 (normal) or -1 (phantom), got {}",
                self.epsilon
            )));
        }
        if !self.cosmological_constant.is_finite() {
            return Err(CollapseError::ConfigError(format!(
                "cosmological_constant must be finite, got {}",
                self.cosmological_constant
            )));
        }
        for (label, pulse) in [("pulse", &self.pulse), ("second_pulse", &self.second_pulse)] {
            if !pulse.amplitude.is_finite() || !pulse.center.is_finite() {
                return Err(CollapseError::ConfigError(format!(
                    "{label} amplitude and center must be finite"
                )));
            }
            if !pulse.width.is_finite() || pulse.width <= 0.0 {
                return Err(CollapseError::ConfigError(format!(
                    "{label} width must be finite and > 0, got {}",
                    pulse.width
                )));
            }
        }
        Ok(PhysicalParams {
            profile,
            pulse: self.pulse,
            second_pulse: self.second_pulse,
            epsilon: self.epsilon,
            cosmological_constant: self.cosmological_constant,
        })
    }
}

impl NewtonConfig {
    pub fn validate(&self) -> CollapseResult<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(CollapseError::ConfigError(format!(
                "newton tolerance must be finite and > 0, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(CollapseError::ConfigError(
                "newton max_iterations must be >= 1".to_string(),
            ));
        }
        if !self.max_step.is_finite() || self.max_step <= 0.0 {
            return Err(CollapseError::ConfigError(format!(
                "newton max_step must be finite and > 0, got {}",
                self.max_step
            )));
        }
        Ok(())
    }
}

impl SimulationConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> CollapseResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn coord_system(&self) -> CollapseResult<CoordSystem> {
        CoordSystem::parse(
            &self.grid.coord_system,
            self.grid.sinh_amplitude,
            self.grid.sinh_width,
        )
    }

    /// Build the radial grid described by this config.
    pub fn create_grid(&self) -> CollapseResult<GridParameters> {
        GridParameters::new(
            self.grid.num_points,
            self.coord_system()?,
            self.grid.r_max,
            self.grid.courant,
        )
    }

    pub fn profile(&self) -> CollapseResult<InitialProfile> {
        InitialProfile::parse(&self.physics.profile)
    }

    pub fn physical_params(&self) -> CollapseResult<PhysicalParams> {
        self.physics.params()
    }

    /// `None` when lapse rescaling is disabled.
    pub fn rescaling_mode(&self) -> CollapseResult<Option<RescalingMode>> {
        let mode = RescalingMode::select(self.evolution.invert_rescaling, self.physics.epsilon)?;
        Ok(self.evolution.lapse_rescaling.then_some(mode))
    }

    /// Check every field that is only interpreted later in the run.
    pub fn validate(&self) -> CollapseResult<()> {
        self.create_grid()?;
        self.physical_params()?;
        self.rescaling_mode()?;
        self.newton.validate()?;
        if self.evolution.output_every == 0 {
            return Err(CollapseError::ConfigError(
                "output_every must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
