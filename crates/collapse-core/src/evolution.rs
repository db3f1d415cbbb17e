// ─────────────────────────────────────────────────────────────────────
// SF Collapse — Evolution Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Owns the grid and the three-level field storage and advances them.
//!
//! One step, for step index n:
//! 1. n = 0 only: copy the initial level into the current one.
//! 2. Interior update of φ, Φ, Π.
//! 3. Origin regularity, then the outgoing-radiation edge.
//! 4. Constraint solve for a, seeded with a at the current level.
//! 5. Polar slicing for α.
//! 6. Lapse rescaling on its cadence.
//! 7. Rotate the levels.

use crate::boundary::{apply_origin_regularity, apply_outgoing_radiation};
use crate::constraint::solve_metric;
use crate::initial::set_initial_data;
use crate::rescale::LapseRescaler;
use crate::slicing::solve_lapse;
use crate::stepper::{advance_matter, StepCoefficients};
use collapse_types::config::{NewtonConfig, PhysicalParams, SimulationConfig};
use collapse_types::error::CollapseResult;
use collapse_types::grid::GridParameters;
use collapse_types::state::{FieldSet, StepReport};

pub struct Evolution {
    grid: GridParameters,
    params: PhysicalParams,
    newton: NewtonConfig,
    rescaler: Option<LapseRescaler>,
    rescale_every: usize,
    fields: FieldSet,
    step: usize,
    time: f64,
}

impl Evolution {
    /// Build the field storage and solve the initial data.
    ///
    /// `rescale_every = 0` disables rescaling during the run; the initial
    /// rescaling still happens whenever a rescaler is supplied.
    pub fn new(
        grid: GridParameters,
        params: PhysicalParams,
        newton: NewtonConfig,
        rescaler: Option<LapseRescaler>,
        rescale_every: usize,
    ) -> CollapseResult<Self> {
        newton.validate()?;
        let mut fields = FieldSet::new(grid.num_points);
        set_initial_data(&grid, &params, &newton, rescaler.as_ref(), &mut fields)?;
        Ok(Evolution {
            grid,
            params,
            newton,
            rescaler,
            rescale_every,
            fields,
            step: 0,
            time: 0.0,
        })
    }

    pub fn from_config(config: &SimulationConfig) -> CollapseResult<Self> {
        config.validate()?;
        let grid = config.create_grid()?;
        let params = config.physical_params()?;
        let rescaler = config
            .rescaling_mode()?
            .map(|mode| LapseRescaler::new(mode, params.epsilon, &config.evolution.rescaling_log))
            .transpose()?;
        Self::new(
            grid,
            params,
            config.newton,
            rescaler,
            config.evolution.rescale_every,
        )
    }

    pub fn grid(&self) -> &GridParameters {
        &self.grid
    }

    pub fn params(&self) -> &PhysicalParams {
        &self.params
    }

    /// Fields after the last completed step; the newest data is the
    /// `current()` level once at least one step has run, `previous()` before.
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Number of completed steps.
    pub fn step_index(&self) -> usize {
        self.step
    }

    /// Time reached by φ.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Newest metric profile.
    pub fn metric(&self) -> &ndarray::Array1<f64> {
        if self.step == 0 {
            self.fields.a.previous()
        } else {
            self.fields.a.current()
        }
    }

    /// Newest lapse profile.
    pub fn lapse(&self) -> &ndarray::Array1<f64> {
        if self.step == 0 {
            self.fields.alpha.previous()
        } else {
            self.fields.alpha.current()
        }
    }

    /// Newest scalar field profile.
    pub fn scalar_field(&self) -> &ndarray::Array1<f64> {
        if self.step == 0 {
            self.fields.phi.previous()
        } else {
            self.fields.phi.current()
        }
    }

    fn rescale_due(&self, n: usize) -> bool {
        self.rescale_every > 0 && (n + 1) % self.rescale_every == 0
    }

    /// Advance one time step.
    ///
    /// The outer boundary runs before the constraint and slicing solves: it
    /// reads only current-level a and α, so the solves then see final Φ, Π
    /// at the edge.
    pub fn step(&mut self) -> CollapseResult<StepReport> {
        let n = self.step;
        if n == 0 {
            self.fields.prime_current();
        }

        advance_matter(n, &self.grid, &mut self.fields);
        apply_origin_regularity(&mut self.fields);
        apply_outgoing_radiation(n, &self.grid, &mut self.fields);

        let newton_failures = {
            let (_, a_cur, a_next) = self.fields.a.split_mut();
            solve_metric(
                &self.grid,
                &self.params,
                &self.newton,
                self.fields.big_phi.next(),
                self.fields.pi.next(),
                Some(a_cur),
                a_next,
            )
        };
        if newton_failures > 0 {
            log::warn!("step {n}: {newton_failures} constraint points did not converge");
        }

        solve_lapse(
            &self.grid,
            self.params.cosmological_constant,
            self.fields.a.next(),
            self.fields.alpha.next_mut(),
        );

        let due = self.rescale_due(n);
        let kappa = match &self.rescaler {
            Some(rescaler) if due => {
                Some(rescaler.rescale(self.fields.a.next(), self.fields.alpha.next_mut())?)
            }
            _ => None,
        };

        self.time += StepCoefficients::for_step(n, self.grid.dt).phi;
        self.step += 1;

        let report = StepReport {
            step: self.step,
            time: self.time,
            central_phi: self.fields.phi.next()[0],
            central_lapse: self.fields.alpha.next()[0],
            max_metric: self
                .fields
                .a
                .next()
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max),
            newton_failures,
            kappa,
        };
        self.fields.rotate();
        Ok(report)
    }

    /// Run `num_steps` steps, handing each report to `on_step`.
    pub fn run<F>(&mut self, num_steps: usize, mut on_step: F) -> CollapseResult<()>
    where
        F: FnMut(&StepReport, &Self) -> CollapseResult<()>,
    {
        for _ in 0..num_steps {
            let report = self.step()?;
            on_step(&report, self)?;
        }
        Ok(())
    }
}
