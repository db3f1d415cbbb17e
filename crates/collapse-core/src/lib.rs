//! Time-evolution engine for a self-gravitating scalar field in spherical symmetry.
//!
//! Per step: hyperbolic update of φ, Φ, Π; boundary conditions; pointwise
//! Newton solve of the Hamiltonian constraint for a; polar slicing
//! recurrence for α; optional lapse rescaling.

pub mod boundary;
pub mod constraint;
pub mod evolution;
pub mod initial;
pub mod rescale;
pub mod slicing;
pub mod stepper;
