// ─────────────────────────────────────────────────────────────────────
// SF Collapse — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::Array1;

/// A named scalar field sampled on the radial grid at three time levels.
///
/// The levels live in a fixed ring of three owned buffers. `head` points at
/// the previous level; current and next follow it around the ring, so a
/// rotation is an index bump with no copying.
#[derive(Debug, Clone)]
pub struct GridFunction {
    name: String,
    levels: [Array1<f64>; 3],
    head: usize,
}

impl GridFunction {
    pub fn new(name: &str, num_points: usize) -> Self {
        GridFunction {
            name: name.to_string(),
            levels: [
                Array1::zeros(num_points),
                Array1::zeros(num_points),
                Array1::zeros(num_points),
            ],
            head: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.levels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn previous(&self) -> &Array1<f64> {
        &self.levels[self.head]
    }

    pub fn current(&self) -> &Array1<f64> {
        &self.levels[(self.head + 1) % 3]
    }

    pub fn next(&self) -> &Array1<f64> {
        &self.levels[(self.head + 2) % 3]
    }

    pub fn previous_mut(&mut self) -> &mut Array1<f64> {
        &mut self.levels[self.head]
    }

    pub fn next_mut(&mut self) -> &mut Array1<f64> {
        &mut self.levels[(self.head + 2) % 3]
    }

    /// Disjoint borrows of (previous, current, next).
    pub fn split_mut(&mut self) -> (&Array1<f64>, &Array1<f64>, &mut Array1<f64>) {
        let [l0, l1, l2] = &mut self.levels;
        match self.head {
            0 => (&*l0, &*l1, l2),
            1 => (&*l1, &*l2, l0),
            _ => (&*l2, &*l0, l1),
        }
    }

    /// Copy the previous level into the current one. Used once, before the
    /// self-starting first step, when only one level has been populated.
    pub fn prime_current(&mut self) {
        let [l0, l1, l2] = &mut self.levels;
        let (src, dst) = match self.head {
            0 => (&*l0, l1),
            1 => (&*l1, l2),
            _ => (&*l2, l0),
        };
        dst.assign(src);
    }

    /// next → current → previous; the old previous buffer becomes next.
    pub fn rotate(&mut self) {
        self.head = (self.head + 1) % 3;
    }
}

/// The five evolved and derived fields of the spherical scalar-field system.
#[derive(Debug, Clone)]
pub struct FieldSet {
    /// Scalar potential.
    pub phi: GridFunction,
    /// Radial derivative proxy, Φ = ∂_r φ.
    pub big_phi: GridFunction,
    /// Time derivative proxy, Π = (a/α) ∂_t φ.
    pub pi: GridFunction,
    /// Metric variable a, solved from the Hamiltonian constraint.
    pub a: GridFunction,
    /// Lapse α, solved from the polar slicing condition.
    pub alpha: GridFunction,
}

impl FieldSet {
    pub fn new(num_points: usize) -> Self {
        FieldSet {
            phi: GridFunction::new("phi", num_points),
            big_phi: GridFunction::new("Phi", num_points),
            pi: GridFunction::new("Pi", num_points),
            a: GridFunction::new("a", num_points),
            alpha: GridFunction::new("alpha", num_points),
        }
    }

    pub fn num_points(&self) -> usize {
        self.phi.len()
    }

    pub fn prime_current(&mut self) {
        for gf in self.iter_mut() {
            gf.prime_current();
        }
    }

    pub fn rotate(&mut self) {
        for gf in self.iter_mut() {
            gf.rotate();
        }
    }

    fn iter_mut(&mut self) -> [&mut GridFunction; 5] {
        [
            &mut self.phi,
            &mut self.big_phi,
            &mut self.pi,
            &mut self.a,
            &mut self.alpha,
        ]
    }
}

/// Per-step summary emitted by the evolution driver.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub step: usize,
    pub time: f64,
    /// φ at the origin.
    pub central_phi: f64,
    /// α at the origin.
    pub central_lapse: f64,
    /// Largest metric value on the grid; grows sharply near horizon formation.
    pub max_metric: f64,
    /// Grid points whose Newton solve hit the iteration budget this step.
    pub newton_failures: usize,
    /// Lapse rescaling factor, when a rescaling ran this step.
    pub kappa: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_function_initialization() {
        let gf = GridFunction::new("phi", 64);
        assert_eq!(gf.name(), "phi");
        assert_eq!(gf.len(), 64);
        assert!(gf.previous().iter().all(|&v| v == 0.0));
        assert!(gf.current().iter().all(|&v| v == 0.0));
        assert!(gf.next().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rotation_cycles_levels() {
        let mut gf = GridFunction::new("Pi", 4);
        gf.previous_mut().fill(1.0);
        gf.split_mut().2.fill(3.0);
        {
            let (_, _, next) = gf.split_mut();
            next[0] = 3.5;
        }
        gf.rotate();
        // old next is now current, old current (zeros) is now previous
        assert_eq!(gf.current()[0], 3.5);
        assert_eq!(gf.current()[1], 3.0);
        assert_eq!(gf.previous()[0], 0.0);
        // old previous buffer is recycled as next
        assert_eq!(gf.next()[0], 1.0);

        // three rotations return to the same ring position
        gf.rotate();
        gf.rotate();
        gf.rotate();
        assert_eq!(gf.current()[0], 3.5);
    }

    #[test]
    fn test_split_mut_matches_accessors_for_every_head() {
        let mut gf = GridFunction::new("a", 3);
        for _ in 0..3 {
            gf.previous_mut().fill(1.0);
            gf.next_mut().fill(2.0);
            let (prev, cur, next) = gf.split_mut();
            assert_eq!(prev[0], 1.0);
            assert_eq!(cur[0], 0.0);
            assert_eq!(next[0], 2.0);
            next.fill(0.0);
            gf.previous_mut().fill(0.0);
            gf.rotate();
        }
    }

    #[test]
    fn test_prime_current_copies_previous() {
        let mut gf = GridFunction::new("alpha", 5);
        gf.rotate();
        gf.previous_mut().fill(0.75);
        gf.prime_current();
        assert!(gf.current().iter().all(|&v| v == 0.75));
        assert!(gf.next().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_field_set_rotates_together() {
        let mut fields = FieldSet::new(8);
        assert_eq!(fields.num_points(), 8);
        fields.phi.next_mut().fill(1.0);
        fields.alpha.next_mut().fill(2.0);
        fields.rotate();
        assert_eq!(fields.phi.current()[3], 1.0);
        assert_eq!(fields.alpha.current()[3], 2.0);
        assert_eq!(fields.big_phi.name(), "Phi");
    }
}
