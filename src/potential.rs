use rayon::prelude::*;

use crate::particle::{Particle, Species};

/// Cutoff radius in units of sigma, when the cutoff is requested.
const CUTOFF_FACTOR: f64 = 2.5;

/// Precomputed Lennard-Jones coefficients for one species pair.
#[derive(Clone, Copy, Debug)]
pub struct LjCoeff {
    epsilon: f64,
    sigma: f64,
    sigma6: f64,
    rcut2: f64,
}
impl LjCoeff {
    fn new(epsilon: f64, sigma: f64) -> Self {
        let sigma6 = sigma * sigma * sigma * sigma * sigma * sigma;
        let rcut = CUTOFF_FACTOR * sigma;
        Self {
            epsilon,
            sigma,
            sigma6,
            rcut2: rcut * rcut,
        }
    }
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
    pub fn rcut2(&self) -> f64 {
        self.rcut2
    }

    /// Force exerted on i by j, for diff = r_i - r_j and r2 = |diff|^2.
    ///
    /// U(r) = 4 eps ((sig/r)^12 - (sig/r)^6)
    /// dU/d(r^2) = -24 eps (sig/r)^6 (2 (sig/r)^6 - 1) / r^2
    /// F_i = -dU/d(r^2) * diff
    ///
    /// No zero-distance guard: r2 == 0 divides by zero and propagates
    /// NaN/Inf. The insertion-time minimum separation is the only safeguard.
    fn force(&self, diff: [f64; 3], r2: f64) -> [f64; 3] {
        let inv_r2 = 1.0 / r2;
        let sr6 = self.sigma6 * inv_r2 * inv_r2 * inv_r2;
        let dphi = -24.0 * self.epsilon * sr6 * (2.0 * sr6 - 1.0) * inv_r2;
        [-dphi * diff[0], -dphi * diff[1], -dphi * diff[2]]
    }
}

/// Lennard-Jones 12-6 potential over the two particle species.
///
/// Coefficients are fixed per species pair:
/// (Light, Light) -> eps 3.0, sig 1.0
/// (Heavy, Heavy) -> eps 60.0, sig 3.0
/// mixed          -> eps 15.0, sig 2.0
pub struct LjTable {
    coeffs: [LjCoeff; 3],
}
impl LjTable {
    pub fn new() -> Self {
        Self {
            coeffs: [
                LjCoeff::new(3.0, 1.0),
                LjCoeff::new(60.0, 3.0),
                LjCoeff::new(15.0, 2.0),
            ],
        }
    }
    pub fn coeff(&self, a: Species, b: Species) -> &LjCoeff {
        let idx = match (a, b) {
            (Species::Light, Species::Light) => 0,
            (Species::Heavy, Species::Heavy) => 1,
            _ => 2,
        };
        &self.coeffs[idx]
    }

    /// Recompute every particle's net force from scratch.
    ///
    /// Half pair loop: each unordered pair is visited once and contributes
    /// to both accumulators with opposite signs (Newton's third law).
    /// With `cutoff` set, pairs beyond 2.5 sigma are skipped before the
    /// reciprocal arithmetic. O(N^2), no spatial partitioning.
    pub fn compute_forces(&self, particles: &mut [Particle], cutoff: bool) {
        for p in particles.iter_mut() {
            p.force = [0.0; 3];
        }
        let n = particles.len();
        for i in 0..n {
            let (head, tail) = particles.split_at_mut(i + 1);
            let p_i = &mut head[i];
            for p_j in tail.iter_mut() {
                let coeff = self.coeff(p_i.species(), p_j.species());
                let diff = [
                    p_i.position[0] - p_j.position[0],
                    p_i.position[1] - p_j.position[1],
                    p_i.position[2] - p_j.position[2],
                ];
                let r2 = diff[0] * diff[0] + diff[1] * diff[1] + diff[2] * diff[2];
                if cutoff && r2 >= coeff.rcut2 {
                    continue;
                }
                let f = coeff.force(diff, r2);
                for m in 0..3 {
                    p_i.force[m] += f[m];
                    p_j.force[m] -= f[m];
                }
            }
        }
    }

    /// Parallel force sweep over the outer pair index.
    ///
    /// Each rayon task accumulates into a thread-local buffer which is
    /// reduced at the end; the accumulators are never shared between tasks,
    /// so the half-loop optimization stays race-free.
    pub fn compute_forces_parallel(&self, particles: &mut [Particle], cutoff: bool) {
        let n = particles.len();
        let snapshot: &[Particle] = particles;
        let contributions: Vec<Vec<[f64; 3]>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let mut local = vec![[0.0; 3]; n];
                let p_i = &snapshot[i];
                for (j, p_j) in snapshot.iter().enumerate().skip(i + 1) {
                    let coeff = self.coeff(p_i.species(), p_j.species());
                    let diff = [
                        p_i.position[0] - p_j.position[0],
                        p_i.position[1] - p_j.position[1],
                        p_i.position[2] - p_j.position[2],
                    ];
                    let r2 = diff[0] * diff[0] + diff[1] * diff[1] + diff[2] * diff[2];
                    if cutoff && r2 >= coeff.rcut2 {
                        continue;
                    }
                    let f = coeff.force(diff, r2);
                    for m in 0..3 {
                        local[i][m] += f[m];
                        local[j][m] -= f[m];
                    }
                }
                local
            })
            .collect();

        for p in particles.iter_mut() {
            p.force = [0.0; 3];
        }
        for local in contributions {
            for (p, f) in particles.iter_mut().zip(local) {
                for m in 0..3 {
                    p.force[m] += f[m];
                }
            }
        }
    }
}

impl Default for LjTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pair(x0: f64, x1: f64, species: Species) -> Vec<Particle> {
        vec![
            Particle::new([x0, 10.0, 10.0], [0.0; 3], species),
            Particle::new([x1, 10.0, 10.0], [0.0; 3], species),
        ]
    }

    #[test]
    fn coeff_lookup_matches_table() {
        let table = LjTable::new();
        assert_eq!(table.coeff(Species::Light, Species::Light).epsilon(), 3.0);
        assert_eq!(table.coeff(Species::Light, Species::Light).sigma(), 1.0);
        assert_eq!(table.coeff(Species::Heavy, Species::Heavy).epsilon(), 60.0);
        assert_eq!(table.coeff(Species::Heavy, Species::Heavy).sigma(), 3.0);
        assert_eq!(table.coeff(Species::Light, Species::Heavy).epsilon(), 15.0);
        assert_eq!(table.coeff(Species::Heavy, Species::Light).sigma(), 2.0);
    }

    #[test]
    fn force_at_sigma_is_repulsive() {
        // At r = sigma, (sig/r)^6 = 1 and |F| = 24 eps / sigma.
        let table = LjTable::new();
        let mut particles = pair(1.0, 0.0, Species::Light);
        table.compute_forces(&mut particles, false);
        assert_relative_eq!(particles[0].force[0], 72.0, max_relative = 1e-12);
        assert_relative_eq!(particles[1].force[0], -72.0, max_relative = 1e-12);
        assert_eq!(particles[0].force[1], 0.0);
        assert_eq!(particles[0].force[2], 0.0);
    }

    #[test]
    fn force_beyond_minimum_is_attractive() {
        let table = LjTable::new();
        // r = 2.0 > 2^(1/6) sigma for the Light pair
        let mut particles = pair(2.0, 0.0, Species::Light);
        table.compute_forces(&mut particles, false);
        assert!(particles[0].force[0] < 0.0);
        assert!(particles[1].force[0] > 0.0);
    }

    #[test]
    fn forces_are_pairwise_antisymmetric() {
        let table = LjTable::new();
        let mut particles = vec![
            Particle::new([9.0, 10.0, 10.0], [0.0; 3], Species::Light),
            Particle::new([11.0, 10.5, 10.0], [0.0; 3], Species::Heavy),
        ];
        table.compute_forces(&mut particles, false);
        for m in 0..3 {
            assert_relative_eq!(
                particles[0].force[m],
                -particles[1].force[m],
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn net_force_vanishes_over_the_ensemble() {
        let table = LjTable::new();
        let mut particles = vec![
            Particle::new([8.0, 10.0, 10.0], [0.0; 3], Species::Light),
            Particle::new([10.0, 11.0, 10.0], [0.0; 3], Species::Heavy),
            Particle::new([12.0, 9.5, 10.5], [0.0; 3], Species::Light),
        ];
        table.compute_forces(&mut particles, false);
        for m in 0..3 {
            let net: f64 = particles.iter().map(|p| p.force[m]).sum();
            assert_relative_eq!(net, 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn cutoff_skips_distant_pairs() {
        let table = LjTable::new();
        // Light pair at r = 3.0 >= 2.5 sigma
        let mut particles = pair(3.0, 0.0, Species::Light);
        table.compute_forces(&mut particles, true);
        assert_eq!(particles[0].force, [0.0; 3]);
        assert_eq!(particles[1].force, [0.0; 3]);
        table.compute_forces(&mut particles, false);
        assert!(particles[0].force[0] != 0.0);
    }

    #[test]
    fn accumulators_are_rezeroed_every_pass() {
        let table = LjTable::new();
        let mut particles = pair(1.0, 0.0, Species::Light);
        table.compute_forces(&mut particles, false);
        let first = particles[0].force;
        table.compute_forces(&mut particles, false);
        assert_eq!(particles[0].force, first);
    }

    #[test]
    fn parallel_sweep_matches_serial() {
        let table = LjTable::new();
        let mut serial: Vec<Particle> = (0..12)
            .map(|i| {
                let species = if i % 4 == 0 {
                    Species::Heavy
                } else {
                    Species::Light
                };
                Particle::new(
                    [
                        1.0 + 1.5 * (i % 3) as f64,
                        2.0 + 1.1 * ((i / 3) % 2) as f64,
                        3.0 + 0.9 * (i / 6) as f64,
                    ],
                    [0.0; 3],
                    species,
                )
            })
            .collect();
        let mut parallel = serial.clone();

        table.compute_forces(&mut serial, true);
        table.compute_forces_parallel(&mut parallel, true);
        for (a, b) in serial.iter().zip(&parallel) {
            for m in 0..3 {
                assert_relative_eq!(a.force[m], b.force[m], max_relative = 1e-12);
            }
        }
    }
}
