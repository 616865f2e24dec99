use rayon::prelude::*;

use crate::particle::Particle;

/// Total kinetic energy of the ensemble.
pub fn system_kinetic_energy(particles: &[Particle]) -> f64 {
    particles.iter().map(Particle::kinetic_energy).sum()
}

/// Same reduction, performed on the rayon pool.
pub fn system_kinetic_energy_parallel(particles: &[Particle]) -> f64 {
    particles.par_iter().map(Particle::kinetic_energy).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Species;
    use approx::assert_relative_eq;

    #[test]
    fn sums_per_particle_energies() {
        let particles = vec![
            Particle::new([0.0; 3], [1.0, 0.0, 0.0], Species::Light),
            Particle::new([5.0; 3], [0.0, 2.0, 0.0], Species::Heavy),
        ];
        // 0.5 * 1 * 1 + 0.5 * 10 * 4
        assert_relative_eq!(system_kinetic_energy(&particles), 20.5);
        assert_relative_eq!(
            system_kinetic_energy_parallel(&particles),
            system_kinetic_energy(&particles)
        );
    }

    #[test]
    fn empty_ensemble_has_zero_energy() {
        assert_eq!(system_kinetic_energy(&[]), 0.0);
    }
}
