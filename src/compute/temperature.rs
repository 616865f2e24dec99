use super::{kinetic_energy, KB};
use crate::particle::Particle;

/// Instantaneous temperature of the ensemble, T = 2E / (3 N kB).
pub fn temperature(particles: &[Particle]) -> f64 {
    2.0 * kinetic_energy::system_kinetic_energy(particles)
        / (3.0 * particles.len() as f64 * KB)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Species;
    use approx::assert_relative_eq;

    #[test]
    fn temperature_inverts_energy_relation() {
        let particles = vec![
            Particle::new([0.0; 3], [1.2, -0.4, 0.3], Species::Light),
            Particle::new([5.0; 3], [-0.1, 0.8, 0.0], Species::Heavy),
        ];
        let e = kinetic_energy::system_kinetic_energy(&particles);
        let t = temperature(&particles);
        assert_relative_eq!(e, 1.5 * 2.0 * KB * t, max_relative = 1e-12);
    }
}
