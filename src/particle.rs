/// Particle species. The species fixes the mass and selects the
/// Lennard-Jones pair coefficients.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Species {
    Light,
    Heavy,
}
impl Species {
    pub fn mass(&self) -> f64 {
        match self {
            Species::Light => 1.0,
            Species::Heavy => 10.0,
        }
    }
    /// Numeric species code (0 or 1), used for output labeling.
    pub fn code(&self) -> usize {
        match self {
            Species::Light => 0,
            Species::Heavy => 1,
        }
    }
}

/// Kinematic state of one particle.
///
/// The force accumulator is recomputed from scratch every step; it is never
/// carried over between steps.
#[derive(Clone, Debug)]
pub struct Particle {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub force: [f64; 3],
    species: Species,
    mass: f64,
}
impl Particle {
    /// Create a particle with an explicit position, velocity and species.
    /// The force starts at zero; the mass is derived from the species.
    pub fn new(position: [f64; 3], velocity: [f64; 3], species: Species) -> Self {
        Self {
            position,
            velocity,
            force: [0.0; 3],
            species,
            mass: species.mass(),
        }
    }
    pub fn species(&self) -> Species {
        self.species
    }
    pub fn mass(&self) -> f64 {
        self.mass
    }
    /// Kinetic energy, 0.5 m |v|^2
    pub fn kinetic_energy(&self) -> f64 {
        let v = &self.velocity;
        0.5 * self.mass * (v[0] * v[0] + v[1] * v[1] + v[2] * v[2])
    }
}
