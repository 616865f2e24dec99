//! Aggregate reductions over the particle ensemble.

mod kinetic_energy;
mod temperature;

pub use kinetic_energy::{system_kinetic_energy, system_kinetic_energy_parallel};
pub use temperature::temperature;

/// Reduced Boltzmann constant relating kinetic energy and temperature:
/// E = 1.5 N kB T.
pub const KB: f64 = 0.8314459920816467;
