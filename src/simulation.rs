use log::{debug, info};
use rand_distr::Distribution;
use rayon::prelude::*;

use crate::{
    compute,
    container::Container,
    error::{Error, Result},
    output::{EnergySample, SampleSink, TrajectorySample},
    particle::Particle,
    potential::LjTable,
};

/// Interval between emitted samples, in simulated time units.
pub const SAMPLE_INTERVAL: f64 = 0.1;

/// Squared minimum separation enforced at insertion time.
pub const MIN_SEPARATION_SQ: f64 = 0.25;

/// Thermostat application schedule.
///
/// `InitialOnly` rescales once before the first step and leaves the ensemble
/// energy-conserving afterwards; `EveryStep` additionally rescales at the
/// end of every step, pinning the kinetic energy to the target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Thermostat {
    Off,
    InitialOnly { target: f64 },
    EveryStep { target: f64 },
}
impl Thermostat {
    /// Target temperature when rescaling is enabled.
    pub fn target(&self) -> Option<f64> {
        match *self {
            Thermostat::Off => None,
            Thermostat::InitialOnly { target } | Thermostat::EveryStep { target } => Some(target),
        }
    }
}

/// Run-loop configuration.
#[derive(Clone, Copy, Debug)]
pub struct RunConfig {
    pub dt: f64,
    pub t_end: f64,
    pub thermostat: Thermostat,
    /// Emit per-particle trajectory samples. Disabled for large random
    /// configurations, where only the energy trace is of interest.
    pub emit_trajectory: bool,
    /// Skip pairs beyond 2.5 sigma before the force arithmetic.
    pub cutoff: bool,
    /// Run the per-step sweeps on the rayon pool.
    pub parallel: bool,
}
impl RunConfig {
    pub fn new(dt: f64, t_end: f64) -> Self {
        Self {
            dt,
            t_end,
            thermostat: Thermostat::Off,
            emit_trajectory: true,
            cutoff: false,
            parallel: false,
        }
    }
    fn validate(&self) -> Result<()> {
        if !(self.dt > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "timestep should be positive, found {}",
                self.dt
            )));
        }
        if !(self.t_end >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "total time should be non-negative, found {}",
                self.t_end
            )));
        }
        if let Some(target) = self.thermostat.target() {
            if !(target > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "target temperature should be positive, found {}",
                    target
                )));
            }
        }
        Ok(())
    }
}

/// The main simulation class: a reflective box holding the particle
/// ensemble, the pair potential and the time-stepping loop.
pub struct Simulation {
    container: Container,
    particles: Vec<Particle>,
    potential: LjTable,
}
impl Simulation {
    pub fn new(container: Container) -> Self {
        Self {
            container,
            particles: Vec::new(),
            potential: LjTable::new(),
        }
    }

    // Getters
    pub fn container(&self) -> &Container {
        &self.container
    }
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }
    pub fn potential(&self) -> &LjTable {
        &self.potential
    }

    /// Append a particle unless it sits within the minimum separation of an
    /// already-admitted one. Returns whether the particle was added; on
    /// rejection nothing is modified. The invariant is enforced only here,
    /// dynamics may later bring particles closer.
    pub fn try_add_particle(&mut self, particle: Particle) -> bool {
        for p in &self.particles {
            let mut r2 = 0.0;
            for m in 0..3 {
                let d = particle.position[m] - p.position[m];
                r2 += d * d;
            }
            if r2 < MIN_SEPARATION_SQ {
                return false;
            }
        }
        self.particles.push(particle);
        true
    }

    /// Draw Gaussian velocity components for the given temperature, scaled
    /// by 1/sqrt(mass) per particle.
    pub fn seed_velocities<R: rand::Rng>(&mut self, temperature: f64, rng: &mut R) {
        let dist = rand_distr::Normal::new(0.0, temperature.sqrt()).expect("Invalid temperature");
        for p in &mut self.particles {
            let inv_sqrt_mass = 1.0 / p.mass().sqrt();
            for m in 0..3 {
                p.velocity[m] = dist.sample(rng) * inv_sqrt_mass;
            }
        }
    }

    pub fn system_kinetic_energy(&self) -> f64 {
        compute::system_kinetic_energy(&self.particles)
    }
    pub fn temperature(&self) -> f64 {
        compute::temperature(&self.particles)
    }

    /// Recompute all pairwise forces at the current positions.
    pub fn compute_forces(&mut self, cutoff: bool) {
        self.potential.compute_forces(&mut self.particles, cutoff);
    }
    /// Parallel variant of [`Self::compute_forces`].
    pub fn compute_forces_parallel(&mut self, cutoff: bool) {
        self.potential
            .compute_forces_parallel(&mut self.particles, cutoff);
    }

    /// Rescale every velocity so the ensemble kinetic energy matches the
    /// target temperature exactly: lambda = sqrt(1.5 N kB T / E).
    ///
    /// Requires a strictly positive current kinetic energy; an ensemble at
    /// rest makes lambda infinite and the corruption propagates silently.
    pub fn apply_thermostat(&mut self, target: f64) {
        let energy = self.system_kinetic_energy();
        let lambda =
            (target * 1.5 * compute::KB * self.particles.len() as f64 / energy).sqrt();
        for p in &mut self.particles {
            for m in 0..3 {
                p.velocity[m] *= lambda;
            }
        }
    }

    /// r += dt v, using the previous step's velocities.
    fn increment_positions(&mut self, dt: f64, parallel: bool) {
        let advance = |p: &mut Particle| {
            for m in 0..3 {
                p.position[m] += dt * p.velocity[m];
            }
        };
        if parallel {
            self.particles.par_iter_mut().for_each(advance);
        } else {
            self.particles.iter_mut().for_each(advance);
        }
    }

    /// v += (dt / m) F, followed immediately by the per-axis wall
    /// reflection.
    fn increment_velocities(&mut self, dt: f64, parallel: bool) {
        let extents = self.container.extents();
        let kick = move |p: &mut Particle| {
            let scale = dt / p.mass();
            for m in 0..3 {
                p.velocity[m] += scale * p.force[m];
                Container::reflect_axis(&mut p.position[m], &mut p.velocity[m], extents[m]);
            }
        };
        if parallel {
            self.particles.par_iter_mut().for_each(kick);
        } else {
            self.particles.iter_mut().for_each(kick);
        }
    }

    /// One full step in strict order: drift, forces, kick, walls,
    /// thermostat. Positions are advanced before the forces at the new
    /// positions are known; the scheme is explicit and non-symplectic.
    fn step(&mut self, config: &RunConfig) {
        self.increment_positions(config.dt, config.parallel);
        if config.parallel {
            self.compute_forces_parallel(config.cutoff);
        } else {
            self.compute_forces(config.cutoff);
        }
        self.increment_velocities(config.dt, config.parallel);
        if let Thermostat::EveryStep { target } = config.thermostat {
            self.apply_thermostat(target);
        }
    }

    /// Run until `t_end`, emitting samples at every 0.1-time-unit boundary.
    ///
    /// When a thermostat target is configured, one rescaling is applied
    /// before the loop to normalize the starting ensemble. Samples are taken
    /// at the top of a step, so the initial state is emitted.
    pub fn run<S: SampleSink>(&mut self, config: &RunConfig, sink: &mut S) -> Result<()> {
        config.validate()?;
        info!(
            "running {} particles to t = {} with dt = {}",
            self.particles.len(),
            config.t_end,
            config.dt
        );

        if let Some(target) = config.thermostat.target() {
            self.apply_thermostat(target);
        }

        let num_steps = (config.t_end / config.dt).round() as usize;
        for n in 0..=num_steps {
            let t = n as f64 * config.dt;
            if let Some(rounded) = sample_time(t, config.dt) {
                self.emit_samples(rounded, config, sink)?;
            }
            self.step(config);
        }

        info!("run complete at t = {}", config.t_end);
        Ok(())
    }

    fn emit_samples<S: SampleSink>(
        &self,
        time: f64,
        config: &RunConfig,
        sink: &mut S,
    ) -> Result<()> {
        if config.emit_trajectory {
            for (index, p) in self.particles.iter().enumerate() {
                sink.trajectory(TrajectorySample {
                    time,
                    index,
                    position: p.position,
                    velocity: p.velocity,
                })?;
            }
        }
        let kinetic_energy = if config.parallel {
            compute::system_kinetic_energy_parallel(&self.particles)
        } else {
            self.system_kinetic_energy()
        };
        debug!("t = {}: kinetic energy {}", time, kinetic_energy);
        sink.energy(EnergySample {
            time,
            kinetic_energy,
        })?;
        Ok(())
    }
}

/// Nearest-boundary test for the sampling cadence. Returns the rounded
/// sample time when `t` falls on a multiple of [`SAMPLE_INTERVAL`], within
/// half a timestep; rounding avoids the drift a plain modulo test picks up.
fn sample_time(t: f64, dt: f64) -> Option<f64> {
    let boundary = (t / SAMPLE_INTERVAL).round() * SAMPLE_INTERVAL;
    if (t - boundary).abs() < 0.5 * dt {
        Some((t * 10.0).round() / 10.0)
    } else {
        None
    }
}
