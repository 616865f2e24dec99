use std::io::Write;

use crate::error::Result;

/// State of one particle at a sampled instant.
#[derive(Clone, Copy, Debug)]
pub struct TrajectorySample {
    /// Sample time, rounded to the sampling boundary.
    pub time: f64,
    /// Zero-based index of the particle in insertion order.
    pub index: usize,
    pub position: [f64; 3],
    pub velocity: [f64; 3],
}

/// Aggregate kinetic energy at a sampled instant.
#[derive(Clone, Copy, Debug)]
pub struct EnergySample {
    pub time: f64,
    pub kinetic_energy: f64,
}

/// Consumer of the samples emitted by the run loop. The loop decides when
/// to emit and what values to emit; serialization lives behind this trait.
pub trait SampleSink {
    fn trajectory(&mut self, sample: TrajectorySample) -> Result<()>;
    fn energy(&mut self, sample: EnergySample) -> Result<()>;
}

/// Collects samples in memory, for tests and in-process consumers.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub trajectory: Vec<TrajectorySample>,
    pub energy: Vec<EnergySample>,
}
impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}
impl SampleSink for MemorySink {
    fn trajectory(&mut self, sample: TrajectorySample) -> Result<()> {
        self.trajectory.push(sample);
        Ok(())
    }
    fn energy(&mut self, sample: EnergySample) -> Result<()> {
        self.energy.push(sample);
        Ok(())
    }
}

/// Writes fixed-width text rows: one row per sampled particle with time,
/// 1-based index, position and velocity components, and one row per sampled
/// time with the total kinetic energy.
pub struct TextSink<W: Write, E: Write> {
    particles: W,
    energies: E,
}
impl<W: Write, E: Write> TextSink<W, E> {
    pub fn new(particles: W, energies: E) -> Self {
        Self {
            particles,
            energies,
        }
    }
}
impl<W: Write, E: Write> SampleSink for TextSink<W, E> {
    fn trajectory(&mut self, s: TrajectorySample) -> Result<()> {
        writeln!(
            self.particles,
            "{:>7}{:>7}{:>15.6}{:>15.6}{:>15.6}{:>15.6}{:>15.6}{:>15.6}",
            s.time,
            s.index + 1,
            s.position[0],
            s.position[1],
            s.position[2],
            s.velocity[0],
            s.velocity[1],
            s.velocity[2],
        )?;
        Ok(())
    }
    fn energy(&mut self, s: EnergySample) -> Result<()> {
        writeln!(self.energies, "{:>7}{:>15.6}", s.time, s.kinetic_energy)?;
        Ok(())
    }
}
