pub use super::compute::{self, KB};
pub use super::container::Container;
pub use super::error::{Error, Result};
pub use super::output::{EnergySample, MemorySink, SampleSink, TextSink, TrajectorySample};
pub use super::particle::{Particle, Species};
pub use super::potential::{LjCoeff, LjTable};
pub use super::simulation::{RunConfig, Simulation, Thermostat};
