pub mod compute;
pub mod container;
pub mod error;
pub mod output;
pub mod particle;
pub mod potential;
pub mod prelude;
pub mod simulation;

pub use compute::KB;
pub use container::Container;
pub use error::Error;
pub use output::{MemorySink, SampleSink, TextSink};
pub use particle::{Particle, Species};
pub use potential::LjTable;
pub use simulation::{RunConfig, Simulation, Thermostat};
