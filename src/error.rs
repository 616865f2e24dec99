use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected run parameters (non-positive timestep, negative total time, ...).
    #[error("invalid run configuration: {0}")]
    InvalidConfig(String),

    /// Random placement kept colliding with already-admitted particles.
    #[error("could not place a particle after {attempts} attempts, configuration too dense")]
    TooDense { attempts: usize },

    /// Propagated I/O errors from sample sinks.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
