//! Error types for the harness binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and the gather walk.

/// Top-level error for the harness binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: forage_core::config::ConfigError,
    },

    /// The simulated clock could not advance.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: forage_core::clock::ClockError,
    },

    /// Location state could not be serialized.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: forage_world::WorldError,
    },

    /// Writing the snapshot file failed.
    #[error("failed to write snapshot to {path}: {source}")]
    Snapshot {
        /// Destination path.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
