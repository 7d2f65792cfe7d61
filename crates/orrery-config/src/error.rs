//! Configuration error types.

/// Errors that can occur when loading, saving, parsing, or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write the config file to disk.
    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize config to RON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),

    /// Two planets share the same id.
    #[error("duplicate planet id '{0}'")]
    DuplicatePlanetId(String),

    /// A planet has an empty id.
    #[error("planet at position {0} has an empty id")]
    EmptyPlanetId(usize),

    /// A size or radius that must be strictly positive is not.
    #[error("{field} must be > 0 (got {value})")]
    NonPositive { field: String, value: f32 },

    /// A numeric field is NaN or infinite.
    #[error("{field} must be finite (got {value})")]
    NonFinite { field: String, value: f32 },

    /// Starfield shell bounds are empty or inverted.
    #[error("starfield distance requires 0 < min < max (got min {min}, max {max})")]
    InvalidDistanceRange { min: f32, max: f32 },

    /// Strict ring policy and no ring material for a ringed planet.
    #[error("planet '{0}' requests a ring but no ring material is available")]
    RingMaterialMissing(String),
}
