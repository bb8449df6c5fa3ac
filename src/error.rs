//! Error types for simulation configuration and setup.

use std::fmt;

/// Errors reported when a [`crate::config::SimConfig`] fails validation.
///
/// All variants are fatal: they are raised before any simulation state is
/// built, and the offending value is carried for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// World grid dimensions must both be at least 1.
    InvalidDimensions { width: i32, height: i32 },
    /// At least one Voronoi site is required to partition the world.
    ZeroSites,
    /// Cluster radius must be at least 1.
    InvalidRadius(i32),
    /// Buffer margin must be at least 1.
    InvalidMargin(i32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions: {}x{}", width, height)
            }
            ConfigError::ZeroSites => write!(f, "at least one voronoi site is required"),
            ConfigError::InvalidRadius(r) => write!(f, "invalid cluster radius: {}", r),
            ConfigError::InvalidMargin(m) => write!(f, "invalid buffer margin: {}", m),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Result type alias for simulation setup operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offending_values() {
        let err = ConfigError::InvalidDimensions {
            width: 0,
            height: 64,
        };
        assert_eq!(err.to_string(), "invalid grid dimensions: 0x64");

        let err = ConfigError::InvalidRadius(-3);
        assert_eq!(err.to_string(), "invalid cluster radius: -3");

        let err = ConfigError::InvalidMargin(0);
        assert_eq!(err.to_string(), "invalid buffer margin: 0");

        assert_eq!(
            ConfigError::ZeroSites.to_string(),
            "at least one voronoi site is required"
        );
    }
}
