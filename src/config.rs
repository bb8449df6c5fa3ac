use crate::error::{ConfigError, Result};

/// Global configuration for a [`crate::sim::Simulation`].
///
/// Defaults match the reference parameter set: a 64x64 world split among
/// 10 sites, clusters of radius 20 grown with up to 10 000 walker attempts.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimConfig {
    pub grid_width: i32,
    pub grid_height: i32,
    pub voronoi_points: usize,
    pub dla_radius: i32,
    pub max_iterations: u32,
    pub margin: i32,
    /// Per-walker step budget. `None` lets a walker wander until it sticks
    /// or reaches the edge band.
    pub max_walk_steps: Option<u32>,
    /// Lifetime of grown cells in ticks. `None` makes growth permanent.
    pub cell_ttl: Option<u64>,
    /// Upper bound on live ephemeral cells across all regions; the
    /// oldest cell is dropped first. `None` leaves the count unbounded.
    pub max_active_cells: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_width: 64,
            grid_height: 64,
            voronoi_points: 10,
            dla_radius: 20,
            max_iterations: 10_000,
            margin: 5,
            max_walk_steps: None,
            cell_ttl: None,
            max_active_cells: None,
        }
    }
}

impl SimConfig {
    /// Checks that the configuration can produce a well-formed simulation.
    ///
    /// `max_iterations` may be 0 (the cluster then terminates immediately
    /// with only its seed cell); all other numeric fields must be at least 1.
    ///
    /// ### Returns
    /// `Ok(())` if valid, otherwise the [`ConfigError`] naming the first
    /// violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.grid_width < 1 || self.grid_height < 1 {
            return Err(ConfigError::InvalidDimensions {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.voronoi_points == 0 {
            return Err(ConfigError::ZeroSites);
        }
        if self.dla_radius < 1 {
            return Err(ConfigError::InvalidRadius(self.dla_radius));
        }
        if self.margin < 1 {
            return Err(ConfigError::InvalidMargin(self.margin));
        }
        Ok(())
    }
}
