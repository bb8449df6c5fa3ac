//! Voronoi-partitioned diffusion-limited aggregation simulation library.
//!
//! Main components:
//! - [`site`] - Voronoi sites and nearest-site queries.
//! - [`region`] - dense nearest-site partition of the world grid.
//! - [`cluster`] - per-region cell buffer for one aggregate.
//! - [`engine`] - the random-walk aggregation state machine.
//! - [`sim`] - orchestrator stepping all regions cooperatively.
//! - [`snapshot`] - renderer-facing world state.
//! - [`ephemeral`] - lifetime bookkeeping for transient cells.
//! - [`config`] - global configuration for a simulation run.
//! - [`error`] - configuration error types.
//! - [`types`] - shared type aliases and IDs.

pub mod cluster;
pub mod config;
pub mod engine;
pub mod ephemeral;
pub mod error;
pub mod region;
pub mod sim;
pub mod site;
pub mod snapshot;
pub mod types;
