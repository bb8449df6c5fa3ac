//! Renderer-facing view of the simulation state.
//!
//! The core never draws anything; instead [`crate::sim::Simulation`]
//! assembles a [`WorldSnapshot`] on demand and a renderer decides how to
//! present it. The static region backdrop comes separately from
//! [`crate::region::RegionMap`].

use crate::cluster::CellState;
use crate::types::SiteId;
use glam::IVec2;

/// One grown cell, in world coordinates.
///
/// A cluster-local cell `p` of region `r` maps to
/// `site[r].pos + (p - seed_pos)`, which puts every region's seed cell
/// exactly on its site. Positions near the world border may overhang the
/// world rectangle; clipping is the renderer's concern.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellUpdate {
    pub pos: IVec2,
    pub region: SiteId,
    pub state: CellState,
    /// Tick at which the cell disappears, when TTL bookkeeping is on.
    pub expires_at: Option<u64>,
}

/// Full overlay state at one tick.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub cells: Vec<CellUpdate>,
}
