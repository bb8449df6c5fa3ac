//! Random-walk aggregation engine for a single [`ClusterGrid`].
//!
//! The engine grows an aggregate by repeatedly releasing walkers from the
//! domain rim and letting them wander until they touch the aggregate:
//! 1. A walker spawns on the circle of radius `grid.radius()` around the
//!    seed, at a uniform random angle.
//! 2. Each step it moves by an offset drawn from `{-1, 0, 1}` per axis,
//!    clamped into the buffer.
//! 3. When an orthogonal neighbor is occupied it sticks, claiming its
//!    cell; a walker that reaches the buffer edge band is discarded.
//!
//! [`DlaEngine::advance`] performs exactly one of these micro-steps per
//! call, so several engines can be interleaved cooperatively on one
//! thread and any caller can observe the growth walker by walker.

use crate::cluster::{CellState, ClusterGrid};
use glam::IVec2;
use log::debug;
use rand::Rng;
use std::f32::consts::TAU;

/// A walker released from the rim, wandering until it sticks or escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walker {
    /// Current position, local to the cluster buffer.
    pub pos: IVec2,
    /// Number of moves taken since spawning.
    pub steps: u32,
}

/// Why an engine stopped growing its aggregate.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// A walker stuck on the outermost ring of the growth domain.
    BoundaryReached,
    /// The attempt budget (`max_iterations` walkers) was used up.
    IterationCapReached,
    /// [`DlaEngine::stop`] was called.
    Manual,
}

/// What a single call to [`DlaEngine::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A new walker was released from the rim.
    Spawned,
    /// The live walker moved one cell (possibly in place, at the clamp).
    Walking,
    /// The live walker stuck at the given local cell.
    Stuck(IVec2),
    /// The live walker was discarded at the edge band or its step budget.
    Escaped,
    /// The engine is terminal; nothing changed.
    Complete(TerminationReason),
}

/// Running totals for one engine's growth.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthStatus {
    /// Occupied cells, the seed included. A fresh engine reports 1.
    pub cells_added: u32,
    /// Walkers released so far, whether or not they stuck.
    pub walkers_spawned: u32,
    /// Set once the engine stops; never cleared.
    pub terminal: Option<TerminationReason>,
}

/// Grows one aggregate on an owned [`ClusterGrid`] with an owned
/// generator, one micro-step at a time.
#[derive(Debug)]
pub struct DlaEngine<R: Rng> {
    grid: ClusterGrid,
    rng: R,
    max_iterations: u32,
    max_walk_steps: Option<u32>,
    walker: Option<Walker>,
    status: GrowthStatus,
}

impl<R: Rng> DlaEngine<R> {
    /// Creates an engine over `grid` with a budget of `max_iterations`
    /// walker attempts. A budget of 0 means the very first [`advance`]
    /// completes the growth with nothing but the seed.
    ///
    /// [`advance`]: DlaEngine::advance
    pub fn new(grid: ClusterGrid, max_iterations: u32, rng: R) -> Self {
        let status = GrowthStatus {
            cells_added: grid.occupied_count(),
            walkers_spawned: 0,
            terminal: None,
        };
        Self {
            grid,
            rng,
            max_iterations,
            max_walk_steps: None,
            walker: None,
            status,
        }
    }

    /// Limits every walker to at most `max_walk_steps` moves; one that
    /// exhausts the budget is discarded like an edge escape. Without a
    /// cap a walker wanders until it sticks or reaches the edge band.
    pub fn with_walk_cap(mut self, max_walk_steps: u32) -> Self {
        self.max_walk_steps = Some(max_walk_steps);
        self
    }

    /// Performs one micro-step of the aggregation and reports it.
    ///
    /// In order:
    /// 1. A terminal engine returns [`StepOutcome::Complete`] and changes
    ///    nothing.
    /// 2. With no walker in flight, either the attempt budget is exhausted
    ///    (the engine terminates with
    ///    [`TerminationReason::IterationCapReached`]) or a new walker is
    ///    released from the rim ([`StepOutcome::Spawned`]).
    /// 3. A walker next to the aggregate sticks, claiming its cell. The
    ///    stick wins even inside the edge band. If the claimed cell lies
    ///    on the outermost domain ring, the engine terminates with
    ///    [`TerminationReason::BoundaryReached`]; the stick itself is
    ///    still reported as [`StepOutcome::Stuck`].
    /// 4. A walker in the edge band, or out of walk budget, is discarded
    ///    ([`StepOutcome::Escaped`]); only `walkers_spawned` remembers it.
    /// 5. Otherwise the walker takes one random move, clamped into the
    ///    buffer ([`StepOutcome::Walking`]).
    ///
    /// The spawn position is the rounded point on the circle of radius
    /// `grid.radius()` at a uniform angle in `[0, 2pi)`. Rounding may
    /// place it just outside the circle; it is not clamped there.
    pub fn advance(&mut self) -> StepOutcome {
        if let Some(reason) = self.status.terminal {
            return StepOutcome::Complete(reason);
        }

        let Some(walker) = self.walker else {
            if self.status.walkers_spawned >= self.max_iterations {
                self.terminate(TerminationReason::IterationCapReached);
                return StepOutcome::Complete(TerminationReason::IterationCapReached);
            }
            self.walker = Some(Walker {
                pos: self.spawn_pos(),
                steps: 0,
            });
            self.status.walkers_spawned += 1;
            return StepOutcome::Spawned;
        };

        if self.grid.has_occupied_neighbor(walker.pos) {
            self.walker = None;
            // A walker that drifted onto the aggregate sticks in place
            // without recounting its cell.
            if self.grid.get(walker.pos) != CellState::Occupied {
                self.grid.set(walker.pos, CellState::Occupied);
                self.status.cells_added += 1;
            }
            if self.grid.near_circular_bound(walker.pos) {
                self.terminate(TerminationReason::BoundaryReached);
            }
            return StepOutcome::Stuck(walker.pos);
        }

        if self.grid.near_edge(walker.pos) {
            self.walker = None;
            return StepOutcome::Escaped;
        }

        if let Some(cap) = self.max_walk_steps
            && walker.steps >= cap
        {
            self.walker = None;
            return StepOutcome::Escaped;
        }

        let dx = self.rng.random_range(-1..=1);
        let dy = self.rng.random_range(-1..=1);
        self.walker = Some(Walker {
            pos: self.grid.clamp(walker.pos + IVec2::new(dx, dy)),
            steps: walker.steps + 1,
        });
        StepOutcome::Walking
    }

    /// Loops [`advance`] until the engine terminates and returns the
    /// reason.
    ///
    /// [`advance`]: DlaEngine::advance
    pub fn run_to_completion(&mut self) -> TerminationReason {
        loop {
            if let StepOutcome::Complete(reason) = self.advance() {
                return reason;
            }
        }
    }

    /// Terminates the growth with [`TerminationReason::Manual`]. Does
    /// nothing if the engine already stopped for another reason.
    pub fn stop(&mut self) {
        if self.status.terminal.is_none() {
            self.walker = None;
            self.terminate(TerminationReason::Manual);
        }
    }

    #[inline]
    pub fn status(&self) -> GrowthStatus {
        self.status
    }

    #[inline]
    pub fn grid(&self) -> &ClusterGrid {
        &self.grid
    }

    /// The walker currently in flight, if any.
    #[inline]
    pub fn walker(&self) -> Option<Walker> {
        self.walker
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.status.terminal.is_some()
    }

    fn terminate(&mut self, reason: TerminationReason) {
        self.status.terminal = Some(reason);
        debug!(
            "growth terminated: {:?} ({} cells, {} walkers)",
            reason, self.status.cells_added, self.status.walkers_spawned
        );
    }

    fn spawn_pos(&mut self) -> IVec2 {
        let r = self.grid.radius() as f32;
        let theta = self.rng.random_range(0.0..TAU);
        let offset = IVec2::new(
            (r * theta.cos()).round() as i32,
            (r * theta.sin()).round() as i32,
        );
        self.grid.seed_pos() + offset
    }
}
