use crate::types::SiteId;
use glam::IVec2;
use std::collections::VecDeque;

/// A grown cell with a limited lifetime, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EphemeralCell {
    pub pos: IVec2,
    pub region: SiteId,
    /// Tick at which the cell stops being live. `None` means the cell
    /// only ever leaves through the max-active cap.
    pub expires_at: Option<u64>,
}

/// Ordered bookkeeping of live ephemeral cells.
///
/// Cells enter at the back and leave from the front, either because
/// their expiry tick passed or because the optional max-active cap
/// pushed out the oldest entry. Entries must be pushed in nondecreasing
/// expiry order (which is automatic when expiry is `stick tick + ttl`),
/// so expiring is a cheap pop loop at the front.
#[derive(Debug, Default)]
pub struct EphemeralSet {
    cells: VecDeque<EphemeralCell>,
    max_active: Option<usize>,
}

impl EphemeralSet {
    pub fn new() -> Self {
        Self {
            cells: VecDeque::new(),
            max_active: None,
        }
    }

    /// Caps the set at `max` live cells; pushing beyond the cap drops
    /// the oldest entry first.
    pub fn with_max_active(max: usize) -> Self {
        Self {
            cells: VecDeque::new(),
            max_active: Some(max),
        }
    }

    /// Appends a cell, evicting the oldest one if the cap is exceeded.
    pub fn push(&mut self, cell: EphemeralCell) {
        debug_assert!(
            self.cells
                .back()
                .is_none_or(|last| last.expires_at <= cell.expires_at),
            "ephemeral cells must be pushed in nondecreasing expiry order"
        );
        self.cells.push_back(cell);
        if let Some(max) = self.max_active
            && self.cells.len() > max
        {
            self.cells.pop_front();
        }
    }

    /// Drops every cell whose expiry tick is at or before `tick` and
    /// returns how many were dropped.
    pub fn expire_until(&mut self, tick: u64) -> usize {
        let mut dropped = 0;
        while let Some(front) = self.cells.front() {
            match front.expires_at {
                Some(expiry) if expiry <= tick => {
                    self.cells.pop_front();
                    dropped += 1;
                }
                _ => break,
            }
        }
        dropped
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item = &'a EphemeralCell> + 'a {
        self.cells.iter()
    }
}
