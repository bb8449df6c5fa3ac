use crate::site::SiteIndex;
use crate::types::SiteId;
use glam::IVec2;
use log::debug;

/// Dense nearest-site partition of a world grid.
///
/// For each cell of a `width x height` grid, this map stores the
/// [`SiteId`] of the closest site, row-major. It is built once from a
/// [`SiteIndex`] and never changes afterwards, so lookups are a single
/// array read.
#[derive(Debug)]
pub struct RegionMap {
    width: i32,
    height: i32,
    /// Owning site per cell, `cells[y * width + x]`.
    cells: Vec<SiteId>,
}

impl RegionMap {
    /// Builds the partition by querying [`SiteIndex::nearest`] per cell.
    ///
    /// Runs in O(cells x sites). Every in-bounds cell receives exactly one
    /// owner; exact ties between sites resolve to the lowest id, as
    /// guaranteed by `nearest`.
    ///
    /// ### Panics
    /// Panics if `width` or `height` is less than 1, or if `index` is
    /// empty (an empty index cannot partition anything).
    pub fn build(width: i32, height: i32, index: &SiteIndex) -> Self {
        assert!(
            width >= 1 && height >= 1,
            "region map needs positive dimensions, got {}x{}",
            width,
            height
        );

        let mut cells = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                let id = index
                    .nearest(IVec2::new(x, y))
                    .expect("cannot build a region map from an empty site index");
                cells.push(id);
            }
        }

        debug!(
            "region map built: {}x{} cells over {} sites",
            width,
            height,
            index.len()
        );

        Self {
            width,
            height,
            cells,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Returns the owning site of the given cell.
    ///
    /// ### Panics
    /// Panics if `pos` lies outside the grid.
    #[inline]
    pub fn get(&self, pos: IVec2) -> SiteId {
        assert!(
            self.in_bounds(pos),
            "cell {:?} outside {}x{} region map",
            pos,
            self.width,
            self.height
        );
        self.cells[(pos.y * self.width + pos.x) as usize]
    }

    /// Iterates over all cells in row-major order as `(position, owner)`.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (IVec2, SiteId)> + 'a {
        self.cells.iter().enumerate().map(|(i, &id)| {
            let x = (i as i32) % self.width;
            let y = (i as i32) / self.width;
            (IVec2::new(x, y), id)
        })
    }
}
