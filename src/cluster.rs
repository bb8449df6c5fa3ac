use glam::IVec2;

/// State of a single cell in a [`ClusterGrid`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Free cell inside the circular growth domain.
    Empty,
    /// Cell claimed by the aggregate.
    Occupied,
    /// Cell outside the circular growth domain; never grown into.
    OutOfDomain,
}

/// A square cell buffer holding one region's aggregate.
///
/// The buffer has side `2 * radius + margin` and its center cell is the
/// seed of the aggregate. Cells whose distance from the seed exceeds
/// `radius` are marked [`CellState::OutOfDomain`] at construction; the
/// seed cell starts [`CellState::Occupied`]. All coordinates are local
/// to the buffer, `(0, 0)` at the top-left corner.
///
/// Growth is monotonic: the stepping engine only ever turns `Empty`
/// cells into `Occupied` ones, and it terminates before the aggregate
/// can reach the out-of-domain ring.
#[derive(Debug)]
pub struct ClusterGrid {
    side: i32,
    radius: i32,
    seed: IVec2,
    /// Cell states, `cells[y * side + x]`.
    cells: Vec<CellState>,
    occupied: u32,
}

impl ClusterGrid {
    /// Creates a grid for an aggregate of the given radius.
    ///
    /// ### Parameters
    /// - `radius` - Radius of the circular growth domain, in cells.
    /// - `margin` - Extra cells of buffer around the domain; the walker
    ///   escape band lives here.
    ///
    /// ### Panics
    /// Panics if `radius` or `margin` is less than 1.
    pub fn new(radius: i32, margin: i32) -> Self {
        assert!(radius >= 1, "cluster radius must be at least 1, got {}", radius);
        assert!(margin >= 1, "cluster margin must be at least 1, got {}", margin);

        let side = 2 * radius + margin;
        let seed = IVec2::new(side / 2, side / 2);

        let mut grid = Self {
            side,
            radius,
            seed,
            cells: vec![CellState::Empty; (side as usize) * (side as usize)],
            occupied: 0,
        };

        for y in 0..side {
            for x in 0..side {
                let pos = IVec2::new(x, y);
                if !grid.in_domain(pos) {
                    grid.set(pos, CellState::OutOfDomain);
                }
            }
        }
        grid.set(seed, CellState::Occupied);

        grid
    }

    /// Side length of the square buffer.
    #[inline]
    pub fn side(&self) -> i32 {
        self.side
    }

    /// Radius of the circular growth domain.
    #[inline]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Local position of the seed cell (the buffer center).
    #[inline]
    pub fn seed_pos(&self) -> IVec2 {
        self.seed
    }

    /// Number of cells currently [`CellState::Occupied`], seed included.
    #[inline]
    pub fn occupied_count(&self) -> u32 {
        self.occupied
    }

    #[inline]
    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.x < self.side && pos.y >= 0 && pos.y < self.side
    }

    /// Returns the state of the given cell.
    ///
    /// ### Panics
    /// Panics if `pos` lies outside the buffer.
    #[inline]
    pub fn get(&self, pos: IVec2) -> CellState {
        assert!(
            self.in_bounds(pos),
            "cell {:?} outside cluster buffer of side {}",
            pos,
            self.side
        );
        self.cells[(pos.y * self.side + pos.x) as usize]
    }

    /// Overwrites the state of the given cell, keeping the occupied
    /// count in sync.
    ///
    /// ### Panics
    /// Panics if `pos` lies outside the buffer.
    pub fn set(&mut self, pos: IVec2, state: CellState) {
        assert!(
            self.in_bounds(pos),
            "cell {:?} outside cluster buffer of side {}",
            pos,
            self.side
        );
        let cell = &mut self.cells[(pos.y * self.side + pos.x) as usize];
        if *cell != CellState::Occupied && state == CellState::Occupied {
            self.occupied += 1;
        } else if *cell == CellState::Occupied && state != CellState::Occupied {
            self.occupied -= 1;
        }
        *cell = state;
    }

    /// Returns `true` if the cell is occupied. Out-of-bounds positions
    /// are simply not occupied, so neighbor probes near the buffer edge
    /// need no bounds handling.
    #[inline]
    pub fn is_occupied(&self, pos: IVec2) -> bool {
        self.in_bounds(pos)
            && self.cells[(pos.y * self.side + pos.x) as usize] == CellState::Occupied
    }

    /// Returns `true` if any of the four orthogonal neighbors of `pos`
    /// is occupied. Diagonal contact does not count; the aggregate stays
    /// 4-connected.
    pub fn has_occupied_neighbor(&self, pos: IVec2) -> bool {
        const NEIGHBORS: [IVec2; 4] = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];
        NEIGHBORS.iter().any(|&off| self.is_occupied(pos + off))
    }

    /// Returns `true` if `pos` lies in the escape band along the buffer
    /// edge: `x <= 1`, `x >= side - 1`, `y <= 1` or `y >= side - 1`.
    /// A walker reaching this band is discarded.
    #[inline]
    pub fn near_edge(&self, pos: IVec2) -> bool {
        pos.x <= 1 || pos.x >= self.side - 1 || pos.y <= 1 || pos.y >= self.side - 1
    }

    /// Returns `true` if `pos` lies within the circular growth domain,
    /// i.e. its distance from the seed is at most `radius`.
    #[inline]
    pub fn in_domain(&self, pos: IVec2) -> bool {
        self.dist2_from_seed(pos) <= (self.radius as i64) * (self.radius as i64)
    }

    /// Returns `true` if `pos` sits on the outermost ring of the growth
    /// domain: its distance from the seed is at least `radius - 1`. A
    /// stick on this ring completes the aggregate.
    #[inline]
    pub fn near_circular_bound(&self, pos: IVec2) -> bool {
        let rim = (self.radius - 1) as i64;
        self.dist2_from_seed(pos) >= rim * rim
    }

    /// Clamps a position into the buffer, component-wise.
    #[inline]
    pub fn clamp(&self, pos: IVec2) -> IVec2 {
        pos.clamp(IVec2::ZERO, IVec2::splat(self.side - 1))
    }

    /// Iterates over all cells in row-major order as `(position, state)`.
    pub fn cells<'a>(&'a self) -> impl Iterator<Item = (IVec2, CellState)> + 'a {
        self.cells.iter().enumerate().map(|(i, &state)| {
            let x = (i as i32) % self.side;
            let y = (i as i32) / self.side;
            (IVec2::new(x, y), state)
        })
    }

    #[inline]
    fn dist2_from_seed(&self, pos: IVec2) -> i64 {
        let dx = pos.x as i64 - self.seed.x as i64;
        let dy = pos.y as i64 - self.seed.y as i64;
        dx * dx + dy * dy
    }
}
