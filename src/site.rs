use crate::types::SiteId;
use glam::IVec2;
use rand::Rng;

/// A Voronoi site: a fixed point that owns the world cells closest to it.
///
/// `tag` is an opaque display hint (e.g. a palette index) that the core
/// never interprets; renderers may use it to color the site's region.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub id: SiteId,
    pub pos: IVec2,
    pub tag: Option<u32>,
}

/// The full set of sites partitioning a world grid.
///
/// Sites are immutable after construction; their ids are their indices.
#[derive(Debug)]
pub struct SiteIndex {
    sites: Vec<Site>,
}

impl SiteIndex {
    pub fn from_positions(positions: Vec<IVec2>) -> Self {
        let sites = positions
            .into_iter()
            .enumerate()
            .map(|(id, pos)| Site { id, pos, tag: None })
            .collect();

        Self { sites }
    }

    /// Draws `count` sites uniformly in `[0, width) x [0, height)`.
    ///
    /// Duplicate positions are allowed; a duplicate simply owns no cells
    /// because the lower id wins every tie. Each site gets a random `tag`.
    pub fn random(width: i32, height: i32, count: usize, rng: &mut impl Rng) -> Self {
        let mut index = Self::from_positions(
            (0..count)
                .map(|_| {
                    let x = rng.random_range(0..width);
                    let y = rng.random_range(0..height);
                    IVec2::new(x, y)
                })
                .collect(),
        );
        for site in &mut index.sites {
            site.tag = Some(rng.random());
        }
        index
    }

    /// Returns the id of the site closest to `pos` in Euclidean distance.
    ///
    /// Exact ties resolve to the lowest id: the scan runs in id order and
    /// only a strictly smaller squared distance replaces the current best.
    /// Distances are compared as squared integers, so the result is exact
    /// for any probe point.
    ///
    /// ### Returns
    /// The nearest [`SiteId`], or `None` if the index has no sites.
    pub fn nearest(&self, pos: IVec2) -> Option<SiteId> {
        let mut best = None;
        let mut best_d2 = i64::MAX;
        for s in &self.sites {
            let dx = s.pos.x as i64 - pos.x as i64;
            let dy = s.pos.y as i64 - pos.y as i64;
            let d2 = dx * dx + dy * dy;
            if d2 < best_d2 {
                best_d2 = d2;
                best = Some(s.id);
            }
        }
        best
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    #[inline]
    pub fn get(&self, id: SiteId) -> Option<&Site> {
        self.sites.get(id)
    }

    #[inline]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn from_positions_assigns_sequential_ids() {
        let index = SiteIndex::from_positions(vec![
            IVec2::new(3, 4),
            IVec2::new(0, 0),
            IVec2::new(-2, 7),
        ]);

        assert_eq!(index.len(), 3);
        for (i, site) in index.sites().iter().enumerate() {
            assert_eq!(site.id, i);
            assert_eq!(site.tag, None);
        }
        assert_eq!(index.get(1).map(|s| s.pos), Some(IVec2::new(0, 0)));
        assert_eq!(index.get(3), None);
    }

    #[test]
    fn nearest_returns_closest_site() {
        let index = SiteIndex::from_positions(vec![IVec2::new(0, 0), IVec2::new(10, 0)]);

        assert_eq!(index.nearest(IVec2::new(2, 1)), Some(0));
        assert_eq!(index.nearest(IVec2::new(9, -1)), Some(1));
    }

    #[test]
    fn nearest_breaks_exact_ties_toward_lowest_id() {
        // Probe (5, 0) is exactly 5 cells from both sites.
        let index = SiteIndex::from_positions(vec![IVec2::new(0, 0), IVec2::new(10, 0)]);
        assert_eq!(index.nearest(IVec2::new(5, 0)), Some(0));

        // Same layout, reversed ids: the tie still goes to the lower id.
        let index = SiteIndex::from_positions(vec![IVec2::new(10, 0), IVec2::new(0, 0)]);
        assert_eq!(index.nearest(IVec2::new(5, 0)), Some(0));
    }

    #[test]
    fn nearest_with_duplicate_sites_prefers_earlier_id() {
        let index = SiteIndex::from_positions(vec![
            IVec2::new(4, 4),
            IVec2::new(4, 4),
            IVec2::new(20, 20),
        ]);
        assert_eq!(index.nearest(IVec2::new(5, 5)), Some(0));
    }

    #[test]
    fn nearest_on_empty_index_is_none() {
        let index = SiteIndex::from_positions(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.nearest(IVec2::new(0, 0)), None);
    }

    #[test]
    fn random_sites_stay_in_bounds_and_are_seed_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let a = SiteIndex::random(64, 48, 25, &mut rng);

        assert_eq!(a.len(), 25);
        for site in a.sites() {
            assert!(site.pos.x >= 0 && site.pos.x < 64);
            assert!(site.pos.y >= 0 && site.pos.y < 48);
            assert!(site.tag.is_some());
        }

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let b = SiteIndex::random(64, 48, 25, &mut rng);
        assert_eq!(a.sites(), b.sites());
    }
}
