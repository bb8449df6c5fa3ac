/// Identifier for a site in a [`crate::site::SiteIndex`].
///
/// This is an index into `SiteIndex::sites`, and is only meaningful within
/// the lifetime of a given `SiteIndex` instance. The [`crate::region::RegionMap`]
/// built from an index stores these ids, one per world cell.
pub type SiteId = usize;
