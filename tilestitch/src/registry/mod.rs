//! Tile registry - the set of known tiles, keyed by world coordinate.
//!
//! A coordinate-keyed map over [`Tile`] entities with the adjacency and
//! bounds queries the compositor and alignment estimator need. Backed by a
//! `BTreeMap` so iteration is always ascending (x, z) without explicit
//! re-sorting, which keeps compositing deterministic.
//!
//! The registry is single-threaded and batch-oriented; there is no interior
//! locking.

use crate::coord::WorldCoord;
use crate::tile::Tile;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Axis-aligned world-space bounds of a set of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl Bounds {
    /// The minimum corner as a coordinate.
    #[inline]
    pub fn min(&self) -> WorldCoord {
        WorldCoord::new(self.min_x, self.min_z)
    }
}

/// Errors raised by registry queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry holds no tiles
    Empty,
    /// Step-size inference needs at least two tiles
    InsufficientTiles(usize),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Empty => write!(f, "Registry contains no tiles"),
            RegistryError::InsufficientTiles(count) => {
                write!(
                    f,
                    "Step-size inference needs at least 2 tiles, registry has {}",
                    count
                )
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// The set of known tiles for one capture run.
#[derive(Debug, Default)]
pub struct TileRegistry {
    tiles: BTreeMap<WorldCoord, Tile>,
}

impl TileRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        TileRegistry::default()
    }

    /// Number of tiles in the registry.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True when no tiles have been added.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Adds a tile, first-seen wins.
    ///
    /// A second tile at an already-known coordinate is not an error and
    /// never replaces existing data; it may only contribute a path the
    /// existing entity is missing. This is how the raw screenshot and the
    /// pre-cropped tile file for the same capture merge into one entity.
    pub fn add(&mut self, tile: Tile) {
        match self.tiles.get_mut(&tile.coord()) {
            Some(existing) => {
                if existing.screenshot_path().is_none() {
                    if let Some(path) = tile.screenshot_path() {
                        existing.set_screenshot_path(path.to_path_buf());
                    }
                }
                if existing.tile_path().is_none() {
                    if let Some(path) = tile.tile_path() {
                        existing.set_tile_path(path.to_path_buf());
                    }
                }
                debug!(coord = %tile.coord(), "Duplicate tile coordinate, keeping first");
            }
            None => {
                self.tiles.insert(tile.coord(), tile);
            }
        }
    }

    /// Looks up a tile by coordinate.
    pub fn get(&self, coord: &WorldCoord) -> Option<&Tile> {
        self.tiles.get(coord)
    }

    /// Looks up a tile by coordinate, mutably.
    pub fn get_mut(&mut self, coord: &WorldCoord) -> Option<&mut Tile> {
        self.tiles.get_mut(coord)
    }

    /// Iterates tiles in ascending (x, z) order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// All coordinates in ascending (x, z) order.
    pub fn coords(&self) -> Vec<WorldCoord> {
        self.tiles.keys().copied().collect()
    }

    /// The tile at `(coord.x + dx, coord.z + dz)`, if present.
    ///
    /// Absence is the normal outcome at grid edges and is reported as
    /// `None`, never as an error.
    pub fn find_neighbour(&self, coord: WorldCoord, dx: i32, dz: i32) -> Option<&Tile> {
        self.tiles.get(&coord.offset(dx, dz))
    }

    /// Grid step size inferred from the first two tiles in sort order.
    ///
    /// Computed as `max(|x0-x1|, |z0-z1|)`. This matches the capture tool's
    /// behavior but is only correct when those two tiles are grid-adjacent;
    /// see [`TileRegistry::min_pairwise_step`] for the robust variant.
    pub fn step_size(&self) -> Result<i32, RegistryError> {
        let mut keys = self.tiles.keys();
        let (first, second) = match (keys.next(), keys.next()) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err(RegistryError::InsufficientTiles(self.tiles.len())),
        };
        let x_diff = (first.x - second.x).abs();
        let z_diff = (first.z - second.z).abs();
        Ok(x_diff.max(z_diff))
    }

    /// Grid step size as the minimum positive per-axis coordinate delta
    /// across the whole registry.
    ///
    /// Correct even when the first two tiles in sort order are not adjacent
    /// (e.g. a column of captures is missing at the western edge).
    pub fn min_pairwise_step(&self) -> Result<i32, RegistryError> {
        if self.tiles.len() < 2 {
            return Err(RegistryError::InsufficientTiles(self.tiles.len()));
        }

        let mut xs: Vec<i32> = self.tiles.keys().map(|c| c.x).collect();
        let mut zs: Vec<i32> = self.tiles.keys().map(|c| c.z).collect();
        xs.sort_unstable();
        xs.dedup();
        zs.sort_unstable();
        zs.dedup();

        let min_delta = |values: &[i32]| {
            values
                .windows(2)
                .map(|w| w[1] - w[0])
                .filter(|d| *d > 0)
                .min()
        };

        match (min_delta(&xs), min_delta(&zs)) {
            (Some(dx), Some(dz)) => Ok(dx.min(dz)),
            (Some(dx), None) => Ok(dx),
            (None, Some(dz)) => Ok(dz),
            // All tiles share one coordinate on both axes, which add() makes
            // impossible for len >= 2
            (None, None) => Err(RegistryError::InsufficientTiles(self.tiles.len())),
        }
    }

    /// World-space bounds over all tiles.
    pub fn bounds(&self) -> Result<Bounds, RegistryError> {
        Self::bounds_over(self.tiles.keys().copied())
    }

    /// World-space bounds over a selection of coordinates.
    pub fn bounds_of(&self, selection: &[WorldCoord]) -> Result<Bounds, RegistryError> {
        Self::bounds_over(selection.iter().copied())
    }

    fn bounds_over(coords: impl Iterator<Item = WorldCoord>) -> Result<Bounds, RegistryError> {
        let mut bounds: Option<Bounds> = None;
        for coord in coords {
            let b = bounds.get_or_insert(Bounds {
                min_x: coord.x,
                max_x: coord.x,
                min_z: coord.z,
                max_z: coord.z,
            });
            b.min_x = b.min_x.min(coord.x);
            b.max_x = b.max_x.max(coord.x);
            b.min_z = b.min_z.min(coord.z);
            b.max_z = b.max_z.max(coord.z);
        }
        bounds.ok_or(RegistryError::Empty)
    }
}
