//! Terrain source contract
//!
//! An [`Outline`] is a zoomed-out description of the world that the autotiler
//! reads cells from. Implementations must be cheap and side-effect free: the
//! engine queries up to nine cells (target + 8 neighbors) for every cell it
//! tiles, and may query the same coordinate repeatedly.

use crate::cell::Cell;
use crate::error::Result;
use crate::rect::Rect;

/// Read-only terrain source the autotiler samples cells from.
///
/// All methods must be thread-safe; independent maps are generated by
/// parallel workers reading from the same outline.
pub trait Outline {
    /// The world-space region this outline can answer queries for
    fn bounds(&self) -> Rect;

    /// A read-only snapshot of the terrain at `(x, y)`.
    ///
    /// Out-of-range coordinates are the implementation's concern: return a
    /// null cell, clamp, wrap, whatever suits the world. Errors abort the
    /// current map's generation.
    fn at(&self, x: i32, y: i32) -> Result<Cell>;
}

/// Semantic terrain tags reported by tag queries and attached to placements
pub mod tags {
    /// Any water tile
    pub const WATER: &str = "water";

    /// General grassy ground
    pub const GRASS: &str = "grass";
    /// Deserts, beaches
    pub const SAND: &str = "sand";
    /// Bare earth fallback
    pub const DIRT: &str = "dirt";
    /// Cold-climate ground
    pub const SNOW: &str = "snow";
    /// Barren / mountainous ground
    pub const ROCK: &str = "rock";

    /// Road, path or street
    pub const ROAD: &str = "road";
    /// Molten rock
    pub const LAVA: &str = "lava";
    /// The visible face of a cliff
    pub const CLIFF_FACE: &str = "cliff-face";
    /// High ground adjoining a cliff face
    pub const CLIFF_EDGE: &str = "cliff-edge";

    /// Nothing was placed
    pub const NULL: &str = "null";
}
