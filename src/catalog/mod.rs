//! Tile catalogs
//!
//! A [`LandCatalog`] is the named bundle of tile image references a cell
//! draws from, organized by terrain kind and geometric role. Catalogs are
//! immutable configuration: validated once at load time, then shared
//! read-only (behind an `Arc`) between all cells and parallel map workers.
//!
//! Validation and runtime differ deliberately: a consulted role that is
//! empty fails [`LandCatalog::validate`], but if one slips through to
//! runtime the engine places nothing rather than erroring.

mod cliff;
mod tileset;
mod waterfall;

pub use cliff::CliffTileset;
pub use tileset::Tileset;
pub use waterfall::{FallFace, FallLip, StairTiles, WaterfallTiles};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{AutotileError, Result};

/// Floor tiles for one basic land type (grass, sand, dirt, snow, rock)
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundTiles {
    /// Tiles fully covered by this land type
    pub full: Vec<String>,

    /// Partial-cover tiles layered over another land type to soften the
    /// boundary between two regions (eg. grass giving way to snow)
    pub transition: Vec<String>,
}

/// A named bundle of tile references for every terrain the engine places.
///
/// Every field is optional; an absent terrain kind simply never places
/// tiles. Present kinds must pass [`LandCatalog::validate`] before the
/// engine runs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandCatalog {
    /// Catalog name, for error reporting and logs
    pub name: String,

    /// Tile set where the cell is unclassified void, if any
    pub null: Option<String>,

    /// General ground, the default when nothing else applies
    pub grass: Option<GroundTiles>,
    /// Deserts and beaches
    pub sand: Option<GroundTiles>,
    /// Fallback ground when grass cannot be placed
    pub dirt: Option<GroundTiles>,
    /// Cold-climate ground
    pub snow: Option<GroundTiles>,
    /// Barren / mountainous ground
    pub rock: Option<GroundTiles>,

    /// Water bodies (sea, rivers, swamps)
    pub water: Option<Tileset>,
    /// Roads, paths, streets
    pub road: Option<Tileset>,
    /// Road pieces crossing water
    pub bridge: Option<Tileset>,
    /// Molten rock
    pub lava: Option<Tileset>,

    /// Cliff faces, placed where high ground meets low
    pub cliff: Option<CliffTileset>,

    /// Waterfalls, where water crosses a cliff
    pub waterfall: Option<WaterfallTiles>,
    /// Staircases, where a road crosses a cliff
    pub stairs: Option<StairTiles>,
}

impl LandCatalog {
    /// Every required role of every present terrain kind that has no tile
    /// variants, in catalog order.
    ///
    /// Waterfall and stair sub-pieces are deliberately not required; absent
    /// ones drop their feature silently at resolution time.
    pub fn missing_roles(&self) -> Vec<String> {
        let mut missing = Vec::new();

        let grounds = [
            ("grass", &self.grass),
            ("sand", &self.sand),
            ("dirt", &self.dirt),
            ("snow", &self.snow),
            ("rock", &self.rock),
        ];
        for (name, ground) in grounds {
            if let Some(g) = ground {
                if g.full.is_empty() {
                    missing.push(format!("{name}: full"));
                }
            }
        }

        let tilesets = [
            ("water", &self.water),
            ("road", &self.road),
            ("bridge", &self.bridge),
            ("lava", &self.lava),
        ];
        for (name, tileset) in tilesets {
            if let Some(ts) = tileset {
                for (role, tiles) in ts.required_roles() {
                    if tiles.is_empty() {
                        missing.push(format!("{name}: {role}"));
                    }
                }
            }
        }

        if let Some(cliff) = &self.cliff {
            for (role, tiles) in cliff.required_roles() {
                if tiles.is_empty() {
                    missing.push(format!("cliff: {role}"));
                }
            }
        }

        missing
    }

    /// Check every consulted role has at least one tile.
    ///
    /// Idempotent; validating twice yields the same result and the same
    /// missing-role list.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_roles();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AutotileError::IncompleteCatalog { missing })
        }
    }
}

/// Choose one tile at random; `None` when the role is empty
pub(crate) fn one<'a, R: Rng>(rng: &mut R, items: &'a [String]) -> Option<&'a str> {
    items.choose(rng).map(|s| s.as_str())
}

/// The first non-empty `full` role along a fallback chain of ground types.
///
/// Land-type decisions are expressed as ordered chains (grass, else dirt,
/// else rock) consulted by this helper rather than nested conditionals.
pub(crate) fn first_full<'a, R: Rng>(
    rng: &mut R,
    chain: &[Option<&'a GroundTiles>],
) -> Option<&'a str> {
    chain
        .iter()
        .flatten()
        .find(|g| !g.full.is_empty())
        .and_then(|g| one(rng, &g.full))
}

/// The first non-empty `transition` role along a fallback chain
pub(crate) fn first_transition<'a, R: Rng>(
    rng: &mut R,
    chain: &[Option<&'a GroundTiles>],
) -> Option<&'a str> {
    chain
        .iter()
        .flatten()
        .find(|g| !g.transition.is_empty())
        .and_then(|g| one(rng, &g.transition))
}
