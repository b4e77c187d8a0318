//! Autotiling for 2D orthogonal grid maps
//!
//! Turns a coarse terrain description (height, temperature, water / road /
//! lava flags per cell) into concrete tile placements: land with biome
//! transitions, self-joining water, roads and lava, cliffs along height
//! drops, and waterfalls and staircases where rivers and roads cross them.
//!
//! Terrain comes in through the [`Outline`] trait, tiles go out through the
//! [`TileSink`] trait, and the tile art is described by a [`LandCatalog`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use grid_autotile::*;
//!
//! # struct World;
//! # impl Outline for World {
//! #     fn bounds(&self) -> Rect { Rect::cell(IVec2::ZERO) }
//! #     fn at(&self, _x: i32, _y: i32) -> Result<Cell> { unimplemented!() }
//! # }
//! let config = AutotilerConfigBuilder::new()
//!     .seed(42)
//!     .workers(4).unwrap()
//!     .build().unwrap();
//!
//! let tiler = Autotiler::new(config).unwrap();
//! let world = World;
//!
//! let mut map = MapBuffer::new();
//! tiler.render_map(&world, world.bounds(), &mut map).unwrap();
//! println!("placed {} tiles", map.len());
//! ```
//!
//! # Features
//!
//! - `serde`: Enables serialization support for configuration and catalogs

// Modules
pub mod autotiler;
pub mod catalog;
pub mod cell;
pub mod collision;
pub mod config;
pub mod error;
pub mod event;
pub mod heading;
pub mod outline;
pub mod rect;
pub mod sink;

// Re-export core types for convenience
pub use autotiler::Autotiler;
pub use catalog::{
    CliffTileset, FallFace, FallLip, GroundTiles, LandCatalog, StairTiles, Tileset,
    WaterfallTiles,
};
pub use cell::{Cell, Neighbor, Neighborhood};
pub use collision::{CollisionKind, CollisionMap, CollisionRegion};
pub use config::{AutotilerConfig, AutotilerConfigBuilder};
pub use error::{AutotileError, Result};
pub use event::{presets, Event, Properties, Value};
pub use heading::Heading;
pub use outline::{tags, Outline};
pub use rect::Rect;
pub use sink::{MapBuffer, TileSink};

// Re-export glam::IVec2 for convenience
pub use glam::IVec2;
