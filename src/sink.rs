//! Placement output
//!
//! The engine writes finished placements through the [`TileSink`] trait so
//! callers can stream tiles straight into their own map structures.
//! [`MapBuffer`] is the in-memory reference sink: it keeps the ordered
//! placement log plus a last-write-wins index by (x, y, z), which is enough
//! to export to an external map format afterwards.

use std::collections::HashMap;

use glam::IVec2;

use crate::event::{Event, Properties};

/// Receives placements as the engine emits them.
///
/// Calls arrive in emission order; a later call for the same (x, y, z)
/// replaces the earlier one.
pub trait TileSink {
    /// Place a tile image at the given position and z layer
    fn set_tile(&mut self, x: i32, y: i32, z: i32, src: &str, properties: &Properties);

    /// Place a game object at the given position and z layer
    fn place_object(&mut self, x: i32, y: i32, z: i32, object_id: &str);
}

/// In-memory sink keeping every placement plus a by-position tile index
#[derive(Debug, Default)]
pub struct MapBuffer {
    log: Vec<Event>,
    tiles: HashMap<(i32, i32, i32), usize>,
}

impl MapBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every placement in the order it was emitted, overwrites included
    pub fn log(&self) -> &[Event] {
        &self.log
    }

    /// The surviving tile at (x, y, z), after overwrites
    pub fn tile_at(&self, x: i32, y: i32, z: i32) -> Option<&Event> {
        self.tiles.get(&(x, y, z)).map(|&i| &self.log[i])
    }

    /// Surviving tiles at (x, y) across all z layers, lowest layer first
    pub fn tiles_at(&self, x: i32, y: i32) -> Vec<&Event> {
        let mut found: Vec<&Event> = self
            .tiles
            .iter()
            .filter(|((tx, ty, _), _)| *tx == x && *ty == y)
            .map(|(_, &i)| &self.log[i])
            .collect();
        found.sort_by_key(|e| e.z);
        found
    }

    /// Number of distinct (x, y, z) positions holding a tile
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl TileSink for MapBuffer {
    fn set_tile(&mut self, x: i32, y: i32, z: i32, src: &str, properties: &Properties) {
        let event = Event::tile(IVec2::new(x, y), z, src, properties.clone());
        self.log.push(event);
        self.tiles.insert((x, y, z), self.log.len() - 1);
    }

    fn place_object(&mut self, x: i32, y: i32, z: i32, object_id: &str) {
        let event = Event::object(IVec2::new(x, y), z, object_id);
        self.log.push(event);
        self.tiles.insert((x, y, z), self.log.len() - 1);
    }
}
