//! Collision aggregation
//!
//! Some features (stairs, waterfalls) span several cells, but the per-cell
//! pass only ever sees one cell at a time. Qualifying cells emit collision
//! events instead of tiles; the [`CollisionMap`] merges adjacent same-kind
//! events into rectangular [`CollisionRegion`]s which are resolved into
//! directional fills once the full-map pass completes.

use crate::event::Event;
use crate::rect::Rect;

/// The kind of multi-cell feature a collision event asks for.
///
/// Directions read flow-from/flow-to: `WaterfallNorthSouth` flows from the
/// north down towards the viewer, `WaterfallSouthNorth` away over the far
/// side of a cliff.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionKind {
    WaterfallNorthSouth,
    WaterfallSouthNorth,
    WaterfallEastWest,
    WaterfallWestEast,
    StairsNorthSouth,
    StairsSouthNorth,
    StairsEastWest,
    StairsWestEast,
}

impl CollisionKind {
    /// Whether this kind is a staircase (road crossing a cliff)
    pub fn is_stairs(self) -> bool {
        matches!(
            self,
            CollisionKind::StairsNorthSouth
                | CollisionKind::StairsSouthNorth
                | CollisionKind::StairsEastWest
                | CollisionKind::StairsWestEast
        )
    }
}

/// A merged rectangle of same-kind collision events
#[derive(Debug, Clone)]
pub struct CollisionRegion {
    kind: CollisionKind,
    rect: Rect,
    events: Vec<Event>,
}

impl CollisionRegion {
    fn new(kind: CollisionKind, first: Event) -> Self {
        Self {
            kind,
            rect: Rect::cell(first.pos),
            events: vec![first],
        }
    }

    /// The feature kind shared by every member event
    pub fn kind(&self) -> CollisionKind {
        self.kind
    }

    /// Inclusive bounding rectangle of the member events
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Member events in arrival order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Join `incoming` to this region if it is the same kind and lies within
    /// Chebyshev distance 1 of any member event. Returns whether it joined.
    fn accept(&mut self, incoming: &Event) -> bool {
        if incoming.collision != Some(self.kind) {
            return false;
        }
        let near = self.events.iter().any(|e| {
            let d = (e.pos - incoming.pos).abs();
            d.x <= 1 && d.y <= 1
        });
        if !near {
            return false;
        }
        self.rect.include(incoming.pos);
        self.events.push(incoming.clone());
        true
    }
}

/// Accumulates collision events over one full-map pass
#[derive(Debug, Default)]
pub struct CollisionMap {
    regions: Vec<CollisionRegion>,
}

impl CollisionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a collision event, merging it into the first adjacent region
    /// of the same kind or opening a new singleton region.
    pub fn push(&mut self, event: Event) {
        let Some(kind) = event.collision else {
            return; // not a collision event
        };
        for region in self.regions.iter_mut() {
            if region.accept(&event) {
                return;
            }
        }
        self.regions.push(CollisionRegion::new(kind, event));
    }

    /// All accumulated regions, in the order they were opened
    pub fn regions(&self) -> &[CollisionRegion] {
        &self.regions
    }
}
