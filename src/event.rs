//! Placement events and tile metadata
//!
//! Every decision the engine makes is expressed as an [`Event`]: set a tile
//! image at a grid coordinate and z-layer, or place a composite object.
//! Consumers apply events in emission order; a later event at the same
//! `(x, y, z)` overwrites an earlier one.

use std::collections::BTreeMap;

use glam::IVec2;

use crate::collision::CollisionKind;

/// A typed metadata value attached to a placed tile
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Bool(bool),
    Int(i64),
}

/// Metadata properties attached to a placed tile.
///
/// Keys are ordered so serialized output is stable.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties(BTreeMap<String, Value>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_str(&mut self, key: &str, value: &str) -> &mut Self {
        self.0.insert(key.to_string(), Value::Str(value.to_string()));
        self
    }

    pub fn set_bool(&mut self, key: &str, value: bool) -> &mut Self {
        self.0.insert(key.to_string(), Value::Bool(value));
        self
    }

    pub fn set_int(&mut self, key: &str, value: i64) -> &mut Self {
        self.0.insert(key.to_string(), Value::Int(value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// property keys readable from tileset metadata
const P_OBJECT: &str = "object";
const P_BIOME: &str = "biome";
const P_WALL: &str = "wall";
const P_WATER: &str = "water";
const P_LAVA: &str = "lava";

/// Properties presets per layer, mirrored into the tileset metadata so map
/// consumers can query what a tile is without knowing the image names.
pub mod presets {
    use super::*;

    pub fn water() -> Properties {
        let mut p = Properties::new();
        p.set_str(P_OBJECT, "water")
            .set_str(P_BIOME, "river")
            .set_bool(P_WATER, true);
        p
    }

    pub fn land() -> Properties {
        let mut p = Properties::new();
        p.set_str(P_OBJECT, "land").set_str(P_BIOME, "land");
        p
    }

    pub fn road() -> Properties {
        let mut p = Properties::new();
        p.set_str(P_OBJECT, "road").set_str(P_BIOME, "land");
        p
    }

    pub fn cliff() -> Properties {
        let mut p = Properties::new();
        p.set_str(P_OBJECT, "cliff-face")
            .set_str(P_BIOME, "rock")
            .set_bool(P_WALL, true);
        p
    }

    pub fn lava() -> Properties {
        let mut p = Properties::new();
        p.set_str(P_OBJECT, "lava")
            .set_str(P_BIOME, "volcanic")
            .set_bool(P_LAVA, true);
        p
    }

    pub fn waterfall() -> Properties {
        let mut p = Properties::new();
        p.set_str(P_OBJECT, "waterfall")
            .set_str(P_BIOME, "river")
            .set_bool(P_WALL, true)
            .set_bool(P_WATER, true);
        p
    }

    pub fn null() -> Properties {
        let mut p = Properties::new();
        p.set_str(P_OBJECT, "null");
        p
    }
}

/// A single placement decision
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Grid position
    pub pos: IVec2,
    /// Z-layer
    pub z: i32,

    /// Tile image reference; empty means no tile is set by this event
    pub src: String,
    /// Metadata attached to the placed tile
    pub properties: Properties,

    /// Composite object reference, for object placements
    pub object_id: Option<String>,

    /// Set on events that signal a multi-cell feature rather than a tile.
    /// Collision events are aggregated internally and never reach the sink.
    pub(crate) collision: Option<CollisionKind>,
}

impl Event {
    /// A tile placement
    pub fn tile(pos: IVec2, z: i32, src: impl Into<String>, properties: Properties) -> Self {
        Self {
            pos,
            z,
            src: src.into(),
            properties,
            object_id: None,
            collision: None,
        }
    }

    /// A composite object placement
    pub fn object(pos: IVec2, z: i32, object_id: impl Into<String>) -> Self {
        Self {
            pos,
            z,
            src: String::new(),
            properties: Properties::new(),
            object_id: Some(object_id.into()),
            collision: None,
        }
    }

    /// A collision signal (internal)
    pub(crate) fn collision(pos: IVec2, z: i32, kind: CollisionKind) -> Self {
        Self {
            pos,
            z,
            src: String::new(),
            properties: Properties::new(),
            object_id: None,
            collision: Some(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_round_trip() {
        let mut p = Properties::new();
        p.set_str("object", "water");
        p.set_bool("water", true);
        p.set_int("depth", 3);

        assert_eq!(p.get("object"), Some(&Value::Str("water".to_string())));
        assert_eq!(p.get("water"), Some(&Value::Bool(true)));
        assert_eq!(p.get("depth"), Some(&Value::Int(3)));
        assert_eq!(p.get("missing"), None);
    }

    #[test]
    fn test_presets_carry_object_key() {
        for p in [
            presets::water(),
            presets::land(),
            presets::road(),
            presets::cliff(),
            presets::lava(),
            presets::waterfall(),
            presets::null(),
        ] {
            assert!(matches!(p.get("object"), Some(Value::Str(_))));
        }
        assert_eq!(
            presets::waterfall().get("water"),
            Some(&Value::Bool(true))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_event_serialization() {
        let e = Event::tile(IVec2::new(3, 4), 2, "water.full.01.png", presets::water());
        let json = serde_json::to_string(&e).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }
}
