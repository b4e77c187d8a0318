//! Waterfall and staircase tiles
//!
//! Waterfalls and stairs are resolved over a rectangle rather than a single
//! cell. A [`FallFace`] is the Left/Mid/Right x Top/Centre/Bottom grid of
//! sub-pieces for a feature facing the viewer; a [`FallLip`] is the single
//! visible top edge of a feature flowing away from the viewer.

use glam::IVec2;
use rand::Rng;

use crate::event::{Event, Properties};
use crate::rect::Rect;

use super::one;

/// Sub-pieces of a feature facing the viewer, filled over a rectangle
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallFace {
    pub left_top: Vec<String>,
    pub left_centre: Vec<String>,
    pub left_bottom: Vec<String>,
    pub mid_top: Vec<String>,
    pub mid_centre: Vec<String>,
    pub mid_bottom: Vec<String>,
    pub right_top: Vec<String>,
    pub right_centre: Vec<String>,
    pub right_bottom: Vec<String>,
}

impl FallFace {
    /// Fill `rect` bottom-to-top with positional sub-pieces.
    ///
    /// Rows are emitted max-Y first so pieces nearer the front of the view
    /// keep a consistent stacking order. A single-column rectangle uses the
    /// Mid column; a single-row rectangle uses the Top row (the lip).
    /// Empty sub-roles emit nothing for their cells.
    pub(crate) fn fill_rect<R: Rng>(
        &self,
        rng: &mut R,
        rect: Rect,
        z: i32,
        properties: &Properties,
    ) -> Vec<Event> {
        let mut events = Vec::new();
        for y in (rect.min.y..=rect.max.y).rev() {
            for x in rect.min.x..=rect.max.x {
                let role = self.role_at(rect, x, y);
                if let Some(src) = one(rng, role) {
                    events.push(Event::tile(IVec2::new(x, y), z, src, properties.clone()));
                }
            }
        }
        events
    }

    fn role_at(&self, rect: Rect, x: i32, y: i32) -> &[String] {
        let top = y == rect.min.y || rect.height() == 1;
        let bottom = !top && y == rect.max.y;
        let left = x == rect.min.x && rect.width() > 1;
        let right = x == rect.max.x && rect.width() > 1;

        match (left, right) {
            (true, _) => {
                if top {
                    &self.left_top
                } else if bottom {
                    &self.left_bottom
                } else {
                    &self.left_centre
                }
            }
            (_, true) => {
                if top {
                    &self.right_top
                } else if bottom {
                    &self.right_bottom
                } else {
                    &self.right_centre
                }
            }
            _ => {
                if top {
                    &self.mid_top
                } else if bottom {
                    &self.mid_bottom
                } else {
                    &self.mid_centre
                }
            }
        }
    }
}

/// The visible lip of a feature flowing away from the viewer
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallLip {
    pub mid_top: Vec<String>,
}

impl FallLip {
    /// Fill every cell of `rect` with the lip piece, bottom-to-top
    pub(crate) fn fill_rect<R: Rng>(
        &self,
        rng: &mut R,
        rect: Rect,
        z: i32,
        properties: &Properties,
    ) -> Vec<Event> {
        let mut events = Vec::new();
        for y in (rect.min.y..=rect.max.y).rev() {
            for x in rect.min.x..=rect.max.x {
                if let Some(src) = one(rng, &self.mid_top) {
                    events.push(Event::tile(IVec2::new(x, y), z, src, properties.clone()));
                }
            }
        }
        events
    }
}

/// Waterfall tiles per flow direction. All directions are optional; a
/// resolved region with no matching direction places nothing.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaterfallTiles {
    /// Flowing north to south, towards the viewer
    pub ns: Option<FallFace>,
    /// Flowing south to north, away over the far side of the cliff
    pub sn: Option<FallLip>,
    /// Flowing east to west
    pub ew: Option<FallFace>,
    /// Flowing west to east
    pub we: Option<FallFace>,
}

/// Staircase tiles per climb direction, for roads crossing cliffs
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StairTiles {
    pub ns: Option<FallFace>,
    pub sn: Option<FallFace>,
    pub ew: Option<FallFace>,
    pub we: Option<FallFace>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::presets;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn named_face() -> FallFace {
        FallFace {
            left_top: vec!["lt".into()],
            left_centre: vec!["lc".into()],
            left_bottom: vec!["lb".into()],
            mid_top: vec!["mt".into()],
            mid_centre: vec!["mc".into()],
            mid_bottom: vec!["mb".into()],
            right_top: vec!["rt".into()],
            right_centre: vec!["rc".into()],
            right_bottom: vec!["rb".into()],
        }
    }

    #[test]
    fn test_fill_three_by_three() {
        let rect = Rect::new(IVec2::new(0, 0), IVec2::new(2, 2));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let events = named_face().fill_rect(&mut rng, rect, 5, &presets::waterfall());

        assert_eq!(events.len(), 9);
        // bottom row first, left to right
        assert_eq!(events[0].pos, IVec2::new(0, 2));
        assert_eq!(events[0].src, "lb");
        assert_eq!(events[1].src, "mb");
        assert_eq!(events[2].src, "rb");
        // centre row
        assert_eq!(events[3].src, "lc");
        assert_eq!(events[4].src, "mc");
        assert_eq!(events[5].src, "rc");
        // top row last
        assert_eq!(events[6].pos, IVec2::new(0, 0));
        assert_eq!(events[6].src, "lt");
        assert_eq!(events[7].src, "mt");
        assert_eq!(events[8].src, "rt");
        assert!(events.iter().all(|e| e.z == 5));
    }

    #[test]
    fn test_single_column_uses_mid() {
        let rect = Rect::new(IVec2::new(4, 0), IVec2::new(4, 2));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let events = named_face().fill_rect(&mut rng, rect, 5, &presets::waterfall());

        let srcs: Vec<&str> = events.iter().map(|e| e.src.as_str()).collect();
        assert_eq!(srcs, vec!["mb", "mc", "mt"]);
    }

    #[test]
    fn test_single_row_uses_top() {
        let rect = Rect::new(IVec2::new(0, 4), IVec2::new(2, 4));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let events = named_face().fill_rect(&mut rng, rect, 5, &presets::waterfall());

        let srcs: Vec<&str> = events.iter().map(|e| e.src.as_str()).collect();
        assert_eq!(srcs, vec!["lt", "mt", "rt"]);
    }

    #[test]
    fn test_empty_sub_role_skips_cells() {
        let mut face = named_face();
        face.mid_centre.clear();
        let rect = Rect::new(IVec2::new(0, 0), IVec2::new(2, 2));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let events = face.fill_rect(&mut rng, rect, 5, &presets::waterfall());
        assert_eq!(events.len(), 8);
        assert!(events.iter().all(|e| e.src != "mc"));
    }

    #[test]
    fn test_lip_fills_everything_with_top() {
        let lip = FallLip {
            mid_top: vec!["lip".into()],
        };
        let rect = Rect::new(IVec2::new(0, 0), IVec2::new(1, 1));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let events = lip.fill_rect(&mut rng, rect, 5, &presets::waterfall());
        assert_eq!(events.len(), 4);
        assert!(events.iter().all(|e| e.src == "lip"));
    }
}
