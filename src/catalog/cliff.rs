//! Cliff tilesets and cliff geometry
//!
//! Cliffs are driven by relative height, not a membership predicate: the
//! pattern being matched is the set of neighbors that are *low ground*.
//! Role names describe which part of the finished cliff the image forms:
//! `north_half` is the piece rising towards the north, placed when the low
//! ground lies to the south.
//!
//! Several roles carry a paired `*_base` role drawn one row below the
//! primary piece to visually extend the cliff's height. Which roles carry a
//! base and which stand alone is a constraint of how the art is cut, not an
//! accident of the algorithm.

use glam::IVec2;
use rand::Rng;

use crate::cell::{headings, Neighbor};
use crate::heading::{includes, Heading, CORNER_NE, CORNER_NW, CORNER_SE, CORNER_SW};

use super::one;

/// A tile chosen for a specific grid position
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Placement {
    pub pos: IVec2,
    pub src: String,
}

/// Cliff tile variants, framed around which side is high ground
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliffTileset {
    /// The cliff rises from south to north; drawn one row above the target
    pub north_half: Vec<String>,
    /// Bottom piece paired under `north_half`
    pub north_half_base: Vec<String>,

    /// The cliff faces the viewer, falling off to the south
    pub south_half: Vec<String>,
    /// Bottom piece paired under `south_half`
    pub south_half_base: Vec<String>,

    /// The land rises west to east
    pub east_half: Vec<String>,
    /// The land rises east to west
    pub west_half: Vec<String>,

    /// North, east and north-east are high ground (the cliff turns a corner)
    pub quarter_north_east: Vec<String>,
    /// Bottom piece paired under `quarter_north_east`
    pub quarter_north_east_base: Vec<String>,

    /// South, east and south-east are high ground
    pub quarter_south_east: Vec<String>,
    /// South, west and south-west are high ground
    pub quarter_south_west: Vec<String>,

    /// North, west and north-west are high ground
    pub quarter_north_west: Vec<String>,
    /// Bottom piece paired under `quarter_north_west`
    pub quarter_north_west_base: Vec<String>,

    /// Only the south-west corner is low ground
    pub three_quarter_north_east: Vec<String>,
    /// Only the south-east corner is low ground
    pub three_quarter_north_west: Vec<String>,
}

impl CliffTileset {
    /// Decide the cliff pieces for a cell at `pos` whose strictly-lower
    /// neighbors are `lowland`.
    ///
    /// Returns an empty set when the lowland pattern produces no coherent
    /// cliff geometry (no low neighbors, an unhandled single diagonal, or
    /// six or more low neighbors).
    pub(crate) fn placements<R: Rng>(
        &self,
        rng: &mut R,
        pos: IVec2,
        lowland: &[&Neighbor],
    ) -> Vec<Placement> {
        let up = IVec2::new(0, -1);
        let down = IVec2::new(0, 1);

        if lowland.len() == 1 {
            // a single low corner cut into an otherwise-high cell;
            // only the south-facing diagonals have art
            return match lowland[0].heading {
                Heading::SouthEast => pair(
                    (pos + up, one(rng, &self.three_quarter_north_west)),
                    (pos, one(rng, &self.west_half)),
                ),
                Heading::SouthWest => pair(
                    (pos + up, one(rng, &self.three_quarter_north_east)),
                    (pos, one(rng, &self.east_half)),
                ),
                Heading::North => pair(
                    (pos, one(rng, &self.south_half)),
                    (pos + down, one(rng, &self.south_half_base)),
                ),
                Heading::East => single(pos, one(rng, &self.west_half)),
                Heading::South => pair(
                    (pos + up, one(rng, &self.north_half)),
                    (pos, one(rng, &self.north_half_base)),
                ),
                Heading::West => single(pos, one(rng, &self.east_half)),
                _ => Vec::new(),
            };
        }

        if (2..=5).contains(&lowland.len()) {
            let low = headings(lowland);

            // corners before edges, same priority as piece selection
            if includes(&low, &CORNER_NE) {
                return single(pos, one(rng, &self.quarter_south_west));
            } else if includes(&low, &CORNER_NW) {
                return single(pos, one(rng, &self.quarter_south_east));
            } else if includes(&low, &CORNER_SE) {
                return pair(
                    (pos + up, one(rng, &self.quarter_north_west)),
                    (pos, one(rng, &self.quarter_north_west_base)),
                );
            } else if includes(&low, &CORNER_SW) {
                return pair(
                    (pos + up, one(rng, &self.quarter_north_east)),
                    (pos, one(rng, &self.quarter_north_east_base)),
                );
            } else if includes(&low, &[Heading::North]) {
                return pair(
                    (pos, one(rng, &self.south_half)),
                    (pos + down, one(rng, &self.south_half_base)),
                );
            } else if includes(&low, &[Heading::East]) {
                return single(pos, one(rng, &self.west_half));
            } else if includes(&low, &[Heading::South]) {
                return pair(
                    (pos + up, one(rng, &self.north_half)),
                    (pos, one(rng, &self.north_half_base)),
                );
            } else if includes(&low, &[Heading::West]) {
                return single(pos, one(rng, &self.east_half));
            }
        }

        Vec::new()
    }

    /// Roles that must be non-empty for this tileset to validate
    pub(crate) fn required_roles(&self) -> [(&'static str, &[String]); 14] {
        [
            ("north-half", &self.north_half),
            ("north-half-base", &self.north_half_base),
            ("south-half", &self.south_half),
            ("south-half-base", &self.south_half_base),
            ("east-half", &self.east_half),
            ("west-half", &self.west_half),
            ("1/4-north-east", &self.quarter_north_east),
            ("1/4-north-east-base", &self.quarter_north_east_base),
            ("1/4-south-east", &self.quarter_south_east),
            ("1/4-south-west", &self.quarter_south_west),
            ("1/4-north-west", &self.quarter_north_west),
            ("1/4-north-west-base", &self.quarter_north_west_base),
            ("3/4-north-east", &self.three_quarter_north_east),
            ("3/4-north-west", &self.three_quarter_north_west),
        ]
    }
}

fn single(pos: IVec2, src: Option<&str>) -> Vec<Placement> {
    src.map(|s| {
        vec![Placement {
            pos,
            src: s.to_string(),
        }]
    })
    .unwrap_or_default()
}

fn pair(a: (IVec2, Option<&str>), b: (IVec2, Option<&str>)) -> Vec<Placement> {
    let mut out = Vec::with_capacity(2);
    if let Some(s) = a.1 {
        out.push(Placement {
            pos: a.0,
            src: s.to_string(),
        });
    }
    if let Some(s) = b.1 {
        out.push(Placement {
            pos: b.0,
            src: s.to_string(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LandCatalog;
    use crate::cell::{Cell, Neighborhood};
    use crate::error::Result;
    use crate::outline::Outline;
    use crate::rect::Rect;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    /// Cliff tileset with one tile per role, named after the role
    fn named_cliff() -> CliffTileset {
        CliffTileset {
            north_half: vec!["cliff-n".into()],
            north_half_base: vec!["cliff-n-base".into()],
            south_half: vec!["cliff-s".into()],
            south_half_base: vec!["cliff-s-base".into()],
            east_half: vec!["cliff-e".into()],
            west_half: vec!["cliff-w".into()],
            quarter_north_east: vec!["cliff-1q-ne".into()],
            quarter_north_east_base: vec!["cliff-1q-ne-base".into()],
            quarter_south_east: vec!["cliff-1q-se".into()],
            quarter_south_west: vec!["cliff-1q-sw".into()],
            quarter_north_west: vec!["cliff-1q-nw".into()],
            quarter_north_west_base: vec!["cliff-1q-nw-base".into()],
            three_quarter_north_east: vec!["cliff-3q-ne".into()],
            three_quarter_north_west: vec!["cliff-3q-nw".into()],
        }
    }

    /// Outline where exactly the listed headings around (0,0) are lower
    struct LowAt {
        low: Vec<IVec2>,
        catalog: Arc<LandCatalog>,
    }

    impl LowAt {
        fn new(low: &[Heading]) -> Self {
            Self {
                low: low.iter().map(|h| h.offset()).collect(),
                catalog: Arc::new(LandCatalog::default()),
            }
        }
    }

    impl Outline for LowAt {
        fn bounds(&self) -> Rect {
            Rect::new(IVec2::new(-1, -1), IVec2::new(1, 1))
        }

        fn at(&self, x: i32, y: i32) -> Result<Cell> {
            let pos = IVec2::new(x, y);
            let mut cell = Cell::null_at(pos, self.catalog.clone());
            cell.null = false;
            cell.height = if self.low.contains(&pos) { 1 } else { 10 };
            Ok(cell)
        }
    }

    fn place(low: &[Heading]) -> Vec<Placement> {
        let hood = Neighborhood::sample(&LowAt::new(low), IVec2::ZERO).unwrap();
        let lowland = hood.lower(10);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        named_cliff().placements(&mut rng, IVec2::ZERO, &lowland)
    }

    #[test]
    fn test_no_lowland_no_cliff() {
        assert!(place(&[]).is_empty());
    }

    #[test]
    fn test_single_low_south_east() {
        let got = place(&[Heading::SouthEast]);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].pos, IVec2::new(0, -1));
        assert_eq!(got[0].src, "cliff-3q-nw");
        assert_eq!(got[1].pos, IVec2::ZERO);
        assert_eq!(got[1].src, "cliff-w");
    }

    #[test]
    fn test_single_low_south_west() {
        let got = place(&[Heading::SouthWest]);
        assert_eq!(got[0].src, "cliff-3q-ne");
        assert_eq!(got[1].src, "cliff-e");
    }

    #[test]
    fn test_unhandled_diagonals_place_nothing() {
        assert!(place(&[Heading::NorthEast]).is_empty());
        assert!(place(&[Heading::NorthWest]).is_empty());
    }

    #[test]
    fn test_low_north_places_south_half_with_base() {
        let got = place(&[Heading::North]);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].pos, IVec2::ZERO);
        assert_eq!(got[0].src, "cliff-s");
        // base goes one row below its counterpart
        assert_eq!(got[1].pos, IVec2::new(0, 1));
        assert_eq!(got[1].src, "cliff-s-base");
    }

    #[test]
    fn test_low_south_places_north_half_with_base() {
        let got = place(&[Heading::South]);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].pos, IVec2::new(0, -1));
        assert_eq!(got[0].src, "cliff-n");
        assert_eq!(got[1].pos, IVec2::ZERO);
        assert_eq!(got[1].src, "cliff-n-base");
    }

    #[test]
    fn test_low_east_west_have_no_base() {
        let east = place(&[Heading::East]);
        assert_eq!(east.len(), 1);
        assert_eq!(east[0].src, "cliff-w");

        let west = place(&[Heading::West]);
        assert_eq!(west.len(), 1);
        assert_eq!(west[0].src, "cliff-e");
    }

    #[test]
    fn test_low_corner_ne_is_single_piece() {
        let got = place(&[Heading::North, Heading::NorthEast, Heading::East]);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].pos, IVec2::ZERO);
        assert_eq!(got[0].src, "cliff-1q-sw");
    }

    #[test]
    fn test_low_corner_se_pairs_a_base() {
        let got = place(&[Heading::East, Heading::SouthEast, Heading::South]);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].pos, IVec2::new(0, -1));
        assert_eq!(got[0].src, "cliff-1q-nw");
        assert_eq!(got[1].pos, IVec2::ZERO);
        assert_eq!(got[1].src, "cliff-1q-nw-base");
    }

    #[test]
    fn test_corner_priority_over_cardinal() {
        // NE corner low and West low at once; the corner rules
        let got = place(&[
            Heading::North,
            Heading::NorthEast,
            Heading::East,
            Heading::West,
        ]);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].src, "cliff-1q-sw");
    }

    #[test]
    fn test_six_or_more_lowland_no_geometry() {
        let got = place(&[
            Heading::North,
            Heading::NorthEast,
            Heading::East,
            Heading::SouthEast,
            Heading::South,
            Heading::SouthWest,
        ]);
        assert!(got.is_empty());
    }
}
