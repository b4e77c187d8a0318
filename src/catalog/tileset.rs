//! Tilesets and piece selection
//!
//! A [`Tileset`] bundles tile image variants by geometric role for terrain
//! that must join up with itself: water, roads, lava, bridges. Piece
//! selection inspects which of the eight neighbors share the feature and
//! picks the full / half / quarter / three-quarter role that fits the cut.

use rand::Rng;

use crate::cell::{headings, Cell, Neighborhood};
use crate::heading::{
    includes, Heading, CORNER_NE, CORNER_NW, CORNER_SE, CORNER_SW, EDGE_NE, EDGE_NW, EDGE_SE,
    EDGE_SW,
};

use super::one;

/// Tile variants organized by geometric role.
///
/// Role names describe which part of the tile is covered by the feature:
/// `north_half` means the north half of the tile is (say) water. A
/// three-quarter role is the complement of the opposite quarter: in
/// `three_quarter_north_east` only the south-west corner is *not* covered.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tileset {
    /// A tile covered entirely by the feature
    pub full: Vec<String>,

    pub north_half: Vec<String>,
    pub east_half: Vec<String>,
    pub south_half: Vec<String>,
    pub west_half: Vec<String>,

    pub quarter_north_east: Vec<String>,
    pub quarter_south_east: Vec<String>,
    pub quarter_south_west: Vec<String>,
    pub quarter_north_west: Vec<String>,

    pub three_quarter_north_east: Vec<String>,
    pub three_quarter_south_east: Vec<String>,
    pub three_quarter_south_west: Vec<String>,
    pub three_quarter_north_west: Vec<String>,
}

impl Tileset {
    /// Choose the piece to place at the centre of `hood` given which
    /// neighbors satisfy `pred` (share the feature with the target cell).
    ///
    /// Branch order is fixed and first-match-wins; corners are evaluated
    /// before cardinal edges because a missing corner neighbor indicates a
    /// diagonal cut no half piece can represent. Returns `None` when no
    /// pattern matches or the selected role has no variants.
    pub fn choose_piece<R, F>(&self, rng: &mut R, hood: &Neighborhood, pred: F) -> Option<String>
    where
        R: Rng,
        F: Fn(&Cell) -> bool,
    {
        let (in_set, out_set) = hood.partition(&pred);
        let role = self.role_for(in_set.len(), &out_set);
        role.and_then(|r| one(rng, r)).map(str::to_string)
    }

    /// The role slice for a membership pattern; `None` when nothing fits
    fn role_for(&self, in_len: usize, out_set: &[&crate::cell::Neighbor]) -> Option<&[String]> {
        if in_len >= 8 {
            // an 8-neighbor window cannot exceed 8; this is really == 8
            return Some(&self.full);
        }

        if in_len == 7 {
            // exactly one neighbor is out; its heading decides directly
            return Some(match out_set[0].heading {
                Heading::NorthEast => &self.three_quarter_south_west,
                Heading::SouthEast => &self.three_quarter_north_west,
                Heading::SouthWest => &self.three_quarter_north_east,
                Heading::NorthWest => &self.three_quarter_south_east,
                Heading::North => &self.south_half,
                Heading::East => &self.west_half,
                Heading::South => &self.north_half,
                Heading::West => &self.east_half,
            });
        }

        let out = headings(out_set);
        let in_: Vec<Heading> = Heading::ALL
            .iter()
            .copied()
            .filter(|h| !out.contains(h))
            .collect();

        // corners first, then edges
        if includes(&out, &CORNER_NE) {
            if includes(&in_, &EDGE_SW) {
                Some(&self.three_quarter_south_west)
            } else {
                Some(&self.quarter_south_west)
            }
        } else if includes(&out, &CORNER_SE) {
            if includes(&in_, &EDGE_NW) {
                Some(&self.three_quarter_north_west)
            } else {
                Some(&self.quarter_north_west)
            }
        } else if includes(&out, &CORNER_SW) {
            if includes(&in_, &EDGE_NE) {
                Some(&self.three_quarter_north_east)
            } else {
                Some(&self.quarter_north_east)
            }
        } else if includes(&out, &CORNER_NW) {
            if includes(&in_, &EDGE_SE) {
                Some(&self.three_quarter_south_east)
            } else {
                Some(&self.quarter_south_east)
            }
        } else if includes(&out, &[Heading::North]) {
            Some(&self.south_half)
        } else if includes(&out, &[Heading::East]) {
            Some(&self.west_half)
        } else if includes(&out, &[Heading::South]) {
            Some(&self.north_half)
        } else if includes(&out, &[Heading::West]) {
            Some(&self.east_half)
        } else {
            None
        }
    }

    /// Roles that must be non-empty for this tileset to validate, with the
    /// names used in error reports.
    pub(crate) fn required_roles(&self) -> [(&'static str, &[String]); 13] {
        [
            ("full", &self.full),
            ("north-half", &self.north_half),
            ("east-half", &self.east_half),
            ("south-half", &self.south_half),
            ("west-half", &self.west_half),
            ("1/4-north-east", &self.quarter_north_east),
            ("1/4-south-east", &self.quarter_south_east),
            ("1/4-south-west", &self.quarter_south_west),
            ("1/4-north-west", &self.quarter_north_west),
            ("3/4-north-east", &self.three_quarter_north_east),
            ("3/4-south-east", &self.three_quarter_south_east),
            ("3/4-south-west", &self.three_quarter_south_west),
            ("3/4-north-west", &self.three_quarter_north_west),
        ]
    }
}
