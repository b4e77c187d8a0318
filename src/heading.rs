//! 8-way compass model
//!
//! Headings identify a neighbor cell's position relative to a target cell.
//! Pattern matching over neighbor sets works on lists of headings sorted by
//! ordinal, compared with a circular containment predicate so that patterns
//! crossing the North wrap boundary still match.

use glam::IVec2;

/// A compass direction, ordinal 0..=7 clockwise from North
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Heading {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Heading {
    /// All headings in clockwise order starting at North
    pub const ALL: [Heading; 8] = [
        Heading::North,
        Heading::NorthEast,
        Heading::East,
        Heading::SouthEast,
        Heading::South,
        Heading::SouthWest,
        Heading::West,
        Heading::NorthWest,
    ];

    /// Grid offset of the neighbor cell in this direction.
    ///
    /// Y grows southward (screen coordinates), so North is (0, -1).
    #[inline]
    pub fn offset(self) -> IVec2 {
        match self {
            Heading::North => IVec2::new(0, -1),
            Heading::NorthEast => IVec2::new(1, -1),
            Heading::East => IVec2::new(1, 0),
            Heading::SouthEast => IVec2::new(1, 1),
            Heading::South => IVec2::new(0, 1),
            Heading::SouthWest => IVec2::new(-1, 1),
            Heading::West => IVec2::new(-1, 0),
            Heading::NorthWest => IVec2::new(-1, -1),
        }
    }

    /// The heading directly across the compass
    #[inline]
    pub fn opposite(self) -> Heading {
        Heading::ALL[(self as usize + 4) % 8]
    }

    /// Whether this heading is one of the four diagonals
    #[inline]
    pub fn is_diagonal(self) -> bool {
        (self as u8) % 2 == 1
    }
}

/// The three headings forming the north-east corner of the neighborhood
pub(crate) const CORNER_NE: [Heading; 3] = [Heading::North, Heading::NorthEast, Heading::East];
/// The three headings forming the north-west corner
pub(crate) const CORNER_NW: [Heading; 3] = [Heading::West, Heading::NorthWest, Heading::North];
/// The three headings forming the south-east corner
pub(crate) const CORNER_SE: [Heading; 3] = [Heading::East, Heading::SouthEast, Heading::South];
/// The three headings forming the south-west corner
pub(crate) const CORNER_SW: [Heading; 3] = [Heading::South, Heading::SouthWest, Heading::West];

// The 5-heading arcs centred on each corner. When a corner triple is entirely
// absent, the presence of the full opposite arc is what distinguishes a
// three-quarter cut from a plain quarter cut.
pub(crate) const EDGE_NE: [Heading; 5] = [
    Heading::NorthWest,
    Heading::North,
    Heading::NorthEast,
    Heading::East,
    Heading::SouthEast,
];
pub(crate) const EDGE_NW: [Heading; 5] = [
    Heading::SouthWest,
    Heading::West,
    Heading::NorthWest,
    Heading::North,
    Heading::NorthEast,
];
pub(crate) const EDGE_SE: [Heading; 5] = [
    Heading::NorthEast,
    Heading::East,
    Heading::SouthEast,
    Heading::South,
    Heading::SouthWest,
];
pub(crate) const EDGE_SW: [Heading; 5] = [
    Heading::SouthEast,
    Heading::South,
    Heading::SouthWest,
    Heading::West,
    Heading::NorthWest,
];

/// Returns whether `haystack` contains `needle` as a contiguous sub-sequence,
/// treating `haystack` as circular.
///
/// `haystack` must be sorted by ordinal; the wrap around North is handled by
/// scanning an extended copy with the first `needle.len() - 1` elements
/// appended. An empty needle, or one longer than the haystack, never matches.
pub fn includes(haystack: &[Heading], needle: &[Heading]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }

    let mut ring: Vec<Heading> = haystack.to_vec();
    if needle.len() > 1 {
        ring.extend_from_slice(&haystack[..needle.len() - 1]);
    }

    ring.windows(needle.len()).any(|w| w == needle)
}
