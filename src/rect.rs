//! Inclusive integer rectangles
//!
//! Regions in this crate (scan regions, collision bounding boxes) are
//! axis-aligned rectangles with inclusive min/max corners.

use glam::IVec2;

/// An axis-aligned rectangle with inclusive corners
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Minimum (north-west) corner, inclusive
    pub min: IVec2,
    /// Maximum (south-east) corner, inclusive
    pub max: IVec2,
}

impl Rect {
    /// Create a rectangle from inclusive corners.
    ///
    /// Corners are normalised so that `min <= max` on both axes.
    pub fn new(a: IVec2, b: IVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// A 1x1 rectangle covering a single cell
    pub fn cell(p: IVec2) -> Self {
        Self { min: p, max: p }
    }

    /// Width in cells (always >= 1)
    #[inline]
    pub fn width(&self) -> i32 {
        self.max.x - self.min.x + 1
    }

    /// Height in cells (always >= 1)
    #[inline]
    pub fn height(&self) -> i32 {
        self.max.y - self.min.y + 1
    }

    /// Whether the point lies within the rectangle
    #[inline]
    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Grow the rectangle so it covers `p`
    pub fn include(&mut self, p: IVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// A copy expanded (or, with negative values, contracted) on the y axis
    pub fn expand_y(&self, top: i32, bottom: i32) -> Self {
        Self {
            min: IVec2::new(self.min.x, self.min.y - top),
            max: IVec2::new(self.max.x, self.max.y + bottom),
        }
    }
}
