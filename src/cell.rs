//! Cell snapshots and neighborhood sampling
//!
//! A [`Cell`] is a read-only terrain sample at one grid coordinate. The
//! engine never keeps cells beyond the target currently being tiled and its
//! eight-neighbor window, the [`Neighborhood`].

use std::sync::Arc;

use glam::IVec2;

use crate::catalog::LandCatalog;
use crate::error::Result;
use crate::heading::Heading;
use crate::outline::Outline;

/// A read-only terrain sample for a single grid cell
///
/// Cells are produced on demand by an [`Outline`] and carry everything the
/// placement passes need: classification flags, height, temperature, the
/// tile catalog to draw from and any pass-through tags.
#[derive(Debug, Clone)]
pub struct Cell {
    /// Grid position of this cell
    pub pos: IVec2,

    /// Height in arbitrary but monotone units. Relative differences drive
    /// cliff placement; absolute values are compared against the configured
    /// cliff and mountain levels.
    pub height: i32,

    /// Temperature in degrees; drives snow / vegetation / desert transitions
    pub temperature: i32,

    /// This cell is underwater (sea, river or swamp)
    pub water: bool,

    /// This cell carries a road, path or street
    pub road: bool,

    /// This cell is molten rock
    pub molten: bool,

    /// This cell is unclassified void (eg. outside an interior)
    pub null: bool,

    /// Tile catalog applicable to this cell
    pub catalog: Arc<LandCatalog>,

    /// Free-form tags supplied by the terrain source
    pub tags: Vec<String>,
}

impl Cell {
    /// Create a null (void) cell at the given position.
    ///
    /// Useful for outline implementations answering out-of-range queries.
    pub fn null_at(pos: IVec2, catalog: Arc<LandCatalog>) -> Self {
        Self {
            pos,
            height: 0,
            temperature: 0,
            water: false,
            road: false,
            molten: false,
            null: true,
            catalog,
            tags: Vec::new(),
        }
    }

    /// Whether this cell is dry, classified land
    #[inline]
    pub fn is_land(&self) -> bool {
        !self.water && !self.molten && !self.null
    }
}

/// A cell tagged with its compass relation to the target cell
#[derive(Debug, Clone)]
pub struct Neighbor {
    /// Where this cell sits relative to the target
    pub heading: Heading,
    /// The sampled cell
    pub cell: Cell,
}

/// The eight cells surrounding a target cell, in clockwise heading order
#[derive(Debug, Clone)]
pub struct Neighborhood {
    neighbors: [Neighbor; 8],
}

impl Neighborhood {
    /// Sample the eight neighbors of `pos` from the outline
    pub fn sample<O: Outline + ?Sized>(outline: &O, pos: IVec2) -> Result<Self> {
        let mut cells = Vec::with_capacity(8);
        for heading in Heading::ALL {
            let at = pos + heading.offset();
            cells.push(Neighbor {
                heading,
                cell: outline.at(at.x, at.y)?,
            });
        }
        // Vec -> array; length is fixed by the loop above
        let neighbors: [Neighbor; 8] = cells
            .try_into()
            .unwrap_or_else(|_| unreachable!("exactly 8 headings"));
        Ok(Self { neighbors })
    }

    /// All eight neighbors in clockwise order from North
    #[inline]
    pub fn all(&self) -> &[Neighbor; 8] {
        &self.neighbors
    }

    /// The neighbor at the given heading
    #[inline]
    pub fn get(&self, heading: Heading) -> &Cell {
        &self.neighbors[heading as usize].cell
    }

    /// Neighbors whose height is strictly less than `height`
    pub fn lower(&self, height: i32) -> Vec<&Neighbor> {
        self.neighbors
            .iter()
            .filter(|n| n.cell.height < height)
            .collect()
    }

    /// Split the neighbors into those matching the predicate and those not
    pub fn partition<F>(&self, pred: F) -> (Vec<&Neighbor>, Vec<&Neighbor>)
    where
        F: Fn(&Cell) -> bool,
    {
        self.neighbors.iter().partition(|n| pred(&n.cell))
    }

    /// How many neighbors match the predicate
    pub fn count<F>(&self, pred: F) -> usize
    where
        F: Fn(&Cell) -> bool,
    {
        self.neighbors.iter().filter(|n| pred(&n.cell)).count()
    }
}

/// The headings of the given neighbors, sorted by ordinal.
///
/// Sorted lists are what the circular containment predicate operates on.
pub fn headings(neighbors: &[&Neighbor]) -> Vec<Heading> {
    let mut ls: Vec<Heading> = neighbors.iter().map(|n| n.heading).collect();
    ls.sort();
    ls
}

/// All cells within Chebyshev radius `r` of `pos` matching the predicate
pub fn within_radius<O, F>(outline: &O, pos: IVec2, r: i32, pred: F) -> Result<Vec<Cell>>
where
    O: Outline + ?Sized,
    F: Fn(&Cell) -> bool,
{
    let mut found = Vec::new();
    for iy in (pos.y - r)..=(pos.y + r) {
        for ix in (pos.x - r)..=(pos.x + r) {
            let cell = outline.at(ix, iy)?;
            if pred(&cell) {
                found.push(cell);
            }
        }
    }
    Ok(found)
}
