//! Binary visibility masks.

use crate::ViewshedError;
use meshrf_dem::GridPoint;

/// Row-major boolean raster marking the cells visible from one site.
///
/// Cells start invisible and are only ever switched on while a viewshed is
/// computed, so rays may be merged in any order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl VisibilityMask {
    /// All-invisible mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the cell at `(x, y)` is visible; `false` outside the mask.
    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.index_of(x, y).is_some_and(|idx| self.cells[idx])
    }

    /// Whether the cell at a grid point is visible.
    pub fn contains_point(&self, point: GridPoint) -> bool {
        self.is_visible(point.x, point.y)
    }

    /// Mark a cell visible. Marking is idempotent and never clears a cell.
    pub(crate) fn mark(&mut self, index: usize) {
        self.cells[index] = true;
    }

    pub(crate) fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Number of visible cells.
    pub fn visible_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v).count()
    }

    /// Visible area in km² for a given ground-sample distance.
    pub fn coverage_area_km2(&self, gsd_meters: f64) -> f64 {
        self.visible_count() as f64 * gsd_meters * gsd_meters / 1_000_000.0
    }

    /// Iterate over the visible cells in row-major order.
    pub fn iter_visible(&self) -> impl Iterator<Item = GridPoint> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v)
            .map(move |(idx, _)| GridPoint::new((idx % width) as i32, (idx / width) as i32))
    }

    /// Row-major cells.
    pub fn as_slice(&self) -> &[bool] {
        &self.cells
    }

    /// Consume the mask, returning its row-major cells.
    pub fn into_vec(self) -> Vec<bool> {
        self.cells
    }

    /// Cells as bytes (`1` visible, `0` not), the layout raster exporters expect.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.cells.iter().map(|&v| u8::from(v)).collect()
    }

    /// Merge another mask into this one (cell-wise OR).
    pub fn union_with(&mut self, other: &VisibilityMask) -> Result<(), ViewshedError> {
        if self.width != other.width || self.height != other.height {
            return Err(ViewshedError::DimensionMismatch {
                left_width: self.width,
                left_height: self.height,
                right_width: other.width,
                right_height: other.height,
            });
        }
        for (cell, &seen) in self.cells.iter_mut().zip(&other.cells) {
            *cell |= seen;
        }
        Ok(())
    }
}
