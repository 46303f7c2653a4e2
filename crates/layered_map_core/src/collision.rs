//! Quadrant-level collision grid derived from the layered tile data

use crate::{QuadrantCollision, MAX_CONTEXTS};
use serde::{Deserialize, Serialize};

/// Collision state at twice the tile resolution
///
/// Each tile covers a 2x2 block of cells (one per quadrant). Each cell packs
/// one bit per context: bit `c` is set when the cell is blocked in the context
/// stored at index `c`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollisionGrid {
    width: u32,
    height: u32,
    cells: Vec<u32>,
}

impl CollisionGrid {
    /// Create a grid for a map of `map_length` x `map_height` tiles
    pub fn for_map(map_length: u32, map_height: u32) -> Self {
        let width = map_length * 2;
        let height = map_height * 2;
        Self {
            width,
            height,
            cells: vec![0; (width * height) as usize],
        }
    }

    /// Build from rows of packed cells. Returns `None` for ragged rows.
    pub fn from_rows(rows: &[Vec<u32>]) -> Option<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |row| row.len() as u32);
        if rows.iter().any(|row| row.len() as u32 != width) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed context bits of one cell, zero when out of bounds
    pub fn get(&self, x: u32, y: u32) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.cells[(y * self.width + x) as usize]
    }

    pub fn is_blocked(&self, x: u32, y: u32, context_index: usize) -> bool {
        context_index < MAX_CONTEXTS && self.get(x, y) & (1 << context_index) != 0
    }

    /// Mark the blocked quadrants of tile `(tile_x, tile_y)` for one context
    pub(crate) fn mark_tile(
        &mut self,
        tile_x: u32,
        tile_y: u32,
        context_index: usize,
        quadrants: QuadrantCollision,
    ) {
        let bit = 1u32 << context_index;
        let (x, y) = (tile_x * 2, tile_y * 2);
        let cells = [
            (x, y, QuadrantCollision::NORTH_WEST),
            (x + 1, y, QuadrantCollision::NORTH_EAST),
            (x, y + 1, QuadrantCollision::SOUTH_WEST),
            (x + 1, y + 1, QuadrantCollision::SOUTH_EAST),
        ];
        for (cx, cy, quadrant) in cells {
            if quadrants.contains(quadrant) && cx < self.width && cy < self.height {
                self.cells[(cy * self.width + cx) as usize] |= bit;
            }
        }
    }

    /// Rows of packed cells, top to bottom
    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.cells
            .chunks(self.width.max(1) as usize)
            .map(|row| row.to_vec())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_tile() {
        let mut grid = CollisionGrid::for_map(3, 2);
        assert_eq!(grid.width(), 6);
        assert_eq!(grid.height(), 4);

        grid.mark_tile(1, 1, 2, QuadrantCollision::NORTH_EAST | QuadrantCollision::SOUTH_WEST);
        assert_eq!(grid.get(3, 2), 0b100);
        assert_eq!(grid.get(2, 3), 0b100);
        assert_eq!(grid.get(2, 2), 0);
        assert!(grid.is_blocked(3, 2, 2));
        assert!(!grid.is_blocked(3, 2, 0));
        assert!(!grid.is_blocked(3, 2, MAX_CONTEXTS));
        assert_eq!(grid.get(100, 100), 0);
    }

    #[test]
    fn test_rows() {
        let mut grid = CollisionGrid::for_map(1, 1);
        grid.mark_tile(0, 0, 0, QuadrantCollision::all());
        let rows = grid.rows();
        assert_eq!(rows, vec![vec![1, 1], vec![1, 1]]);
        assert_eq!(CollisionGrid::from_rows(&rows), Some(grid));
        assert_eq!(CollisionGrid::from_rows(&[vec![1, 1], vec![1]]), None);
    }
}
