//! Inclusive tile rectangles

/// A rectangle of tiles with inclusive corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRect {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl TileRect {
    /// Rectangle spanned by two corners given in any order
    pub fn from_corners(a: (u32, u32), b: (u32, u32)) -> Self {
        Self {
            min_x: a.0.min(b.0),
            min_y: a.1.min(b.1),
            max_x: a.0.max(b.0),
            max_y: a.1.max(b.1),
        }
    }

    pub fn single(x: u32, y: u32) -> Self {
        Self::from_corners((x, y), (x, y))
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    /// Grow to include a cell
    pub fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Intersect with a `width` x `height` grid. `None` if nothing is left.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 || self.min_x >= width || self.min_y >= height {
            return None;
        }
        Some(Self {
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.max_x.min(width - 1),
            max_y: self.max_y.min(height - 1),
        })
    }

    /// Row-major iterator over every cell
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> {
        let (min_x, max_x) = (self.min_x, self.max_x);
        (self.min_y..=self.max_y).flat_map(move |y| (min_x..=max_x).map(move |x| (x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes() {
        let rect = TileRect::from_corners((5, 1), (2, 4));
        assert_eq!((rect.min_x, rect.min_y, rect.max_x, rect.max_y), (2, 1, 5, 4));
        assert_eq!(rect.width(), 4);
        assert_eq!(rect.height(), 4);
        assert!(rect.contains(2, 4));
        assert!(!rect.contains(6, 4));
    }

    #[test]
    fn test_clamp_to() {
        let rect = TileRect::from_corners((30, 20), (40, 30));
        assert_eq!(
            rect.clamp_to(32, 24),
            Some(TileRect::from_corners((30, 20), (31, 23)))
        );
        assert_eq!(rect.clamp_to(30, 24), None);
    }

    #[test]
    fn test_cells_are_row_major() {
        let cells: Vec<_> = TileRect::from_corners((0, 0), (1, 1)).cells().collect();
        assert_eq!(cells, [(0, 0), (1, 0), (0, 1), (1, 1)]);
    }
}
