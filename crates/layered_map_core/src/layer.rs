//! Tile layers and their shared per-layer properties

use crate::TileRef;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A rectangular grid of tile references
///
/// Tiles are stored row-major: the cell at `(x, y)` lives at `y * width + x`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileLayer {
    width: u32,
    height: u32,
    tiles: Vec<TileRef>,
}

impl TileLayer {
    /// Create a layer of the given size filled with `TileRef::Empty`
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, TileRef::Empty)
    }

    /// Create a layer of the given size filled with `tile`
    pub fn filled(width: u32, height: u32, tile: TileRef) -> Self {
        Self {
            width,
            height,
            tiles: vec![tile; (width * height) as usize],
        }
    }

    /// Build a layer from row-major tiles. Returns `None` if the length does not match.
    pub fn from_tiles(width: u32, height: u32, tiles: Vec<TileRef>) -> Option<Self> {
        if tiles.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True if the layer has no cells
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Row-major view of every cell
    pub fn tiles(&self) -> &[TileRef] {
        &self.tiles
    }

    /// Iterate over `((x, y), tile)` for every cell
    pub fn iter(&self) -> impl Iterator<Item = ((u32, u32), TileRef)> + '_ {
        let width = self.width.max(1);
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, tile)| ((i as u32 % width, i as u32 / width), *tile))
    }

    /// Number of cells holding exactly `tile`
    pub fn count_matching(&self, tile: TileRef) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    /// Get the tile at a position. Out of bounds reads are `TileRef::Empty`.
    pub fn get_tile(&self, x: u32, y: u32) -> TileRef {
        self.index(x, y)
            .and_then(|i| self.tiles.get(i).copied())
            .unwrap_or(TileRef::Empty)
    }

    /// Set the tile at a position. Out of bounds writes are ignored.
    pub fn set_tile(&mut self, x: u32, y: u32, tile: TileRef) {
        if let Some(i) = self.index(x, y) {
            self.tiles[i] = tile;
        }
    }

    /// Replace every occurrence of `old` with `new`, returning how many cells changed
    pub fn replace_tiles(&mut self, old: TileRef, new: TileRef) -> usize {
        let mut replaced = 0;
        for tile in self.tiles.iter_mut().filter(|t| **t == old) {
            *tile = new;
            replaced += 1;
        }
        replaced
    }

    /// Set every cell to `tile`
    pub fn fill_layer(&mut self, tile: TileRef) {
        self.tiles.fill(tile);
    }

    /// Set every cell to `TileRef::Empty`
    pub fn clear_layer(&mut self) {
        self.fill_layer(TileRef::Empty);
    }

    /// Apply `f` to every tile in place
    pub(crate) fn map_tiles(&mut self, mut f: impl FnMut(TileRef) -> TileRef) {
        for tile in self.tiles.iter_mut() {
            *tile = f(*tile);
        }
    }

    /// Resize keeping the top-left corner in place.
    ///
    /// Growth appends empty columns on the right and empty rows at the bottom;
    /// shrinking truncates from the same edges.
    pub(crate) fn resize_layer(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                tiles.push(self.get_tile(x, y));
            }
        }
        self.width = width;
        self.height = height;
        self.tiles = tiles;
    }

    /// Insert `count` rows filled with `tile` before row `index`.
    ///
    /// Requires `count > 0` and `index <= height`; otherwise nothing changes and
    /// `false` is returned.
    pub(crate) fn add_rows(&mut self, index: u32, count: u32, tile: TileRef) -> bool {
        if count == 0 || index > self.height {
            warn!(index, count, height = self.height, "invalid row insertion");
            return false;
        }
        let at = (index * self.width) as usize;
        let inserted = std::iter::repeat(tile).take((count * self.width) as usize);
        self.tiles.splice(at..at, inserted);
        self.height += count;
        true
    }

    /// Insert `count` columns filled with `tile` before column `index`.
    ///
    /// Requires `count > 0` and `index <= width`; otherwise nothing changes and
    /// `false` is returned.
    pub(crate) fn add_columns(&mut self, index: u32, count: u32, tile: TileRef) -> bool {
        if count == 0 || index > self.width {
            warn!(index, count, width = self.width, "invalid column insertion");
            return false;
        }
        let new_width = self.width + count;
        let mut tiles = Vec::with_capacity((new_width * self.height) as usize);
        for row in self.tiles.chunks(self.width.max(1) as usize) {
            let (left, right) = row.split_at(index as usize);
            tiles.extend_from_slice(left);
            tiles.extend(std::iter::repeat(tile).take(count as usize));
            tiles.extend_from_slice(right);
        }
        // A zero-width layer has no rows to chunk but still gains columns
        if self.width == 0 {
            tiles = vec![tile; (new_width * self.height) as usize];
        }
        self.width = new_width;
        self.tiles = tiles;
        true
    }

    /// Remove `count` rows starting at row `index`.
    ///
    /// Requires `count > 0` and `index + count <= height`; otherwise nothing
    /// changes and `false` is returned.
    pub(crate) fn delete_rows(&mut self, index: u32, count: u32) -> bool {
        if count == 0 || index.checked_add(count).map_or(true, |end| end > self.height) {
            warn!(index, count, height = self.height, "invalid row deletion");
            return false;
        }
        let start = (index * self.width) as usize;
        let end = ((index + count) * self.width) as usize;
        self.tiles.drain(start..end);
        self.height -= count;
        true
    }

    /// Remove `count` columns starting at column `index`.
    ///
    /// Requires `count > 0` and `index + count <= width`; otherwise nothing
    /// changes and `false` is returned.
    pub(crate) fn delete_columns(&mut self, index: u32, count: u32) -> bool {
        if count == 0 || index.checked_add(count).map_or(true, |end| end > self.width) {
            warn!(index, count, width = self.width, "invalid column deletion");
            return false;
        }
        let new_width = self.width - count;
        let mut tiles = Vec::with_capacity((new_width * self.height) as usize);
        for row in self.tiles.chunks(self.width as usize) {
            tiles.extend_from_slice(&row[..index as usize]);
            tiles.extend_from_slice(&row[(index + count) as usize..]);
        }
        self.width = new_width;
        self.tiles = tiles;
        true
    }
}

/// Per-layer metadata shared by every context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayerProperties {
    pub name: String,
    /// Editor-session only, never persisted
    #[serde(skip, default = "default_visible")]
    pub visible: bool,
    pub collision_enabled: bool,
}

fn default_visible() -> bool {
    true
}

impl TileLayerProperties {
    pub fn new(name: impl Into<String>, collision_enabled: bool) -> Self {
        Self {
            name: name.into(),
            visible: true,
            collision_enabled,
        }
    }

    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }

    pub fn toggle_collision(&mut self) {
        self.collision_enabled = !self.collision_enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_layer(width: u32, height: u32) -> TileLayer {
        let tiles = (0..width * height).map(TileRef::Tile).collect();
        TileLayer::from_tiles(width, height, tiles).unwrap()
    }

    #[test]
    fn test_new_layer() {
        let layer = TileLayer::new(10, 8);
        assert_eq!(layer.width(), 10);
        assert_eq!(layer.height(), 8);
        assert_eq!(layer.tiles().len(), 80);
        assert!(layer.tiles().iter().all(|t| t.is_empty()));
    }

    #[test]
    fn test_tile_operations() {
        let mut layer = TileLayer::new(4, 4);
        layer.set_tile(2, 3, TileRef::Tile(42));
        assert_eq!(layer.get_tile(2, 3), TileRef::Tile(42));

        // Out of bounds reads are empty and writes do nothing
        assert_eq!(layer.get_tile(4, 0), TileRef::Empty);
        let before = layer.clone();
        layer.set_tile(0, 4, TileRef::Tile(1));
        assert_eq!(layer, before);

        assert_eq!(TileLayer::default().get_tile(0, 0), TileRef::Empty);
    }

    #[test]
    fn test_replace_and_fill() {
        let mut layer = TileLayer::filled(3, 3, TileRef::Inherited);
        layer.set_tile(1, 1, TileRef::Tile(7));
        assert_eq!(layer.replace_tiles(TileRef::Inherited, TileRef::Empty), 8);
        assert_eq!(layer.count_matching(TileRef::Empty), 8);

        layer.fill_layer(TileRef::Tile(3));
        assert_eq!(layer.count_matching(TileRef::Tile(3)), 9);
        layer.clear_layer();
        assert_eq!(layer.count_matching(TileRef::Empty), 9);
    }

    #[test]
    fn test_resize_round_trip() {
        let original = numbered_layer(5, 4);
        let mut layer = original.clone();
        layer.resize_layer(8, 6);
        assert_eq!(layer.get_tile(4, 3), TileRef::Tile(19));
        assert_eq!(layer.get_tile(7, 5), TileRef::Empty);
        layer.resize_layer(5, 4);
        assert_eq!(layer, original);
    }

    #[test]
    fn test_resize_shrink_truncates() {
        let mut layer = numbered_layer(5, 4);
        layer.resize_layer(2, 2);
        assert_eq!(
            layer.tiles(),
            &[TileRef::Tile(0), TileRef::Tile(1), TileRef::Tile(5), TileRef::Tile(6)]
        );
    }

    #[test]
    fn test_add_then_delete_rows() {
        let original = numbered_layer(4, 3);
        let mut layer = original.clone();
        assert!(layer.add_rows(1, 2, TileRef::Inherited));
        assert_eq!(layer.height(), 5);
        assert_eq!(layer.get_tile(0, 0), TileRef::Tile(0));
        assert_eq!(layer.get_tile(0, 1), TileRef::Inherited);
        assert_eq!(layer.get_tile(0, 3), TileRef::Tile(4));
        assert!(layer.delete_rows(1, 2));
        assert_eq!(layer, original);
    }

    #[test]
    fn test_add_then_delete_columns() {
        let original = numbered_layer(4, 3);
        let mut layer = original.clone();
        assert!(layer.add_columns(0, 3, TileRef::Empty));
        assert_eq!(layer.width(), 7);
        assert_eq!(layer.get_tile(3, 1), TileRef::Tile(4));
        assert_eq!(layer.get_tile(2, 1), TileRef::Empty);
        assert!(layer.delete_columns(0, 3));
        assert_eq!(layer, original);
    }

    #[test]
    fn test_append_rows_and_columns_at_end() {
        let mut layer = numbered_layer(2, 2);
        assert!(layer.add_rows(2, 1, TileRef::Empty));
        assert!(layer.add_columns(2, 1, TileRef::Empty));
        assert_eq!(layer.get_tile(1, 1), TileRef::Tile(3));
        assert_eq!(layer.get_tile(2, 2), TileRef::Empty);
    }

    #[test]
    fn test_invalid_row_column_operations_are_ignored() {
        let original = numbered_layer(4, 3);
        let mut layer = original.clone();
        assert!(!layer.add_rows(0, 0, TileRef::Empty));
        assert!(!layer.add_rows(4, 1, TileRef::Empty));
        assert!(!layer.add_columns(5, 1, TileRef::Empty));
        assert!(!layer.delete_rows(2, 2));
        assert!(!layer.delete_columns(3, 2));
        assert!(!layer.delete_columns(0, 0));
        assert_eq!(layer, original);
    }

    #[test]
    fn test_layer_properties() {
        let mut props = TileLayerProperties::new("Ground", true);
        assert!(props.visible);
        props.toggle_visible();
        props.toggle_collision();
        assert!(!props.visible);
        assert!(!props.collision_enabled);
    }
}
