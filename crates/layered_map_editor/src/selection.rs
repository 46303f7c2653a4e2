//! Tile selection area
//!
//! The selection is an overlay mask the size of the map holding `Selected` or
//! `Empty`, plus the bounding box of the selected cells. It is editor state
//! only and never stored in the map.

use crate::rect::TileRect;
use crate::tools::fill::matching_region;
use layered_map_core::{TileLayer, TileRef};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a new selection combines with the existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Replace the selection
    #[default]
    Normal,
    /// Union with the selection
    Additive,
    /// Remove from the selection
    Subtractive,
}

impl SelectionMode {
    pub fn name(&self) -> &'static str {
        match self {
            SelectionMode::Normal => "Normal",
            SelectionMode::Additive => "Additive",
            SelectionMode::Subtractive => "Subtractive",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionArea {
    mask: TileLayer,
    bounds: Option<TileRect>,
}

impl SelectionArea {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            mask: TileLayer::new(width, height),
            bounds: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.mask.width()
    }

    pub fn height(&self) -> u32 {
        self.mask.height()
    }

    /// True while at least one cell is selected
    pub fn is_active(&self) -> bool {
        self.bounds.is_some()
    }

    /// Bounding box of the selected cells
    pub fn bounds(&self) -> Option<TileRect> {
        self.bounds
    }

    /// The selection mask: `Selected` for selected cells, `Empty` elsewhere
    pub fn mask(&self) -> &TileLayer {
        &self.mask
    }

    pub fn is_selected(&self, x: u32, y: u32) -> bool {
        self.mask.get_tile(x, y).is_selected()
    }

    pub fn selected_count(&self) -> usize {
        self.mask.count_matching(TileRef::Selected)
    }

    /// Row-major list of selected cells
    pub fn selected_cells(&self) -> Vec<(u32, u32)> {
        self.mask
            .iter()
            .filter(|(_, tile)| tile.is_selected())
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Drop the selection and resize the mask, e.g. after the map changed size
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.mask.clear_layer();
        self.bounds = None;
    }

    pub fn select_all(&mut self) {
        self.mask.fill_layer(TileRef::Selected);
        self.bounds = TileRect::from_corners((0, 0), (self.width(), self.height()))
            .clamp_to(self.width(), self.height());
    }

    /// Select the rectangle spanned by two corners, clipped to the map
    pub fn select_rectangle(&mut self, a: (u32, u32), b: (u32, u32), mode: SelectionMode) {
        if mode == SelectionMode::Normal {
            self.clear();
        }
        let Some(rect) = TileRect::from_corners(a, b).clamp_to(self.width(), self.height()) else {
            return;
        };
        self.apply_cells(rect.cells(), mode);
    }

    /// Magic wand: select the 4-connected cells of `layer` matching the tile at
    /// `(x, y)`
    pub fn select_matching_region(
        &mut self,
        layer: &TileLayer,
        x: u32,
        y: u32,
        mode: SelectionMode,
    ) {
        if mode == SelectionMode::Normal {
            self.clear();
        }
        if x >= layer.width() || y >= layer.height() {
            return;
        }
        let region = matching_region(layer, x, y);
        let cells = region
            .iter()
            .filter(|(_, tile)| tile.is_selected())
            .map(|(pos, _)| pos);
        self.apply_cells(cells, mode);
    }

    /// Recompute the bounding box by scanning the whole mask
    pub fn refresh(&mut self) {
        let mut bounds: Option<TileRect> = None;
        for ((x, y), tile) in self.mask.iter() {
            if tile.is_selected() {
                include_cell(&mut bounds, x, y);
            }
        }
        self.bounds = bounds;
    }

    /// Replace the mask, e.g. after moving the selected cells
    pub(crate) fn set_mask(&mut self, mask: TileLayer) {
        if mask.width() == self.width() && mask.height() == self.height() {
            self.mask = mask;
            self.refresh();
        }
    }

    fn apply_cells(&mut self, cells: impl Iterator<Item = (u32, u32)>, mode: SelectionMode) {
        let mut changed = 0usize;
        match mode {
            SelectionMode::Normal | SelectionMode::Additive => {
                for (x, y) in cells {
                    self.mask.set_tile(x, y, TileRef::Selected);
                    include_cell(&mut self.bounds, x, y);
                    changed += 1;
                }
            }
            SelectionMode::Subtractive => {
                for (x, y) in cells {
                    self.mask.set_tile(x, y, TileRef::Empty);
                    changed += 1;
                }
                // The remaining region is not the old box minus the new one
                self.refresh();
            }
        }
        debug!(mode = mode.name(), changed, "updated selection");
    }
}

fn include_cell(bounds: &mut Option<TileRect>, x: u32, y: u32) {
    match bounds {
        Some(bounds) => bounds.include(x, y),
        None => *bounds = Some(TileRect::single(x, y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_rectangle_normal_replaces() {
        let mut selection = SelectionArea::new(10, 10);
        selection.select_rectangle((1, 1), (2, 2), SelectionMode::Normal);
        selection.select_rectangle((5, 5), (6, 7), SelectionMode::Normal);
        assert_eq!(selection.selected_count(), 6);
        assert!(!selection.is_selected(1, 1));
        assert_eq!(
            selection.bounds(),
            Some(TileRect::from_corners((5, 5), (6, 7)))
        );
    }

    #[test]
    fn test_additive_grows_bounds() {
        let mut selection = SelectionArea::new(10, 10);
        selection.select_rectangle((1, 1), (2, 2), SelectionMode::Normal);
        selection.select_rectangle((8, 0), (8, 0), SelectionMode::Additive);
        assert_eq!(selection.selected_count(), 5);
        assert_eq!(
            selection.bounds(),
            Some(TileRect::from_corners((1, 0), (8, 2)))
        );
    }

    #[test]
    fn test_subtractive_rescans_bounds() {
        let mut selection = SelectionArea::new(10, 10);
        selection.select_rectangle((0, 0), (4, 4), SelectionMode::Normal);
        selection.select_rectangle((0, 0), (4, 2), SelectionMode::Subtractive);
        assert_eq!(
            selection.bounds(),
            Some(TileRect::from_corners((0, 3), (4, 4)))
        );

        selection.select_rectangle((0, 3), (4, 4), SelectionMode::Subtractive);
        assert!(!selection.is_active());
        assert!(selection.selected_cells().is_empty());
    }

    #[test]
    fn test_rectangle_is_clipped_to_map() {
        let mut selection = SelectionArea::new(4, 4);
        selection.select_rectangle((2, 2), (9, 9), SelectionMode::Normal);
        assert_eq!(selection.selected_cells(), [(2, 2), (3, 2), (2, 3), (3, 3)]);
        selection.select_rectangle((5, 5), (9, 9), SelectionMode::Normal);
        assert!(!selection.is_active());
    }

    #[test]
    fn test_select_all_and_clear() {
        let mut selection = SelectionArea::new(3, 2);
        selection.select_all();
        assert_eq!(selection.selected_count(), 6);
        assert_eq!(
            selection.bounds(),
            Some(TileRect::from_corners((0, 0), (2, 1)))
        );
        selection.clear();
        assert_eq!(selection.selected_count(), 0);
        assert_eq!(selection.bounds(), None);
    }

    #[test]
    fn test_magic_wand() {
        let mut layer = TileLayer::new(4, 4);
        for x in 0..4 {
            layer.set_tile(x, 2, TileRef::Tile(1));
        }
        let mut selection = SelectionArea::new(4, 4);
        selection.select_matching_region(&layer, 0, 0, SelectionMode::Normal);
        assert_eq!(selection.selected_count(), 8);
        assert_eq!(
            selection.bounds(),
            Some(TileRect::from_corners((0, 0), (3, 1)))
        );

        selection.select_matching_region(&layer, 1, 2, SelectionMode::Additive);
        assert_eq!(selection.selected_count(), 12);
    }
}
