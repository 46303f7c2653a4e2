//! Multi-tile paint, erase and inherit strokes

use super::LayerTarget;
use crate::rect::TileRect;
use crate::selection::SelectionArea;
use layered_map_core::{MapData, MapError, TileRef, TILESET_COLUMNS, TILESET_ROWS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// A stamp of tiles painted with its top-left cell at the cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileBrush {
    width: u32,
    height: u32,
    tiles: Vec<TileRef>,
}

impl Default for TileBrush {
    fn default() -> Self {
        Self::single(TileRef::from_parts(0, 0))
    }
}

impl TileBrush {
    pub fn single(tile: TileRef) -> Self {
        Self {
            width: 1,
            height: 1,
            tiles: vec![tile],
        }
    }

    /// Row-major stamp. `None` if the size is zero or does not match `tiles`.
    pub fn from_tiles(width: u32, height: u32, tiles: Vec<TileRef>) -> Option<Self> {
        if width == 0 || height == 0 || tiles.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            tiles,
        })
    }

    /// Stamp made of a rectangle picked from a tileset's 16x16 grid
    pub fn from_tileset_region(tileset_ordinal: u32, region: TileRect) -> Option<Self> {
        if region.max_x >= TILESET_COLUMNS || region.max_y >= TILESET_ROWS {
            return None;
        }
        let tiles = region
            .cells()
            .map(|(x, y)| TileRef::from_parts(tileset_ordinal, y * TILESET_COLUMNS + x))
            .collect();
        Self::from_tiles(region.width(), region.height(), tiles)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tile at an offset into the stamp, repeating in both directions
    pub fn tile_at(&self, dx: u32, dy: u32) -> TileRef {
        let index = (dy % self.height) * self.width + dx % self.width;
        self.tiles
            .get(index as usize)
            .copied()
            .unwrap_or(TileRef::Empty)
    }

    fn distinct_tiles(&self) -> HashSet<TileRef> {
        self.tiles.iter().copied().collect()
    }

    fn footprint(&self, x: u32, y: u32) -> TileRect {
        TileRect::from_corners(
            (x, y),
            (
                x.saturating_add(self.width - 1),
                y.saturating_add(self.height - 1),
            ),
        )
    }
}

/// Which cells a stroke may touch.
///
/// A stroke that starts inside the selection only edits selected cells; one
/// that starts outside only edits unselected cells. Without a selection
/// everything is editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrokeScope {
    selection_active: bool,
    origin_selected: bool,
}

impl StrokeScope {
    /// Scope that allows every cell
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Capture the selection status of the pressed cell
    pub fn from_press(selection: &SelectionArea, x: u32, y: u32) -> Self {
        Self {
            selection_active: selection.is_active(),
            origin_selected: selection.is_selected(x, y),
        }
    }

    pub fn allows(&self, selection: &SelectionArea, x: u32, y: u32) -> bool {
        !self.selection_active || selection.is_selected(x, y) == self.origin_selected
    }
}

/// Stamp `brush` with its top-left cell at `origin`
pub fn paint_tiles(
    map: &mut MapData,
    target: LayerTarget,
    selection: &SelectionArea,
    scope: StrokeScope,
    origin: (u32, u32),
    brush: &TileBrush,
) -> Result<usize, MapError> {
    for tile in brush.distinct_tiles() {
        map.validate_tile_write(target.context, target.layer, tile)?;
    }
    let area = brush.footprint(origin.0, origin.1);
    apply_stroke(map, target, selection, scope, area, |x, y| {
        brush.tile_at(x - origin.0, y - origin.1)
    })
}

/// Clear the brush footprint at `origin`
pub fn erase_tiles(
    map: &mut MapData,
    target: LayerTarget,
    selection: &SelectionArea,
    scope: StrokeScope,
    origin: (u32, u32),
    brush: &TileBrush,
) -> Result<usize, MapError> {
    map.validate_tile_layer(target.context, target.layer)?;
    let area = brush.footprint(origin.0, origin.1);
    apply_stroke(map, target, selection, scope, area, |_, _| TileRef::Empty)
}

/// Mark the brush footprint at `origin` as inherited from the parent context
pub fn inherit_tiles(
    map: &mut MapData,
    target: LayerTarget,
    selection: &SelectionArea,
    scope: StrokeScope,
    origin: (u32, u32),
    brush: &TileBrush,
) -> Result<usize, MapError> {
    map.validate_tile_write(target.context, target.layer, TileRef::Inherited)?;
    let area = brush.footprint(origin.0, origin.1);
    apply_stroke(map, target, selection, scope, area, |_, _| TileRef::Inherited)
}

/// Cover a rectangle with the brush pattern, anchored at its top-left corner
pub fn paint_rectangle(
    map: &mut MapData,
    target: LayerTarget,
    selection: &SelectionArea,
    scope: StrokeScope,
    rect: TileRect,
    brush: &TileBrush,
) -> Result<usize, MapError> {
    for tile in brush.distinct_tiles() {
        map.validate_tile_write(target.context, target.layer, tile)?;
    }
    apply_stroke(map, target, selection, scope, rect, |x, y| {
        brush.tile_at(x - rect.min_x, y - rect.min_y)
    })
}

pub fn erase_rectangle(
    map: &mut MapData,
    target: LayerTarget,
    selection: &SelectionArea,
    scope: StrokeScope,
    rect: TileRect,
) -> Result<usize, MapError> {
    map.validate_tile_layer(target.context, target.layer)?;
    apply_stroke(map, target, selection, scope, rect, |_, _| TileRef::Empty)
}

pub fn inherit_rectangle(
    map: &mut MapData,
    target: LayerTarget,
    selection: &SelectionArea,
    scope: StrokeScope,
    rect: TileRect,
) -> Result<usize, MapError> {
    map.validate_tile_write(target.context, target.layer, TileRef::Inherited)?;
    apply_stroke(map, target, selection, scope, rect, |_, _| TileRef::Inherited)
}

/// Write `tile_for(x, y)` over the cells of `area` that are on the map and in scope.
/// Returns how many cells changed.
fn apply_stroke(
    map: &mut MapData,
    target: LayerTarget,
    selection: &SelectionArea,
    scope: StrokeScope,
    area: TileRect,
    tile_for: impl Fn(u32, u32) -> TileRef,
) -> Result<usize, MapError> {
    let Some(layer) = map.tile_layer_mut(target.context, target.layer) else {
        return Ok(0);
    };
    let Some(area) = area.clamp_to(layer.width(), layer.height()) else {
        return Ok(0);
    };

    let mut changed = 0;
    for (x, y) in area.cells() {
        if !scope.allows(selection, x, y) {
            continue;
        }
        let tile = tile_for(x, y);
        if layer.get_tile(x, y) != tile {
            layer.set_tile(x, y, tile);
            changed += 1;
        }
    }

    if changed > 0 {
        map.set_map_modified(true);
    }
    debug!(context = %target.context, layer = target.layer, changed, "applied stroke");
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionMode;
    use layered_map_core::ContextId;

    fn setup() -> (MapData, SelectionArea) {
        let mut map = MapData::default();
        map.create_data(32, 24).unwrap();
        map.set_map_modified(false);
        (map, SelectionArea::new(32, 24))
    }

    fn base_layer(layer: usize) -> LayerTarget {
        LayerTarget::new(ContextId::BASE, layer)
    }

    #[test]
    fn test_brush_from_tileset_region() {
        let brush =
            TileBrush::from_tileset_region(1, TileRect::from_corners((2, 3), (3, 4))).unwrap();
        assert_eq!(brush.width(), 2);
        assert_eq!(brush.height(), 2);
        assert_eq!(brush.tile_at(0, 0), TileRef::from_parts(1, 50));
        assert_eq!(brush.tile_at(1, 1), TileRef::from_parts(1, 67));
        // Offsets wrap around the stamp
        assert_eq!(brush.tile_at(2, 2), brush.tile_at(0, 0));
        assert!(TileBrush::from_tileset_region(0, TileRect::single(16, 0)).is_none());
    }

    #[test]
    fn test_paint_multi_tile_stamp() {
        let (mut map, selection) = setup();
        let brush = TileBrush::from_tiles(
            2,
            1,
            vec![TileRef::from_parts(0, 1), TileRef::from_parts(0, 2)],
        )
        .unwrap();
        let changed = paint_tiles(
            &mut map,
            base_layer(0),
            &selection,
            StrokeScope::unrestricted(),
            (31, 0),
            &brush,
        );
        // The second column falls off the map
        assert_eq!(changed, Ok(1));
        assert_eq!(map.get_tile(ContextId::BASE, 0, 31, 0), TileRef::from_parts(0, 1));
        assert!(map.is_map_modified());
    }

    #[test]
    fn test_stroke_stays_inside_selection() {
        let (mut map, mut selection) = setup();
        selection.select_rectangle((0, 0), (1, 1), SelectionMode::Normal);
        let scope = StrokeScope::from_press(&selection, 0, 0);
        let rect = TileRect::from_corners((0, 0), (3, 3));

        let brush = TileBrush::single(TileRef::Tile(7));
        let changed = paint_rectangle(&mut map, base_layer(0), &selection, scope, rect, &brush);
        assert_eq!(changed, Ok(4));
        assert_eq!(map.get_tile(ContextId::BASE, 0, 2, 2), TileRef::Empty);
    }

    #[test]
    fn test_stroke_stays_outside_selection() {
        let (mut map, mut selection) = setup();
        selection.select_rectangle((0, 0), (1, 1), SelectionMode::Normal);
        let scope = StrokeScope::from_press(&selection, 3, 3);
        let rect = TileRect::from_corners((0, 0), (3, 3));

        let brush = TileBrush::single(TileRef::Tile(7));
        let changed = paint_rectangle(&mut map, base_layer(0), &selection, scope, rect, &brush);
        assert_eq!(changed, Ok(12));
        assert_eq!(map.get_tile(ContextId::BASE, 0, 0, 0), TileRef::Empty);
    }

    #[test]
    fn test_erase_tiles() {
        let (mut map, selection) = setup();
        map.set_tile(ContextId::BASE, 1, 4, 4, TileRef::Tile(2))
            .unwrap();
        map.set_map_modified(false);
        let brush = TileBrush::single(TileRef::Tile(9));
        let scope = StrokeScope::unrestricted();

        assert_eq!(erase_tiles(&mut map, base_layer(1), &selection, scope, (4, 4), &brush), Ok(1));
        assert_eq!(map.get_tile(ContextId::BASE, 1, 4, 4), TileRef::Empty);
        // Erasing empty cells changes nothing
        map.set_map_modified(false);
        assert_eq!(erase_tiles(&mut map, base_layer(1), &selection, scope, (4, 4), &brush), Ok(0));
        assert!(!map.is_map_modified());
    }

    #[test]
    fn test_inherit_requires_inheriting_context() {
        let (mut map, selection) = setup();
        let scope = StrokeScope::unrestricted();
        let rect = TileRect::from_corners((0, 0), (1, 1));
        assert_eq!(
            inherit_rectangle(&mut map, base_layer(0), &selection, scope, rect),
            Err(MapError::NotInheriting(ContextId::BASE))
        );

        let night = map
            .add_tile_context("Night", Some(ContextId::BASE))
            .unwrap();
        let target = LayerTarget::new(night, 0);
        erase_rectangle(&mut map, target, &selection, scope, rect).unwrap();
        assert_eq!(map.get_tile(night, 0, 1, 1), TileRef::Empty);
        assert_eq!(inherit_rectangle(&mut map, target, &selection, scope, rect), Ok(4));
        assert_eq!(map.get_tile(night, 0, 1, 1), TileRef::Inherited);
    }

    #[test]
    fn test_paint_rejects_unknown_layer() {
        let (mut map, selection) = setup();
        let brush = TileBrush::default();
        assert_eq!(
            paint_tiles(
                &mut map,
                base_layer(5),
                &selection,
                StrokeScope::unrestricted(),
                (0, 0),
                &brush
            ),
            Err(MapError::LayerIndexOutOfRange(5))
        );
    }
}
