//! Swap a block of tiles with the block at a displacement
//!
//! Cells are exchanged pairwise, `c` with `c + offset`, visiting the cells
//! farthest along the offset first on each axis. When source and destination
//! overlap, every source cell is therefore read before anything overwrites
//! it, and the displaced destination cells rotate into the vacated space.

use super::LayerTarget;
use crate::rect::TileRect;
use crate::selection::SelectionArea;
use layered_map_core::{MapData, MapError, TileLayer};
use tracing::debug;

fn displaced(layer: &TileLayer, x: u32, y: u32, offset: (i32, i32)) -> Option<(u32, u32)> {
    let nx = x.checked_add_signed(offset.0)?;
    let ny = y.checked_add_signed(offset.1)?;
    (nx < layer.width() && ny < layer.height()).then_some((nx, ny))
}

fn swap_cells(layer: &mut TileLayer, a: (u32, u32), b: (u32, u32)) {
    let first = layer.get_tile(a.0, a.1);
    layer.set_tile(a.0, a.1, layer.get_tile(b.0, b.1));
    layer.set_tile(b.0, b.1, first);
}

/// Axis values ordered so the cell farthest along `delta` comes first
fn axis_order(min: u32, max: u32, delta: i32) -> Vec<u32> {
    if delta > 0 {
        (min..=max).rev().collect()
    } else {
        (min..=max).collect()
    }
}

/// Swap the tiles of `region` with those at `region + offset`.
///
/// Nothing changes and `false` is returned when the offset is zero or any
/// destination cell would leave the layer.
pub fn swap_region(layer: &mut TileLayer, region: TileRect, offset: (i32, i32)) -> bool {
    if offset == (0, 0) {
        return false;
    }
    let Some(region) = region.clamp_to(layer.width(), layer.height()) else {
        return false;
    };
    let corners = [(region.min_x, region.min_y), (region.max_x, region.max_y)];
    if corners
        .iter()
        .any(|&(x, y)| displaced(layer, x, y, offset).is_none())
    {
        return false;
    }

    let columns = axis_order(region.min_x, region.max_x, offset.0);
    for y in axis_order(region.min_y, region.max_y, offset.1) {
        for &x in &columns {
            if let Some(target) = displaced(layer, x, y, offset) {
                swap_cells(layer, (x, y), target);
            }
        }
    }
    true
}

/// Swap the selected tiles with those at `selected + offset`, moving the
/// selection along with them.
///
/// Nothing changes and `false` is returned when the offset is zero, nothing
/// is selected or any destination cell would leave the layer.
pub fn swap_selection(
    layer: &mut TileLayer,
    selection: &mut SelectionArea,
    offset: (i32, i32),
) -> bool {
    if offset == (0, 0) || !selection.is_active() {
        return false;
    }
    if selection.width() != layer.width() || selection.height() != layer.height() {
        return false;
    }

    let mut cells = selection.selected_cells();
    if cells
        .iter()
        .any(|&(x, y)| displaced(layer, x, y, offset).is_none())
    {
        return false;
    }

    // Farthest along the offset first, rows as the outer axis
    cells.sort_by(|a, b| {
        let rows = if offset.1 > 0 { b.1.cmp(&a.1) } else { a.1.cmp(&b.1) };
        let columns = if offset.0 > 0 { b.0.cmp(&a.0) } else { a.0.cmp(&b.0) };
        rows.then(columns)
    });

    let mut mask = selection.mask().clone();
    for &(x, y) in &cells {
        if let Some(target) = displaced(layer, x, y, offset) {
            swap_cells(layer, (x, y), target);
            swap_cells(&mut mask, (x, y), target);
        }
    }
    selection.set_mask(mask);
    true
}

/// Swap tool: drag from `from` to `to` on one layer of the map.
///
/// Dragging a selected cell swaps the whole selection. Dragging any other cell
/// swaps that single tile, unless the drop cell is selected.
pub fn swap_tiles(
    map: &mut MapData,
    target: LayerTarget,
    selection: &mut SelectionArea,
    from: (u32, u32),
    to: (u32, u32),
) -> Result<bool, MapError> {
    map.validate_tile_layer(target.context, target.layer)?;
    let offset = (
        to.0 as i64 - from.0 as i64,
        to.1 as i64 - from.1 as i64,
    );
    let (Ok(dx), Ok(dy)) = (i32::try_from(offset.0), i32::try_from(offset.1)) else {
        return Ok(false);
    };
    let Some(layer) = map.tile_layer_mut(target.context, target.layer) else {
        return Ok(false);
    };

    let swapped = if selection.is_selected(from.0, from.1) {
        swap_selection(layer, selection, (dx, dy))
    } else if selection.is_selected(to.0, to.1) {
        false
    } else {
        swap_region(layer, TileRect::single(from.0, from.1), (dx, dy))
    };

    if swapped {
        map.set_map_modified(true);
    }
    debug!(context = %target.context, layer = target.layer, dx, dy, swapped, "swap tiles");
    Ok(swapped)
}
