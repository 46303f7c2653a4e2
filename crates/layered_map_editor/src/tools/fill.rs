//! Bucket fill
//!
//! Two flood algorithms share one span-queue walker:
//! - value fill spreads over 4-connected cells holding the seed's value
//! - selection fill spreads over the selection mask, whatever the tiles hold

use crate::selection::SelectionArea;
use layered_map_core::{ContextId, MapData, MapError, TileLayer, TileRef};
use std::collections::VecDeque;
use tracing::debug;

/// A grid walked by `span_fill`.
///
/// After `visit(x, y)` returns, `matches(x, y)` must be false, or the walk
/// would never end.
pub trait FloodTarget {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Whether the cell belongs to the region and has not been visited yet
    fn matches(&self, x: u32, y: u32) -> bool;
    fn visit(&mut self, x: u32, y: u32);
}

/// Scanline flood fill from a seed. Returns the number of visited cells.
///
/// Each dequeued seed is extended left and right into a span; the rows above
/// and below are then scanned across that span and one seed is queued per run
/// of matching cells.
pub fn span_fill(target: &mut impl FloodTarget, x: u32, y: u32) -> usize {
    let (width, height) = (target.width(), target.height());
    if x >= width || y >= height || !target.matches(x, y) {
        return 0;
    }

    let mut queue = VecDeque::from([(x, y)]);
    let mut visited = 0;
    while let Some((x, y)) = queue.pop_front() {
        if !target.matches(x, y) {
            continue;
        }

        let mut left = x;
        while left > 0 && target.matches(left - 1, y) {
            left -= 1;
        }
        let mut right = x;
        while right + 1 < width && target.matches(right + 1, y) {
            right += 1;
        }
        for cx in left..=right {
            target.visit(cx, y);
        }
        visited += (right - left + 1) as usize;

        let above = y.checked_sub(1);
        let below = (y + 1 < height).then_some(y + 1);
        for ny in [above, below].into_iter().flatten() {
            let mut in_run = false;
            for cx in left..=right {
                if target.matches(cx, ny) {
                    if !in_run {
                        queue.push_back((cx, ny));
                        in_run = true;
                    }
                } else {
                    in_run = false;
                }
            }
        }
    }
    visited
}

/// Replaces a connected region of equal tiles, optionally skipping masked cells
struct ValueFill<'a> {
    layer: &'a mut TileLayer,
    target: TileRef,
    replacement: TileRef,
    excluded: Option<&'a TileLayer>,
}

impl FloodTarget for ValueFill<'_> {
    fn width(&self) -> u32 {
        self.layer.width()
    }

    fn height(&self) -> u32 {
        self.layer.height()
    }

    fn matches(&self, x: u32, y: u32) -> bool {
        self.layer.get_tile(x, y) == self.target
            && !self.excluded.is_some_and(|mask| mask.get_tile(x, y).is_selected())
    }

    fn visit(&mut self, x: u32, y: u32) {
        self.layer.set_tile(x, y, self.replacement);
    }
}

/// Writes a tile over selected mask cells, clearing the mask as it goes
struct SelectionFill<'a> {
    layer: &'a mut TileLayer,
    mask: &'a mut TileLayer,
    tile: TileRef,
}

impl FloodTarget for SelectionFill<'_> {
    fn width(&self) -> u32 {
        self.mask.width()
    }

    fn height(&self) -> u32 {
        self.mask.height()
    }

    fn matches(&self, x: u32, y: u32) -> bool {
        self.mask.get_tile(x, y).is_selected()
    }

    fn visit(&mut self, x: u32, y: u32) {
        self.layer.set_tile(x, y, self.tile);
        self.mask.set_tile(x, y, TileRef::Empty);
    }
}

/// Marks the connected region of equal tiles in a mask
struct RegionScan<'a> {
    layer: &'a TileLayer,
    target: TileRef,
    region: TileLayer,
}

impl FloodTarget for RegionScan<'_> {
    fn width(&self) -> u32 {
        self.layer.width()
    }

    fn height(&self) -> u32 {
        self.layer.height()
    }

    fn matches(&self, x: u32, y: u32) -> bool {
        self.layer.get_tile(x, y) == self.target && !self.region.get_tile(x, y).is_selected()
    }

    fn visit(&mut self, x: u32, y: u32) {
        self.region.set_tile(x, y, TileRef::Selected);
    }
}

/// Replace the 4-connected region of tiles equal to the seed's tile with `tile`.
///
/// Cells marked `Selected` in `excluded` are treated as walls.
pub fn flood_fill(
    layer: &mut TileLayer,
    x: u32,
    y: u32,
    tile: TileRef,
    excluded: Option<&TileLayer>,
) -> usize {
    let target = layer.get_tile(x, y);
    if target == tile {
        return 0;
    }
    let mut fill = ValueFill {
        layer,
        target,
        replacement: tile,
        excluded,
    };
    span_fill(&mut fill, x, y)
}

/// Write `tile` over the selected region of `mask` connected to the seed.
///
/// The mask doubles as the visited set: every filled cell is cleared from it.
pub fn fill_selection(
    layer: &mut TileLayer,
    mask: &mut TileLayer,
    x: u32,
    y: u32,
    tile: TileRef,
) -> usize {
    let mut fill = SelectionFill { layer, mask, tile };
    span_fill(&mut fill, x, y)
}

/// Mask of the 4-connected region of tiles equal to the seed's tile
pub fn matching_region(layer: &TileLayer, x: u32, y: u32) -> TileLayer {
    let mut scan = RegionScan {
        layer,
        target: layer.get_tile(x, y),
        region: TileLayer::new(layer.width(), layer.height()),
    };
    span_fill(&mut scan, x, y);
    scan.region
}

/// Bucket fill one layer of the map at a seed.
///
/// A seed inside the active selection fills the selected region around it.
/// Any other seed floods matching tiles without entering the selection.
/// Returns how many cells were written.
pub fn fill_area(
    map: &mut MapData,
    context: ContextId,
    layer_index: usize,
    selection: &SelectionArea,
    x: u32,
    y: u32,
    tile: TileRef,
) -> Result<usize, MapError> {
    map.validate_tile_write(context, layer_index, tile)?;
    let Some(layer) = map.tile_layer_mut(context, layer_index) else {
        return Ok(0);
    };

    let filled = if selection.is_selected(x, y) {
        let mut mask = selection.mask().clone();
        fill_selection(layer, &mut mask, x, y, tile)
    } else {
        let excluded = selection.is_active().then(|| selection.mask());
        flood_fill(layer, x, y, tile, excluded)
    };

    if filled > 0 {
        map.set_map_modified(true);
    }
    debug!(%context, layer_index, x, y, filled, "fill area");
    Ok(filled)
}
