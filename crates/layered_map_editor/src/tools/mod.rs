//! Editing tools operating on map layers

pub mod fill;
pub mod paint;
pub mod swap;
pub mod transfer;

pub use fill::{fill_area, fill_selection, flood_fill, matching_region, span_fill, FloodTarget};
pub use paint::{
    erase_rectangle, erase_tiles, inherit_rectangle, inherit_tiles, paint_rectangle, paint_tiles,
    StrokeScope, TileBrush,
};
pub use swap::{swap_region, swap_selection, swap_tiles};
pub use transfer::{transfer_selection, TransferMode, TransferReport};

use layered_map_core::ContextId;

/// One layer of one context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerTarget {
    pub context: ContextId,
    pub layer: usize,
}

impl LayerTarget {
    pub fn new(context: ContextId, layer: usize) -> Self {
        Self { context, layer }
    }
}

/// Bresenham's line algorithm - every tile coordinate from `from` to `to`, inclusive
pub fn bresenham_line(from: (u32, u32), to: (u32, u32)) -> Vec<(u32, u32)> {
    let (x0, y0) = (from.0 as i64, from.1 as i64);
    let (x1, y1) = (to.0 as i64, to.1 as i64);
    let mut points = Vec::new();

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        points.push((x as u32, y as u32));

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }

    points
}
