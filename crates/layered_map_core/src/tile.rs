//! Tile references and their tileset encoding

use serde::{Deserialize, Serialize};

/// Number of tiles in one tileset image (16x16 grid)
pub const TILES_PER_TILESET: u32 = 256;
/// Columns of tiles in a tileset image
pub const TILESET_COLUMNS: u32 = 16;
/// Rows of tiles in a tileset image
pub const TILESET_ROWS: u32 = 16;
/// Largest tile value that can be persisted
pub const MAX_TILE_VALUE: u32 = i32::MAX as u32;

/// Raw value written for an empty cell
pub const MISSING_TILE: i32 = -1;
/// Raw value written for a cell deferring to the inherited context
pub const INHERITED_TILE: i32 = -2;
/// Raw value used by selection masks
pub const SELECTED_TILE: i32 = -3;

/// A single cell value of a tile layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileRef {
    /// No tile
    #[default]
    Empty,
    /// Defer to the same layer and position in the inherited context
    Inherited,
    /// Marks a cell of a selection mask, never stored in map content
    Selected,
    /// Tileset-encoded tile: `tileset_ordinal * TILES_PER_TILESET + local_index`
    Tile(u32),
}

impl TileRef {
    /// Build a tile reference from a tileset ordinal and a tile index inside it.
    ///
    /// Values past `MAX_TILE_VALUE` are clamped to it.
    #[inline]
    pub fn from_parts(tileset_ordinal: u32, local_index: u32) -> Self {
        let value = tileset_ordinal
            .saturating_mul(TILES_PER_TILESET)
            .saturating_add(local_index % TILES_PER_TILESET);
        TileRef::Tile(value.min(MAX_TILE_VALUE))
    }

    /// Decode a persisted value. Returns `None` for negative values that are not a sentinel.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            MISSING_TILE => Some(TileRef::Empty),
            INHERITED_TILE => Some(TileRef::Inherited),
            SELECTED_TILE => Some(TileRef::Selected),
            v if v >= 0 => Some(TileRef::Tile(v as u32)),
            _ => None,
        }
    }

    /// Encode for persistence. Tiles past `MAX_TILE_VALUE` saturate; map
    /// writes reject them before they get here.
    pub fn to_raw(self) -> i32 {
        match self {
            TileRef::Empty => MISSING_TILE,
            TileRef::Inherited => INHERITED_TILE,
            TileRef::Selected => SELECTED_TILE,
            TileRef::Tile(v) => i32::try_from(v).unwrap_or(i32::MAX),
        }
    }

    /// Whether the value survives a save and load unchanged
    #[inline]
    pub fn is_persistable(self) -> bool {
        match self {
            TileRef::Tile(v) => v <= MAX_TILE_VALUE,
            _ => true,
        }
    }

    #[inline]
    pub fn is_tile(self) -> bool {
        matches!(self, TileRef::Tile(_))
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == TileRef::Empty
    }

    #[inline]
    pub fn is_inherited(self) -> bool {
        self == TileRef::Inherited
    }

    #[inline]
    pub fn is_selected(self) -> bool {
        self == TileRef::Selected
    }

    /// Ordinal of the tileset this tile belongs to
    #[inline]
    pub fn tileset_ordinal(self) -> Option<u32> {
        match self {
            TileRef::Tile(v) => Some(v / TILES_PER_TILESET),
            _ => None,
        }
    }

    /// Index of the tile inside its tileset
    #[inline]
    pub fn local_index(self) -> Option<u32> {
        match self {
            TileRef::Tile(v) => Some(v % TILES_PER_TILESET),
            _ => None,
        }
    }

    /// Re-encode a tile under a new tileset ordinal.
    ///
    /// `remap` receives the current ordinal and returns the new one, or `None`
    /// when the tile should become `Empty`. Sentinels pass through unchanged.
    pub fn remap_tileset(self, remap: impl Fn(u32) -> Option<u32>) -> Self {
        match self {
            TileRef::Tile(v) => match remap(v / TILES_PER_TILESET) {
                Some(ordinal) => TileRef::from_parts(ordinal, v % TILES_PER_TILESET),
                None => TileRef::Empty,
            },
            other => other,
        }
    }
}
