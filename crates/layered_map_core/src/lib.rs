//! Core data structures for layered_map_editor
//!
//! This crate provides the data model of a layered, context-aware tile map:
//! - `TileRef` - A cell value: a tileset-encoded tile or a sentinel
//! - `TileLayer` - A resizable grid of tile references
//! - `TileContext` - One map variant with its own layers and optional inheritance
//! - `Tileset` - A tileset reference with per-tile collision quadrants
//! - `MapData` - The aggregate owning contexts, layers and tilesets
//! - `MapDocument` - The persisted shape of a map

mod collision;
mod config;
mod context;
mod error;
mod layer;
mod map;
mod tile;
mod tileset;

pub use collision::CollisionGrid;
pub use config::{MapConfig, MAX_CONTEXTS, QUADRANTS_PER_TILE};
pub use context::{ContextId, TileContext};
pub use error::{ConfigError, DocumentError, MapError};
pub use layer::{TileLayer, TileLayerProperties};
pub use map::{
    ContextDocument, LayerDocument, MapData, MapDocument, BASE_CONTEXT_NAME, DOCUMENT_VERSION,
};
pub use tile::{
    TileRef, INHERITED_TILE, MAX_TILE_VALUE, MISSING_TILE, SELECTED_TILE, TILESET_COLUMNS,
    TILESET_ROWS, TILES_PER_TILESET,
};
pub use tileset::{QuadrantCollision, Tileset, TilesetDefinition};
