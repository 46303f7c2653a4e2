//! Error types for map operations and map files

use crate::ContextId;

/// A rejected map operation. The map is left untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("map data is already initialized")]
    AlreadyInitialized,
    #[error("map data is not initialized")]
    NotInitialized,
    #[error("map size {length}x{height} is outside the allowed range")]
    InvalidDimensions { length: u32, height: u32 },
    #[error("cannot insert {count} rows at index {index}")]
    InvalidRowInsertion { index: u32, count: u32 },
    #[error("cannot insert {count} columns at index {index}")]
    InvalidColumnInsertion { index: u32, count: u32 },
    #[error("cannot remove {count} rows at index {index}")]
    InvalidRowRemoval { index: u32, count: u32 },
    #[error("cannot remove {count} columns at index {index}")]
    InvalidColumnRemoval { index: u32, count: u32 },

    #[error("tileset is not initialized")]
    TilesetNotInitialized,
    #[error("tileset is already loaded")]
    DuplicateTileset,
    #[error("a tileset with definition file '{0}' is already loaded")]
    DuplicateTilesetDefinition(String),
    #[error("no tileset at index {0}")]
    TilesetIndexOutOfRange(usize),
    #[error("expected tileset '{expected}' but got '{found}'")]
    TilesetMismatch { expected: String, found: String },

    #[error("name must not be empty")]
    EmptyName,
    #[error("a tile layer named '{0}' already exists")]
    DuplicateLayerName(String),
    #[error("no tile layer at index {0}")]
    LayerIndexOutOfRange(usize),
    #[error("the last tile layer can not be deleted")]
    LastTileLayer,
    #[error("a layer can not be swapped with itself")]
    SameTileLayer,

    #[error("the maximum number of contexts ({0}) has been reached")]
    ContextLimitReached(usize),
    #[error("a context named '{0}' already exists")]
    DuplicateContextName(String),
    #[error("no context with id {0}")]
    ContextNotFound(ContextId),
    #[error("context {0} can not inherit from itself")]
    InheritFromSelf(ContextId),
    #[error("context {0} inherits from another context and can not be inherited from")]
    InheritFromInheritingContext(ContextId),
    #[error("context {0} is inherited by other contexts and can not inherit")]
    ContextHasDependents(ContextId),
    #[error("context {0} is inherited by another context and can not be deleted")]
    ContextInherited(ContextId),
    #[error("the last context can not be deleted")]
    LastContext,
    #[error("a context can not be swapped with itself")]
    SameContext,
    #[error("context {0} does not inherit from another context")]
    NotInheriting(ContextId),

    #[error("invalid tile value {0}")]
    InvalidTileValue(i64),
    #[error("tile references tileset {ordinal} but only {loaded} tilesets are loaded")]
    TilesetOrdinalOutOfRange { ordinal: u32, loaded: usize },
    #[error("document is malformed: {0}")]
    MalformedDocument(String),
}

/// Failure reading or writing a map document or tileset definition
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Map(#[from] MapError),
}

/// Failure loading or validating a `MapConfig`
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
