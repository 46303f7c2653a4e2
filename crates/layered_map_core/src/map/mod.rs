//! The map aggregate: contexts, layers, tilesets and derived collision data
//!
//! `MapData` owns every `TileContext` and is the only type allowed to change
//! the shape of their layer sets. Each structural operation validates first
//! and only then applies the same change to every context, so a rejected
//! operation never leaves the map partially modified.

mod collision;
mod contexts;
mod document;
mod layers;
mod structure;
mod tilesets;

use crate::{
    CollisionGrid, ContextId, MapConfig, MapError, TileContext, TileLayer, TileLayerProperties,
    TileRef, Tileset,
};
use tracing::{info, warn};

pub use document::{ContextDocument, LayerDocument, MapDocument, DOCUMENT_VERSION};

/// Default layers of a new map: (name, collision enabled)
const DEFAULT_TILE_LAYERS: [(&str, bool); 3] = [("Ground", true), ("Middle", true), ("Sky", false)];
/// Name of the context every new map starts with
pub const BASE_CONTEXT_NAME: &str = "Base";

/// Complete editable state of one map
#[derive(Debug, Clone)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct MapData {
    config: MapConfig,
    initialized: bool,
    modified: bool,
    map_length: u32,
    map_height: u32,
    tilesets: Vec<Tileset>,
    tile_layer_properties: Vec<TileLayerProperties>,
    tile_contexts: Vec<TileContext>,
    /// Template for new layers, always sized to the map
    empty_tile_layer: TileLayer,
    collision_data: CollisionGrid,
    error_message: String,
}

impl Default for MapData {
    fn default() -> Self {
        Self::new(MapConfig::default())
    }
}

impl MapData {
    /// Create an empty, uninitialized map
    pub fn new(config: MapConfig) -> Self {
        Self {
            config,
            initialized: false,
            modified: false,
            map_length: 0,
            map_height: 0,
            tilesets: Vec::new(),
            tile_layer_properties: Vec::new(),
            tile_contexts: Vec::new(),
            empty_tile_layer: TileLayer::default(),
            collision_data: CollisionGrid::default(),
            error_message: String::new(),
        }
    }

    /// Build the default map: three layers (Ground, Middle, Sky) and one base context
    pub fn create_data(&mut self, map_length: u32, map_height: u32) -> Result<(), MapError> {
        if self.initialized {
            return self.reject(MapError::AlreadyInitialized);
        }
        if !self.config.is_valid_length(map_length) || !self.config.is_valid_height(map_height) {
            return self.reject(MapError::InvalidDimensions {
                length: map_length,
                height: map_height,
            });
        }

        self.map_length = map_length;
        self.map_height = map_height;
        self.empty_tile_layer = TileLayer::new(map_length, map_height);
        self.collision_data = CollisionGrid::for_map(map_length, map_height);

        let mut base = TileContext::new(ContextId::BASE, BASE_CONTEXT_NAME.to_string(), None);
        for (name, collision) in DEFAULT_TILE_LAYERS {
            self.tile_layer_properties
                .push(TileLayerProperties::new(name, collision));
            base.add_tile_layer(self.empty_tile_layer.clone());
        }
        self.tile_contexts.push(base);

        self.initialized = true;
        self.modified = true;
        info!(map_length, map_height, "created map data");
        Ok(())
    }

    /// Drop all contexts, layers and tilesets, returning to the uninitialized state
    pub fn destroy_data(&mut self) {
        let config = std::mem::take(&mut self.config);
        *self = Self::new(config);
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_map_modified(&self) -> bool {
        self.modified
    }

    pub fn set_map_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn map_length(&self) -> u32 {
        self.map_length
    }

    pub fn map_height(&self) -> u32 {
        self.map_height
    }

    /// Message of the most recent rejected operation
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn tilesets(&self) -> &[Tileset] {
        &self.tilesets
    }

    pub fn tileset_count(&self) -> usize {
        self.tilesets.len()
    }

    pub fn tile_layer_properties(&self) -> &[TileLayerProperties] {
        &self.tile_layer_properties
    }

    pub fn tile_layer_count(&self) -> usize {
        self.tile_layer_properties.len()
    }

    pub fn tile_contexts(&self) -> &[TileContext] {
        &self.tile_contexts
    }

    pub fn tile_context_count(&self) -> usize {
        self.tile_contexts.len()
    }

    pub fn find_tile_context_by_id(&self, id: ContextId) -> Option<&TileContext> {
        id.index().and_then(|i| self.tile_contexts.get(i))
    }

    pub fn find_tile_context_by_name(&self, name: &str) -> Option<&TileContext> {
        self.tile_contexts.iter().find(|c| c.name() == name)
    }

    pub fn find_tile_context_by_index(&self, index: usize) -> Option<&TileContext> {
        self.tile_contexts.get(index)
    }

    /// The last computed collision grid; see `compute_collision_data`
    pub fn collision_data(&self) -> &CollisionGrid {
        &self.collision_data
    }

    pub fn tile_layer(&self, context: ContextId, layer_index: usize) -> Option<&TileLayer> {
        self.find_tile_context_by_id(context)?.tile_layer(layer_index)
    }

    /// Mutable access to one layer's cells. The layer's size can not be changed
    /// through it; callers editing tiles should mark the map modified.
    pub fn tile_layer_mut(
        &mut self,
        context: ContextId,
        layer_index: usize,
    ) -> Option<&mut TileLayer> {
        let index = context.index()?;
        self.tile_contexts.get_mut(index)?.tile_layer_mut(layer_index)
    }

    /// Tile stored at a position, without resolving inheritance
    pub fn get_tile(&self, context: ContextId, layer_index: usize, x: u32, y: u32) -> TileRef {
        self.tile_layer(context, layer_index)
            .map(|layer| layer.get_tile(x, y))
            .unwrap_or(TileRef::Empty)
    }

    /// Tile visible at a position, following one level of inheritance
    pub fn resolved_tile(&self, context: ContextId, layer_index: usize, x: u32, y: u32) -> TileRef {
        let Some(ctx) = self.find_tile_context_by_id(context) else {
            return TileRef::Empty;
        };
        match ctx.get_tile(layer_index, x, y) {
            TileRef::Inherited => ctx
                .inherited_context_id()
                .and_then(|parent| self.find_tile_context_by_id(parent))
                .map(|parent| parent.get_tile(layer_index, x, y))
                .filter(|tile| tile.is_tile())
                .unwrap_or(TileRef::Empty),
            tile => tile,
        }
    }

    /// Write one tile into map content. Out of bounds positions are ignored.
    pub fn set_tile(
        &mut self,
        context: ContextId,
        layer_index: usize,
        x: u32,
        y: u32,
        tile: TileRef,
    ) -> Result<(), MapError> {
        self.validate_tile_write(context, layer_index, tile)?;
        if let Some(layer) = self.tile_layer_mut(context, layer_index) {
            layer.set_tile(x, y, tile);
        }
        self.modified = true;
        Ok(())
    }

    /// Check that a context and layer exist
    pub fn validate_tile_layer(
        &mut self,
        context: ContextId,
        layer_index: usize,
    ) -> Result<(), MapError> {
        self.context_index(context)?;
        if layer_index >= self.tile_layer_count() {
            return self.reject(MapError::LayerIndexOutOfRange(layer_index));
        }
        Ok(())
    }

    /// Check that `tile` may be stored in a layer of `context`.
    ///
    /// `Selected` is never map content, `Inherited` needs an inheriting context
    /// and tile values must fit the persisted encoding.
    pub fn validate_tile_write(
        &mut self,
        context: ContextId,
        layer_index: usize,
        tile: TileRef,
    ) -> Result<(), MapError> {
        self.validate_tile_layer(context, layer_index)?;
        let inheriting = self
            .find_tile_context_by_id(context)
            .is_some_and(|c| c.is_inheriting_context());
        match tile {
            TileRef::Selected => self.reject(MapError::InvalidTileValue(tile.to_raw().into())),
            TileRef::Tile(v) if !tile.is_persistable() => {
                self.reject(MapError::InvalidTileValue(v.into()))
            }
            TileRef::Inherited if !inheriting => self.reject(MapError::NotInheriting(context)),
            _ => Ok(()),
        }
    }

    /// Record and log a rejected operation
    fn reject<T>(&mut self, error: MapError) -> Result<T, MapError> {
        warn!("{}", error);
        self.error_message = error.to_string();
        Err(error)
    }

    fn require_initialized(&mut self) -> Result<(), MapError> {
        if self.initialized {
            Ok(())
        } else {
            self.reject(MapError::NotInitialized)
        }
    }

    /// Storage index of a live context
    fn context_index(&mut self, id: ContextId) -> Result<usize, MapError> {
        match id.index() {
            Some(index) if index < self.tile_contexts.len() => Ok(index),
            _ => self.reject(MapError::ContextNotFound(id)),
        }
    }

    /// Apply a change to every layer of every context and to the template layer
    fn for_each_tile_layer(&mut self, mut f: impl FnMut(&mut TileLayer, TileRef)) {
        for context in &mut self.tile_contexts {
            let fill = context.default_fill();
            for layer in context.tile_layers_mut() {
                f(layer, fill);
            }
        }
        f(&mut self.empty_tile_layer, TileRef::Empty);
    }
}

/// Produce a name not accepted by `is_taken`: `"<name> (Clone)"`, then
/// `"<name> (Clone #2)"`, `"<name> (Clone #3)"` and so on.
pub(crate) fn clone_name(name: &str, is_taken: impl Fn(&str) -> bool) -> String {
    let candidate = format!("{name} (Clone)");
    if !is_taken(&candidate) {
        return candidate;
    }
    (2..)
        .map(|n| format!("{name} (Clone #{n})"))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_default()
}
