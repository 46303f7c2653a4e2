//! Persisted shape of a map
//!
//! `MapDocument` is everything a map file needs: dimensions, tileset
//! definition files in ordinal order, layer metadata, every context's raw tile
//! grids and the collision grid. Layer visibility is editor state and is not
//! stored.

use super::MapData;
use crate::{
    ContextId, DocumentError, MapError, TileContext, TileLayer, TileLayerProperties, TileRef,
    Tileset,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Current document format version
pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDocument {
    pub name: String,
    pub collision_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDocument {
    pub name: String,
    /// Id of the inherited context, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits: Option<u32>,
    /// Raw tile values per layer, then per row
    pub layers: Vec<Vec<Vec<i32>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDocument {
    pub version: u32,
    pub length: u32,
    pub height: u32,
    /// Tileset definition files, in ordinal order
    pub tilesets: Vec<String>,
    pub layers: Vec<LayerDocument>,
    pub contexts: Vec<ContextDocument>,
    /// `2 * height` rows of `2 * length` packed context bits
    #[serde(default)]
    pub collision: Vec<Vec<u32>>,
}

impl MapDocument {
    /// Load a document from a JSON file
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        let document = serde_json::from_str(&content)?;
        Ok(document)
    }

    /// Save the document as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!(path = %path.display(), "saved map document");
        Ok(())
    }
}

impl MapData {
    /// Snapshot the map for saving. Recomputes the collision grid.
    pub fn to_document(&mut self) -> Result<MapDocument, MapError> {
        self.require_initialized()?;
        let collision = self.compute_collision_data().rows();

        let contexts = self
            .tile_contexts
            .iter()
            .map(|context| ContextDocument {
                name: context.name().to_string(),
                inherits: context.inherited_context_id().map(|id| id.0),
                layers: context.tile_layers().iter().map(layer_to_rows).collect(),
            })
            .collect();

        Ok(MapDocument {
            version: DOCUMENT_VERSION,
            length: self.map_length,
            height: self.map_height,
            tilesets: self
                .tilesets
                .iter()
                .map(|t| t.definition_filename.clone())
                .collect(),
            layers: self
                .tile_layer_properties
                .iter()
                .map(|p| LayerDocument {
                    name: p.name.clone(),
                    collision_enabled: p.collision_enabled,
                })
                .collect(),
            contexts,
            collision,
        })
    }

    /// Populate an empty map from a document.
    ///
    /// `tilesets` must be the loaded tilesets named by `document.tilesets`, in
    /// the same order. The whole document is validated before anything is
    /// applied. The collision grid is recomputed rather than trusted.
    pub fn load_document(
        &mut self,
        document: &MapDocument,
        tilesets: Vec<Tileset>,
    ) -> Result<(), MapError> {
        if self.initialized {
            return self.reject(MapError::AlreadyInitialized);
        }
        let built = match build_from_document(self, document, tilesets) {
            Ok(built) => built,
            Err(error) => return self.reject(error),
        };

        self.map_length = document.length;
        self.map_height = document.height;
        self.tilesets = built.tilesets;
        self.tile_layer_properties = built.properties;
        self.tile_contexts = built.contexts;
        self.empty_tile_layer = TileLayer::new(document.length, document.height);
        self.initialized = true;
        self.compute_collision_data();
        self.modified = false;
        info!(
            length = document.length,
            height = document.height,
            contexts = self.tile_contexts.len(),
            "loaded map document"
        );
        Ok(())
    }
}

fn layer_to_rows(layer: &TileLayer) -> Vec<Vec<i32>> {
    layer
        .tiles()
        .chunks(layer.width().max(1) as usize)
        .map(|row| row.iter().map(|t| t.to_raw()).collect())
        .collect()
}

struct BuiltMap {
    tilesets: Vec<Tileset>,
    properties: Vec<TileLayerProperties>,
    contexts: Vec<TileContext>,
}

fn malformed(message: impl Into<String>) -> MapError {
    MapError::MalformedDocument(message.into())
}

fn build_from_document(
    map: &MapData,
    document: &MapDocument,
    tilesets: Vec<Tileset>,
) -> Result<BuiltMap, MapError> {
    let config = map.config();
    if !config.is_valid_length(document.length) || !config.is_valid_height(document.height) {
        return Err(MapError::InvalidDimensions {
            length: document.length,
            height: document.height,
        });
    }

    // Tilesets
    if tilesets.len() != document.tilesets.len() {
        return Err(malformed(format!(
            "document lists {} tilesets but {} were provided",
            document.tilesets.len(),
            tilesets.len()
        )));
    }
    let mut seen_files = HashSet::new();
    for (expected, tileset) in document.tilesets.iter().zip(&tilesets) {
        if &tileset.definition_filename != expected {
            return Err(MapError::TilesetMismatch {
                expected: expected.clone(),
                found: tileset.definition_filename.clone(),
            });
        }
        if !tileset.is_initialized() {
            return Err(MapError::TilesetNotInitialized);
        }
        if !seen_files.insert(expected.as_str()) {
            return Err(MapError::DuplicateTilesetDefinition(expected.clone()));
        }
    }

    // Layers
    if document.layers.is_empty() {
        return Err(malformed("document has no tile layers"));
    }
    let mut seen_names = HashSet::new();
    for layer in &document.layers {
        if layer.name.is_empty() {
            return Err(MapError::EmptyName);
        }
        if !seen_names.insert(layer.name.as_str()) {
            return Err(MapError::DuplicateLayerName(layer.name.clone()));
        }
    }
    let properties = document
        .layers
        .iter()
        .map(|l| TileLayerProperties::new(l.name.clone(), l.collision_enabled))
        .collect();

    // Contexts
    let context_count = document.contexts.len();
    if context_count == 0 {
        return Err(malformed("document has no contexts"));
    }
    let limit = config.context_limit();
    if context_count > limit {
        return Err(MapError::ContextLimitReached(limit));
    }
    let mut seen_names = HashSet::new();
    let mut contexts = Vec::with_capacity(context_count);
    for (index, entry) in document.contexts.iter().enumerate() {
        let id = ContextId::from_index(index);
        if entry.name.is_empty() {
            return Err(MapError::EmptyName);
        }
        if !seen_names.insert(entry.name.as_str()) {
            return Err(MapError::DuplicateContextName(entry.name.clone()));
        }

        let inherits = entry.inherits.map(ContextId);
        if let Some(parent) = inherits {
            if parent == id {
                return Err(MapError::InheritFromSelf(id));
            }
            let parent_entry = parent
                .index()
                .and_then(|i| document.contexts.get(i))
                .ok_or(MapError::ContextNotFound(parent))?;
            if parent_entry.inherits.is_some() {
                return Err(MapError::InheritFromInheritingContext(parent));
            }
        }

        if entry.layers.len() != document.layers.len() {
            return Err(malformed(format!(
                "context '{}' has {} layers, expected {}",
                entry.name,
                entry.layers.len(),
                document.layers.len()
            )));
        }

        let mut context = TileContext::new(id, entry.name.clone(), inherits);
        for rows in &entry.layers {
            let layer = layer_from_rows(document, rows, inherits.is_some(), tilesets.len())?;
            context.add_tile_layer(layer);
        }
        contexts.push(context);
    }

    Ok(BuiltMap {
        tilesets,
        properties,
        contexts,
    })
}

fn layer_from_rows(
    document: &MapDocument,
    rows: &[Vec<i32>],
    inheriting: bool,
    tileset_count: usize,
) -> Result<TileLayer, MapError> {
    if rows.len() != document.height as usize
        || rows.iter().any(|row| row.len() != document.length as usize)
    {
        return Err(malformed(format!(
            "layer grid is not {}x{}",
            document.length, document.height
        )));
    }

    let mut tiles = Vec::with_capacity((document.length * document.height) as usize);
    for &raw in rows.iter().flatten() {
        let tile = match TileRef::from_raw(raw) {
            Some(TileRef::Selected) | None => return Err(MapError::InvalidTileValue(raw.into())),
            Some(TileRef::Inherited) if !inheriting => {
                return Err(MapError::InvalidTileValue(raw.into()))
            }
            Some(tile) => tile,
        };
        if let Some(ordinal) = tile.tileset_ordinal() {
            if ordinal as usize >= tileset_count {
                return Err(MapError::TilesetOrdinalOutOfRange {
                    ordinal,
                    loaded: tileset_count,
                });
            }
        }
        tiles.push(tile);
    }
    TileLayer::from_tiles(document.length, document.height, tiles)
        .ok_or_else(|| malformed("layer grid size mismatch"))
}
