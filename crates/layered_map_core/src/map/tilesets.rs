//! Tileset list management and tile reference re-encoding

use super::MapData;
use crate::{MapError, TileRef, Tileset};
use tracing::{debug, info};

impl MapData {
    /// Append a tileset. Its ordinal becomes `tileset_count() - 1`.
    pub fn add_tileset(&mut self, tileset: Tileset) -> Result<usize, MapError> {
        if !tileset.is_initialized() {
            return self.reject(MapError::TilesetNotInitialized);
        }
        if self.tilesets.iter().any(|t| t.id == tileset.id) {
            return self.reject(MapError::DuplicateTileset);
        }
        if self
            .tilesets
            .iter()
            .any(|t| t.definition_filename == tileset.definition_filename)
        {
            return self.reject(MapError::DuplicateTilesetDefinition(
                tileset.definition_filename,
            ));
        }

        info!(name = %tileset.name, definition = %tileset.definition_filename, "added tileset");
        self.tilesets.push(tileset);
        self.modified = true;
        Ok(self.tilesets.len() - 1)
    }

    /// Remove the tileset at `index` and re-encode every tile reference.
    ///
    /// Tiles of the removed tileset become `Empty`; tiles of later tilesets move
    /// down by one tileset span.
    pub fn remove_tileset(&mut self, index: usize) -> Result<Tileset, MapError> {
        if index >= self.tilesets.len() {
            return self.reject(MapError::TilesetIndexOutOfRange(index));
        }

        let removed = self.tilesets.remove(index);
        let removed_ordinal = index as u32;
        let changed = self.remap_tile_references(|ordinal| match ordinal {
            o if o == removed_ordinal => None,
            o if o > removed_ordinal => Some(o - 1),
            o => Some(o),
        });
        self.modified = true;
        info!(name = %removed.name, index, changed, "removed tileset");
        Ok(removed)
    }

    /// Exchange the ordinals of two tilesets, re-encoding every tile reference
    pub fn swap_tilesets(&mut self, first: usize, second: usize) -> Result<(), MapError> {
        let count = self.tilesets.len();
        if first >= count {
            return self.reject(MapError::TilesetIndexOutOfRange(first));
        }
        if second >= count {
            return self.reject(MapError::TilesetIndexOutOfRange(second));
        }
        if first == second {
            return Ok(());
        }

        self.tilesets.swap(first, second);
        let (a, b) = (first as u32, second as u32);
        let changed = self.remap_tile_references(|ordinal| match ordinal {
            o if o == a => Some(b),
            o if o == b => Some(a),
            o => Some(o),
        });
        self.modified = true;
        debug!(first, second, changed, "swapped tilesets");
        Ok(())
    }

    /// Index of the tileset defined by `definition_filename`
    pub fn tileset_index(&self, definition_filename: &str) -> Option<usize> {
        self.tilesets
            .iter()
            .position(|t| t.definition_filename == definition_filename)
    }

    /// Tileset owning a tile reference, if loaded
    pub fn tileset_for_tile(&self, tile: TileRef) -> Option<&Tileset> {
        self.tilesets.get(tile.tileset_ordinal()? as usize)
    }

    /// Rewrite every tile reference of every layer of every context.
    /// Returns how many cells changed.
    fn remap_tile_references(&mut self, remap: impl Fn(u32) -> Option<u32> + Copy) -> usize {
        let mut changed = 0;
        for context in &mut self.tile_contexts {
            for layer in context.tile_layers_mut() {
                layer.map_tiles(|tile| {
                    let new_tile = tile.remap_tileset(remap);
                    if new_tile != tile {
                        changed += 1;
                    }
                    new_tile
                });
            }
        }
        changed
    }
}
