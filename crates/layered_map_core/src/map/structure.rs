//! Map resizing and row/column insertion and removal

use super::MapData;
use crate::{CollisionGrid, MapError};
use tracing::info;

impl MapData {
    /// Resize every layer of every context, keeping the top-left corner in place
    pub fn resize_map(&mut self, map_length: u32, map_height: u32) -> Result<(), MapError> {
        self.require_initialized()?;
        if map_length == self.map_length && map_height == self.map_height {
            return Ok(());
        }
        if !self.config.is_valid_length(map_length) || !self.config.is_valid_height(map_height) {
            return self.reject(MapError::InvalidDimensions {
                length: map_length,
                height: map_height,
            });
        }

        self.for_each_tile_layer(|layer, _| layer.resize_layer(map_length, map_height));
        self.set_dimensions(map_length, map_height);
        info!(map_length, map_height, "resized map");
        Ok(())
    }

    /// Insert `count` rows before row `index` in every layer of every context.
    /// An index equal to the height appends at the bottom.
    pub fn insert_tile_layer_rows(&mut self, index: u32, count: u32) -> Result<(), MapError> {
        self.require_initialized()?;
        if count == 0 {
            return Ok(());
        }
        let fits = self
            .map_height
            .checked_add(count)
            .is_some_and(|height| height <= self.config.maximum_map_height);
        if index > self.map_height || !fits {
            return self.reject(MapError::InvalidRowInsertion { index, count });
        }

        self.for_each_tile_layer(|layer, fill| {
            layer.add_rows(index, count, fill);
        });
        self.set_dimensions(self.map_length, self.map_height + count);
        Ok(())
    }

    /// Remove `count` rows starting at row `index` from every layer of every context
    pub fn remove_tile_layer_rows(&mut self, index: u32, count: u32) -> Result<(), MapError> {
        self.require_initialized()?;
        if count == 0 {
            return Ok(());
        }
        let in_range = index
            .checked_add(count)
            .is_some_and(|end| end <= self.map_height);
        if !in_range || self.map_height - count < self.config.minimum_map_height {
            return self.reject(MapError::InvalidRowRemoval { index, count });
        }

        self.for_each_tile_layer(|layer, _| {
            layer.delete_rows(index, count);
        });
        self.set_dimensions(self.map_length, self.map_height - count);
        Ok(())
    }

    /// Insert `count` columns before column `index` in every layer of every context.
    /// An index equal to the length appends at the right edge.
    pub fn insert_tile_layer_columns(&mut self, index: u32, count: u32) -> Result<(), MapError> {
        self.require_initialized()?;
        if count == 0 {
            return Ok(());
        }
        let fits = self
            .map_length
            .checked_add(count)
            .is_some_and(|length| length <= self.config.maximum_map_length);
        if index > self.map_length || !fits {
            return self.reject(MapError::InvalidColumnInsertion { index, count });
        }

        self.for_each_tile_layer(|layer, fill| {
            layer.add_columns(index, count, fill);
        });
        self.set_dimensions(self.map_length + count, self.map_height);
        Ok(())
    }

    /// Remove `count` columns starting at column `index` from every layer of every context
    pub fn remove_tile_layer_columns(&mut self, index: u32, count: u32) -> Result<(), MapError> {
        self.require_initialized()?;
        if count == 0 {
            return Ok(());
        }
        let in_range = index
            .checked_add(count)
            .is_some_and(|end| end <= self.map_length);
        if !in_range || self.map_length - count < self.config.minimum_map_length {
            return self.reject(MapError::InvalidColumnRemoval { index, count });
        }

        self.for_each_tile_layer(|layer, _| {
            layer.delete_columns(index, count);
        });
        self.set_dimensions(self.map_length - count, self.map_height);
        Ok(())
    }

    fn set_dimensions(&mut self, map_length: u32, map_height: u32) {
        self.map_length = map_length;
        self.map_height = map_height;
        self.collision_data = CollisionGrid::for_map(map_length, map_height);
        self.modified = true;
    }
}
