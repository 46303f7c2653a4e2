//! Tile layer list operations, mirrored across every context

use super::{clone_name, MapData};
use crate::{MapError, TileLayerProperties};
use tracing::info;

impl MapData {
    /// Append a layer to every context. Returns the new layer index.
    pub fn add_tile_layer(
        &mut self,
        name: &str,
        collision_enabled: bool,
    ) -> Result<usize, MapError> {
        self.require_initialized()?;
        self.validate_layer_name(name)?;

        for context in &mut self.tile_contexts {
            let mut layer = self.empty_tile_layer.clone();
            layer.fill_layer(context.default_fill());
            context.add_tile_layer(layer);
        }
        self.tile_layer_properties
            .push(TileLayerProperties::new(name, collision_enabled));
        self.modified = true;
        info!(name, "added tile layer");
        Ok(self.tile_layer_properties.len() - 1)
    }

    /// Delete a layer from every context. The final layer can not be deleted.
    pub fn delete_tile_layer(&mut self, index: usize) -> Result<(), MapError> {
        self.check_layer_index(index)?;
        if self.tile_layer_properties.len() == 1 {
            return self.reject(MapError::LastTileLayer);
        }

        for context in &mut self.tile_contexts {
            context.remove_tile_layer(index);
        }
        let removed = self.tile_layer_properties.remove(index);
        self.modified = true;
        info!(name = %removed.name, "deleted tile layer");
        Ok(())
    }

    /// Append a copy of a layer (content and properties) to every context.
    /// Returns the index of the copy.
    pub fn clone_tile_layer(&mut self, index: usize) -> Result<usize, MapError> {
        self.check_layer_index(index)?;

        let source = &self.tile_layer_properties[index];
        let name = clone_name(&source.name, |candidate| {
            self.tile_layer_properties
                .iter()
                .any(|p| p.name == candidate)
        });
        let properties = TileLayerProperties {
            name,
            ..source.clone()
        };

        for context in &mut self.tile_contexts {
            context.clone_tile_layer(index);
        }
        info!(name = %properties.name, "cloned tile layer");
        self.tile_layer_properties.push(properties);
        self.modified = true;
        Ok(self.tile_layer_properties.len() - 1)
    }

    pub fn rename_tile_layer(&mut self, index: usize, name: &str) -> Result<(), MapError> {
        self.check_layer_index(index)?;
        if self.tile_layer_properties[index].name == name {
            return Ok(());
        }
        self.validate_layer_name(name)?;

        self.tile_layer_properties[index].name = name.to_string();
        self.modified = true;
        Ok(())
    }

    /// Exchange the positions of two layers in every context
    pub fn swap_tile_layers(&mut self, first: usize, second: usize) -> Result<(), MapError> {
        self.check_layer_index(first)?;
        self.check_layer_index(second)?;
        if first == second {
            return self.reject(MapError::SameTileLayer);
        }

        for context in &mut self.tile_contexts {
            context.swap_tile_layers(first, second);
        }
        self.tile_layer_properties.swap(first, second);
        self.modified = true;
        Ok(())
    }

    /// Visibility is editor-only state and does not mark the map modified
    pub fn toggle_tile_layer_visibility(&mut self, index: usize) -> Result<bool, MapError> {
        self.check_layer_index(index)?;
        let properties = &mut self.tile_layer_properties[index];
        properties.toggle_visible();
        Ok(properties.visible)
    }

    pub fn toggle_tile_layer_collision(&mut self, index: usize) -> Result<bool, MapError> {
        self.check_layer_index(index)?;
        let properties = &mut self.tile_layer_properties[index];
        properties.toggle_collision();
        let enabled = properties.collision_enabled;
        self.modified = true;
        Ok(enabled)
    }

    pub fn tile_layer_index_by_name(&self, name: &str) -> Option<usize> {
        self.tile_layer_properties
            .iter()
            .position(|p| p.name == name)
    }

    fn check_layer_index(&mut self, index: usize) -> Result<(), MapError> {
        if index < self.tile_layer_properties.len() {
            Ok(())
        } else {
            self.reject(MapError::LayerIndexOutOfRange(index))
        }
    }

    fn validate_layer_name(&mut self, name: &str) -> Result<(), MapError> {
        if name.is_empty() {
            return self.reject(MapError::EmptyName);
        }
        if self.tile_layer_index_by_name(name).is_some() {
            return self.reject(MapError::DuplicateLayerName(name.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::map::tests::new_map;
    use crate::{ContextId, MapError, TileRef};

    #[test]
    fn test_add_tile_layer_fans_out() {
        let mut map = new_map();
        let night = map
            .add_tile_context("Night", Some(ContextId::BASE))
            .unwrap();
        let index = map.add_tile_layer("Objects", false).unwrap();
        assert_eq!(index, 3);
        for context in map.tile_contexts() {
            assert_eq!(context.tile_layer_count(), 4);
        }
        assert_eq!(map.get_tile(ContextId::BASE, 3, 0, 0), TileRef::Empty);
        assert_eq!(map.get_tile(night, 3, 0, 0), TileRef::Inherited);
    }

    #[test]
    fn test_layer_names_are_unique() {
        let mut map = new_map();
        assert_eq!(
            map.add_tile_layer("Ground", true),
            Err(MapError::DuplicateLayerName("Ground".to_string()))
        );
        assert_eq!(map.add_tile_layer("", true), Err(MapError::EmptyName));
        // Names are case sensitive
        assert!(map.add_tile_layer("ground", true).is_ok());
        assert!(map.rename_tile_layer(0, "Sky").is_err());
        assert!(map.rename_tile_layer(0, "Ground").is_ok());
        map.rename_tile_layer(0, "Floor").unwrap();
        assert_eq!(map.tile_layer_properties()[0].name, "Floor");
        assert_eq!(map.tile_layer_count(), 4);
    }

    #[test]
    fn test_delete_tile_layer() {
        let mut map = new_map();
        map.set_tile(ContextId::BASE, 2, 0, 0, TileRef::Tile(3))
            .unwrap();
        map.delete_tile_layer(1).unwrap();
        assert_eq!(map.tile_layer_count(), 2);
        assert_eq!(map.tile_layer_properties()[1].name, "Sky");
        assert_eq!(map.get_tile(ContextId::BASE, 1, 0, 0), TileRef::Tile(3));

        map.delete_tile_layer(0).unwrap();
        assert_eq!(map.delete_tile_layer(0), Err(MapError::LastTileLayer));
        assert_eq!(
            map.delete_tile_layer(4),
            Err(MapError::LayerIndexOutOfRange(4))
        );
    }

    #[test]
    fn test_clone_tile_layer() {
        let mut map = new_map();
        map.set_tile(ContextId::BASE, 0, 5, 5, TileRef::Tile(8))
            .unwrap();
        assert_eq!(map.clone_tile_layer(0), Ok(3));
        assert_eq!(map.clone_tile_layer(0), Ok(4));
        let names: Vec<_> = map
            .tile_layer_properties()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(
            names,
            ["Ground", "Middle", "Sky", "Ground (Clone)", "Ground (Clone #2)"]
        );
        assert!(map.tile_layer_properties()[3].collision_enabled);
        assert_eq!(map.get_tile(ContextId::BASE, 4, 5, 5), TileRef::Tile(8));
    }

    #[test]
    fn test_swap_tile_layers() {
        let mut map = new_map();
        map.set_tile(ContextId::BASE, 0, 0, 0, TileRef::Tile(1))
            .unwrap();
        map.swap_tile_layers(0, 2).unwrap();
        assert_eq!(map.tile_layer_properties()[2].name, "Ground");
        assert_eq!(map.get_tile(ContextId::BASE, 2, 0, 0), TileRef::Tile(1));
        assert_eq!(map.swap_tile_layers(1, 1), Err(MapError::SameTileLayer));
    }

    #[test]
    fn test_toggle_layer_flags() {
        let mut map = new_map();
        map.set_map_modified(false);
        assert_eq!(map.toggle_tile_layer_visibility(0), Ok(false));
        assert!(!map.is_map_modified());
        assert_eq!(map.toggle_tile_layer_collision(2), Ok(true));
        assert!(map.is_map_modified());
    }
}
