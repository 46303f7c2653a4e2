//! Tileset references and per-tile collision quadrants

use crate::{DocumentError, TILES_PER_TILESET};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

bitflags! {
    /// Blocked quadrants of a single tile
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct QuadrantCollision: u8 {
        const NORTH_WEST = 1 << 0;
        const NORTH_EAST = 1 << 1;
        const SOUTH_WEST = 1 << 2;
        const SOUTH_EAST = 1 << 3;
    }
}

impl QuadrantCollision {
    /// Build from `[north_west, north_east, south_west, south_east]`
    pub fn from_quadrants(quadrants: [bool; 4]) -> Self {
        let mut flags = QuadrantCollision::empty();
        flags.set(QuadrantCollision::NORTH_WEST, quadrants[0]);
        flags.set(QuadrantCollision::NORTH_EAST, quadrants[1]);
        flags.set(QuadrantCollision::SOUTH_WEST, quadrants[2]);
        flags.set(QuadrantCollision::SOUTH_EAST, quadrants[3]);
        flags
    }

    pub fn to_quadrants(self) -> [bool; 4] {
        [
            self.contains(QuadrantCollision::NORTH_WEST),
            self.contains(QuadrantCollision::NORTH_EAST),
            self.contains(QuadrantCollision::SOUTH_WEST),
            self.contains(QuadrantCollision::SOUTH_EAST),
        ]
    }
}

/// On-disk tileset definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetDefinition {
    pub name: String,
    pub image: String,
    /// One `[nw, ne, sw, se]` entry per tile, in tile index order
    #[serde(default)]
    pub collisions: Vec<[bool; 4]>,
}

/// A tileset loaded into a map
///
/// Its position in the map's tileset list decides how tile references encode it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tileset {
    pub id: Uuid,
    pub name: String,
    /// File this tileset was defined by, unique per map
    pub definition_filename: String,
    pub image_filename: String,
    collisions: Vec<QuadrantCollision>,
}

impl Tileset {
    /// Create a tileset without collision data. It is not initialized until
    /// collision data for every tile is supplied.
    pub fn new(
        name: impl Into<String>,
        definition_filename: impl Into<String>,
        image_filename: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            definition_filename: definition_filename.into(),
            image_filename: image_filename.into(),
            collisions: Vec::new(),
        }
    }

    /// Create a tileset whose tiles are all walkable
    pub fn walkable(name: impl Into<String>, definition_filename: impl Into<String>) -> Self {
        let mut tileset = Self::new(name, definition_filename, String::new());
        tileset.collisions = vec![QuadrantCollision::empty(); TILES_PER_TILESET as usize];
        tileset
    }

    /// Build from a parsed definition
    pub fn from_definition(
        definition_filename: impl Into<String>,
        definition: TilesetDefinition,
    ) -> Self {
        let mut tileset = Self::new(definition.name, definition_filename, definition.image);
        tileset.collisions = definition
            .collisions
            .into_iter()
            .map(QuadrantCollision::from_quadrants)
            .collect();
        tileset
    }

    /// Load a tileset from its JSON definition file
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        let definition: TilesetDefinition = serde_json::from_str(&content)?;
        Ok(Self::from_definition(
            path.to_string_lossy().into_owned(),
            definition,
        ))
    }

    pub fn to_definition(&self) -> TilesetDefinition {
        TilesetDefinition {
            name: self.name.clone(),
            image: self.image_filename.clone(),
            collisions: self.collisions.iter().map(|c| c.to_quadrants()).collect(),
        }
    }

    /// Write this tileset's definition as JSON
    pub fn save_definition(&self, path: &Path) -> Result<(), DocumentError> {
        let content = serde_json::to_string_pretty(&self.to_definition())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// True once the definition filename is set and every tile has collision data
    pub fn is_initialized(&self) -> bool {
        !self.definition_filename.is_empty()
            && self.collisions.len() == TILES_PER_TILESET as usize
    }

    /// Replace the collision data of every tile
    pub fn set_collisions(&mut self, collisions: Vec<QuadrantCollision>) {
        self.collisions = collisions;
    }

    pub fn set_tile_collision(&mut self, local_index: u32, collision: QuadrantCollision) {
        if let Some(entry) = self.collisions.get_mut(local_index as usize) {
            *entry = collision;
        }
    }

    /// Collision quadrants of one tile. Unknown tiles are fully blocked.
    pub fn tile_collision(&self, local_index: u32) -> QuadrantCollision {
        self.collisions
            .get(local_index as usize)
            .copied()
            .unwrap_or(QuadrantCollision::all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialization() {
        let mut tileset = Tileset::new("Grass", "grass.json", "grass.png");
        assert!(!tileset.is_initialized());
        tileset.set_collisions(vec![QuadrantCollision::empty(); 256]);
        assert!(tileset.is_initialized());
        assert!(Tileset::walkable("Water", "water.json").is_initialized());
        assert!(!Tileset::walkable("Nameless", "").is_initialized());
    }

    #[test]
    fn test_tile_collision() {
        let mut tileset = Tileset::walkable("Walls", "walls.json");
        tileset.set_tile_collision(
            3,
            QuadrantCollision::NORTH_WEST | QuadrantCollision::SOUTH_EAST,
        );
        assert_eq!(
            tileset.tile_collision(3).to_quadrants(),
            [true, false, false, true]
        );
        assert_eq!(tileset.tile_collision(4), QuadrantCollision::empty());
        assert_eq!(tileset.tile_collision(999), QuadrantCollision::all());
    }

    #[test]
    fn test_definition_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walls.json");

        let mut tileset = Tileset::walkable("Walls", "walls.json");
        tileset.image_filename = "walls.png".to_string();
        tileset.set_tile_collision(0, QuadrantCollision::all());
        tileset.save_definition(&path).unwrap();

        let loaded = Tileset::load(&path).unwrap();
        assert!(loaded.is_initialized());
        assert_eq!(loaded.name, "Walls");
        assert_eq!(loaded.image_filename, "walls.png");
        assert_eq!(loaded.tile_collision(0), QuadrantCollision::all());
        assert_eq!(loaded.tile_collision(1), QuadrantCollision::empty());
        assert_ne!(loaded.id, tileset.id);
    }
}
