//! Collision grid computation

use super::MapData;
use crate::{CollisionGrid, QuadrantCollision, TileRef};
use tracing::{debug, warn};

impl MapData {
    /// Rebuild the collision grid from every context's collision-enabled layers.
    ///
    /// For each tile the quadrant flags of all collision layers are OR-ed
    /// together, following one level of inheritance. A tile position where no
    /// collision layer holds any tile is fully blocked.
    pub fn compute_collision_data(&mut self) -> &CollisionGrid {
        let mut grid = CollisionGrid::for_map(self.map_length, self.map_height);
        let collision_layers: Vec<usize> = self
            .tile_layer_properties
            .iter()
            .enumerate()
            .filter(|(_, p)| p.collision_enabled)
            .map(|(i, _)| i)
            .collect();

        let mut out_of_range = 0usize;
        for (context_index, context) in self.tile_contexts.iter().enumerate() {
            let parent = context
                .inherited_context_id()
                .and_then(|id| self.find_tile_context_by_id(id));

            for y in 0..self.map_height {
                for x in 0..self.map_length {
                    let mut found_tile = false;
                    let mut quadrants = QuadrantCollision::empty();

                    for &layer in &collision_layers {
                        let tile = match context.get_tile(layer, x, y) {
                            TileRef::Inherited => parent
                                .map(|p| p.get_tile(layer, x, y))
                                .unwrap_or(TileRef::Empty),
                            tile => tile,
                        };
                        let (Some(ordinal), Some(local)) =
                            (tile.tileset_ordinal(), tile.local_index())
                        else {
                            continue;
                        };
                        match self.tilesets.get(ordinal as usize) {
                            Some(tileset) => {
                                found_tile = true;
                                quadrants |= tileset.tile_collision(local);
                            }
                            None => out_of_range += 1,
                        }
                    }

                    if !found_tile {
                        quadrants = QuadrantCollision::all();
                    }
                    grid.mark_tile(x, y, context_index, quadrants);
                }
            }
        }

        if out_of_range > 0 {
            warn!(
                out_of_range,
                tilesets = self.tilesets.len(),
                "tiles reference tilesets that are not loaded"
            );
        }
        debug!(
            contexts = self.tile_contexts.len(),
            layers = collision_layers.len(),
            "computed collision data"
        );
        self.collision_data = grid;
        &self.collision_data
    }
}

#[cfg(test)]
mod tests {
    use crate::map::tests::new_map;
    use crate::{ContextId, MapData, QuadrantCollision, TileRef, Tileset};

    fn map_with_walls() -> MapData {
        let mut map = new_map();
        let mut tileset = Tileset::walkable("Walls", "walls.json");
        tileset.set_tile_collision(1, QuadrantCollision::NORTH_WEST);
        tileset.set_tile_collision(2, QuadrantCollision::SOUTH_EAST);
        map.add_tileset(tileset).unwrap();
        map
    }

    #[test]
    fn test_void_is_blocked() {
        let mut map = map_with_walls();
        let grid = map.compute_collision_data();
        assert_eq!(grid.width(), 64);
        assert_eq!(grid.height(), 48);
        assert!((0..4).all(|i| grid.is_blocked(i % 2, i / 2, 0)));
    }

    #[test]
    fn test_quadrants_are_combined_across_layers() {
        let mut map = map_with_walls();
        map.set_tile(ContextId::BASE, 0, 0, 0, TileRef::from_parts(0, 1))
            .unwrap();
        map.set_tile(ContextId::BASE, 1, 0, 0, TileRef::from_parts(0, 2))
            .unwrap();
        map.set_tile(ContextId::BASE, 0, 1, 0, TileRef::from_parts(0, 0))
            .unwrap();

        let grid = map.compute_collision_data();
        // Tile (0, 0): NW from the ground layer, SE from the middle layer
        assert!(grid.is_blocked(0, 0, 0));
        assert!(!grid.is_blocked(1, 0, 0));
        assert!(!grid.is_blocked(0, 1, 0));
        assert!(grid.is_blocked(1, 1, 0));
        // Tile (1, 0) is fully walkable
        assert_eq!(grid.get(2, 0) | grid.get(3, 0) | grid.get(2, 1) | grid.get(3, 1), 0);
    }

    #[test]
    fn test_layers_without_collision_are_ignored() {
        let mut map = map_with_walls();
        // Sky has collision disabled, so this tile counts as void
        map.set_tile(ContextId::BASE, 2, 0, 0, TileRef::from_parts(0, 0))
            .unwrap();
        let grid = map.compute_collision_data();
        assert!(grid.is_blocked(0, 0, 0));
    }

    #[test]
    fn test_collision_bits_per_context() {
        let mut map = map_with_walls();
        let child = map
            .add_tile_context("Child", Some(ContextId::BASE))
            .unwrap();
        let other = map.add_tile_context("Other", None).unwrap();
        map.set_tile(ContextId::BASE, 0, 0, 0, TileRef::from_parts(0, 0))
            .unwrap();
        map.set_tile(other, 0, 0, 0, TileRef::from_parts(0, 1))
            .unwrap();

        let grid = map.compute_collision_data();
        // Base and the inheriting child see a walkable tile, Other blocks NW
        assert_eq!(grid.get(0, 0), 0b100);
        assert_eq!(grid.get(1, 1), 0);
        assert_eq!(child.index(), Some(1));
        // Elsewhere every context is blocked
        assert_eq!(grid.get(10, 10), 0b111);
    }

    #[test]
    fn test_unloaded_tileset_counts_as_void() {
        let mut map = map_with_walls();
        map.set_tile(ContextId::BASE, 0, 0, 0, TileRef::from_parts(4, 0))
            .unwrap();
        let grid = map.compute_collision_data();
        assert!(grid.is_blocked(1, 1, 0));
    }
}
