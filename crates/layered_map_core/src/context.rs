//! Tile contexts - map variants sharing geometry but not content

use crate::{TileLayer, TileRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Identifier of a tile context. Ids are 1-based and always match storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContextId(pub u32);

impl ContextId {
    /// The first (base) context of every map
    pub const BASE: ContextId = ContextId(1);

    /// Id of the context stored at `index`
    pub fn from_index(index: usize) -> Self {
        ContextId(index as u32 + 1)
    }

    /// Storage index of this context. Id 0 has no valid index.
    pub fn index(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One variant of the map: an ordered set of tile layers plus optional inheritance
///
/// Layers are index-aligned with the map's `TileLayerProperties`. Only `MapData`
/// may change the layer set so that every context keeps the same layer count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileContext {
    id: ContextId,
    name: String,
    inherited_context: Option<ContextId>,
    tile_layers: Vec<TileLayer>,
}

impl TileContext {
    pub(crate) fn new(id: ContextId, name: String, inherited_context: Option<ContextId>) -> Self {
        Self {
            id,
            name,
            inherited_context,
            tile_layers: Vec::new(),
        }
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_inheriting_context(&self) -> bool {
        self.inherited_context.is_some()
    }

    pub fn inherited_context_id(&self) -> Option<ContextId> {
        self.inherited_context
    }

    pub fn tile_layers(&self) -> &[TileLayer] {
        &self.tile_layers
    }

    pub fn tile_layer(&self, index: usize) -> Option<&TileLayer> {
        self.tile_layers.get(index)
    }

    pub fn tile_layer_count(&self) -> usize {
        self.tile_layers.len()
    }

    /// Tile stored in this context, without resolving inheritance
    pub fn get_tile(&self, layer_index: usize, x: u32, y: u32) -> TileRef {
        self.tile_layers
            .get(layer_index)
            .map(|layer| layer.get_tile(x, y))
            .unwrap_or(TileRef::Empty)
    }

    /// Value newly created cells of this context start with
    pub fn default_fill(&self) -> TileRef {
        if self.is_inheriting_context() {
            TileRef::Inherited
        } else {
            TileRef::Empty
        }
    }

    pub(crate) fn tile_layer_mut(&mut self, index: usize) -> Option<&mut TileLayer> {
        self.tile_layers.get_mut(index)
    }

    pub(crate) fn tile_layers_mut(&mut self) -> &mut [TileLayer] {
        &mut self.tile_layers
    }

    pub(crate) fn set_id(&mut self, id: ContextId) {
        self.id = id;
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Change the inherited context.
    ///
    /// Clearing inheritance turns every `Inherited` cell into `Empty` so no layer
    /// keeps a reference to a context it no longer follows.
    pub(crate) fn set_inheriting_context(&mut self, inherited_context: Option<ContextId>) {
        self.inherited_context = inherited_context;
        if inherited_context.is_none() {
            for layer in &mut self.tile_layers {
                layer.replace_tiles(TileRef::Inherited, TileRef::Empty);
            }
        }
    }

    /// Append a layer. Rejected if its size differs from the existing layers.
    pub(crate) fn add_tile_layer(&mut self, layer: TileLayer) -> bool {
        if let Some(first) = self.tile_layers.first() {
            if first.width() != layer.width() || first.height() != layer.height() {
                warn!(
                    context = %self.name,
                    expected_width = first.width(),
                    expected_height = first.height(),
                    width = layer.width(),
                    height = layer.height(),
                    "rejected tile layer with mismatched dimensions"
                );
                return false;
            }
        }
        self.tile_layers.push(layer);
        true
    }

    pub(crate) fn remove_tile_layer(&mut self, index: usize) -> Option<TileLayer> {
        if index < self.tile_layers.len() {
            Some(self.tile_layers.remove(index))
        } else {
            warn!(context = %self.name, index, "no tile layer to remove");
            None
        }
    }

    /// Append a copy of the layer at `index`
    pub(crate) fn clone_tile_layer(&mut self, index: usize) -> bool {
        match self.tile_layers.get(index) {
            Some(layer) => {
                let copy = layer.clone();
                self.tile_layers.push(copy);
                true
            }
            None => {
                warn!(context = %self.name, index, "no tile layer to clone");
                false
            }
        }
    }

    pub(crate) fn swap_tile_layers(&mut self, first: usize, second: usize) -> bool {
        if first >= self.tile_layers.len() || second >= self.tile_layers.len() {
            warn!(context = %self.name, first, second, "tile layer swap out of range");
            return false;
        }
        self.tile_layers.swap(first, second);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with_layers(count: usize) -> TileContext {
        let mut context = TileContext::new(ContextId(1), "Base".to_string(), None);
        for i in 0..count {
            let mut layer = TileLayer::new(4, 4);
            layer.set_tile(0, 0, TileRef::Tile(i as u32));
            assert!(context.add_tile_layer(layer));
        }
        context
    }

    #[test]
    fn test_context_id_index() {
        assert_eq!(ContextId(1).index(), Some(0));
        assert_eq!(ContextId(0).index(), None);
        assert_eq!(ContextId::from_index(4), ContextId(5));
    }

    #[test]
    fn test_rejects_mismatched_layer() {
        let mut context = context_with_layers(1);
        assert!(!context.add_tile_layer(TileLayer::new(5, 4)));
        assert_eq!(context.tile_layer_count(), 1);
    }

    #[test]
    fn test_clearing_inheritance_removes_inherited_tiles() {
        let mut context = TileContext::new(ContextId(2), "Night".to_string(), Some(ContextId(1)));
        assert!(context.add_tile_layer(TileLayer::filled(3, 3, TileRef::Inherited)));
        context.tile_layer_mut(0).unwrap().set_tile(1, 1, TileRef::Tile(9));
        assert_eq!(context.default_fill(), TileRef::Inherited);

        context.set_inheriting_context(None);
        assert!(!context.is_inheriting_context());
        let layer = context.tile_layer(0).unwrap();
        assert_eq!(layer.count_matching(TileRef::Inherited), 0);
        assert_eq!(layer.get_tile(1, 1), TileRef::Tile(9));
    }

    #[test]
    fn test_layer_mutators() {
        let mut context = context_with_layers(3);
        assert!(context.swap_tile_layers(0, 2));
        assert_eq!(context.get_tile(0, 0, 0), TileRef::Tile(2));
        assert!(context.clone_tile_layer(0));
        assert_eq!(context.get_tile(3, 0, 0), TileRef::Tile(2));
        assert!(context.remove_tile_layer(1).is_some());
        assert_eq!(context.tile_layer_count(), 3);
        assert!(!context.swap_tile_layers(0, 3));
        assert!(context.remove_tile_layer(3).is_none());
    }
}
