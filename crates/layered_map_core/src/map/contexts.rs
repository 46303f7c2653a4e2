//! Tile context list operations and inheritance rules
//!
//! Context ids always equal storage position + 1, so every operation that
//! deletes or reorders contexts renumbers them and rewrites the inheritance
//! ids that pointed at moved contexts.

use super::{clone_name, MapData};
use crate::{ContextId, MapError, TileContext};
use tracing::info;

impl MapData {
    /// Create a context, optionally inheriting from a non-inheriting context.
    ///
    /// An inheriting context starts with every cell `Inherited`.
    pub fn add_tile_context(
        &mut self,
        name: &str,
        inherit_from: Option<ContextId>,
    ) -> Result<ContextId, MapError> {
        self.require_initialized()?;
        self.check_context_capacity()?;
        self.validate_context_name(name)?;
        if let Some(parent) = inherit_from {
            self.check_inheritance_target(parent)?;
        }

        let id = ContextId::from_index(self.tile_contexts.len());
        let mut context = TileContext::new(id, name.to_string(), inherit_from);
        let fill = context.default_fill();
        for _ in 0..self.tile_layer_properties.len() {
            let mut layer = self.empty_tile_layer.clone();
            layer.fill_layer(fill);
            context.add_tile_layer(layer);
        }
        self.tile_contexts.push(context);
        self.modified = true;
        info!(%id, name, "added tile context");
        Ok(id)
    }

    /// Delete a context. Rejected for the last context and for contexts that
    /// another context inherits from.
    pub fn delete_tile_context(&mut self, id: ContextId) -> Result<(), MapError> {
        let index = self.context_index(id)?;
        if self.tile_contexts.len() == 1 {
            return self.reject(MapError::LastContext);
        }
        if self.has_dependents(id) {
            return self.reject(MapError::ContextInherited(id));
        }

        let removed = self.tile_contexts.remove(index);
        for context in &mut self.tile_contexts {
            if let Some(parent) = context.inherited_context_id() {
                if parent > id {
                    context.set_inheriting_context(Some(ContextId(parent.0 - 1)));
                }
            }
        }
        self.renumber_contexts();
        self.modified = true;
        info!(%id, name = removed.name(), "deleted tile context");
        Ok(())
    }

    /// Append a deep copy of a context under a generated name
    pub fn clone_tile_context(&mut self, id: ContextId) -> Result<ContextId, MapError> {
        let index = self.context_index(id)?;
        self.check_context_capacity()?;

        let source = &self.tile_contexts[index];
        let name = clone_name(source.name(), |candidate| {
            self.tile_contexts.iter().any(|c| c.name() == candidate)
        });
        let new_id = ContextId::from_index(self.tile_contexts.len());
        let mut copy = source.clone();
        copy.set_id(new_id);
        copy.set_name(name);

        info!(%new_id, name = copy.name(), "cloned tile context");
        self.tile_contexts.push(copy);
        self.modified = true;
        Ok(new_id)
    }

    pub fn rename_tile_context(&mut self, id: ContextId, name: &str) -> Result<(), MapError> {
        let index = self.context_index(id)?;
        if self.tile_contexts[index].name() == name {
            return Ok(());
        }
        self.validate_context_name(name)?;

        self.tile_contexts[index].set_name(name.to_string());
        self.modified = true;
        Ok(())
    }

    /// Change which context `id` inherits from.
    ///
    /// `None` stops inheriting and turns every inherited cell empty. A context
    /// may only inherit from a non-inheriting context, and a context that
    /// others inherit from may not start inheriting itself.
    pub fn change_inheritance_tile_context(
        &mut self,
        id: ContextId,
        inherit_from: Option<ContextId>,
    ) -> Result<(), MapError> {
        let index = self.context_index(id)?;
        if self.tile_contexts[index].inherited_context_id() == inherit_from {
            return Ok(());
        }
        if let Some(parent) = inherit_from {
            if parent == id {
                return self.reject(MapError::InheritFromSelf(id));
            }
            self.check_inheritance_target(parent)?;
            if self.has_dependents(id) {
                return self.reject(MapError::ContextHasDependents(id));
            }
        }

        self.tile_contexts[index].set_inheriting_context(inherit_from);
        self.modified = true;
        Ok(())
    }

    /// Exchange the positions of two contexts.
    ///
    /// Ids follow positions, and every context that inherited from one of the
    /// two now inherits from its new id.
    pub fn swap_tile_contexts(
        &mut self,
        first: ContextId,
        second: ContextId,
    ) -> Result<(), MapError> {
        let first_index = self.context_index(first)?;
        let second_index = self.context_index(second)?;
        if first == second {
            return self.reject(MapError::SameContext);
        }

        self.tile_contexts.swap(first_index, second_index);
        for context in &mut self.tile_contexts {
            match context.inherited_context_id() {
                Some(parent) if parent == first => context.set_inheriting_context(Some(second)),
                Some(parent) if parent == second => context.set_inheriting_context(Some(first)),
                _ => {}
            }
        }
        self.renumber_contexts();
        self.modified = true;
        Ok(())
    }

    /// True if any context inherits from `id`
    pub fn has_dependents(&self, id: ContextId) -> bool {
        self.tile_contexts
            .iter()
            .any(|c| c.inherited_context_id() == Some(id))
    }

    fn renumber_contexts(&mut self) {
        for (index, context) in self.tile_contexts.iter_mut().enumerate() {
            context.set_id(ContextId::from_index(index));
        }
    }

    fn check_context_capacity(&mut self) -> Result<(), MapError> {
        let limit = self.config.context_limit();
        if self.tile_contexts.len() >= limit {
            return self.reject(MapError::ContextLimitReached(limit));
        }
        Ok(())
    }

    fn check_inheritance_target(&mut self, parent: ContextId) -> Result<(), MapError> {
        let index = self.context_index(parent)?;
        if self.tile_contexts[index].is_inheriting_context() {
            return self.reject(MapError::InheritFromInheritingContext(parent));
        }
        Ok(())
    }

    fn validate_context_name(&mut self, name: &str) -> Result<(), MapError> {
        if name.is_empty() {
            return self.reject(MapError::EmptyName);
        }
        if self.find_tile_context_by_name(name).is_some() {
            return self.reject(MapError::DuplicateContextName(name.to_string()));
        }
        Ok(())
    }
}
