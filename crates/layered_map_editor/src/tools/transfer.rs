//! Copy or move the selected tiles to another layer or context

use super::LayerTarget;
use crate::selection::SelectionArea;
use layered_map_core::{MapData, MapError, TileRef};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransferMode {
    #[default]
    Copy,
    /// Copy, then clear the source cells
    Move,
}

/// Outcome of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferReport {
    /// Cells written to the destination
    pub transferred: usize,
    /// Inherited cells written as empty because the destination does not inherit
    pub discarded_inherited: usize,
}

impl TransferReport {
    /// True when some inherited cells could not be carried over
    pub fn is_partial(&self) -> bool {
        self.discarded_inherited > 0
    }
}

/// Copy every selected cell of `from` into the same position of `to`.
///
/// `Inherited` cells copied into a context that does not inherit become
/// `Empty` and are counted in the report. `TransferMode::Move` clears the
/// source cells afterwards.
pub fn transfer_selection(
    map: &mut MapData,
    selection: &SelectionArea,
    from: LayerTarget,
    to: LayerTarget,
    mode: TransferMode,
) -> Result<TransferReport, MapError> {
    map.validate_tile_layer(from.context, from.layer)?;
    map.validate_tile_layer(to.context, to.layer)?;
    if from == to || !selection.is_active() {
        return Ok(TransferReport::default());
    }

    let destination_inherits = map
        .find_tile_context_by_id(to.context)
        .is_some_and(|c| c.is_inheriting_context());
    let cells: Vec<((u32, u32), TileRef)> = selection
        .selected_cells()
        .into_iter()
        .map(|(x, y)| ((x, y), map.get_tile(from.context, from.layer, x, y)))
        .collect();

    let mut report = TransferReport::default();
    if let Some(layer) = map.tile_layer_mut(to.context, to.layer) {
        for &((x, y), tile) in &cells {
            let tile = if tile.is_inherited() && !destination_inherits {
                report.discarded_inherited += 1;
                TileRef::Empty
            } else {
                tile
            };
            layer.set_tile(x, y, tile);
            report.transferred += 1;
        }
    }

    if mode == TransferMode::Move {
        if let Some(layer) = map.tile_layer_mut(from.context, from.layer) {
            for &((x, y), _) in &cells {
                layer.set_tile(x, y, TileRef::Empty);
            }
        }
    }

    map.set_map_modified(true);
    if report.is_partial() {
        warn!(
            discarded = report.discarded_inherited,
            context = %to.context,
            "inherited tiles can not be copied into a context that does not inherit"
        );
    }
    info!(
        ?mode,
        transferred = report.transferred,
        from_context = %from.context,
        to_context = %to.context,
        "transferred selection"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionMode;
    use layered_map_core::ContextId;

    fn setup() -> (MapData, SelectionArea, ContextId) {
        let mut map = MapData::default();
        map.create_data(32, 24).unwrap();
        let night = map
            .add_tile_context("Night", Some(ContextId::BASE))
            .unwrap();
        map.set_tile(night, 0, 0, 0, TileRef::Tile(4)).unwrap();
        let mut selection = SelectionArea::new(32, 24);
        selection.select_rectangle((0, 0), (1, 0), SelectionMode::Normal);
        (map, selection, night)
    }

    #[test]
    fn test_copy_to_other_layer() {
        let (mut map, selection, night) = setup();
        let report = transfer_selection(
            &mut map,
            &selection,
            LayerTarget::new(night, 0),
            LayerTarget::new(night, 2),
            TransferMode::Copy,
        )
        .unwrap();
        assert_eq!(report.transferred, 2);
        assert!(!report.is_partial());
        assert_eq!(map.get_tile(night, 2, 0, 0), TileRef::Tile(4));
        assert_eq!(map.get_tile(night, 2, 1, 0), TileRef::Inherited);
        assert_eq!(map.get_tile(night, 0, 0, 0), TileRef::Tile(4));
    }

    #[test]
    fn test_move_to_non_inheriting_context() {
        let (mut map, selection, night) = setup();
        let report = transfer_selection(
            &mut map,
            &selection,
            LayerTarget::new(night, 0),
            LayerTarget::new(ContextId::BASE, 0),
            TransferMode::Move,
        )
        .unwrap();
        assert_eq!(report.discarded_inherited, 1);
        assert!(report.is_partial());
        assert_eq!(map.get_tile(ContextId::BASE, 0, 0, 0), TileRef::Tile(4));
        assert_eq!(map.get_tile(ContextId::BASE, 0, 1, 0), TileRef::Empty);
        assert_eq!(map.get_tile(night, 0, 0, 0), TileRef::Empty);
        // Cells outside the selection are untouched
        assert_eq!(map.get_tile(night, 0, 2, 0), TileRef::Inherited);
    }

    #[test]
    fn test_transfer_validates_targets() {
        let (mut map, selection, night) = setup();
        assert_eq!(
            transfer_selection(
                &mut map,
                &selection,
                LayerTarget::new(night, 0),
                LayerTarget::new(ContextId(7), 0),
                TransferMode::Copy,
            ),
            Err(MapError::ContextNotFound(ContextId(7)))
        );
        let same = LayerTarget::new(night, 1);
        assert_eq!(
            transfer_selection(&mut map, &selection, same, same, TransferMode::Move),
            Ok(TransferReport::default())
        );
    }
}
