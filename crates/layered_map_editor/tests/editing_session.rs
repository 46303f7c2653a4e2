//! Editing sessions driven through EditorState, as a frontend would

use layered_map_core::{ContextId, MapData, MapDocument, TileRef, Tileset};
use layered_map_editor::{
    EditorState, EditorTool, LayerTarget, SelectionMode, TileBrush, ToolMode, TransferMode,
};

fn town() -> MapData {
    let mut map = MapData::default();
    map.create_data(32, 24).unwrap();
    map.add_tileset(Tileset::walkable("Town", "town.json"))
        .unwrap();
    map
}

#[test]
fn test_paint_insert_row_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("town.map.json");

    let mut map = town();
    let mut editor = EditorState::new(&map);
    editor.current_tool = EditorTool::Paint;
    editor.brush = TileBrush::single(TileRef::from_parts(0, 5));
    editor.press(&mut map, 0, 0).unwrap();
    editor.release(&mut map, 0, 0).unwrap();

    map.insert_tile_layer_rows(0, 1).unwrap();
    editor.sync_with_map(&map);
    assert_eq!(editor.selection.height(), 25);
    assert_eq!(map.get_tile(ContextId::BASE, 0, 0, 1), TileRef::from_parts(0, 5));

    map.to_document().unwrap().save(&path).unwrap();
    let document = MapDocument::load(&path).unwrap();
    assert_eq!(document.height, 25);
    assert_eq!(document.contexts[0].layers[0][1][0], 5);
}

#[test]
fn test_night_variant_workflow() {
    let mut map = town();
    let night = map
        .add_tile_context("Night", Some(ContextId::BASE))
        .unwrap();
    let mut editor = EditorState::new(&map);

    // Ground of the base context
    editor.current_tool = EditorTool::Fill;
    editor.brush = TileBrush::single(TileRef::from_parts(0, 1));
    editor.press(&mut map, 10, 10).unwrap();

    // Night overrides a rectangle, then restores part of it from the base
    editor.selected_context = night;
    editor.current_tool = EditorTool::Paint;
    editor.tool_mode = ToolMode::Rectangle;
    editor.brush = TileBrush::single(TileRef::from_parts(0, 2));
    editor.press(&mut map, 0, 0).unwrap();
    editor.release(&mut map, 3, 3).unwrap();

    editor.current_tool = EditorTool::Inherit;
    editor.press(&mut map, 0, 0).unwrap();
    editor.release(&mut map, 1, 3).unwrap();

    assert_eq!(map.resolved_tile(night, 0, 0, 0), TileRef::from_parts(0, 1));
    assert_eq!(map.resolved_tile(night, 0, 2, 0), TileRef::from_parts(0, 2));
    assert_eq!(map.resolved_tile(night, 0, 20, 20), TileRef::from_parts(0, 1));

    // Copy the night overrides onto the base context
    editor.current_tool = EditorTool::Select;
    editor.selection_mode = SelectionMode::Normal;
    editor.press(&mut map, 0, 0).unwrap();
    editor.release(&mut map, 3, 3).unwrap();
    let report = editor
        .transfer_selection(
            &mut map,
            LayerTarget::new(ContextId::BASE, 1),
            TransferMode::Copy,
        )
        .unwrap();
    assert_eq!(report.transferred, 16);
    assert_eq!(report.discarded_inherited, 8);
    assert_eq!(map.get_tile(ContextId::BASE, 1, 3, 3), TileRef::from_parts(0, 2));
    assert_eq!(map.get_tile(ContextId::BASE, 1, 0, 0), TileRef::Empty);
}

#[test]
fn test_deleting_selected_context_resets_editor() {
    let mut map = town();
    let dusk = map.add_tile_context("Dusk", None).unwrap();
    let mut editor = EditorState::new(&map);
    editor.selected_context = dusk;

    map.delete_tile_context(dusk).unwrap();
    editor.sync_with_map(&map);
    assert_eq!(editor.selected_context, ContextId::BASE);
}
