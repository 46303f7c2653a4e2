//! Editor session state
//!
//! `EditorState` turns pointer events, given as tile coordinates, into tool
//! operations on a `MapData`. It owns the selection and the preview overlay;
//! neither is ever written into the map.

use crate::preferences::EditorPreferences;
use crate::rect::TileRect;
use crate::selection::{SelectionArea, SelectionMode};
use crate::tools::{
    bresenham_line, erase_rectangle, erase_tiles, fill_area, inherit_rectangle, inherit_tiles,
    paint_rectangle, paint_tiles, swap_tiles, transfer_selection, LayerTarget, StrokeScope,
    TileBrush, TransferMode, TransferReport,
};
use layered_map_core::{ContextId, MapData, MapError, TileLayer, TileRef};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Available editor tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditorTool {
    #[default]
    Select,
    Paint,
    Erase,
    /// Mark cells as inherited from the parent context
    Inherit,
    Fill,
    Swap,
}

impl EditorTool {
    pub const ALL: [EditorTool; 6] = [
        EditorTool::Select,
        EditorTool::Paint,
        EditorTool::Erase,
        EditorTool::Inherit,
        EditorTool::Fill,
        EditorTool::Swap,
    ];

    /// Returns true if this tool supports Point/Rectangle modes
    pub fn supports_modes(&self) -> bool {
        matches!(
            self,
            EditorTool::Select | EditorTool::Paint | EditorTool::Erase | EditorTool::Inherit
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditorTool::Select => "Select",
            EditorTool::Paint => "Paint",
            EditorTool::Erase => "Erase",
            EditorTool::Inherit => "Inherit",
            EditorTool::Fill => "Fill",
            EditorTool::Swap => "Swap",
        }
    }
}

/// Tool mode for painting and selecting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    /// Brush strokes follow the pointer; a click with Select picks a matching region
    #[default]
    Point,
    /// Drag to define a rectangle, applied on release
    Rectangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stroke {
    origin: (u32, u32),
    last: (u32, u32),
    scope: StrokeScope,
}

/// Editing session for one map
#[derive(Debug, Clone)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct EditorState {
    pub selected_context: ContextId,
    pub selected_layer: usize,
    pub current_tool: EditorTool,
    pub tool_mode: ToolMode,
    pub selection_mode: SelectionMode,
    pub brush: TileBrush,
    pub selection: SelectionArea,
    /// Pending stroke overlay: brush tiles for Paint, `Selected` markers otherwise
    preview: TileLayer,
    stroke: Option<Stroke>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            selected_context: ContextId::BASE,
            selected_layer: 0,
            current_tool: EditorTool::default(),
            tool_mode: ToolMode::default(),
            selection_mode: SelectionMode::default(),
            brush: TileBrush::default(),
            selection: SelectionArea::default(),
            preview: TileLayer::default(),
            stroke: None,
        }
    }
}

impl EditorState {
    /// Session sized for `map`
    pub fn new(map: &MapData) -> Self {
        let mut state = Self::default();
        state.sync_with_map(map);
        state
    }

    /// Session sized for `map`, starting with the preferred tool and selection mode
    pub fn from_preferences(map: &MapData, preferences: &EditorPreferences) -> Self {
        let mut state = Self::new(map);
        state.current_tool = preferences.default_tool;
        state.selection_mode = preferences.default_selection_mode;
        state
    }

    /// The layer tools currently edit
    pub fn target(&self) -> LayerTarget {
        LayerTarget::new(self.selected_context, self.selected_layer)
    }

    pub fn preview(&self) -> &TileLayer {
        &self.preview
    }

    pub fn is_stroke_active(&self) -> bool {
        self.stroke.is_some()
    }

    /// Bring overlays and selections back in line with the map after a
    /// structural change.
    ///
    /// A size change drops the selection. A deleted context or layer moves the
    /// selection to the base context or the last layer.
    pub fn sync_with_map(&mut self, map: &MapData) {
        let (length, height) = (map.map_length(), map.map_height());
        if self.selection.width() != length || self.selection.height() != height {
            self.selection.resize(length, height);
            self.preview = TileLayer::new(length, height);
            self.stroke = None;
        }
        if map.find_tile_context_by_id(self.selected_context).is_none() {
            self.selected_context = ContextId::BASE;
        }
        if self.selected_layer >= map.tile_layer_count() {
            self.selected_layer = map.tile_layer_count().saturating_sub(1);
        }
    }

    /// Pointer pressed on a tile
    pub fn press(&mut self, map: &mut MapData, x: u32, y: u32) -> Result<(), MapError> {
        if x >= map.map_length() || y >= map.map_height() {
            return Ok(());
        }
        self.cancel();
        let scope = StrokeScope::from_press(&self.selection, x, y);

        // A rejected press leaves no stroke behind
        match self.current_tool {
            EditorTool::Fill => {
                let tile = self.brush.tile_at(0, 0);
                fill_area(
                    map,
                    self.selected_context,
                    self.selected_layer,
                    &self.selection,
                    x,
                    y,
                    tile,
                )?;
                return Ok(());
            }
            EditorTool::Paint | EditorTool::Erase | EditorTool::Inherit
                if self.tool_mode == ToolMode::Point =>
            {
                self.apply_point(map, (x, y), scope)?;
            }
            _ => {}
        }
        self.stroke = Some(Stroke {
            origin: (x, y),
            last: (x, y),
            scope,
        });
        self.update_preview();
        Ok(())
    }

    /// Pointer moved while pressed
    pub fn drag(&mut self, map: &mut MapData, x: u32, y: u32) -> Result<(), MapError> {
        let Some(mut stroke) = self.stroke else {
            return Ok(());
        };
        let current = clamp_to_map(map, x, y);
        if current == stroke.last {
            return Ok(());
        }

        let point_stroke = self.tool_mode == ToolMode::Point
            && matches!(
                self.current_tool,
                EditorTool::Paint | EditorTool::Erase | EditorTool::Inherit
            );
        let previous = stroke.last;
        stroke.last = current;
        self.stroke = Some(stroke);

        if point_stroke {
            for point in bresenham_line(previous, current).into_iter().skip(1) {
                self.apply_point(map, point, stroke.scope)?;
            }
        }
        self.update_preview();
        Ok(())
    }

    /// Pointer released, finishing the stroke
    pub fn release(&mut self, map: &mut MapData, x: u32, y: u32) -> Result<(), MapError> {
        let Some(stroke) = self.stroke.take() else {
            return Ok(());
        };
        self.preview.clear_layer();
        let current = clamp_to_map(map, x, y);
        let rect = TileRect::from_corners(stroke.origin, current);
        let target = self.target();

        match (self.current_tool, self.tool_mode) {
            (EditorTool::Select, ToolMode::Point) if current == stroke.origin => {
                if let Some(layer) = map.tile_layer(self.selected_context, self.selected_layer) {
                    self.selection
                        .select_matching_region(layer, current.0, current.1, self.selection_mode);
                }
            }
            (EditorTool::Select, _) => {
                self.selection
                    .select_rectangle(stroke.origin, current, self.selection_mode);
            }
            (EditorTool::Paint, ToolMode::Rectangle) => {
                paint_rectangle(map, target, &self.selection, stroke.scope, rect, &self.brush)?;
            }
            (EditorTool::Erase, ToolMode::Rectangle) => {
                erase_rectangle(map, target, &self.selection, stroke.scope, rect)?;
            }
            (EditorTool::Inherit, ToolMode::Rectangle) => {
                inherit_rectangle(map, target, &self.selection, stroke.scope, rect)?;
            }
            (EditorTool::Swap, _) => {
                swap_tiles(map, target, &mut self.selection, stroke.origin, current)?;
            }
            _ => {}
        }
        debug!(tool = self.current_tool.name(), ?current, "stroke finished");
        Ok(())
    }

    /// Abandon the current stroke. Edits already applied by point strokes stay.
    pub fn cancel(&mut self) {
        self.stroke = None;
        self.preview.clear_layer();
    }

    /// Copy or move the selected cells of the current layer to another layer or context
    pub fn transfer_selection(
        &self,
        map: &mut MapData,
        to: LayerTarget,
        mode: TransferMode,
    ) -> Result<TransferReport, MapError> {
        transfer_selection(map, &self.selection, self.target(), to, mode)
    }

    fn apply_point(
        &self,
        map: &mut MapData,
        point: (u32, u32),
        scope: StrokeScope,
    ) -> Result<usize, MapError> {
        let target = self.target();
        match self.current_tool {
            EditorTool::Paint => {
                paint_tiles(map, target, &self.selection, scope, point, &self.brush)
            }
            EditorTool::Erase => {
                erase_tiles(map, target, &self.selection, scope, point, &self.brush)
            }
            EditorTool::Inherit => {
                inherit_tiles(map, target, &self.selection, scope, point, &self.brush)
            }
            _ => Ok(0),
        }
    }

    fn update_preview(&mut self) {
        self.preview.clear_layer();
        let Some(stroke) = self.stroke else {
            return;
        };
        let area = match (self.current_tool, self.tool_mode) {
            (EditorTool::Paint | EditorTool::Erase | EditorTool::Inherit, ToolMode::Point) => {
                TileRect::from_corners(
                    stroke.last,
                    (
                        stroke.last.0.saturating_add(self.brush.width() - 1),
                        stroke.last.1.saturating_add(self.brush.height() - 1),
                    ),
                )
            }
            (EditorTool::Swap, _) => TileRect::single(stroke.last.0, stroke.last.1),
            _ => TileRect::from_corners(stroke.origin, stroke.last),
        };
        let Some(area) = area.clamp_to(self.preview.width(), self.preview.height()) else {
            return;
        };
        for (x, y) in area.cells() {
            let tile = if self.current_tool == EditorTool::Paint {
                self.brush.tile_at(x - area.min_x, y - area.min_y)
            } else {
                TileRef::Selected
            };
            self.preview.set_tile(x, y, tile);
        }
    }
}

fn clamp_to_map(map: &MapData, x: u32, y: u32) -> (u32, u32) {
    (
        x.min(map.map_length().saturating_sub(1)),
        y.min(map.map_height().saturating_sub(1)),
    )
}
