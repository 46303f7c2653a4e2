//! layered_map_editor - Editing tools for layered, context-aware tile maps
//!
//! This crate provides the editing layer on top of `layered_map_core`:
//! - Rectangle and magic-wand selection with normal/additive/subtractive modes
//! - Bucket fill bounded by tile values or by the selection
//! - Multi-tile paint, erase and inherit strokes that respect the selection
//! - Swapping blocks of tiles, including overlapping moves
//! - Copying or moving the selection to another layer or context
//! - An editor session that turns pointer events into those operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use layered_map_editor::layered_map_core::{MapData, TileRef};
//! use layered_map_editor::{EditorState, EditorTool, TileBrush};
//!
//! let mut map = MapData::default();
//! map.create_data(32, 24)?;
//!
//! let mut editor = EditorState::new(&map);
//! editor.current_tool = EditorTool::Paint;
//! editor.brush = TileBrush::single(TileRef::from_parts(0, 17));
//! editor.press(&mut map, 3, 4)?;
//! editor.release(&mut map, 3, 4)?;
//! ```

pub mod preferences;
pub mod rect;
pub mod selection;
pub mod state;
pub mod tools;

pub use layered_map_core;

pub use preferences::{EditorPreferences, PreferencesError, MAX_RECENT_MAPS};
pub use rect::TileRect;
pub use selection::{SelectionArea, SelectionMode};
pub use state::{EditorState, EditorTool, ToolMode};
pub use tools::{LayerTarget, StrokeScope, TileBrush, TransferMode, TransferReport};
