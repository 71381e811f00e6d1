/*!
 * # Pointer Controllers
 *
 * Stateful controllers that turn pointer and keyboard events into table
 * operations. Each controller owns its own state; nothing is shared through
 * globals, so an editor can run one controller per view.
 *
 * Controllers never trust what they remembered from an earlier event. The
 * table is looked up again by its [`TableId`](crate::editing::TableId) on
 * every event, and any mismatch with the live document ends the gesture
 * with a [`CancelReason`](crate::error::CancelReason).
 *
 * ## Module Structure
 *
 * - **`drag`**: `DragController`, drag-to-reorder of rows and columns
 * - **`resize`**: `ColumnResizer`, dragging column borders
 */

pub mod drag;
pub mod resize;

pub use drag::{Drag, DragController, DragOutcome, DragState, Hover};
pub use resize::{ColumnResizer, ResizeOutcome, ResizeState};

/// Keys the controllers react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}
