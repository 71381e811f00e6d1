//! Capabilities the engine needs from the rendering layer.
//!
//! The engine never touches rendered elements directly. It asks the host to
//! hit-test pointer coordinates, to map an element back to a document
//! position, and to show or hide decorations. Any rendering technology that
//! can answer these questions can drive the controllers in
//! [`interaction`](crate::interaction).

use serde::{Deserialize, Serialize};

use crate::table::Orientation;

/// Opaque handle to a rendered element, issued by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u64);

/// Opaque handle to a decoration the host is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DecorationHandle(pub u64);

/// Pointer coordinates, in the same space as [`Bounds`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The coordinate that moves along `orientation`'s drag axis
    pub fn along(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Row => self.y,
            Orientation::Column => self.x,
        }
    }
}

/// Distance a clamped point keeps from the excluded right and bottom edges
pub const CLAMP_INSET: f32 = 0.5;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.left..self.right).contains(&point.x) && (self.top..self.bottom).contains(&point.y)
    }

    /// Nearest point inside the box.
    ///
    /// The right and bottom edges are outside (see [`Bounds::contains`]), so
    /// points beyond them are pulled in by [`CLAMP_INSET`].
    pub fn clamp(&self, point: Point) -> Point {
        Point {
            x: point.x.clamp(self.left, (self.right - CLAMP_INSET).max(self.left)),
            y: point.y.clamp(self.top, (self.bottom - CLAMP_INSET).max(self.top)),
        }
    }

    /// Leading edge along `orientation`'s drag axis
    pub fn start_along(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Row => self.top,
            Orientation::Column => self.left,
        }
    }
}

/// Which part of a cell the pointer is over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    Cell,
    /// Drag handle for the cell's row
    RowHandle,
    /// Drag handle for the cell's column
    ColumnHandle,
}

/// Result of hit-testing a pointer position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    /// The cell element under the pointer (for handles, the cell they belong to)
    pub element: ElementId,
    pub region: HitRegion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DecorationKind {
    /// Drag handle shown on the hovered cell's row
    RowHandle,
    /// Drag handle shown on the hovered cell's column
    ColumnHandle,
    /// Line marking where a dragged row/column will land
    DropIndicator {
        orientation: Orientation,
        side: Side,
    },
    /// Highlight on a column border that can be dragged
    ColumnResizeHandle,
    /// Live width while a column border is being dragged
    ColumnResizePreview { width: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DecorationTarget {
    /// Attached to the node at a document position
    Position(usize),
    /// Free-floating overlay
    Rect(Bounds),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub target: DecorationTarget,
}

/// Rendering-side collaborator used by the interaction controllers
pub trait HostView {
    /// Document position at (or just inside) the node `element` renders,
    /// or `None` if the element is no longer part of the document
    fn resolve_position(&self, element: ElementId) -> Option<usize>;

    fn hit_test(&self, point: Point) -> Option<Hit>;

    fn element_bounds(&self, element: ElementId) -> Option<Bounds>;

    /// Bounding box of the table starting at `table_pos`
    fn table_bounds(&self, table_pos: usize) -> Option<Bounds>;

    fn request_decoration(&mut self, decoration: Decoration) -> DecorationHandle;

    fn clear_decoration(&mut self, handle: DecorationHandle);
}
