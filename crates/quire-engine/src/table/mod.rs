/*!
 * # Table Engine
 *
 * Grid-level operations on tables embedded in a [`Document`]. Nothing in
 * here keeps state between calls: every operation resolves its table from
 * the live document, derives a [`TableMap`] and, when it needs to change
 * anything, returns a [`Transaction`](crate::editing::Transaction) for the
 * host to apply.
 *
 * ## Module Structure
 *
 * - **`map`**: `TableMap` coordinate index, `Rect`, `TableMapCache`
 * - **`selection`**: rectangle algebra over a map (validity, expansion, enumeration)
 * - **`locate`**: resolving document positions and rendered elements to cells
 * - **`moves`**: row/column reordering
 * - **`header`**: header row/column flags and toggling
 * - **`clear`**: clearing cell content
 * - **`resize`**: persisted column widths
 * - **`navigation`**: Tab-order movement between cells
 */

pub mod clear;
pub mod header;
pub mod locate;
pub mod map;
pub mod moves;
pub mod navigation;
pub mod resize;
pub mod selection;

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::editing::{Document, Node};
use crate::error::TableError;

pub use clear::{ClearTarget, clear_content};
pub use header::{HeaderFlags, header_flags, toggle_header};
pub use locate::{CellHit, CellLocation, dom_cell_to_coordinate, find_cell_around};
pub use map::{CellCoord, CellInfo, Direction, Rect, TableMap, TableMapCache};
pub use moves::{can_move, check_move, move_line};
pub use navigation::{TabDirection, go_to_next_cell};
pub use resize::{column_width, set_column_width};
pub use selection::{
    CoveredCell, Region, cell_selection, cells_in, expand_to_valid, is_rectangle_valid,
    line_rect, rectangle_for, select_line, selected_rect, validate_rectangle,
};

/// Row or column, for operations that apply symmetrically to either
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Row,
    Column,
}

impl Orientation {
    /// The line index of `coord` along this orientation
    pub fn index_of(&self, coord: CellCoord) -> usize {
        match self {
            Orientation::Row => coord.row,
            Orientation::Column => coord.col,
        }
    }

    pub fn other(&self) -> Orientation {
        match self {
            Orientation::Row => Orientation::Column,
            Orientation::Column => Orientation::Row,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Row => write!(f, "row"),
            Orientation::Column => write!(f, "column"),
        }
    }
}

/// A table node located in a document together with its map
#[derive(Debug, Clone)]
pub struct ResolvedTable<'a> {
    pub pos: usize,
    pub node: &'a Node,
    pub map: Rc<TableMap>,
}

impl<'a> ResolvedTable<'a> {
    /// Resolve the table starting at `pos`, building its map
    pub fn at(doc: &'a Document, pos: usize) -> Result<Self, TableError> {
        let node = doc
            .node_at(pos)
            .filter(|node| node.is_table())
            .ok_or_else(|| TableError::NotFound(format!("no table at {pos}")))?;
        let map = TableMap::build(node).inspect_err(|problem| {
            log::warn!("table at {pos} is malformed: {problem}");
        })?;
        Ok(Self {
            pos,
            node,
            map: Rc::new(map),
        })
    }

    /// Resolve through a cache keyed by document version
    pub fn cached(
        doc: &'a Document,
        pos: usize,
        cache: &mut TableMapCache,
    ) -> Result<Self, TableError> {
        let map = cache.get(doc, pos)?;
        let node = doc
            .node_at(pos)
            .ok_or_else(|| TableError::NotFound(format!("no table at {pos}")))?;
        Ok(Self { pos, node, map })
    }

    /// Absolute position where the table's content starts
    pub fn start(&self) -> usize {
        self.pos + 1
    }

    /// Absolute position of the cell at a map offset
    pub fn cell_pos(&self, offset: usize) -> usize {
        self.start() + offset
    }

    /// The cell node at a map offset
    pub fn cell_node(&self, offset: usize) -> Option<&'a Node> {
        self.node.node_at(offset).filter(|node| node.is_cell())
    }
}
