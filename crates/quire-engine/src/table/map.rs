//! # Coordinate Index
//!
//! Flattens a table node into a row-major grid of cell offsets. Offsets are
//! relative to the start of the table's content, so the absolute position
//! of a cell is `table_pos + 1 + offset`.
//!
//! ```text
//! ┌───────┬───┐      map (width 2, height 2)
//! │ A     │ B │      [ A, B,
//! │ (2x1) ├───┤        A, C ]
//! │       │ C │
//! └───────┴───┘
//! ```
//!
//! Every coordinate covered by a merged cell holds that cell's offset, so
//! two neighbouring entries are equal exactly when a span joins them.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde::Serialize;

use crate::editing::{Document, Node};
use crate::error::{TableError, TableProblem};

/// Half-open rectangle of grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl Rect {
    pub fn new(top: usize, left: usize, bottom: usize, right: usize) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn height(&self) -> usize {
        self.bottom.saturating_sub(self.top)
    }

    pub fn width(&self) -> usize {
        self.right.saturating_sub(self.left)
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.top..self.bottom).contains(&row) && (self.left..self.right).contains(&col)
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.top <= other.top
            && self.left <= other.left
            && self.bottom >= other.bottom
            && self.right >= other.right
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.top < other.bottom
            && other.top < self.bottom
            && self.left < other.right
            && other.left < self.right
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            top: self.top.min(other.top),
            left: self.left.min(other.left),
            bottom: self.bottom.max(other.bottom),
            right: self.right.max(other.right),
        }
    }
}

/// A (row, column) coordinate in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// The cell covering a coordinate: its offset and the full span it occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellInfo {
    pub offset: usize,
    pub span: Rect,
}

/// Direction for merge-aware neighbour lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Immutable grid index of a single table node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMap {
    width: usize,
    height: usize,
    map: Vec<usize>,
    /// Span of every cell, keyed by offset
    spans: HashMap<usize, Rect>,
}

impl TableMap {
    /// Index a table node.
    ///
    /// Runs in O(height * width) and fails when the cells do not exactly
    /// tile the grid.
    pub fn build(table: &Node) -> Result<Self, TableProblem> {
        if !table.is_table() {
            return Err(TableProblem::NotATable);
        }

        let height = table.content.len();
        let width = find_width(table)?;
        let mut slots: Vec<Option<usize>> = vec![None; width * height];
        let mut spans = HashMap::new();

        let mut pos = 0;
        for (row, row_node) in table.content.iter().enumerate() {
            pos += 1;
            let mut col = 0;
            for cell in &row_node.content {
                let attrs = cell
                    .cell_attrs()
                    .ok_or(TableProblem::NotACell { row, offset: pos })?;

                while col < width && slots[row * width + col].is_some() {
                    col += 1;
                }
                if row + attrs.rowspan > height {
                    return Err(TableProblem::OverlongRowspan { offset: pos });
                }
                for r in row..row + attrs.rowspan {
                    for c in col..col + attrs.colspan {
                        let slot = slots
                            .get_mut(r * width + c)
                            .filter(|_| c < width)
                            .ok_or(TableProblem::Collision { row: r, col: c })?;
                        if slot.is_some() {
                            return Err(TableProblem::Collision { row: r, col: c });
                        }
                        *slot = Some(pos);
                    }
                }
                spans.insert(
                    pos,
                    Rect::new(row, col, row + attrs.rowspan, col + attrs.colspan),
                );

                col += attrs.colspan;
                pos += cell.size();
            }
            pos += 1;
        }

        let map = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or(TableProblem::Missing {
                    row: index / width,
                    col: index % width,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            width,
            height,
            map,
            spans,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of lines in the given orientation
    pub fn line_count(&self, orientation: super::Orientation) -> usize {
        match orientation {
            super::Orientation::Row => self.height,
            super::Orientation::Column => self.width,
        }
    }

    /// Raw row-major offsets
    pub fn offsets(&self) -> &[usize] {
        &self.map
    }

    /// The whole grid as a rectangle
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.height, self.width)
    }

    /// Offset of the cell covering `(row, col)`, if in bounds
    pub fn offset_at(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.height && col < self.width).then(|| self.map[row * self.width + col])
    }

    /// Cell covering `(row, col)` with its full span
    pub fn cell_at(&self, row: usize, col: usize) -> Result<CellInfo, TableError> {
        let offset = self.offset_at(row, col).ok_or(TableError::OutOfBounds {
            row,
            col,
            height: self.height,
            width: self.width,
        })?;
        let span = self
            .find_cell(offset)
            .ok_or_else(|| TableError::NotFound(format!("offset {offset}")))?;
        Ok(CellInfo { offset, span })
    }

    /// Span of the cell starting at `offset`
    pub fn find_cell(&self, offset: usize) -> Option<Rect> {
        self.spans.get(&offset).copied()
    }

    /// Top-left coordinate of the cell starting at `offset`
    pub fn coordinate_of(&self, offset: usize) -> Option<CellCoord> {
        self.find_cell(offset)
            .map(|rect| CellCoord::new(rect.top, rect.left))
    }

    /// Leftmost column of the cell starting at `offset`
    pub fn col_count(&self, offset: usize) -> Option<usize> {
        self.find_cell(offset).map(|rect| rect.left)
    }

    /// Neighbouring cell in `direction`, skipping over merged coordinates
    pub fn next_cell(&self, offset: usize, direction: Direction) -> Option<usize> {
        let rect = self.find_cell(offset)?;
        match direction {
            Direction::Left => {
                let col = rect.left.checked_sub(1)?;
                self.offset_at(rect.top, col)
            }
            Direction::Right => self.offset_at(rect.top, rect.right),
            Direction::Up => {
                let row = rect.top.checked_sub(1)?;
                self.offset_at(row, rect.left)
            }
            Direction::Down => self.offset_at(rect.bottom, rect.left),
        }
    }

    /// Distinct cell offsets in row-major order of their top-left corner
    pub fn cells_in_order(&self) -> Vec<usize> {
        let mut seen = HashSet::new();
        self.map
            .iter()
            .copied()
            .filter(|offset| seen.insert(*offset))
            .collect()
    }

    /// Distinct cell offsets covering any coordinate of `rect`
    pub fn cells_in_rect(&self, rect: &Rect) -> Vec<usize> {
        let mut seen = HashSet::new();
        let mut cells = Vec::new();
        for row in rect.top..rect.bottom.min(self.height) {
            for col in rect.left..rect.right.min(self.width) {
                let offset = self.map[row * self.width + col];
                if seen.insert(offset) {
                    cells.push(offset);
                }
            }
        }
        cells
    }
}

/// Width of the grid: the widest row once cells hanging down from earlier
/// rows are counted
fn find_width(table: &Node) -> Result<usize, TableProblem> {
    let height = table.content.len();
    let mut carried = vec![0usize; height];
    let mut width = 0;

    let mut pos = 0;
    for (row, row_node) in table.content.iter().enumerate() {
        if !row_node.is_row() {
            return Err(TableProblem::NotARow { row });
        }
        pos += 1;
        let mut own = 0;
        for cell in &row_node.content {
            let attrs = cell
                .cell_attrs()
                .ok_or(TableProblem::NotACell { row, offset: pos })?;
            if attrs.rowspan == 0 || attrs.colspan == 0 {
                return Err(TableProblem::ZeroSpan { offset: pos });
            }
            own += attrs.colspan;
            for below in carried.iter_mut().skip(row + 1).take(attrs.rowspan - 1) {
                *below += attrs.colspan;
            }
            pos += cell.size();
        }
        width = width.max(own + carried[row]);
        pos += 1;
    }

    Ok(width)
}

/// Memoised maps for the tables of one document version.
///
/// Maps are never patched: the first lookup after the document version
/// changes drops every cached map and rebuilds on demand.
#[derive(Debug, Default)]
pub struct TableMapCache {
    version: Option<u64>,
    maps: HashMap<usize, Rc<TableMap>>,
}

impl TableMapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map of the table starting at `table_pos` in the current document
    pub fn get(&mut self, doc: &Document, table_pos: usize) -> Result<Rc<TableMap>, TableError> {
        if self.version != Some(doc.version()) {
            self.maps.clear();
            self.version = Some(doc.version());
        }

        if let Some(map) = self.maps.get(&table_pos) {
            return Ok(Rc::clone(map));
        }

        let table = doc
            .node_at(table_pos)
            .filter(|node| node.is_table())
            .ok_or_else(|| TableError::NotFound(format!("no table at {table_pos}")))?;
        let map = Rc::new(TableMap::build(table).inspect_err(|problem| {
            log::warn!("table at {table_pos} is malformed: {problem}");
        })?);
        self.maps.insert(table_pos, Rc::clone(&map));
        Ok(map)
    }
}
