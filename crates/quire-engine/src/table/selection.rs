//! # Selection Algebra
//!
//! Rectangles over a [`TableMap`] and the rule that keeps them honest: a
//! rectangle is valid only when every merged cell it touches lies entirely
//! inside it.
//!
//! Validity is checked at the edges. Two map entries straddling an edge
//! (one just inside, one just outside) hold the same offset exactly when a
//! span crosses that edge.
//!
//! Expansion is a fixpoint: grow the rectangle to the union of the spans of
//! every cell it covers, repeat until nothing changes. Spans that only come
//! into reach after an earlier pass (chains of spans crossing each other's
//! rows or columns) are pulled in transitively, so the result does not
//! depend on the order cells are visited in.

use crate::editing::{CellSelection, Document, Selection, Transaction};
use crate::error::TableError;
use crate::table::{CellCoord, Orientation, Rect, ResolvedTable, TableMap, find_cell_around};

/// What to enumerate cells over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Rect(Rect),
    Line(Orientation, usize),
}

/// One distinct cell covering part of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoveredCell {
    /// Top row of the cell's span
    pub row: usize,
    /// Left column of the cell's span
    pub col: usize,
    pub offset: usize,
    pub span: Rect,
    pub is_merged: bool,
}

/// Smallest rectangle containing both coordinates
pub fn rectangle_for(
    map: &TableMap,
    anchor: CellCoord,
    head: CellCoord,
) -> Result<Rect, TableError> {
    for coord in [anchor, head] {
        map.cell_at(coord.row, coord.col)?;
    }
    Ok(Rect::new(
        anchor.row.min(head.row),
        anchor.col.min(head.col),
        anchor.row.max(head.row) + 1,
        anchor.col.max(head.col) + 1,
    ))
}

/// True when `rect` lies inside the grid and splits no merged cell
pub fn is_rectangle_valid(map: &TableMap, rect: &Rect) -> bool {
    if rect.is_empty() || rect.bottom > map.height() || rect.right > map.width() {
        return false;
    }

    let at = |row: usize, col: usize| map.offset_at(row, col);

    for row in rect.top..rect.bottom {
        if rect.left > 0 && at(row, rect.left - 1) == at(row, rect.left) {
            return false;
        }
        if rect.right < map.width() && at(row, rect.right - 1) == at(row, rect.right) {
            return false;
        }
    }
    for col in rect.left..rect.right {
        if rect.top > 0 && at(rect.top - 1, col) == at(rect.top, col) {
            return false;
        }
        if rect.bottom < map.height() && at(rect.bottom - 1, col) == at(rect.bottom, col) {
            return false;
        }
    }
    true
}

/// `rect` unchanged if valid, otherwise [`TableError::InvalidRectangle`]
pub fn validate_rectangle(map: &TableMap, rect: Rect) -> Result<Rect, TableError> {
    if is_rectangle_valid(map, &rect) {
        Ok(rect)
    } else {
        Err(TableError::InvalidRectangle(rect))
    }
}

/// Grow `rect` minimally until no merged cell straddles its edges.
///
/// Empty rectangles and rectangles reaching past the grid are returned
/// unchanged; the result always contains the input. Terminates because each
/// pass either leaves the rectangle unchanged or strictly grows it, and it
/// can never grow past the grid.
pub fn expand_to_valid(map: &TableMap, rect: Rect) -> Rect {
    if rect.is_empty() || !map.bounds().contains_rect(&rect) {
        return rect;
    }
    let mut rect = rect;

    loop {
        let grown = map
            .cells_in_rect(&rect)
            .into_iter()
            .filter_map(|offset| map.find_cell(offset))
            .fold(rect, |acc, span| acc.union(&span));
        if grown == rect {
            return rect;
        }
        rect = grown;
    }
}

/// Rectangle covering one whole row or column
pub fn line_rect(map: &TableMap, orientation: Orientation, index: usize) -> Option<Rect> {
    if index >= map.line_count(orientation) {
        return None;
    }
    Some(match orientation {
        Orientation::Row => Rect::new(index, 0, index + 1, map.width()),
        Orientation::Column => Rect::new(0, index, map.height(), index + 1),
    })
}

/// Distinct cells touching `region`, in row-major order of first appearance
pub fn cells_in(map: &TableMap, region: Region) -> Vec<CoveredCell> {
    let rect = match region {
        Region::Rect(rect) => rect,
        Region::Line(orientation, index) => match line_rect(map, orientation, index) {
            Some(rect) => rect,
            None => return Vec::new(),
        },
    };

    map.cells_in_rect(&rect)
        .into_iter()
        .filter_map(|offset| {
            let span = map.find_cell(offset)?;
            Some(CoveredCell {
                row: span.top,
                col: span.left,
                offset,
                span,
                is_merged: span.height() > 1 || span.width() > 1,
            })
        })
        .collect()
}

/// Cell selection spanning `rect`, anchored at its top-left cell
pub fn cell_selection(table: &ResolvedTable<'_>, rect: &Rect) -> Option<Selection> {
    if rect.is_empty() {
        return None;
    }
    let anchor = table.map.offset_at(rect.top, rect.left)?;
    let head = table.map.offset_at(rect.bottom - 1, rect.right - 1)?;
    Some(Selection::CellRectangle(CellSelection {
        anchor_cell: table.cell_pos(anchor),
        head_cell: table.cell_pos(head),
    }))
}

/// Transaction selecting an entire row or column, widened over merged cells
pub fn select_line(
    doc: &Document,
    table_pos: usize,
    orientation: Orientation,
    index: usize,
) -> Result<Transaction, TableError> {
    let table = ResolvedTable::at(doc, table_pos)?;
    let rect = line_rect(&table.map, orientation, index).ok_or(TableError::OutOfBounds {
        row: if orientation == Orientation::Row { index } else { 0 },
        col: if orientation == Orientation::Column { index } else { 0 },
        height: table.map.height(),
        width: table.map.width(),
    })?;
    let rect = expand_to_valid(&table.map, rect);
    let selection = cell_selection(&table, &rect)
        .ok_or_else(|| TableError::NotFound(format!("{orientation} {index}")))?;
    Ok(Transaction::new().with_selection(selection))
}

/// The table and valid rectangle the document selection covers.
///
/// Cell rectangles use their anchor and head cells; text selections use the
/// cells around their endpoints. `None` when the selection is not inside a
/// single table.
pub fn selected_rect(doc: &Document) -> Option<(ResolvedTable<'_>, Rect)> {
    let selection = doc.selection();
    let anchor = find_cell_around(doc, selection.anchor())?;
    let head = find_cell_around(doc, selection.head())?;
    if anchor.table_pos != head.table_pos {
        return None;
    }

    let table = ResolvedTable::at(doc, anchor.table_pos).ok()?;
    let anchor_span = table.map.find_cell(anchor.cell_pos - table.start())?;
    let head_span = table.map.find_cell(head.cell_pos - table.start())?;
    let rect = expand_to_valid(&table.map, anchor_span.union(&head_span));
    Some((table, rect))
}
