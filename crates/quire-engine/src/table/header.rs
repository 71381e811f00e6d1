//! Header row / header column flags.
//!
//! Header state is never stored on the table. A table has a header row when
//! every cell touching row 0 is a header cell, and a header column likewise
//! for column 0.

use crate::editing::{CellKind, Document, Step, Transaction};
use crate::error::TableError;
use crate::table::{CoveredCell, Orientation, Region, ResolvedTable, cells_in};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderFlags {
    pub row: bool,
    pub column: bool,
}

impl HeaderFlags {
    pub fn get(&self, orientation: Orientation) -> bool {
        match orientation {
            Orientation::Row => self.row,
            Orientation::Column => self.column,
        }
    }
}

pub fn header_flags(table: &ResolvedTable<'_>) -> HeaderFlags {
    HeaderFlags {
        row: is_header_line(table, Orientation::Row),
        column: is_header_line(table, Orientation::Column),
    }
}

fn is_header_line(table: &ResolvedTable<'_>, orientation: Orientation) -> bool {
    let cells = cells_in(&table.map, Region::Line(orientation, 0));
    !cells.is_empty() && cells.iter().all(|cell| kind_of(table, cell) == Some(CellKind::Header))
}

fn kind_of(table: &ResolvedTable<'_>, cell: &CoveredCell) -> Option<CellKind> {
    table.cell_node(cell.offset).and_then(|node| node.cell_kind())
}

/// Turn row 0 or column 0 into a header line, or back into data cells.
///
/// When switching a line off, cells shared with the other orientation's
/// header line keep their header type. Only cells whose type actually
/// changes get a step; content is never touched.
pub fn toggle_header(
    doc: &Document,
    table_pos: usize,
    orientation: Orientation,
    index: usize,
) -> Result<Transaction, TableError> {
    if index != 0 {
        return Err(TableError::HeaderIndex { index });
    }

    let table = ResolvedTable::at(doc, table_pos)?;
    let flags = header_flags(&table);
    let enable = !flags.get(orientation);
    let keep_shared = flags.get(orientation.other());

    let mut tx = Transaction::new();
    for cell in cells_in(&table.map, Region::Line(orientation, 0)) {
        let shared = match orientation {
            Orientation::Row => cell.span.left == 0,
            Orientation::Column => cell.span.top == 0,
        };
        let kind = if enable || (keep_shared && shared) {
            CellKind::Header
        } else {
            CellKind::Data
        };
        if kind_of(&table, &cell) != Some(kind) {
            tx.push(Step::SetCellKind {
                pos: table.cell_pos(cell.offset),
                kind,
            });
        }
    }

    log::debug!(
        "{} header {orientation} of table at {table_pos}",
        if enable { "enabling" } else { "disabling" }
    );
    Ok(tx)
}
