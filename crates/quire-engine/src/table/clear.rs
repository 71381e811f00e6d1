//! Clearing cell content without touching table structure

use crate::editing::{Document, Node, Step, Transaction};
use crate::error::TableError;
use crate::table::{Orientation, Region, ResolvedTable, cells_in, line_rect, selected_rect};

/// Size of a cell holding a single empty paragraph
const CLEARED_CELL_SIZE: usize = 4;

/// Which cells to clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearTarget {
    /// The cells covered by the current document selection
    Selection,
    /// One whole row or column
    Line {
        table_pos: usize,
        orientation: Orientation,
        index: usize,
    },
}

/// Empty every distinct non-empty cell in `target`.
///
/// Each cleared cell keeps its type and span and is left holding one empty
/// paragraph. Returns `Ok(None)` when every covered cell is already empty.
pub fn clear_content(
    doc: &Document,
    target: ClearTarget,
) -> Result<Option<Transaction>, TableError> {
    let (table, rect) = match target {
        ClearTarget::Selection => selected_rect(doc)
            .ok_or_else(|| TableError::NotFound("selection is not inside a table".to_string()))?,
        ClearTarget::Line {
            table_pos,
            orientation,
            index,
        } => {
            let table = ResolvedTable::at(doc, table_pos)?;
            let rect = line_rect(&table.map, orientation, index).ok_or(TableError::OutOfBounds {
                row: if orientation == Orientation::Row { index } else { 0 },
                col: if orientation == Orientation::Column { index } else { 0 },
                height: table.map.height(),
                width: table.map.width(),
            })?;
            (table, rect)
        }
    };

    // (position, size) of every cell to clear, in document order
    let mut cleared: Vec<(usize, usize)> = cells_in(&table.map, Region::Rect(rect))
        .into_iter()
        .filter_map(|cell| {
            let node = table.cell_node(cell.offset)?;
            (!node.has_empty_content()).then(|| (table.cell_pos(cell.offset), node.size()))
        })
        .collect();
    if cleared.is_empty() {
        return Ok(None);
    }
    cleared.sort_unstable();

    // back to front, so earlier positions stay put
    let mut tx = Transaction::new();
    for &(pos, _) in cleared.iter().rev() {
        tx.push(Step::ReplaceContent {
            pos,
            content: vec![Node::paragraph("")],
        });
    }

    log::debug!("clearing {} cells of table at {}", cleared.len(), table.pos);
    Ok(Some(tx.with_selection(
        doc.selection().map(|pos| map_through_clear(pos, &cleared)),
    )))
}

/// Where `pos` ends up once every cell in `cleared` has been emptied.
/// Positions inside a cleared cell land inside its empty paragraph.
fn map_through_clear(pos: usize, cleared: &[(usize, usize)]) -> usize {
    // cells holding bare text can be narrower than a cleared cell, so the
    // running delta may go either way
    let mut delta: isize = 0;
    for &(cell_pos, size) in cleared {
        if pos >= cell_pos + size {
            delta += CLEARED_CELL_SIZE as isize - size as isize;
        } else if pos > cell_pos {
            return cell_pos.saturating_add_signed(delta) + (pos - cell_pos).min(2);
        } else {
            break;
        }
    }
    pos.saturating_add_signed(delta)
}
