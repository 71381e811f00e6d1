//! # Row/Column Reordering
//!
//! A move takes line `from` out of the table and reinserts it so that it
//! ends up at index `to`; every line in between shifts by one towards the
//! gap. The whole table node is rebuilt and swapped in with a single step,
//! so the move is applied completely or not at all.
//!
//! Rows are whole row nodes and move as such. Columns are spread over every
//! row node, so each row's cells are re-sorted by their new start column.

use std::rc::Rc;

use crate::editing::{Node, Step, Transaction};
use crate::error::{MoveRejected, TableError};
use crate::table::{
    Orientation, ResolvedTable, TableMap, cell_selection, header_flags, is_rectangle_valid,
    line_rect,
};

/// Check every precondition of moving line `from` to index `to`.
///
/// Preconditions are checked in order: both indexes in range, distinct
/// indexes, header policy, then merged cells on either line.
pub fn check_move(
    table: &ResolvedTable<'_>,
    orientation: Orientation,
    from: usize,
    to: usize,
    exclude_header: bool,
) -> Result<(), MoveRejected> {
    let len = table.map.line_count(orientation);
    for index in [from, to] {
        if index >= len {
            return Err(MoveRejected::OutOfRange {
                orientation,
                index,
                len,
            });
        }
    }

    if from == to {
        return Err(MoveRejected::SameIndex {
            orientation,
            index: from,
        });
    }

    if exclude_header && (from == 0 || to == 0) && header_flags(table).get(orientation) {
        return Err(MoveRejected::HeaderLine { orientation });
    }

    for index in [from, to] {
        let valid = line_rect(&table.map, orientation, index)
            .is_some_and(|rect| is_rectangle_valid(&table.map, &rect));
        if !valid {
            return Err(MoveRejected::SpanConflict { orientation, index });
        }
    }

    Ok(())
}

pub fn can_move(
    table: &ResolvedTable<'_>,
    orientation: Orientation,
    from: usize,
    to: usize,
    exclude_header: bool,
) -> bool {
    check_move(table, orientation, from, to, exclude_header).is_ok()
}

/// Build the transaction moving line `from` to index `to`.
///
/// The transaction also selects the moved line at its new index.
pub fn move_line(
    table: &ResolvedTable<'_>,
    orientation: Orientation,
    from: usize,
    to: usize,
    exclude_header: bool,
) -> Result<Transaction, TableError> {
    check_move(table, orientation, from, to, exclude_header)?;

    let moved = match orientation {
        Orientation::Row => move_row(table.node, from, to),
        Orientation::Column => move_column(table, from, to),
    };

    let moved_map = TableMap::build(&moved).inspect_err(|problem| {
        log::warn!("moving {orientation} {from} broke table at {}: {problem}", table.pos);
    })?;
    let moved_table = ResolvedTable {
        pos: table.pos,
        node: &moved,
        map: Rc::new(moved_map),
    };
    let selection = line_rect(&moved_table.map, orientation, to)
        .and_then(|rect| cell_selection(&moved_table, &rect))
        .ok_or_else(|| TableError::NotFound(format!("{orientation} {to} after move")))?;

    log::debug!(
        "moving {orientation} {from} to {to} in table at {}",
        table.pos
    );

    Ok(Transaction::new()
        .step(Step::ReplaceNode {
            pos: table.pos,
            node: moved,
        })
        .with_selection(selection))
}

fn move_row(table: &Node, from: usize, to: usize) -> Node {
    let mut moved = table.clone();
    let row = moved.content.remove(from);
    moved.content.insert(to, row);
    moved
}

fn move_column(table: &ResolvedTable<'_>, from: usize, to: usize) -> Node {
    let mut moved = table.node.clone();

    let mut pos = 0;
    for row in &mut moved.content {
        pos += 1;
        let mut keyed = Vec::with_capacity(row.content.len());
        for cell in row.content.drain(..) {
            let start = table
                .map
                .find_cell(pos)
                .map(|span| {
                    (span.left..span.right)
                        .map(|col| shifted(col, from, to))
                        .min()
                        .unwrap_or(span.left)
                })
                .unwrap_or_default();
            pos += cell.size();
            keyed.push((start, cell));
        }
        keyed.sort_by_key(|(start, _)| *start);
        row.content = keyed.into_iter().map(|(_, cell)| cell).collect();
        pos += 1;
    }

    moved
}

/// Index that column `col` ends up at when `from` moves to `to`
fn shifted(col: usize, from: usize, to: usize) -> usize {
    if col == from {
        to
    } else if from < to && (from + 1..=to).contains(&col) {
        col - 1
    } else if to < from && (to..from).contains(&col) {
        col + 1
    } else {
        col
    }
}
