//! Persisted column widths.
//!
//! Widths live on the cells: each cell stores one entry per column it
//! spans, with `0` meaning "not set". Resizing never changes the grid.

use quire_config::TableSettings;

use crate::editing::{Document, Step, Transaction};
use crate::error::TableError;
use crate::table::{CoveredCell, Orientation, Region, ResolvedTable, cells_in};

/// Width stored for column `col`, or the configured default when no cell
/// in the column records one. `None` when `col` is outside the table.
pub fn column_width(table: &ResolvedTable<'_>, col: usize, settings: &TableSettings) -> Option<u32> {
    if col >= table.map.width() {
        return None;
    }
    let stored = cells_in(&table.map, Region::Line(Orientation::Column, col))
        .iter()
        .find_map(|cell| stored_width(table, cell, col));
    Some(stored.unwrap_or(settings.default_column_width))
}

fn stored_width(table: &ResolvedTable<'_>, cell: &CoveredCell, col: usize) -> Option<u32> {
    let attrs = table.cell_node(cell.offset)?.cell_attrs()?;
    let width = *attrs.colwidth.as_ref()?.get(col - cell.span.left)?;
    (width > 0).then_some(width)
}

/// Record `width` (clamped to the configured minimum) for column `col`
/// on every cell that covers it.
pub fn set_column_width(
    doc: &Document,
    table_pos: usize,
    col: usize,
    width: u32,
    settings: &TableSettings,
) -> Result<Transaction, TableError> {
    let table = ResolvedTable::at(doc, table_pos)?;
    if col >= table.map.width() {
        return Err(TableError::OutOfBounds {
            row: 0,
            col,
            height: table.map.height(),
            width: table.map.width(),
        });
    }
    let width = width.max(settings.min_column_width);

    let mut tx = Transaction::new();
    for cell in cells_in(&table.map, Region::Line(Orientation::Column, col)) {
        let Some(node) = table.cell_node(cell.offset) else {
            continue;
        };
        let Some(attrs) = node.cell_attrs() else {
            continue;
        };

        let mut attrs = attrs.clone();
        let colspan = attrs.colspan;
        let widths = attrs.colwidth.get_or_insert_with(|| vec![0; colspan]);
        if widths.len() < colspan {
            widths.resize(colspan, 0);
        }
        let index = col - cell.span.left;
        if widths[index] == width {
            continue;
        }
        widths[index] = width;

        tx.push(Step::SetAttrs {
            pos: table.cell_pos(cell.offset),
            attrs,
        });
    }

    log::debug!("column {col} of table at {table_pos} set to {width}px");
    Ok(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Node;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn settings() -> TableSettings {
        TableSettings::default()
    }

    /// Row 0: "wide" spans both columns. Row 1: two plain cells.
    fn doc() -> Document {
        Document::new(vec![Node::table(vec![
            Node::row(vec![Node::cell("wide").with_span(1, 2)]),
            Node::row(vec![Node::cell("a"), Node::cell("b").with_colwidth(vec![140])]),
        ])])
    }

    fn widths(doc: &Document) -> Vec<Option<Vec<u32>>> {
        doc.root().content[0]
            .content
            .iter()
            .flat_map(|row| row.content.iter())
            .map(|cell| cell.cell_attrs().and_then(|attrs| attrs.colwidth.clone()))
            .collect()
    }

    #[test]
    fn test_column_width_falls_back_to_default() {
        let doc = doc();
        let table = ResolvedTable::at(&doc, 0).unwrap();

        assert_eq!(column_width(&table, 0, &settings()), Some(100));
        assert_eq!(column_width(&table, 1, &settings()), Some(140));
        assert_eq!(column_width(&table, 2, &settings()), None);
    }

    #[test]
    fn test_set_width_updates_every_covering_cell() {
        let mut doc = doc();
        let tx = set_column_width(&doc, 0, 1, 180, &settings()).unwrap();
        assert_eq!(tx.steps().len(), 2);
        doc.apply(tx).unwrap();

        assert_eq!(
            widths(&doc),
            vec![Some(vec![0, 180]), None, Some(vec![180])]
        );
        let table = ResolvedTable::at(&doc, 0).unwrap();
        assert_eq!(column_width(&table, 1, &settings()), Some(180));
        assert_eq!(column_width(&table, 0, &settings()), Some(100));
    }

    #[rstest]
    #[case(3, 25)]
    #[case(25, 25)]
    #[case(60, 60)]
    fn test_width_is_clamped_to_minimum(#[case] requested: u32, #[case] stored: u32) {
        let mut doc = doc();
        let tx = set_column_width(&doc, 0, 0, requested, &settings()).unwrap();
        doc.apply(tx).unwrap();

        let table = ResolvedTable::at(&doc, 0).unwrap();
        assert_eq!(column_width(&table, 0, &settings()), Some(stored));
    }

    #[test]
    fn test_resize_keeps_grid() {
        let mut doc = doc();
        let before = ResolvedTable::at(&doc, 0).unwrap().map.as_ref().clone();

        let tx = set_column_width(&doc, 0, 0, 300, &settings()).unwrap();
        doc.apply(tx).unwrap();

        let after = ResolvedTable::at(&doc, 0).unwrap().map.as_ref().clone();
        assert_eq!(after, before);
    }

    #[test]
    fn test_set_width_out_of_range() {
        assert!(matches!(
            set_column_width(&doc(), 0, 5, 100, &settings()),
            Err(TableError::OutOfBounds { col: 5, .. })
        ));
    }
}
