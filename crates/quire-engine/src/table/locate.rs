//! Resolving document positions and rendered elements to table cells

use crate::editing::{Document, TableId};
use crate::error::TableError;
use crate::table::{CellCoord, Rect, ResolvedTable, TableMapCache};
use crate::view::{ElementId, HostView};

/// The innermost cell containing a position, and the table that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLocation {
    pub table_pos: usize,
    pub cell_pos: usize,
}

/// A rendered cell resolved all the way to grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellHit {
    pub table_id: TableId,
    pub table_pos: usize,
    pub cell_pos: usize,
    /// Top-left coordinate of the cell
    pub coord: CellCoord,
    pub span: Rect,
}

/// Walk up from `pos` to the nearest enclosing cell.
///
/// A cell only counts when it sits in a row that sits in a table; stray
/// cells elsewhere in the tree are skipped.
pub fn find_cell_around(doc: &Document, pos: usize) -> Option<CellLocation> {
    let ancestors = doc.root().ancestors_at(pos);

    (2..ancestors.len()).rev().find_map(|index| {
        let (cell_pos, cell) = ancestors[index];
        let (_, row) = ancestors[index - 1];
        let (table_pos, table) = ancestors[index - 2];
        (cell.is_cell() && row.is_row() && table.is_table()).then_some(CellLocation {
            table_pos,
            cell_pos,
        })
    })
}

/// Map a rendered cell element to its table and grid coordinate.
///
/// Fails with [`TableError::NotFound`] when the element no longer maps into
/// the document or is not inside a table cell.
pub fn dom_cell_to_coordinate(
    doc: &Document,
    view: &impl HostView,
    element: ElementId,
    cache: &mut TableMapCache,
) -> Result<CellHit, TableError> {
    let pos = view
        .resolve_position(element)
        .ok_or_else(|| TableError::NotFound(format!("element {} is detached", element.0)))?;
    let location = find_cell_around(doc, pos)
        .ok_or_else(|| TableError::NotFound(format!("position {pos} is not in a table cell")))?;

    let table = ResolvedTable::cached(doc, location.table_pos, cache)?;
    let offset = location.cell_pos - table.start();
    let span = table
        .map
        .find_cell(offset)
        .ok_or_else(|| TableError::NotFound(format!("cell at {} is not in the map", location.cell_pos)))?;
    let table_id = table
        .node
        .table_id()
        .ok_or_else(|| TableError::NotFound(format!("no table at {}", location.table_pos)))?;

    Ok(CellHit {
        table_id,
        table_pos: location.table_pos,
        cell_pos: location.cell_pos,
        coord: CellCoord::new(span.top, span.left),
        span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Node;
    use crate::view::{Bounds, Decoration, DecorationHandle, Hit, Point};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    /// Resolves elements through a fixed table; draws nothing
    struct Elements(HashMap<ElementId, usize>);

    impl HostView for Elements {
        fn resolve_position(&self, element: ElementId) -> Option<usize> {
            self.0.get(&element).copied()
        }

        fn hit_test(&self, _point: Point) -> Option<Hit> {
            None
        }

        fn element_bounds(&self, _element: ElementId) -> Option<Bounds> {
            None
        }

        fn table_bounds(&self, _table_pos: usize) -> Option<Bounds> {
            None
        }

        fn request_decoration(&mut self, _decoration: Decoration) -> DecorationHandle {
            DecorationHandle(0)
        }

        fn clear_decoration(&mut self, _handle: DecorationHandle) {}
    }

    /// "intro" paragraph (size 7) followed by a 2x2 table at 7
    fn doc() -> Document {
        Document::new(vec![
            Node::paragraph("intro"),
            Node::table(vec![
                Node::row(vec![Node::cell("a").with_span(2, 1), Node::cell("b")]),
                Node::row(vec![Node::cell("c")]),
            ]),
        ])
    }

    #[test]
    fn test_find_cell_around_text_position() {
        let doc = doc();
        // table 7, row 8, cell "a" 9, paragraph 10, text 11
        let location = find_cell_around(&doc, 11).unwrap();

        assert_eq!(
            location,
            CellLocation {
                table_pos: 7,
                cell_pos: 9
            }
        );
    }

    #[test]
    fn test_find_cell_around_cell_start() {
        let doc = doc();
        assert_eq!(find_cell_around(&doc, 9).map(|l| l.cell_pos), Some(9));
    }

    #[test]
    fn test_find_cell_around_outside_table() {
        let doc = doc();
        assert_eq!(find_cell_around(&doc, 2), None);
        assert_eq!(find_cell_around(&doc, 7), None);
    }

    #[test]
    fn test_find_cell_around_nested_table_picks_inner_cell() {
        let inner = Node::table(vec![Node::row(vec![Node::cell("x")])]);
        let outer = Node::table(vec![Node::row(vec![Node::new(
            crate::editing::NodeKind::TableCell {
                kind: crate::editing::CellKind::Data,
                attrs: Default::default(),
            },
            vec![inner],
        )])]);
        let doc = Document::new(vec![outer]);
        // outer table 0, row 1, cell 2, inner table 3, row 4, cell 5
        let location = find_cell_around(&doc, 7).unwrap();

        assert_eq!(location.table_pos, 3);
        assert_eq!(location.cell_pos, 5);
    }

    #[test]
    fn test_dom_cell_to_coordinate() {
        let doc = doc();
        let mut cache = TableMapCache::new();
        let table = ResolvedTable::at(&doc, 7).unwrap();
        let b = table.cell_pos(table.map.offset_at(0, 1).unwrap());
        let c = table.cell_pos(table.map.offset_at(1, 1).unwrap());
        let view = Elements(HashMap::from([
            (ElementId(1), 9),
            (ElementId(2), b),
            (ElementId(3), c + 1),
        ]));

        let a_hit = dom_cell_to_coordinate(&doc, &view, ElementId(1), &mut cache).unwrap();
        assert_eq!(a_hit.coord, CellCoord::new(0, 0));
        assert_eq!(a_hit.span, Rect::new(0, 0, 2, 1));
        assert_eq!(a_hit.table_id, table.node.table_id().unwrap());

        let b_hit = dom_cell_to_coordinate(&doc, &view, ElementId(2), &mut cache).unwrap();
        assert_eq!(b_hit.coord, CellCoord::new(0, 1));

        let c_hit = dom_cell_to_coordinate(&doc, &view, ElementId(3), &mut cache).unwrap();
        assert_eq!(c_hit.coord, CellCoord::new(1, 1));
        assert_eq!(c_hit.cell_pos, c);
    }

    #[test]
    fn test_dom_cell_to_coordinate_detached_element() {
        let doc = doc();
        let mut cache = TableMapCache::new();
        let view = Elements(HashMap::from([(ElementId(1), 2)]));

        for element in [ElementId(1), ElementId(99)] {
            assert!(matches!(
                dom_cell_to_coordinate(&doc, &view, element, &mut cache),
                Err(TableError::NotFound(_))
            ));
        }
    }
}
