//! Tab / Shift-Tab movement between cells

use crate::editing::{Document, Selection, Transaction};
use crate::table::{ResolvedTable, find_cell_around};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabDirection {
    Forward,
    Backward,
}

/// Select the content of the next (or previous) cell in reading order.
///
/// Merged cells are visited once, at their top-left coordinate. `None`
/// when the selection is not in a table or there is no cell that way.
pub fn go_to_next_cell(doc: &Document, direction: TabDirection) -> Option<Transaction> {
    let location = find_cell_around(doc, doc.selection().head())?;
    let table = ResolvedTable::at(doc, location.table_pos).ok()?;

    let order = table.map.cells_in_order();
    let current = order
        .iter()
        .position(|&offset| table.cell_pos(offset) == location.cell_pos)?;
    let next = match direction {
        TabDirection::Forward => current + 1,
        TabDirection::Backward => current.checked_sub(1)?,
    };
    let offset = *order.get(next)?;

    let cell_pos = table.cell_pos(offset);
    let cell = table.cell_node(offset)?;
    let selection = if cell.content.is_empty() {
        Selection::Point(cell_pos + 1)
    } else {
        // from the start of the first paragraph to the end of the last
        let anchor = cell_pos + 2;
        let head = cell_pos + cell.size() - 2;
        if anchor == head {
            Selection::Point(anchor)
        } else {
            Selection::Range { anchor, head }
        }
    };

    Some(Transaction::new().with_selection(selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Node;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// 2x2 grid; cells of size 6 at 2, 8, 16, 22
    fn grid() -> Document {
        Document::new(vec![Node::table(vec![
            Node::row(vec![Node::cell("00"), Node::cell("01")]),
            Node::row(vec![Node::cell("10"), Node::cell("11")]),
        ])])
    }

    fn at(caret: usize) -> Document {
        let mut doc = grid();
        doc.set_selection(Selection::Point(caret)).unwrap();
        doc
    }

    #[rstest]
    #[case(4, TabDirection::Forward, Some(Selection::Range { anchor: 10, head: 12 }))]
    #[case(11, TabDirection::Forward, Some(Selection::Range { anchor: 18, head: 20 }))]
    #[case(19, TabDirection::Backward, Some(Selection::Range { anchor: 10, head: 12 }))]
    #[case(4, TabDirection::Backward, None)]
    #[case(25, TabDirection::Forward, None)]
    fn test_tab_order(
        #[case] caret: usize,
        #[case] direction: TabDirection,
        #[case] expected: Option<Selection>,
    ) {
        let selection = go_to_next_cell(&at(caret), direction).and_then(|tx| tx.selection());
        assert_eq!(selection, expected);
    }

    #[test]
    fn test_tab_skips_merged_coordinates() {
        let mut doc = Document::new(vec![Node::table(vec![
            Node::row(vec![Node::cell("a").with_span(2, 1), Node::cell("b")]),
            Node::row(vec![Node::cell("c")]),
        ])]);
        // inside "b"
        let b = ResolvedTable::at(&doc, 0).unwrap().map.offset_at(0, 1).unwrap() + 1;
        doc.set_selection(Selection::Point(b + 2)).unwrap();

        let tx = go_to_next_cell(&doc, TabDirection::Forward).unwrap();
        doc.apply(tx).unwrap();

        let head = doc.selection().head();
        let cell = find_cell_around(&doc, head).unwrap();
        assert_eq!(doc.node_at(cell.cell_pos).map(Node::text_content), Some("c".to_string()));
    }

    #[test]
    fn test_tab_into_empty_cell_places_caret() {
        let mut doc = Document::new(vec![Node::table(vec![Node::row(vec![
            Node::cell("x"),
            Node::cell(""),
        ])])]);
        doc.set_selection(Selection::Point(4)).unwrap();

        let selection = go_to_next_cell(&doc, TabDirection::Forward).and_then(|tx| tx.selection());

        // second cell at 7, empty paragraph at 8
        assert_eq!(selection, Some(Selection::Point(9)));
    }

    #[test]
    fn test_tab_outside_table() {
        let doc = Document::new(vec![Node::paragraph("x")]);
        assert_eq!(go_to_next_cell(&doc, TabDirection::Forward), None);
    }
}
