// Shared fixtures for the integration tests. Not every test file uses every
// helper, so dead code warnings are silenced per item.
use std::collections::BTreeMap;

use quire_engine::editing::{CellKind, Document, Node};
use quire_engine::table::{Rect, ResolvedTable};
use quire_engine::view::{
    Bounds, Decoration, DecorationHandle, DecorationKind, ElementId, Hit, HitRegion, HostView,
    Point,
};

pub const COLUMN_WIDTH: f32 = 100.0;
pub const ROW_HEIGHT: f32 = 30.0;
/// Handles sit in a strip this wide to the left of rows and above columns
pub const HANDLE_STRIP: f32 = 20.0;

struct Placed {
    element: ElementId,
    pos: usize,
    span: Rect,
}

/// Lays out the first table of a document on a uniform grid and records
/// every decoration the engine asks for.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeView {
    table_pos: Option<usize>,
    height: usize,
    width: usize,
    cells: Vec<Placed>,
    generation: u64,
    next_handle: u64,
    pub decorations: BTreeMap<DecorationHandle, Decoration>,
    /// Total number of decorations ever requested
    pub requests: usize,
}

#[allow(dead_code)]
impl FakeView {
    pub fn new(doc: &Document) -> Self {
        let mut view = Self::default();
        view.relayout(doc);
        view
    }

    /// Re-render after the document changed; element ids are reissued
    pub fn relayout(&mut self, doc: &Document) {
        self.generation += 1;
        self.cells.clear();
        self.table_pos = None;

        let Some(&(table_pos, _)) = doc.tables().first() else {
            return;
        };
        let table = ResolvedTable::at(doc, table_pos).unwrap();
        self.table_pos = Some(table_pos);
        self.height = table.map.height();
        self.width = table.map.width();
        for (index, offset) in table.map.cells_in_order().into_iter().enumerate() {
            self.cells.push(Placed {
                element: ElementId(self.generation * 1000 + index as u64),
                pos: table.cell_pos(offset),
                span: table.map.find_cell(offset).unwrap(),
            });
        }
    }

    /// Forget every rendered element, as if the table was torn down
    pub fn detach(&mut self) {
        self.cells.clear();
        self.table_pos = None;
    }

    /// Kinds of the decorations currently shown, oldest first
    pub fn shown(&self) -> Vec<DecorationKind> {
        self.decorations.values().map(|d| d.kind).collect()
    }

    fn cell_covering(&self, row: usize, col: usize) -> Option<&Placed> {
        self.cells.iter().find(|cell| cell.span.contains(row, col))
    }

    fn grid_right(&self) -> f32 {
        self.width as f32 * COLUMN_WIDTH
    }

    fn grid_bottom(&self) -> f32 {
        self.height as f32 * ROW_HEIGHT
    }

    /// Row under `y`; the bottom edge is outside the grid, as in `Bounds::contains`
    fn row_at(&self, y: f32) -> Option<usize> {
        (0.0..self.grid_bottom())
            .contains(&y)
            .then(|| (y / ROW_HEIGHT) as usize)
    }

    fn col_at(&self, x: f32) -> Option<usize> {
        (0.0..self.grid_right())
            .contains(&x)
            .then(|| (x / COLUMN_WIDTH) as usize)
    }
}

impl HostView for FakeView {
    fn resolve_position(&self, element: ElementId) -> Option<usize> {
        self.cells
            .iter()
            .find(|cell| cell.element == element)
            .map(|cell| cell.pos)
    }

    fn hit_test(&self, point: Point) -> Option<Hit> {
        if self.cells.is_empty() {
            return None;
        }
        let in_strip = |v: f32| (-HANDLE_STRIP..0.0).contains(&v);

        let (row, col, region) = if in_strip(point.x) {
            (self.row_at(point.y)?, 0, HitRegion::RowHandle)
        } else if in_strip(point.y) {
            (0, self.col_at(point.x)?, HitRegion::ColumnHandle)
        } else {
            (self.row_at(point.y)?, self.col_at(point.x)?, HitRegion::Cell)
        };

        self.cell_covering(row, col).map(|cell| Hit {
            element: cell.element,
            region,
        })
    }

    fn element_bounds(&self, element: ElementId) -> Option<Bounds> {
        let cell = self.cells.iter().find(|cell| cell.element == element)?;
        Some(Bounds::new(
            cell.span.left as f32 * COLUMN_WIDTH,
            cell.span.top as f32 * ROW_HEIGHT,
            cell.span.right as f32 * COLUMN_WIDTH,
            cell.span.bottom as f32 * ROW_HEIGHT,
        ))
    }

    fn table_bounds(&self, table_pos: usize) -> Option<Bounds> {
        (self.table_pos == Some(table_pos))
            .then(|| Bounds::new(0.0, 0.0, self.grid_right(), self.grid_bottom()))
    }

    fn request_decoration(&mut self, decoration: Decoration) -> DecorationHandle {
        self.next_handle += 1;
        self.requests += 1;
        let handle = DecorationHandle(self.next_handle);
        self.decorations.insert(handle, decoration);
        handle
    }

    fn clear_decoration(&mut self, handle: DecorationHandle) {
        self.decorations.remove(&handle);
    }
}

/// Middle of the grid cell at `(row, col)`
#[allow(dead_code)]
pub fn cell_center(row: usize, col: usize) -> Point {
    Point::new(
        (col as f32 + 0.5) * COLUMN_WIDTH,
        (row as f32 + 0.5) * ROW_HEIGHT,
    )
}

/// A point on the drag handle of `row`
#[allow(dead_code)]
pub fn row_handle(row: usize) -> Point {
    Point::new(-HANDLE_STRIP / 2.0, (row as f32 + 0.5) * ROW_HEIGHT)
}

/// A point on the drag handle of `col`
#[allow(dead_code)]
pub fn column_handle(col: usize) -> Point {
    Point::new((col as f32 + 0.5) * COLUMN_WIDTH, -HANDLE_STRIP / 2.0)
}

/// `rows` x `cols` table whose cells read "{row}{col}"
#[allow(dead_code)]
pub fn grid(rows: usize, cols: usize) -> Node {
    Node::table(
        (0..rows)
            .map(|r| Node::row((0..cols).map(|c| Node::cell(&format!("{r}{c}"))).collect()))
            .collect(),
    )
}

/// Cell text laid out on the grid of the first table, merged cells repeated
#[allow(dead_code)]
pub fn layout(doc: &Document) -> Vec<Vec<String>> {
    let (table_pos, _) = doc.tables()[0];
    let table = ResolvedTable::at(doc, table_pos).unwrap();
    (0..table.map.height())
        .map(|row| {
            (0..table.map.width())
                .map(|col| {
                    let offset = table.map.offset_at(row, col).unwrap();
                    table.cell_node(offset).unwrap().text_content()
                })
                .collect()
        })
        .collect()
}

/// One line per row, cells separated by `|`. Header cells are prefixed
/// with `#` and empty cells show as `_`.
#[allow(dead_code)]
pub fn render(doc: &Document) -> String {
    let (table_pos, _) = doc.tables()[0];
    let table = ResolvedTable::at(doc, table_pos).unwrap();
    (0..table.map.height())
        .map(|row| {
            (0..table.map.width())
                .map(|col| {
                    let offset = table.map.offset_at(row, col).unwrap();
                    let cell = table.cell_node(offset).unwrap();
                    let text = cell.text_content();
                    let text = if text.is_empty() { "_".to_string() } else { text };
                    match cell.cell_kind() {
                        Some(CellKind::Header) => format!("#{text}"),
                        _ => text,
                    }
                })
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
