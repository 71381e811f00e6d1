//! Column border dragging.
//!
//! Hovering within `handle_width` of a cell's right border (or of its left
//! border, which is the previous column's right border) arms the resizer
//! for that column. Dragging shows a live width preview; releasing writes
//! the width to the document.

use quire_config::TableSettings;

use crate::editing::{Document, Patch, TableId};
use crate::error::CancelReason;
use crate::interaction::Key;
use crate::table::{
    ResolvedTable, TableMapCache, column_width, dom_cell_to_coordinate, set_column_width,
};
use crate::view::{
    Decoration, DecorationHandle, DecorationKind, DecorationTarget, HostView, Point,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    /// Pointer is over the border at the right of `col`
    Hovering {
        table_id: TableId,
        col: usize,
        handle: DecorationHandle,
    },
    Dragging {
        table_id: TableId,
        col: usize,
        start_x: f32,
        start_width: u32,
        width: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResizeOutcome {
    Ignored,
    Unchanged,
    HandleShown { col: usize },
    HandleHidden,
    DragStarted { col: usize, width: u32 },
    WidthChanged { width: u32 },
    Committed(Patch),
    Cancelled(CancelReason),
}

#[derive(Debug)]
pub struct ColumnResizer {
    settings: TableSettings,
    state: ResizeState,
    cache: TableMapCache,
    preview: Option<DecorationHandle>,
}

impl ColumnResizer {
    pub fn new(settings: &TableSettings) -> Self {
        Self {
            settings: settings.clone(),
            state: ResizeState::Idle,
            cache: TableMapCache::new(),
            preview: None,
        }
    }

    pub fn state(&self) -> &ResizeState {
        &self.state
    }

    pub fn on_pointer_move(
        &mut self,
        doc: &Document,
        view: &mut impl HostView,
        point: Point,
    ) -> ResizeOutcome {
        if let ResizeState::Dragging {
            table_id,
            col,
            start_x,
            start_width,
            width,
        } = self.state
        {
            let Some(table_pos) = doc.find_table(table_id) else {
                return self.cancel(view, CancelReason::TableRemoved);
            };
            let new_width = self.dragged_width(start_width, point.x - start_x);
            if new_width == width {
                return ResizeOutcome::Unchanged;
            }
            self.show_preview(view, table_pos, new_width);
            self.state = ResizeState::Dragging {
                table_id,
                col,
                start_x,
                start_width,
                width: new_width,
            };
            return ResizeOutcome::WidthChanged { width: new_width };
        }

        let target = self.border_under(doc, &*view, point);
        match (self.state, target) {
            (ResizeState::Hovering { table_id, col, .. }, Some((id, c, _)))
                if table_id == id && col == c =>
            {
                ResizeOutcome::Unchanged
            }
            (_, Some((table_id, col, cell_pos))) => {
                self.clear_handle(view);
                let handle = view.request_decoration(Decoration {
                    kind: DecorationKind::ColumnResizeHandle,
                    target: DecorationTarget::Position(cell_pos),
                });
                self.state = ResizeState::Hovering {
                    table_id,
                    col,
                    handle,
                };
                ResizeOutcome::HandleShown { col }
            }
            (ResizeState::Hovering { .. }, None) => {
                self.clear_handle(view);
                self.state = ResizeState::Idle;
                ResizeOutcome::HandleHidden
            }
            _ => ResizeOutcome::Ignored,
        }
    }

    pub fn on_pointer_down(
        &mut self,
        doc: &Document,
        view: &mut impl HostView,
        point: Point,
    ) -> ResizeOutcome {
        let ResizeState::Hovering { table_id, col, .. } = self.state else {
            return ResizeOutcome::Ignored;
        };
        let Some(table_pos) = doc.find_table(table_id) else {
            return self.cancel(view, CancelReason::TableRemoved);
        };
        let start_width = match ResolvedTable::cached(doc, table_pos, &mut self.cache) {
            Ok(table) => column_width(&table, col, &self.settings),
            Err(_) => None,
        };
        let Some(start_width) = start_width else {
            return self.cancel(view, CancelReason::TableChanged);
        };

        self.clear_handle(view);
        self.show_preview(view, table_pos, start_width);
        self.state = ResizeState::Dragging {
            table_id,
            col,
            start_x: point.x,
            start_width,
            width: start_width,
        };
        log::debug!("resizing column {col} of table at {table_pos} from {start_width}px");
        ResizeOutcome::DragStarted {
            col,
            width: start_width,
        }
    }

    pub fn on_pointer_up(
        &mut self,
        doc: &mut Document,
        view: &mut impl HostView,
        point: Point,
    ) -> ResizeOutcome {
        let ResizeState::Dragging {
            table_id,
            col,
            start_x,
            start_width,
            ..
        } = self.state
        else {
            return ResizeOutcome::Ignored;
        };
        self.clear_preview(view);
        self.state = ResizeState::Idle;

        let Some(table_pos) = doc.find_table(table_id) else {
            return ResizeOutcome::Cancelled(CancelReason::TableRemoved);
        };
        let width = self.dragged_width(start_width, point.x - start_x);
        let tx = match set_column_width(doc, table_pos, col, width, &self.settings) {
            Ok(tx) => tx,
            Err(err) => {
                log::warn!("could not resize column {col} of table at {table_pos}: {err}");
                return ResizeOutcome::Cancelled(CancelReason::TableChanged);
            }
        };
        match doc.apply(tx) {
            Ok(patch) => ResizeOutcome::Committed(patch),
            Err(err) => {
                log::warn!("document rejected column resize: {err}");
                ResizeOutcome::Cancelled(CancelReason::TransactionFailed)
            }
        }
    }

    pub fn on_key_down(&mut self, view: &mut impl HostView, key: Key) -> ResizeOutcome {
        match (key, self.state) {
            (Key::Escape, ResizeState::Dragging { .. }) => {
                self.cancel(view, CancelReason::UserAborted)
            }
            _ => ResizeOutcome::Ignored,
        }
    }

    pub fn on_pointer_leave(&mut self, view: &mut impl HostView) -> ResizeOutcome {
        match self.state {
            ResizeState::Dragging { .. } => self.cancel(view, CancelReason::PointerLeft),
            ResizeState::Hovering { .. } => {
                self.clear_handle(view);
                self.state = ResizeState::Idle;
                ResizeOutcome::HandleHidden
            }
            ResizeState::Idle => ResizeOutcome::Ignored,
        }
    }

    /// Table, column and cell position of a resizable border under `point`
    fn border_under(
        &mut self,
        doc: &Document,
        view: &impl HostView,
        point: Point,
    ) -> Option<(TableId, usize, usize)> {
        let hit = view.hit_test(point)?;
        let cell = dom_cell_to_coordinate(doc, view, hit.element, &mut self.cache).ok()?;
        let bounds = view.element_bounds(hit.element)?;
        let reach = self.settings.handle_width;

        if (0.0..=reach).contains(&(bounds.right - point.x)) {
            Some((cell.table_id, cell.span.right - 1, cell.cell_pos))
        } else if cell.span.left > 0 && (0.0..=reach).contains(&(point.x - bounds.left)) {
            let table = ResolvedTable::cached(doc, cell.table_pos, &mut self.cache).ok()?;
            let offset = table.map.offset_at(cell.coord.row, cell.span.left - 1)?;
            Some((cell.table_id, cell.span.left - 1, table.cell_pos(offset)))
        } else {
            None
        }
    }

    fn dragged_width(&self, start_width: u32, delta: f32) -> u32 {
        let width = (start_width as f32 + delta).round();
        (width.max(0.0) as u32).max(self.settings.min_column_width)
    }

    fn show_preview(&mut self, view: &mut impl HostView, table_pos: usize, width: u32) {
        self.clear_preview(view);
        self.preview = Some(view.request_decoration(Decoration {
            kind: DecorationKind::ColumnResizePreview { width },
            target: DecorationTarget::Position(table_pos),
        }));
    }

    fn clear_preview(&mut self, view: &mut impl HostView) {
        if let Some(handle) = self.preview.take() {
            view.clear_decoration(handle);
        }
    }

    fn clear_handle(&mut self, view: &mut impl HostView) {
        if let ResizeState::Hovering { handle, .. } = self.state {
            view.clear_decoration(handle);
        }
    }

    fn cancel(&mut self, view: &mut impl HostView, reason: CancelReason) -> ResizeOutcome {
        self.clear_handle(view);
        self.clear_preview(view);
        self.state = ResizeState::Idle;
        log::debug!("column resize cancelled: {reason}");
        ResizeOutcome::Cancelled(reason)
    }
}
