//! # Drag-to-Reorder
//!
//! ```text
//!            pointer move              pointer down
//!   Idle ────────────────▶ Hovering ─────────────────▶ Dragging
//!    ▲   ◀──────────────── (cell or     (on a handle)      │
//!    │     pointer leave    handle)                        │
//!    │                                                     │
//!    └──────────── pointer up (Dropped / Rejected) ◀───────┤
//!    └──────────── Escape, pointer leave, stale table ◀────┘
//! ```
//!
//! While dragging, the pointer is clamped to the table's bounds and the
//! line under it becomes the drop target. The drop indicator is only
//! replaced when the target index actually changes.

use quire_config::TableSettings;

use crate::editing::{Document, Patch, TableId};
use crate::error::{CancelReason, MoveRejected, TableError};
use crate::interaction::Key;
use crate::table::{
    CellCoord, Orientation, ResolvedTable, TableMapCache, dom_cell_to_coordinate, move_line,
};
use crate::view::{
    Decoration, DecorationHandle, DecorationKind, DecorationTarget, ElementId, HitRegion,
    HostView, Point, Side,
};

/// The cell (and possibly handle) under the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hover {
    pub table_id: TableId,
    pub element: ElementId,
    pub cell_pos: usize,
    /// Top-left coordinate of the hovered cell
    pub cell: CellCoord,
    /// Set when the pointer is over the row or column drag handle
    pub handle: Option<Orientation>,
}

/// An in-progress drag of one row or column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    pub orientation: Orientation,
    pub table_id: TableId,
    pub origin_index: usize,
    /// Drop target resolved from the most recent pointer position
    pub last_index: usize,
    /// Handle edge minus pointer at drag start
    pub initial_pointer_offset: f32,
    /// Where the dragged line's leading edge would be drawn now
    pub current_pointer_offset: f32,
    /// Table height and width when the drag started
    pub dims: (usize, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Hovering(Hover),
    Dragging(Drag),
}

/// What an event did to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// The event did not concern this controller
    Ignored,
    /// Nothing visible changed
    Unchanged,
    HoverChanged,
    DragStarted {
        orientation: Orientation,
        index: usize,
    },
    DropTargetChanged {
        index: usize,
    },
    Dropped(Patch),
    Rejected(MoveRejected),
    Cancelled(CancelReason),
}

/// Pointer-driven row/column reordering for the tables of one document
#[derive(Debug)]
pub struct DragController {
    exclude_header: bool,
    state: DragState,
    cache: TableMapCache,
    handles: Vec<DecorationHandle>,
    indicator: Option<DecorationHandle>,
}

impl DragController {
    pub fn new(settings: &TableSettings) -> Self {
        Self {
            exclude_header: settings.exclude_header_from_moves,
            state: DragState::Idle,
            cache: TableMapCache::new(),
            handles: Vec::new(),
            indicator: None,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn on_pointer_move(
        &mut self,
        doc: &Document,
        view: &mut impl HostView,
        point: Point,
    ) -> DragOutcome {
        match self.state {
            DragState::Dragging(drag) => self.drag_to(doc, view, drag, point),
            DragState::Idle | DragState::Hovering(_) => self.hover(doc, view, point),
        }
    }

    /// Start a drag when the pointer goes down on a row or column handle.
    ///
    /// Ignored while the user has text selected, so the press keeps its
    /// usual meaning of adjusting that selection.
    pub fn on_pointer_down(
        &mut self,
        doc: &Document,
        view: &mut impl HostView,
        point: Point,
    ) -> DragOutcome {
        let DragState::Hovering(hover) = self.state else {
            return DragOutcome::Ignored;
        };
        let Some(orientation) = hover.handle else {
            return DragOutcome::Ignored;
        };
        if doc.selection().has_text_range() {
            return DragOutcome::Ignored;
        }

        if doc.find_table(hover.table_id).is_none() {
            return self.cancel(view, CancelReason::TableRemoved);
        }
        // the hover may predate a document change, so look the cell up again
        let cell = match dom_cell_to_coordinate(doc, &*view, hover.element, &mut self.cache) {
            Ok(cell) if cell.table_id == hover.table_id => cell,
            _ => return self.cancel(view, CancelReason::StaleElement),
        };
        let table_pos = cell.table_pos;
        let table = match ResolvedTable::cached(doc, table_pos, &mut self.cache) {
            Ok(table) => table,
            Err(_) => return self.cancel(view, CancelReason::TableChanged),
        };
        let origin_index = orientation.index_of(cell.coord);
        if origin_index >= table.map.line_count(orientation) {
            return self.cancel(view, CancelReason::TableChanged);
        }
        let Some(handle_bounds) = view.element_bounds(hover.element) else {
            return self.cancel(view, CancelReason::StaleElement);
        };

        let initial_pointer_offset =
            handle_bounds.start_along(orientation) - point.along(orientation);
        let drag = Drag {
            orientation,
            table_id: hover.table_id,
            origin_index,
            last_index: origin_index,
            initial_pointer_offset,
            current_pointer_offset: point.along(orientation) + initial_pointer_offset,
            dims: (table.map.height(), table.map.width()),
        };

        self.clear_decorations(view);
        self.state = DragState::Dragging(drag);
        log::debug!("started dragging {orientation} {origin_index} of table at {table_pos}");
        DragOutcome::DragStarted {
            orientation,
            index: origin_index,
        }
    }

    /// Finish a drag, moving the dragged line to the last drop target
    pub fn on_pointer_up(
        &mut self,
        doc: &mut Document,
        view: &mut impl HostView,
        point: Point,
    ) -> DragOutcome {
        let DragState::Dragging(drag) = self.state else {
            return DragOutcome::Ignored;
        };
        if let DragOutcome::Cancelled(reason) = self.drag_to(doc, view, drag, point) {
            return DragOutcome::Cancelled(reason);
        }
        let DragState::Dragging(drag) = self.state else {
            return DragOutcome::Ignored;
        };

        self.clear_decorations(view);
        self.state = DragState::Idle;

        let tx = {
            let table = match resolve_drag(doc, &mut self.cache, &drag) {
                Ok(table) => table,
                Err(reason) => return DragOutcome::Cancelled(reason),
            };
            match move_line(
                &table,
                drag.orientation,
                drag.origin_index,
                drag.last_index,
                self.exclude_header,
            ) {
                Ok(tx) => tx,
                Err(TableError::MoveRejected(reason)) => {
                    log::debug!("drop rejected: {reason}");
                    return DragOutcome::Rejected(reason);
                }
                Err(err) => {
                    log::warn!("could not build move for table at {}: {err}", table.pos);
                    return DragOutcome::Cancelled(CancelReason::TableChanged);
                }
            }
        };

        match doc.apply(tx) {
            Ok(patch) => {
                log::debug!(
                    "dropped {} {} at {}",
                    drag.orientation,
                    drag.origin_index,
                    drag.last_index
                );
                DragOutcome::Dropped(patch)
            }
            Err(err) => {
                log::warn!("document rejected table move: {err}");
                DragOutcome::Cancelled(CancelReason::TransactionFailed)
            }
        }
    }

    pub fn on_key_down(&mut self, view: &mut impl HostView, key: Key) -> DragOutcome {
        match (key, self.state) {
            (Key::Escape, DragState::Dragging(_)) => self.cancel(view, CancelReason::UserAborted),
            _ => DragOutcome::Ignored,
        }
    }

    /// The pointer left the document root
    pub fn on_pointer_leave(&mut self, view: &mut impl HostView) -> DragOutcome {
        match self.state {
            DragState::Dragging(_) => self.cancel(view, CancelReason::PointerLeft),
            DragState::Hovering(_) => {
                self.clear_decorations(view);
                self.state = DragState::Idle;
                DragOutcome::HoverChanged
            }
            DragState::Idle => DragOutcome::Ignored,
        }
    }

    /// Re-check an in-progress drag after the document changed underneath it
    pub fn on_document_changed(
        &mut self,
        doc: &Document,
        view: &mut impl HostView,
    ) -> DragOutcome {
        match self.state {
            DragState::Dragging(drag) => match resolve_drag(doc, &mut self.cache, &drag) {
                Ok(_) => DragOutcome::Unchanged,
                Err(reason) => self.cancel(view, reason),
            },
            DragState::Hovering(hover) if doc.find_table(hover.table_id).is_none() => {
                self.clear_decorations(view);
                self.state = DragState::Idle;
                DragOutcome::HoverChanged
            }
            DragState::Hovering(_) | DragState::Idle => DragOutcome::Unchanged,
        }
    }

    fn hover(&mut self, doc: &Document, view: &mut impl HostView, point: Point) -> DragOutcome {
        let hit = view.hit_test(point).and_then(|hit| {
            dom_cell_to_coordinate(doc, &*view, hit.element, &mut self.cache)
                .ok()
                .map(|cell| (hit, cell))
        });

        let Some((hit, cell)) = hit else {
            return match self.state {
                DragState::Hovering(_) => {
                    self.clear_decorations(view);
                    self.state = DragState::Idle;
                    DragOutcome::HoverChanged
                }
                _ => DragOutcome::Ignored,
            };
        };

        let hover = Hover {
            table_id: cell.table_id,
            element: hit.element,
            cell_pos: cell.cell_pos,
            cell: cell.coord,
            handle: match hit.region {
                HitRegion::Cell => None,
                HitRegion::RowHandle => Some(Orientation::Row),
                HitRegion::ColumnHandle => Some(Orientation::Column),
            },
        };

        let same_cell = match self.state {
            DragState::Hovering(previous) if previous == hover => return DragOutcome::Unchanged,
            DragState::Hovering(previous) => {
                previous.table_id == hover.table_id && previous.cell_pos == hover.cell_pos
            }
            _ => false,
        };
        if !same_cell {
            self.clear_decorations(view);
            for kind in [DecorationKind::RowHandle, DecorationKind::ColumnHandle] {
                self.handles.push(view.request_decoration(Decoration {
                    kind,
                    target: DecorationTarget::Position(hover.cell_pos),
                }));
            }
        }
        self.state = DragState::Hovering(hover);
        DragOutcome::HoverChanged
    }

    fn drag_to(
        &mut self,
        doc: &Document,
        view: &mut impl HostView,
        mut drag: Drag,
        point: Point,
    ) -> DragOutcome {
        let table = match resolve_drag(doc, &mut self.cache, &drag) {
            Ok(table) => table,
            Err(reason) => return self.cancel(view, reason),
        };
        let Some(bounds) = view.table_bounds(table.pos) else {
            return self.cancel(view, CancelReason::StaleElement);
        };

        let point = bounds.clamp(point);
        drag.current_pointer_offset = point.along(drag.orientation) + drag.initial_pointer_offset;
        self.state = DragState::Dragging(drag);

        let Some(hit) = view.hit_test(point) else {
            return DragOutcome::Unchanged;
        };
        let cell = match dom_cell_to_coordinate(doc, &*view, hit.element, &mut self.cache) {
            Ok(cell) => cell,
            Err(_) => return self.cancel(view, CancelReason::StaleElement),
        };
        // a nested table under the pointer is not a drop target
        if cell.table_id != drag.table_id {
            return DragOutcome::Unchanged;
        }

        let index = drag.orientation.index_of(cell.coord);
        if index == drag.last_index {
            return DragOutcome::Unchanged;
        }

        if let Some(handle) = self.indicator.take() {
            view.clear_decoration(handle);
        }
        if index != drag.origin_index {
            let side = if index > drag.origin_index {
                Side::After
            } else {
                Side::Before
            };
            let first_cell = match drag.orientation {
                Orientation::Row => table.map.offset_at(index, 0),
                Orientation::Column => table.map.offset_at(0, index),
            };
            if let Some(offset) = first_cell {
                self.indicator = Some(view.request_decoration(Decoration {
                    kind: DecorationKind::DropIndicator {
                        orientation: drag.orientation,
                        side,
                    },
                    target: DecorationTarget::Position(table.cell_pos(offset)),
                }));
            }
        }

        drag.last_index = index;
        self.state = DragState::Dragging(drag);
        log::debug!("drop target for {} {} is now {index}", drag.orientation, drag.origin_index);
        DragOutcome::DropTargetChanged { index }
    }

    fn cancel(&mut self, view: &mut impl HostView, reason: CancelReason) -> DragOutcome {
        self.clear_decorations(view);
        self.state = DragState::Idle;
        log::debug!("drag cancelled: {reason}");
        DragOutcome::Cancelled(reason)
    }

    fn clear_decorations(&mut self, view: &mut impl HostView) {
        for handle in self.handles.drain(..).chain(self.indicator.take()) {
            view.clear_decoration(handle);
        }
    }
}

/// Find the dragged table again and check it still has the shape the drag
/// started with
fn resolve_drag<'d>(
    doc: &'d Document,
    cache: &mut TableMapCache,
    drag: &Drag,
) -> Result<ResolvedTable<'d>, CancelReason> {
    let table_pos = doc
        .find_table(drag.table_id)
        .ok_or(CancelReason::TableRemoved)?;
    let table =
        ResolvedTable::cached(doc, table_pos, cache).map_err(|_| CancelReason::TableChanged)?;
    if (table.map.height(), table.map.width()) != drag.dims
        || drag.origin_index >= table.map.line_count(drag.orientation)
    {
        return Err(CancelReason::TableChanged);
    }
    Ok(table)
}
