use serde::{Deserialize, Serialize};

/// Document selection.
///
/// Positions are absolute document positions. A cell rectangle is described
/// by the positions just before its anchor and head cells; the rectangle
/// itself is derived from the table map when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// Collapsed caret
    Point(usize),
    /// Text range; `anchor` is where the selection started
    Range { anchor: usize, head: usize },
    /// Rectangular block of table cells
    CellRectangle(CellSelection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSelection {
    pub anchor_cell: usize,
    pub head_cell: usize,
}

impl Selection {
    pub fn anchor(&self) -> usize {
        match *self {
            Selection::Point(pos) => pos,
            Selection::Range { anchor, .. } => anchor,
            Selection::CellRectangle(cells) => cells.anchor_cell,
        }
    }

    pub fn head(&self) -> usize {
        match *self {
            Selection::Point(pos) => pos,
            Selection::Range { head, .. } => head,
            Selection::CellRectangle(cells) => cells.head_cell,
        }
    }

    pub fn from(&self) -> usize {
        self.anchor().min(self.head())
    }

    pub fn to(&self) -> usize {
        self.anchor().max(self.head())
    }

    /// True when the user has a non-empty text range selected
    pub fn has_text_range(&self) -> bool {
        match self {
            Selection::Range { anchor, head } => anchor != head,
            Selection::Point(_) | Selection::CellRectangle(_) => false,
        }
    }

    /// Map every position through `map`, keeping the selection kind
    pub fn map(&self, map: impl Fn(usize) -> usize) -> Selection {
        match *self {
            Selection::Point(pos) => Selection::Point(map(pos)),
            Selection::Range { anchor, head } => Selection::Range {
                anchor: map(anchor),
                head: map(head),
            },
            Selection::CellRectangle(cells) => Selection::CellRectangle(CellSelection {
                anchor_cell: map(cells.anchor_cell),
                head_cell: map(cells.head_cell),
            }),
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Point(0)
    }
}
