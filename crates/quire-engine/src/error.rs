//! Error types for the table engine

use thiserror::Error;

use crate::table::{Orientation, Rect};

/// Why a host transaction could not be applied
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("No node starts at position {0}")]
    NoNodeAt(usize),

    #[error("Node at position {0} is not a table cell")]
    NotACell(usize),

    #[error("Node at position {0} cannot hold content")]
    NotAContainer(usize),

    #[error("Cannot insert a node at position {0}")]
    InvalidInsertPosition(usize),

    #[error("Selection position {pos} is outside the document (size {size})")]
    SelectionOutOfRange { pos: usize, size: usize },

    #[error("Cell selection endpoint {0} is not a table cell")]
    SelectionNotInCell(usize),
}

/// Structural inconsistency found while indexing a table node
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableProblem {
    #[error("Node is not a table")]
    NotATable,

    #[error("Child {row} of the table is not a row")]
    NotARow { row: usize },

    #[error("Child at offset {offset} in row {row} is not a cell")]
    NotACell { row: usize, offset: usize },

    #[error("Cell at offset {offset} has a zero span")]
    ZeroSpan { offset: usize },

    #[error("Cell at offset {offset} spans past the last row")]
    OverlongRowspan { offset: usize },

    #[error("Two cells cover ({row}, {col})")]
    Collision { row: usize, col: usize },

    #[error("No cell covers ({row}, {col})")]
    Missing { row: usize, col: usize },
}

/// Precondition that stopped a row or column move
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejected {
    #[error("{orientation} {index} is out of range (table has {len})")]
    OutOfRange {
        orientation: Orientation,
        index: usize,
        len: usize,
    },

    #[error("{orientation} {index} is already at that index")]
    SameIndex {
        orientation: Orientation,
        index: usize,
    },

    #[error("Header {orientation} cannot be moved")]
    HeaderLine { orientation: Orientation },

    #[error("{orientation} {index} is part of a merged cell")]
    SpanConflict {
        orientation: Orientation,
        index: usize,
    },
}

/// Why an in-progress drag ended without moving anything
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    #[error("cancelled by the user")]
    UserAborted,

    #[error("pointer left the document")]
    PointerLeft,

    #[error("table was removed")]
    TableRemoved,

    #[error("table structure changed")]
    TableChanged,

    #[error("rendered cell no longer maps to the document")]
    StaleElement,

    #[error("document rejected the move")]
    TransactionFailed,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("({row}, {col}) is outside the {height}x{width} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    #[error("No table cell found: {0}")]
    NotFound(String),

    #[error("Rectangle {0:?} splits a merged cell")]
    InvalidRectangle(Rect),

    #[error("Header can only be toggled on index 0, got {index}")]
    HeaderIndex { index: usize },

    #[error("Move rejected: {0}")]
    MoveRejected(#[from] MoveRejected),

    #[error("Drag cancelled: {0}")]
    Cancelled(CancelReason),

    #[error("Malformed table: {0}")]
    Malformed(#[from] TableProblem),

    #[error("Transaction failed: {0}")]
    Transaction(#[from] TransactionError),
}
