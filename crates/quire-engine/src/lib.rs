pub mod editing;
pub mod error;
pub mod interaction;
pub mod table;
pub mod view;

// Re-export key types for easier usage
pub use editing::{Document, Node, Patch, Selection, Transaction};
pub use error::{CancelReason, MoveRejected, TableError, TableProblem, TransactionError};
pub use interaction::{ColumnResizer, DragController, DragOutcome, Key, ResizeOutcome};
pub use table::{Orientation, Rect, TableMap};
pub use view::HostView;
