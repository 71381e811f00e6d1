/*!
 * # Host Document Model
 *
 * A small position-addressable document tree with an all-or-nothing
 * transaction API. The table engine only reads nodes and builds
 * transactions; the editor embedding it owns the document and decides when
 * to apply them.
 *
 * ## Positions
 *
 * - A text node occupies one position per character
 * - Every other node occupies its content plus an opening and a closing
 *   position
 * - Position `0` is the start of the document's content
 *
 * ```text
 * <table> <row> <cell> <p> a b </p> </cell> ... </row> </table>
 * 0       1     2      3   4 5 6    7
 * ```
 *
 * ## Module Structure
 *
 * - **`node`**: `Node`, `NodeKind`, cell attributes and `TableId`
 * - **`selection`**: `Selection` variants (caret, text range, cell rectangle)
 * - **`commands`**: `Step` and `Transaction`
 * - **`document`**: `Document`, which owns the tree and applies transactions
 * - **`patch`**: what a committed transaction changed
 */

pub mod commands;
pub mod document;
pub mod node;
pub mod patch;
pub mod selection;

pub use commands::{Step, Transaction};
pub use document::Document;
pub use node::{CellAttrs, CellKind, Node, NodeKind, TableId};
pub use patch::Patch;
pub use selection::{CellSelection, Selection};
