use crate::editing::{Node, Patch, Selection, TableId, Transaction};
use crate::error::TransactionError;

/// In-memory host document.
///
/// Owns the node tree, the current selection and a version counter. The
/// tree is only ever changed through [`Document::apply`], which either
/// commits a whole transaction or leaves the document untouched.
#[derive(Debug, Clone)]
pub struct Document {
    root: Node,
    selection: Selection,
    version: u64,
}

impl Document {
    /// Create a document from top-level block nodes
    pub fn new(content: Vec<Node>) -> Self {
        Self {
            root: Node::doc(content),
            selection: Selection::default(),
            version: 0,
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn content_size(&self) -> usize {
        self.root.content_size()
    }

    /// The node starting at absolute position `pos`
    pub fn node_at(&self, pos: usize) -> Option<&Node> {
        self.root.node_at(pos)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) -> Result<(), TransactionError> {
        validate_selection(&self.root, &selection)?;
        self.selection = selection;
        Ok(())
    }

    /// Incremented once per committed transaction
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply a transaction atomically.
    ///
    /// Steps run against a copy of the tree; the copy replaces the live tree
    /// only when every step and the requested selection are valid. Without
    /// an explicit selection the previous one is kept if it still fits the
    /// new tree, otherwise it collapses to a caret.
    pub fn apply(&mut self, tx: Transaction) -> Result<Patch, TransactionError> {
        let mut root = self.root.clone();
        let mut changed = Vec::with_capacity(tx.steps().len());

        for step in tx.steps() {
            changed.push(step.apply_to(&mut root)?);
        }

        let selection = match tx.selection() {
            Some(selection) => {
                validate_selection(&root, &selection)?;
                selection
            }
            None => fallback_selection(&root, self.selection),
        };

        self.root = root;
        self.selection = selection;
        self.version += 1;

        Ok(Patch {
            changed,
            new_selection: selection,
            version: self.version,
        })
    }

    /// Current position of the table carrying `id`
    pub fn find_table(&self, id: TableId) -> Option<usize> {
        self.tables()
            .into_iter()
            .find(|(_, table_id)| *table_id == id)
            .map(|(pos, _)| pos)
    }

    /// Every table in document order, with its position
    pub fn tables(&self) -> Vec<(usize, TableId)> {
        let mut tables = Vec::new();
        collect_tables(&self.root, 0, &mut tables);
        tables
    }
}

fn collect_tables(node: &Node, content_start: usize, out: &mut Vec<(usize, TableId)>) {
    let mut offset = content_start;
    for child in &node.content {
        if let Some(id) = child.table_id() {
            out.push((offset, id));
        }
        if !child.is_text() {
            collect_tables(child, offset + 1, out);
        }
        offset += child.size();
    }
}

fn validate_selection(root: &Node, selection: &Selection) -> Result<(), TransactionError> {
    let size = root.content_size();
    for pos in [selection.anchor(), selection.head()] {
        if pos > size {
            return Err(TransactionError::SelectionOutOfRange { pos, size });
        }
    }
    if let Selection::CellRectangle(cells) = selection {
        for pos in [cells.anchor_cell, cells.head_cell] {
            if !root.node_at(pos).is_some_and(Node::is_cell) {
                return Err(TransactionError::SelectionNotInCell(pos));
            }
        }
    }
    Ok(())
}

fn fallback_selection(root: &Node, previous: Selection) -> Selection {
    if validate_selection(root, &previous).is_ok() {
        previous
    } else {
        Selection::Point(previous.head().min(root.content_size()))
    }
}
