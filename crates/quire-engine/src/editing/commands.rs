use std::ops::Range;

use crate::editing::{CellAttrs, CellKind, Node, NodeKind, Selection};
use crate::error::TransactionError;

/// A single document mutation.
///
/// Positions refer to the document as it stands after every earlier step of
/// the same transaction has been applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Swap the node starting at `pos` for `node`
    ReplaceNode { pos: usize, node: Node },
    /// Insert `node` at the child boundary `pos`
    InsertNode { pos: usize, node: Node },
    /// Remove the node starting at `pos`
    DeleteNode { pos: usize },
    /// Replace the children of the container starting at `pos`
    ReplaceContent { pos: usize, content: Vec<Node> },
    /// Change a cell between data and header type, keeping its content
    SetCellKind { pos: usize, kind: CellKind },
    /// Replace a cell's attributes
    SetAttrs { pos: usize, attrs: CellAttrs },
}

/// An ordered batch of steps plus the selection to establish afterwards.
///
/// Applied all-or-nothing by [`Document::apply`](crate::editing::Document::apply).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    steps: Vec<Step>,
    selection: Option<Selection>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// True when applying would change neither content nor selection
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.selection.is_none()
    }
}

impl Step {
    /// Apply to `root`, returning the range of the new document this step touched
    pub(crate) fn apply_to(&self, root: &mut Node) -> Result<Range<usize>, TransactionError> {
        match self {
            Step::ReplaceNode { pos, node } => {
                let target = node_mut(root, *pos)?;
                *target = node.clone();
                Ok(*pos..*pos + node.size())
            }
            Step::InsertNode { pos, node } => {
                let (parent_path, index) = root
                    .insertion_point(*pos)
                    .ok_or(TransactionError::InvalidInsertPosition(*pos))?;
                let parent = root
                    .node_at_path_mut(&parent_path)
                    .ok_or(TransactionError::InvalidInsertPosition(*pos))?;
                if parent.is_text() {
                    return Err(TransactionError::InvalidInsertPosition(*pos));
                }
                parent.content.insert(index, node.clone());
                Ok(*pos..*pos + node.size())
            }
            Step::DeleteNode { pos } => {
                let path = root.path_to(*pos).ok_or(TransactionError::NoNodeAt(*pos))?;
                let (index, parent_path) = path
                    .split_last()
                    .ok_or(TransactionError::NoNodeAt(*pos))?;
                let parent = root
                    .node_at_path_mut(parent_path)
                    .ok_or(TransactionError::NoNodeAt(*pos))?;
                parent.content.remove(*index);
                Ok(*pos..*pos)
            }
            Step::ReplaceContent { pos, content } => {
                let target = node_mut(root, *pos)?;
                if target.is_text() {
                    return Err(TransactionError::NotAContainer(*pos));
                }
                target.content = content.clone();
                Ok(*pos..*pos + target.size())
            }
            Step::SetCellKind { pos, kind } => {
                let target = node_mut(root, *pos)?;
                match &mut target.kind {
                    NodeKind::TableCell { kind: current, .. } => *current = *kind,
                    _ => return Err(TransactionError::NotACell(*pos)),
                }
                Ok(*pos..*pos + target.size())
            }
            Step::SetAttrs { pos, attrs } => {
                let target = node_mut(root, *pos)?;
                match &mut target.kind {
                    NodeKind::TableCell { attrs: current, .. } => *current = attrs.clone(),
                    _ => return Err(TransactionError::NotACell(*pos)),
                }
                Ok(*pos..*pos + target.size())
            }
        }
    }
}

fn node_mut(root: &mut Node, pos: usize) -> Result<&mut Node, TransactionError> {
    let path = root.path_to(pos).ok_or(TransactionError::NoNodeAt(pos))?;
    root.node_at_path_mut(&path)
        .ok_or(TransactionError::NoNodeAt(pos))
}
