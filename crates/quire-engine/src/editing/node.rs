use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier carried by every table node.
///
/// Positions shift whenever content is inserted above a table; the id does
/// not, so controllers holding on to a table across edits look it up by id.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct TableId(pub Uuid);

impl TableId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TableId {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a cell renders as a data cell or a header cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Data,
    Header,
}

/// Span and layout attributes of a table cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellAttrs {
    pub rowspan: usize,
    pub colspan: usize,
    /// Persisted pixel width per spanned column; `0` entries are unset
    pub colwidth: Option<Vec<u32>>,
}

impl Default for CellAttrs {
    fn default() -> Self {
        Self {
            rowspan: 1,
            colspan: 1,
            colwidth: None,
        }
    }
}

/// The type of a node in the document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Doc,
    Paragraph,
    Text(String),
    Table { id: TableId },
    TableRow,
    TableCell { kind: CellKind, attrs: CellAttrs },
}

/// A node in the host document tree.
///
/// Positions follow the usual rich-text convention: a text node occupies one
/// position per character, every other node occupies its content plus one
/// position for its opening and one for its closing token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub content: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, content: Vec<Node>) -> Self {
        Self { kind, content }
    }

    pub fn doc(content: Vec<Node>) -> Self {
        Self::new(NodeKind::Doc, content)
    }

    /// A paragraph holding `text`; an empty string yields an empty paragraph
    pub fn paragraph(text: &str) -> Self {
        let content = if text.is_empty() {
            Vec::new()
        } else {
            vec![Self::text(text)]
        };
        Self::new(NodeKind::Paragraph, content)
    }

    pub fn text(text: &str) -> Self {
        Self::new(NodeKind::Text(text.to_string()), Vec::new())
    }

    pub fn table(rows: Vec<Node>) -> Self {
        Self::new(NodeKind::Table { id: TableId::new() }, rows)
    }

    pub fn row(cells: Vec<Node>) -> Self {
        Self::new(NodeKind::TableRow, cells)
    }

    /// A data cell containing a single paragraph
    pub fn cell(text: &str) -> Self {
        Self::new(
            NodeKind::TableCell {
                kind: CellKind::Data,
                attrs: CellAttrs::default(),
            },
            vec![Self::paragraph(text)],
        )
    }

    /// A header cell containing a single paragraph
    pub fn header(text: &str) -> Self {
        Self::new(
            NodeKind::TableCell {
                kind: CellKind::Header,
                attrs: CellAttrs::default(),
            },
            vec![Self::paragraph(text)],
        )
    }

    /// Builder: set the span of a cell. No effect on other node kinds.
    pub fn with_span(mut self, rowspan: usize, colspan: usize) -> Self {
        if let NodeKind::TableCell { attrs, .. } = &mut self.kind {
            attrs.rowspan = rowspan;
            attrs.colspan = colspan;
        }
        self
    }

    /// Builder: set the persisted column widths of a cell
    pub fn with_colwidth(mut self, widths: Vec<u32>) -> Self {
        if let NodeKind::TableCell { attrs, .. } = &mut self.kind {
            attrs.colwidth = Some(widths);
        }
        self
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    pub fn is_table(&self) -> bool {
        matches!(self.kind, NodeKind::Table { .. })
    }

    pub fn is_row(&self) -> bool {
        matches!(self.kind, NodeKind::TableRow)
    }

    pub fn is_cell(&self) -> bool {
        matches!(self.kind, NodeKind::TableCell { .. })
    }

    pub fn table_id(&self) -> Option<TableId> {
        match self.kind {
            NodeKind::Table { id } => Some(id),
            _ => None,
        }
    }

    pub fn cell_kind(&self) -> Option<CellKind> {
        match self.kind {
            NodeKind::TableCell { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn cell_attrs(&self) -> Option<&CellAttrs> {
        match &self.kind {
            NodeKind::TableCell { attrs, .. } => Some(attrs),
            _ => None,
        }
    }

    /// Number of positions this node occupies in its parent
    pub fn size(&self) -> usize {
        match &self.kind {
            NodeKind::Text(text) => text.chars().count(),
            _ => self.content_size() + 2,
        }
    }

    pub fn content_size(&self) -> usize {
        self.content.iter().map(Node::size).sum()
    }

    /// Concatenated text of every descendant text node
    pub fn text_content(&self) -> String {
        match &self.kind {
            NodeKind::Text(text) => text.clone(),
            _ => self.content.iter().map(Node::text_content).collect(),
        }
    }

    /// True for a cell (or any container) whose only content is blank paragraphs
    pub fn has_empty_content(&self) -> bool {
        self.content
            .iter()
            .all(|child| matches!(child.kind, NodeKind::Paragraph) && child.content.is_empty())
    }

    /// The node starting exactly at `pos`, relative to this node's content start
    pub fn node_at(&self, pos: usize) -> Option<&Node> {
        let path = self.path_to(pos)?;
        self.node_at_path(&path)
    }

    /// Child-index path of the node starting exactly at `pos`.
    ///
    /// When `pos` is both the end of one child and the start of the next,
    /// the shallowest starting node wins.
    pub fn path_to(&self, pos: usize) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut node = self;
        let mut pos = pos;

        'descend: loop {
            let mut offset = 0;
            for (index, child) in node.content.iter().enumerate() {
                let end = offset + child.size();
                if offset == pos {
                    path.push(index);
                    return Some(path);
                }
                if pos < end {
                    if child.is_text() {
                        return None;
                    }
                    path.push(index);
                    node = child;
                    pos -= offset + 1;
                    continue 'descend;
                }
                offset = end;
            }
            return None;
        }
    }

    /// Parent path and child index where a node inserted at `pos` would land
    pub fn insertion_point(&self, pos: usize) -> Option<(Vec<usize>, usize)> {
        let mut path = Vec::new();
        let mut node = self;
        let mut pos = pos;

        'descend: loop {
            let mut offset = 0;
            for (index, child) in node.content.iter().enumerate() {
                let end = offset + child.size();
                if offset == pos {
                    return Some((path, index));
                }
                if pos < end {
                    if child.is_text() {
                        return None;
                    }
                    path.push(index);
                    node = child;
                    pos -= offset + 1;
                    continue 'descend;
                }
                offset = end;
            }
            return (offset == pos).then_some((path, node.content.len()));
        }
    }

    pub fn node_at_path(&self, path: &[usize]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, &index| node.content.get(index))
    }

    pub fn node_at_path_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        path.iter()
            .try_fold(self, |node, &index| node.content.get_mut(index))
    }

    /// Every non-text node whose span contains `pos`, outermost first, with
    /// the position just before each one.
    ///
    /// A position equal to a node's start counts as inside that node, so a
    /// position resolved from a rendered cell element finds the cell.
    pub fn ancestors_at(&self, pos: usize) -> Vec<(usize, &Node)> {
        let mut ancestors = Vec::new();
        let mut node = self;
        let mut base = 0;
        let mut pos = pos;

        'descend: loop {
            let mut offset = 0;
            for child in &node.content {
                let end = offset + child.size();
                if offset <= pos && pos < end {
                    if child.is_text() {
                        return ancestors;
                    }
                    ancestors.push((base + offset, child));
                    if pos == offset {
                        return ancestors;
                    }
                    base += offset + 1;
                    pos -= offset + 1;
                    node = child;
                    continue 'descend;
                }
                offset = end;
            }
            return ancestors;
        }
    }
}
