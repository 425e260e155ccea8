/// How an edge occupies lanes between its two rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Owns its target lane from the child row down to the parent row
    Line,
    /// Joins a line another child already opened toward the same parent;
    /// only the one-row joining transition belongs to this edge
    Join,
}

/// One parent link, resolved to graph coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Source commit ID (child)
    pub from: String,
    /// Target commit ID (parent)
    pub to: String,
    /// Row of the child commit
    pub from_row: usize,
    /// Row of the parent commit; `None` while the parent has not appeared
    pub to_row: Option<usize>,
    /// Lane of the child commit
    pub from_lane: usize,
    /// Lane the link travels down and terminates in
    pub to_lane: usize,
    /// True for every parent link of a multi-parent commit
    pub is_merge: bool,
    pub kind: EdgeKind,
}

impl Edge {
    /// A dangling edge references a parent missing from the input window
    pub fn is_dangling(&self) -> bool {
        self.to_row.is_none()
    }
}
