use smallvec::SmallVec;

use super::commit::Commit;
use super::edge::Edge;

/// One drawable transition between two adjacent rows. Equal lanes render as
/// a vertical run; unequal lanes render as a short diagonal interpolating
/// between the two lane columns across one row height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSegment {
    pub start_row: usize,
    /// Always `start_row + 1`; consumers may coalesce consecutive
    /// same-lane segments when batching draw calls
    pub end_row: usize,
    pub from_lane: usize,
    pub to_lane: usize,
    pub is_merge: bool,
}

/// A row in the laid-out graph
#[derive(Debug, Clone, PartialEq)]
pub struct GraphRow {
    /// Row index, equal to the commit's position in the input
    pub row: usize,
    /// The commit occupying this row
    pub commit: Commit,
    /// Lane the commit dot sits in
    pub lane: usize,
    /// Palette index picked when this row's lane was opened
    pub color: usize,
    /// Every segment starting or ending at this row, so a viewport of rows
    /// `a..=b` needs no rows outside itself to draw all intersecting lines
    pub segments: SmallVec<[EdgeSegment; 4]>,
}

/// Immutable layout result, rebuilt from scratch whenever the input changes
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    /// One row per input commit, in input order
    pub rows: Vec<GraphRow>,
    /// One edge per parent reference, in creation order
    pub edges: Vec<Edge>,
    /// Number of lane columns the layout opened (graph width)
    pub lane_count: usize,
    /// Pixels per row, carried for the consumer's y mapping
    pub row_height: f64,
}

impl Graph {
    pub fn empty(row_height: f64) -> Self {
        Self {
            rows: Vec::new(),
            edges: Vec::new(),
            lane_count: 0,
            row_height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total pixel height of the rendered graph
    pub fn pixel_height(&self) -> f64 {
        self.rows.len() as f64 * self.row_height
    }

    /// Summary counters over a built graph
    pub fn stats(&self) -> GraphStats {
        let merge_commits = self.rows.iter().filter(|r| r.commit.is_merge()).count();
        let root_commits = self.rows.iter().filter(|r| r.commit.is_root()).count();
        let dangling_edges = self.edges.iter().filter(|e| e.is_dangling()).count();

        GraphStats {
            total_commits: self.rows.len(),
            total_edges: self.edges.len(),
            merge_commits,
            root_commits,
            dangling_edges,
            width: self.lane_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    pub total_commits: usize,
    pub total_edges: usize,
    pub merge_commits: usize,
    pub root_commits: usize,
    pub dangling_edges: usize,
    pub width: usize,
}
