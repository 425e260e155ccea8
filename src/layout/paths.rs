use smallvec::SmallVec;

use crate::core::{Edge, EdgeKind, EdgeSegment};

/// Expands resolved edges into per-row-transition segments.
///
/// A `Line` edge runs from its child row to its parent row: the first
/// transition carries it from the child's lane into the lane it travels
/// down, every following transition is a vertical run in that lane. A
/// dangling `Line` extends to the bottom boundary of the input window. A
/// `Join` edge contributes only the one-row transition into the lane whose
/// carrier line already draws the rest of the way.
#[derive(Debug, Clone, Copy)]
pub struct PathBuilder {
    row_count: usize,
}

impl PathBuilder {
    pub fn new(row_count: usize) -> Self {
        Self { row_count }
    }

    /// Segments for one edge, top to bottom
    pub fn trace(&self, edge: &Edge) -> SmallVec<[EdgeSegment; 2]> {
        let mut segments = SmallVec::new();
        if self.row_count == 0 {
            return segments;
        }
        let bottom = self.row_count - 1;

        match edge.kind {
            EdgeKind::Join => {
                // Backward references (out-of-order input) get no geometry.
                let forward = edge.to_row.map_or(true, |to| to > edge.from_row);
                if forward && edge.from_row < bottom {
                    segments.push(EdgeSegment {
                        start_row: edge.from_row,
                        end_row: edge.from_row + 1,
                        from_lane: edge.from_lane,
                        to_lane: edge.to_lane,
                        is_merge: edge.is_merge,
                    });
                }
            }
            EdgeKind::Line => {
                let end = match edge.to_row {
                    Some(to) if to <= edge.from_row => return segments,
                    Some(to) => to.min(bottom),
                    None => bottom,
                };
                for row in edge.from_row..end {
                    let from_lane = if row == edge.from_row {
                        edge.from_lane
                    } else {
                        edge.to_lane
                    };
                    segments.push(EdgeSegment {
                        start_row: row,
                        end_row: row + 1,
                        from_lane,
                        to_lane: edge.to_lane,
                        is_merge: edge.is_merge,
                    });
                }
            }
        }

        segments
    }
}
