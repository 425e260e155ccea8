use std::collections::HashMap;

use smallvec::SmallVec;

use crate::core::{Commit, Edge, EdgeKind, Graph, GraphRow};

use super::color::ColorAssigner;
use super::lanes::{LaneAllocator, LaneIdx};
use super::paths::PathBuilder;

/// Row height the history view renders with (pixels per row)
pub const DEFAULT_ROW_HEIGHT: f64 = 28.0;
/// Number of distinct pens the default palette carries
pub const DEFAULT_PALETTE_SIZE: usize = 8;

/// Lays out an ordered commit list in one forward pass.
///
/// The input is assumed ordered so that a commit's parents may appear at
/// any later row, never required earlier. Ids referenced as a parent but
/// not yet reached hold a lane reservation; when the referenced commit
/// arrives it takes that lane, otherwise the line stays open to the bottom
/// of the window. The builder itself only holds configuration, so one
/// instance can serve concurrent calls with independent inputs.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    row_height: f64,
    palette_size: usize,
}

/// Placement of a commit's first occurrence
struct Placed {
    row: usize,
    lane: LaneIdx,
    color: usize,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_HEIGHT, DEFAULT_PALETTE_SIZE)
    }
}

impl GraphBuilder {
    /// `row_height` must be positive; `palette_size` is clamped to one
    /// or more
    pub fn new(row_height: f64, palette_size: usize) -> Self {
        Self {
            row_height,
            palette_size: palette_size.max(1),
        }
    }

    /// Lay out `commits` into a renderable graph.
    ///
    /// Never fails: duplicate ids, dangling parents, out-of-order input
    /// and an empty list all degrade to a valid graph.
    pub fn parse(&self, commits: &[Commit]) -> Graph {
        let mut lanes = LaneAllocator::new();
        let colors = ColorAssigner::new(self.palette_size);

        // parent id -> lane already waiting for it
        let mut reserved: HashMap<String, LaneIdx> = HashMap::new();
        // color picked when each currently-active lane was opened
        let mut lane_colors: HashMap<LaneIdx, usize> = HashMap::new();
        // commit id -> placement of its first occurrence
        let mut placed: HashMap<String, Placed> = HashMap::new();
        // parent id -> edges still waiting for its row
        let mut pending: HashMap<String, SmallVec<[usize; 1]>> = HashMap::new();

        let mut edges: Vec<Edge> = Vec::new();
        let mut slots: Vec<(LaneIdx, usize)> = Vec::with_capacity(commits.len());

        for (row, commit) in commits.iter().enumerate() {
            // Duplicate id: the first occurrence owns the layout, later
            // rows repeat its placement without touching any bookkeeping.
            if let Some(seen) = placed.get(&commit.id) {
                slots.push((seen.lane, seen.color));
                continue;
            }

            let lane = match reserved.remove(&commit.id) {
                Some(lane) => lane,
                None => {
                    // Unreferenced tip (a branch head): open a fresh lane.
                    let lane = lanes.allocate();
                    lane_colors.insert(lane, colors.assign(lane));
                    lane
                }
            };
            let color = lane_colors.get(&lane).copied().unwrap_or_default();

            // Lines that were running toward this commit end here.
            if let Some(waiting) = pending.remove(&commit.id) {
                for idx in waiting {
                    edges[idx].to_row = Some(row);
                }
            }

            placed.insert(
                commit.id.clone(),
                Placed { row, lane, color },
            );

            let is_merge = commit.is_merge();
            let mut carried = false;

            for (nth, parent) in commit.parents.iter().enumerate() {
                if let Some(&target) = reserved.get(parent) {
                    // Convergence: another branch already expects this
                    // parent, so join its line instead of opening one.
                    let idx = edges.len();
                    edges.push(Edge {
                        from: commit.id.clone(),
                        to: parent.clone(),
                        from_row: row,
                        to_row: None,
                        from_lane: lane,
                        to_lane: target,
                        is_merge,
                        kind: EdgeKind::Join,
                    });
                    pending.entry(parent.clone()).or_default().push(idx);
                } else if let Some(above) = placed.get(parent) {
                    // Parent already appeared above; the ordering contract
                    // is broken, keep the link but draw nothing.
                    edges.push(Edge {
                        from: commit.id.clone(),
                        to: parent.clone(),
                        from_row: row,
                        to_row: Some(above.row),
                        from_lane: lane,
                        to_lane: above.lane,
                        is_merge,
                        kind: EdgeKind::Join,
                    });
                } else {
                    let target = if nth == 0 {
                        // The first parent rides this commit's own lane,
                        // keeping the trunk on one column.
                        carried = true;
                        lane
                    } else {
                        let fresh = lanes.allocate();
                        lane_colors.insert(fresh, colors.assign(fresh));
                        fresh
                    };
                    reserved.insert(parent.clone(), target);

                    let idx = edges.len();
                    edges.push(Edge {
                        from: commit.id.clone(),
                        to: parent.clone(),
                        from_row: row,
                        to_row: None,
                        from_lane: lane,
                        to_lane: target,
                        is_merge,
                        kind: EdgeKind::Line,
                    });
                    pending.entry(parent.clone()).or_default().push(idx);
                }
            }

            if !carried {
                lanes.release(lane);
                lane_colors.remove(&lane);
            }

            slots.push((lane, color));
        }

        let paths = PathBuilder::new(commits.len());
        let mut rows: Vec<GraphRow> = commits
            .iter()
            .zip(slots)
            .enumerate()
            .map(|(row, (commit, (lane, color)))| GraphRow {
                row,
                commit: commit.clone(),
                lane,
                color,
                segments: SmallVec::new(),
            })
            .collect();

        for edge in &edges {
            for segment in paths.trace(edge) {
                rows[segment.start_row].segments.push(segment);
                rows[segment.end_row].segments.push(segment);
            }
        }

        let lane_count = lanes.lane_count();
        tracing::debug!(
            rows = rows.len(),
            lanes = lane_count,
            edges = edges.len(),
            "commit graph laid out"
        );

        Graph {
            rows,
            edges,
            lane_count,
            row_height: self.row_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn commit(id: &str, parents: &[&str]) -> Commit {
        Commit::new(id, parents.iter().copied())
    }

    fn lanes_of(graph: &Graph) -> Vec<usize> {
        graph.rows.iter().map(|r| r.lane).collect()
    }

    #[test]
    fn empty_input_yields_empty_graph() {
        let graph = GraphBuilder::default().parse(&[]);
        assert!(graph.is_empty());
        assert_eq!(graph.lane_count, 0);
        assert_eq!(graph.edges.len(), 0);
    }

    #[test]
    fn rows_mirror_input_order() {
        let commits = vec![
            commit("c2", &["c1"]),
            commit("c1", &["c0"]),
            commit("c0", &[]),
        ];
        let graph = GraphBuilder::default().parse(&commits);

        assert_eq!(graph.rows.len(), commits.len());
        for (i, row) in graph.rows.iter().enumerate() {
            assert_eq!(row.row, i);
            assert_eq!(row.commit.id, commits[i].id);
        }
    }

    #[test]
    fn linear_chain_stays_on_one_lane() {
        let commits: Vec<Commit> = (0..6)
            .rev()
            .map(|i| {
                if i == 0 {
                    commit("c0", &[])
                } else {
                    Commit::new(format!("c{i}"), [format!("c{}", i - 1)])
                }
            })
            .collect();
        let graph = GraphBuilder::default().parse(&commits);

        assert_eq!(graph.lane_count, 1);
        assert!(graph.rows.iter().all(|r| r.lane == 0));
        assert!(graph
            .rows
            .iter()
            .flat_map(|r| r.segments.iter())
            .all(|s| s.from_lane == 0 && s.to_lane == 0));
    }

    #[test]
    fn merge_opens_second_lane_and_releases_it_at_convergence() {
        // C3 -- C2 (merge) -- C1a \
        //              \-- C1b ----- C0
        let commits = vec![
            commit("c3", &["c2"]),
            commit("c2", &["c1a", "c1b"]),
            commit("c1a", &["c0"]),
            commit("c1b", &["c0"]),
            commit("c0", &[]),
        ];
        let graph = GraphBuilder::default().parse(&commits);

        assert_eq!(lanes_of(&graph), vec![0, 0, 0, 1, 0]);
        assert_eq!(graph.lane_count, 2);

        // Both parent links of the merge are flagged.
        let merge_edges: Vec<&Edge> = graph.edges.iter().filter(|e| e.from == "c2").collect();
        assert_eq!(merge_edges.len(), 2);
        assert!(merge_edges.iter().all(|e| e.is_merge));

        // c1b converges on c0's reserved lane instead of keeping lane 1.
        let join = graph.edges.iter().find(|e| e.from == "c1b").unwrap();
        assert_eq!(join.kind, EdgeKind::Join);
        assert_eq!((join.from_lane, join.to_lane), (1, 0));
        assert_eq!(join.to_row, Some(4));
    }

    #[test]
    fn merge_second_parent_bends_then_runs_straight() {
        let commits = vec![
            commit("m", &["a", "f"]),
            commit("a", &["c"]),
            commit("f", &["c"]),
            commit("c", &[]),
        ];
        let graph = GraphBuilder::default().parse(&commits);

        let to_f = graph.edges.iter().find(|e| e.to == "f").unwrap();
        assert!(to_f.is_merge);
        assert_eq!(to_f.kind, EdgeKind::Line);

        let paths = PathBuilder::new(commits.len());
        let segments = paths.trace(to_f);
        assert_eq!(segments.len(), 2);
        assert_eq!((segments[0].from_lane, segments[0].to_lane), (0, 1));
        assert_eq!((segments[1].from_lane, segments[1].to_lane), (1, 1));
    }

    #[test]
    fn side_branch_joins_trunk_with_one_diagonal() {
        let commits = vec![
            commit("a", &["b"]),
            commit("f", &["d"]),
            commit("b", &["c"]),
            commit("d", &["c"]),
            commit("c", &[]),
        ];
        let graph = GraphBuilder::default().parse(&commits);

        assert_eq!(lanes_of(&graph), vec![0, 1, 0, 1, 0]);
        assert_eq!(graph.lane_count, 2);

        let join = graph.edges.iter().find(|e| e.from == "d").unwrap();
        assert_eq!(join.kind, EdgeKind::Join);
        assert!(!join.is_merge);

        // Exactly one diagonal carries the branch into the trunk lane; it
        // is listed on both rows it touches.
        let diagonal = |s: &&crate::core::EdgeSegment| s.from_lane == 1 && s.to_lane == 0;
        assert_eq!(graph.rows[3].segments.iter().filter(diagonal).count(), 1);
        assert_eq!(graph.rows[4].segments.iter().filter(diagonal).count(), 1);
    }

    #[test]
    fn dangling_parent_stays_open_to_the_bottom() {
        // c0 is cut off by the history window.
        let commits = vec![
            commit("c2", &["c1"]),
            commit("c1", &["c0"]),
            commit("x", &[]),
        ];
        let graph = GraphBuilder::default().parse(&commits);

        let open = graph.edges.iter().find(|e| e.to == "c0").unwrap();
        assert!(open.is_dangling());

        // The open line keeps its lane busy through the last row.
        let bottom = graph
            .rows
            .last()
            .unwrap()
            .segments
            .iter()
            .any(|s| s.end_row == 2 && s.to_lane == open.to_lane);
        assert!(bottom);

        // The unrelated root cannot take the lane the open line holds.
        assert_eq!(graph.rows[2].lane, 1);
        assert_eq!(graph.lane_count, 2);
    }

    #[test]
    fn duplicate_id_repeats_first_placement() {
        let commits = vec![
            commit("a", &["b"]),
            commit("a", &["b"]),
            commit("b", &[]),
        ];
        let graph = GraphBuilder::default().parse(&commits);

        assert_eq!(graph.rows.len(), 3);
        assert_eq!(graph.rows[1].lane, graph.rows[0].lane);
        assert_eq!(graph.rows[1].color, graph.rows[0].color);
        // Only the first occurrence contributes edges.
        assert_eq!(graph.edges.len(), 1);
    }

    #[test]
    fn parent_listed_before_child_does_not_panic() {
        let commits = vec![commit("c0", &[]), commit("c1", &["c0"])];
        let graph = GraphBuilder::default().parse(&commits);

        assert_eq!(graph.rows.len(), 2);
        let backward = &graph.edges[0];
        assert_eq!(backward.to_row, Some(0));
        assert_eq!(backward.kind, EdgeKind::Join);
        assert!(graph.rows.iter().all(|r| r.segments.is_empty()));
    }

    #[test]
    fn commit_listing_itself_as_parent_is_absorbed() {
        let commits = vec![commit("a", &["a"]), commit("b", &[])];
        let graph = GraphBuilder::default().parse(&commits);

        assert_eq!(graph.rows.len(), 2);
        assert_eq!(graph.edges[0].to_row, Some(0));
        assert!(graph.rows[0].segments.is_empty());
    }

    #[test]
    fn released_lane_is_recycled_for_later_branches() {
        let commits = vec![
            commit("a1", &["a0"]),
            commit("b1", &["b0"]),
            commit("a0", &[]),
            commit("b0", &[]),
            commit("z", &[]),
        ];
        let graph = GraphBuilder::default().parse(&commits);

        assert_eq!(lanes_of(&graph), vec![0, 1, 0, 1, 0]);
        assert_eq!(graph.lane_count, 2);
    }

    #[test]
    fn color_follows_lane_index() {
        let commits = vec![
            commit("a1", &["a0"]),
            commit("b1", &["b0"]),
            commit("c1", &["c0"]),
            commit("a0", &[]),
            commit("b0", &[]),
            commit("c0", &[]),
        ];
        let graph = GraphBuilder::new(28.0, 2).parse(&commits);

        for row in &graph.rows {
            assert_eq!(row.color, row.lane % 2);
        }
    }

    #[test]
    fn identical_input_produces_identical_graphs() {
        let commits = vec![
            commit("m", &["a", "f"]),
            commit("a", &["c"]),
            commit("f", &["c"]),
            commit("c", &["x"]),
        ];
        let builder = GraphBuilder::default();
        assert_eq!(builder.parse(&commits), builder.parse(&commits));
    }

    #[test]
    fn octopus_merge_opens_a_lane_per_extra_parent() {
        let commits = vec![
            commit("m", &["a", "b", "c"]),
            commit("a", &[]),
            commit("b", &[]),
            commit("c", &[]),
        ];
        let graph = GraphBuilder::default().parse(&commits);

        let from_merge: Vec<&Edge> = graph.edges.iter().filter(|e| e.from == "m").collect();
        assert_eq!(from_merge.len(), 3);
        assert!(from_merge.iter().all(|e| e.is_merge));
        assert_eq!(lanes_of(&graph), vec![0, 0, 1, 2]);
        assert_eq!(graph.lane_count, 3);
    }
}
