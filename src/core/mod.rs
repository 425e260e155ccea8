pub mod commit;
pub mod edge;
pub mod graph;

pub use commit::Commit;
pub use edge::{Edge, EdgeKind};
pub use graph::{EdgeSegment, Graph, GraphRow, GraphStats};
