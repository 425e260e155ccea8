pub mod core;
pub mod layout;
pub mod worker;

pub use self::core::{Commit, Edge, EdgeKind, EdgeSegment, Graph, GraphRow, GraphStats};
pub use self::layout::{
    ColorAssigner, GraphBuilder, LaneAllocator, LaneIdx, PathBuilder, DEFAULT_PALETTE_SIZE,
    DEFAULT_ROW_HEIGHT,
};
pub use self::worker::{GraphEvent, GraphWorker, WorkerError};
