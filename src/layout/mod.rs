pub mod builder;
pub mod color;
pub mod lanes;
pub mod paths;

pub use builder::{GraphBuilder, DEFAULT_PALETTE_SIZE, DEFAULT_ROW_HEIGHT};
pub use color::ColorAssigner;
pub use lanes::{LaneAllocator, LaneIdx};
pub use paths::PathBuilder;
