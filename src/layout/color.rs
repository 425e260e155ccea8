use super::lanes::LaneIdx;

/// Deterministic palette-cyclic color selection, keyed to lane allocation
/// events. The palette itself lives in the rendering layer; the engine
/// only hands out indices into it. Color follows the lane index, so each
/// life of a recycled lane gets the same index again.
#[derive(Debug, Clone, Copy)]
pub struct ColorAssigner {
    palette_size: usize,
}

impl ColorAssigner {
    /// A zero palette size is treated as one
    pub fn new(palette_size: usize) -> Self {
        Self {
            palette_size: palette_size.max(1),
        }
    }

    /// Pick the color index for a lane at the moment it is allocated
    pub fn assign(&self, lane: LaneIdx) -> usize {
        lane % self.palette_size
    }
}
