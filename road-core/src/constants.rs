pub const LANE_COUNT: usize = 4;
pub const TOP_LANE: usize = 0;
pub const BOTTOM_LANE: usize = LANE_COUNT - 1;

pub const CLEAR_CHAR: char = '.';
pub const PIT_CHAR: char = '0';

// Search bounds. A state past the max turn is abandoned even if it reached the end of the road.
pub const DEFAULT_MAX_TURN: u32 = 50;
pub const DEFAULT_BEST_FIRST_TURNS: u32 = 3;

/// `SLOW` is only offered while the current speed is strictly above this.
pub const SLOW_MIN_SPEED: u32 = 2;
