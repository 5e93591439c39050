use alloc::{string::String, vec::Vec};
use core::ops::Range;

use crate::constants::{CLEAR_CHAR, LANE_COUNT, PIT_CHAR};
use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Clear,
    Pit,
}

impl Cell {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            CLEAR_CHAR => Some(Self::Clear),
            PIT_CHAR => Some(Self::Pit),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Clear => CLEAR_CHAR,
            Self::Pit => PIT_CHAR,
        }
    }
}

/// Four equal-length lanes. Never mutated once parsed; states share it behind an `Arc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Road {
    lanes: [Vec<Cell>; LANE_COUNT],
    length: usize,
}

impl Road {
    pub fn parse(lanes: &[String; LANE_COUNT]) -> Result<Self, ConfigError> {
        let length = lanes[0].chars().count();
        if length == 0 {
            return Err(ConfigError::EmptyRoad);
        }

        let mut parsed: [Vec<Cell>; LANE_COUNT] = Default::default();
        for (lane, text) in lanes.iter().enumerate() {
            let mut cells = Vec::with_capacity(length);
            for (index, ch) in text.chars().enumerate() {
                let cell = Cell::from_char(ch).ok_or(ConfigError::InvalidCell {
                    lane,
                    index,
                    found: ch,
                })?;
                cells.push(cell);
            }
            if cells.len() != length {
                return Err(ConfigError::LaneLengthMismatch {
                    lane,
                    expected: length,
                    actual: cells.len(),
                });
            }
            parsed[lane] = cells;
        }

        Ok(Self {
            lanes: parsed,
            length,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn cell(&self, lane: usize, index: usize) -> Cell {
        self.lanes[lane][index]
    }

    /// True if any cell of `lane` inside `cells` is a pit. The range is clamped to the road.
    pub fn has_pit(&self, lane: usize, cells: Range<usize>) -> bool {
        let end = cells.end.min(self.length);
        let start = cells.start.min(end);
        self.lanes[lane][start..end].contains(&Cell::Pit)
    }

    pub fn render_lane(&self, lane: usize) -> String {
        self.lanes[lane].iter().map(|cell| cell.as_char()).collect()
    }
}
