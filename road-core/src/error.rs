use core::fmt;

use crate::action::Action;

/// Invariant codes reported by [`crate::GameState::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateRule {
    AliveCountMismatch,
    AliveCountExceedsTotal,
    BikeLaneOutOfRange,
    BikeOrder,
}

impl fmt::Display for StateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AliveCountMismatch => write!(f, "ALIVE_COUNT_MISMATCH"),
            Self::AliveCountExceedsTotal => write!(f, "ALIVE_COUNT_EXCEEDS_TOTAL"),
            Self::BikeLaneOutOfRange => write!(f, "BIKE_LANE_OUT_OF_RANGE"),
            Self::BikeOrder => write!(f, "BIKE_ORDER"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StateRule {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    EmptyRoad,
    LaneLengthMismatch {
        lane: usize,
        expected: usize,
        actual: usize,
    },
    InvalidCell {
        lane: usize,
        index: usize,
        found: char,
    },
    BikeLaneOutOfRange {
        bike: u32,
        lane: u8,
    },
    BikeCountMismatch {
        declared: u32,
        actual: usize,
    },
    MinSurvivorsExceedBikes {
        min_survivors: u32,
        bike_count: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRoad => write!(f, "road has no cells"),
            Self::LaneLengthMismatch {
                lane,
                expected,
                actual,
            } => write!(
                f,
                "lane {lane} length mismatch: expected {expected} cells, got {actual}"
            ),
            Self::InvalidCell { lane, index, found } => {
                write!(f, "invalid cell {found:?} in lane {lane} at index {index}")
            }
            Self::BikeLaneOutOfRange { bike, lane } => {
                write!(f, "bike {bike} placed on lane {lane} (allowed 0..=3)")
            }
            Self::BikeCountMismatch { declared, actual } => write!(
                f,
                "bike count mismatch: declared {declared}, got {actual} bike records"
            ),
            Self::MinSurvivorsExceedBikes {
                min_survivors,
                bike_count,
            } => write!(
                f,
                "min_survivors {min_survivors} exceeds bike count {bike_count}"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplayError {
    IllegalAction { turn: u32, action: Action },
    ActionAfterEndOfRoad { turn: u32 },
    SurvivorsBelowMinimum { turn: u32, alive: u32, min: u32 },
    TurnLimitExceeded { turn: u32, max_turn: u32 },
    RoadNotFinished { turns: u32, position: usize },
    InvalidState { turn: u32, rule: StateRule },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalAction { turn, action } => {
                write!(f, "illegal action {action} at turn {turn}")
            }
            Self::ActionAfterEndOfRoad { turn } => {
                write!(f, "action at turn {turn} issued after the end of the road")
            }
            Self::SurvivorsBelowMinimum { turn, alive, min } => write!(
                f,
                "survivors below minimum after turn {turn}: alive={alive}, min={min}"
            ),
            Self::TurnLimitExceeded { turn, max_turn } => {
                write!(f, "turn limit exceeded: reached turn {turn}, max {max_turn}")
            }
            Self::RoadNotFinished { turns, position } => write!(
                f,
                "sequence ended after {turns} turns at position {position} before the end of the road"
            ),
            Self::InvalidState { turn, rule } => {
                write!(f, "state invariant violated at turn {turn}: {rule}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ReplayError {}
