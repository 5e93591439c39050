use alloc::{collections::BTreeMap, string::String};
use serde::{Deserialize, Serialize};

use crate::constants::LANE_COUNT;
use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BikeSpec {
    pub lane: u8,
    #[serde(default = "default_alive")]
    pub alive: bool,
}

fn default_alive() -> bool {
    true
}

/// One test case: the fixed parameters an initial [`crate::GameState`] is built from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseConfig {
    pub bike_count: u32,
    pub min_survivors: u32,
    pub initial_speed: u32,
    pub lanes: [String; LANE_COUNT],
    pub bikes: BTreeMap<u32, BikeSpec>,
}

impl CaseConfig {
    /// Checks everything except the lane text, which [`crate::Road::parse`] handles.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bikes.len() != self.bike_count as usize {
            return Err(ConfigError::BikeCountMismatch {
                declared: self.bike_count,
                actual: self.bikes.len(),
            });
        }

        if self.min_survivors > self.bike_count {
            return Err(ConfigError::MinSurvivorsExceedBikes {
                min_survivors: self.min_survivors,
                bike_count: self.bike_count,
            });
        }

        for (&bike, spec) in &self.bikes {
            if spec.lane as usize >= LANE_COUNT {
                return Err(ConfigError::BikeLaneOutOfRange {
                    bike,
                    lane: spec.lane,
                });
            }
        }

        Ok(())
    }
}
