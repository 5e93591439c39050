use alloc::{sync::Arc, vec::Vec};
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::config::CaseConfig;
use crate::constants::{BOTTOM_LANE, LANE_COUNT, TOP_LANE};
use crate::error::{ConfigError, StateRule};
use crate::road::{Cell, Road};


#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bike {
    pub id: u32,
    pub lane: usize,
    pub alive: bool,
}

/// What the current action asks of the movement step. Lives for exactly one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PendingMove {
    Drive,
    Jump,
    LaneUp,
    LaneDown,
}

/// World at the start of a turn. Cloning deep-copies the bikes and shares the road.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    position: usize,
    turn: u32,
    speed: u32,
    total_bikes: u32,
    min_survivors: u32,
    alive_count: u32,
    road: Arc<Road>,
    bikes: Vec<Bike>,
    end_of_road: bool,
}

impl GameState {
    pub fn new(config: &CaseConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let road = Road::parse(&config.lanes)?;

        let bikes: Vec<Bike> = config
            .bikes
            .iter()
            .map(|(&id, spec)| Bike {
                id,
                lane: spec.lane as usize,
                alive: spec.alive,
            })
            .collect();
        let alive_count = bikes.iter().filter(|bike| bike.alive).count() as u32;

        Ok(Self {
            position: 0,
            turn: 0,
            speed: config.initial_speed,
            total_bikes: config.bike_count,
            min_survivors: config.min_survivors,
            alive_count,
            road: Arc::new(road),
            bikes,
            end_of_road: false,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn total_bikes(&self) -> u32 {
        self.total_bikes
    }

    pub fn min_survivors(&self) -> u32 {
        self.min_survivors
    }

    pub fn alive_count(&self) -> u32 {
        self.alive_count
    }

    pub fn end_of_road(&self) -> bool {
        self.end_of_road
    }

    pub fn road(&self) -> &Road {
        &self.road
    }

    pub fn bikes(&self) -> &[Bike] {
        &self.bikes
    }

    pub fn bike(&self, id: u32) -> Option<&Bike> {
        self.bikes
            .binary_search_by_key(&id, |bike| bike.id)
            .ok()
            .map(|idx| &self.bikes[idx])
    }

    pub fn meets_survivor_bound(&self) -> bool {
        self.alive_count >= self.min_survivors
    }

    pub fn lane_occupied(&self, lane: usize) -> bool {
        self.bikes.iter().any(|bike| bike.alive && bike.lane == lane)
    }

    pub fn top_lane_occupied(&self) -> bool {
        self.lane_occupied(TOP_LANE)
    }

    pub fn bottom_lane_occupied(&self) -> bool {
        self.lane_occupied(BOTTOM_LANE)
    }

    /// Returns the state one turn after `action`, leaving `self` untouched.
    pub fn apply_action(&self, action: Action) -> GameState {
        let mut next = self.clone();
        next.step(action);
        next
    }

    /// Plays one turn in place and returns how many bikes were lost.
    pub fn step(&mut self, action: Action) -> u32 {
        let pending = self.begin_turn(action);
        let lost = self.move_and_resolve(pending);
        self.position += self.speed as usize;
        self.turn += 1;
        debug_assert_eq!(self.validate(), Ok(()));
        lost
    }

    fn begin_turn(&mut self, action: Action) -> PendingMove {
        match action {
            Action::Jump => PendingMove::Jump,
            Action::Speed => {
                self.speed += 1;
                PendingMove::Drive
            }
            Action::Slow => {
                self.speed = self.speed.saturating_sub(1);
                PendingMove::Drive
            }
            Action::Up => {
                if self.top_lane_occupied() {
                    return PendingMove::Drive;
                }
                self.shift_alive_bikes(|lane| lane - 1);
                PendingMove::LaneUp
            }
            Action::Down => {
                if self.bottom_lane_occupied() {
                    return PendingMove::Drive;
                }
                self.shift_alive_bikes(|lane| lane + 1);
                PendingMove::LaneDown
            }
            Action::Wait => PendingMove::Drive,
        }
    }

    // Dead bikes keep the lane they died in.
    fn shift_alive_bikes(&mut self, shift: impl Fn(usize) -> usize) {
        for bike in self.bikes.iter_mut().filter(|bike| bike.alive) {
            bike.lane = shift(bike.lane);
        }
    }

    fn move_and_resolve(&mut self, pending: PendingMove) -> u32 {
        let from = self.position;
        let mut to = from + self.speed as usize;
        let last_cell = self.road.length() - 1;
        if to > last_cell {
            to = last_cell;
            self.end_of_road = true;
        }

        // Every check reads lane content only, so casualties from this turn cannot
        // influence each other.
        let road = &*self.road;
        let mut lost = 0u32;
        for bike in self.bikes.iter_mut().filter(|bike| bike.alive) {
            if crashes(road, bike.lane, pending, from, to) {
                bike.alive = false;
                lost += 1;
            }
        }
        self.alive_count -= lost;
        lost
    }

    pub fn validate(&self) -> Result<(), StateRule> {
        let alive = self.bikes.iter().filter(|bike| bike.alive).count() as u32;
        if alive != self.alive_count {
            return Err(StateRule::AliveCountMismatch);
        }
        if self.alive_count > self.total_bikes {
            return Err(StateRule::AliveCountExceedsTotal);
        }
        if self
            .bikes
            .iter()
            .any(|bike| bike.alive && bike.lane >= LANE_COUNT)
        {
            return Err(StateRule::BikeLaneOutOfRange);
        }
        if self.bikes.windows(2).any(|pair| pair[0].id >= pair[1].id) {
            return Err(StateRule::BikeOrder);
        }
        Ok(())
    }
}

/// `lane` is the bike's lane after any shift made this turn; `from..=to` is the stretch covered.
fn crashes(road: &Road, lane: usize, pending: PendingMove, from: usize, to: usize) -> bool {
    match pending {
        PendingMove::LaneUp => {
            road.has_pit(lane + 1, from..to) || road.has_pit(lane, from..to + 1)
        }
        PendingMove::LaneDown => {
            road.has_pit(lane - 1, from..to) || road.has_pit(lane, from..to + 1)
        }
        PendingMove::Jump => road.cell(lane, to) == Cell::Pit,
        PendingMove::Drive => road.has_pit(lane, from..to + 1),
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "turn={} position={} speed={} alive={}/{} min={} end_of_road={}",
            self.turn,
            self.position,
            self.speed,
            self.alive_count,
            self.total_bikes,
            self.min_survivors,
            self.end_of_road
        )
    }
}
