#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod action;
pub mod config;
pub mod constants;
pub mod error;
pub mod replay;
pub mod road;
pub mod search;
pub mod state;

pub use action::{format_action_list, parse_action_list, Action, ParseActionError};
pub use config::{BikeSpec, CaseConfig};
pub use error::{ConfigError, ReplayError, StateRule};
pub use replay::{replay, verify_sequence, ReplayResult, TurnRecord};
pub use road::{Cell, Road};
pub use search::{
    find_valid_sequence, search, valid_actions, SearchLimits, SearchReport, SearchStats, Solution,
};
pub use state::{Bike, GameState};
