use alloc::{string::String, vec::Vec};
use core::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};

/// The single per-turn control input shared by every bike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Jump,
    Speed,
    Slow,
    Up,
    Down,
    Wait,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Jump,
        Action::Speed,
        Action::Slow,
        Action::Up,
        Action::Down,
        Action::Wait,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jump => "JUMP",
            Self::Speed => "SPEED",
            Self::Slow => "SLOW",
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Wait => "WAIT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseActionError {
    pub token: String,
}

impl fmt::Display for ParseActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown action '{}' (expected one of JUMP, SPEED, SLOW, UP, DOWN, WAIT)",
            self.token
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseActionError {}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Action::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| ParseActionError {
                token: String::from(token),
            })
    }
}

/// Parses a comma-separated action list such as `SPEED,JUMP,UP`. Empty tokens are skipped.
pub fn parse_action_list(input: &str) -> Result<Vec<Action>, ParseActionError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Action::from_str)
        .collect()
}

pub fn format_action_list(actions: &[Action]) -> String {
    let mut out = String::new();
    for (idx, action) in actions.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push_str(action.as_str());
    }
    out
}
