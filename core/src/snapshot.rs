//! Snapshot serialization: full game state to/from JSON.
//!
//! A snapshot captures everything needed to resume a session without
//! knowing how the caller stores it.

use crate::{
    config::SimConfig,
    error::{SimError, SimResult},
    state::GameState,
    types::{Day, SessionId},
};
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSnapshot {
    pub version: u32,
    pub session_id: SessionId,
    pub day: Day,
    pub state: GameState,
}

impl GameSnapshot {
    pub fn capture(session_id: &str, state: &GameState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            session_id: session_id.to_string(),
            day: state.day_number,
            state: state.clone(),
        }
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Unwrap the state after checking it can be played on `config`.
    pub fn restore(self, config: &SimConfig) -> SimResult<GameState> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SimError::InvalidSnapshot {
                reason: format!("unsupported version {}", self.version),
            });
        }
        if self.day != self.state.day_number {
            return Err(SimError::InvalidSnapshot {
                reason: format!("day {} does not match state day {}", self.day, self.state.day_number),
            });
        }
        self.state
            .check_invariants(config)
            .map_err(|reason| SimError::InvalidSnapshot { reason })?;
        Ok(self.state)
    }
}
