//! Public record of an accepted move

use serde::{Deserialize, Serialize};
use crate::commitment::Digest;
use crate::error::GameResult;
use crate::game::{GameId, Move, Seat, TurnIndex};

/// Emitted once per accepted move.
///
/// Carries only public data: the move coordinates and the blinded board
/// commitment. The unmasked board never leaves the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEvent {
    pub game_id: GameId,
    pub seat: Seat,
    #[serde(rename = "move")]
    pub mv: Move,
    pub new_board_commitment: Digest,
    /// Turn index the move was played at (the first move is turn 0)
    pub turn: TurnIndex,
}

impl MoveEvent {
    pub fn to_json(&self) -> GameResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> GameResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
