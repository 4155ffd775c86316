//! Seats and the private, locally-held player state

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::commitment::{PlayerSecrets, Secret};
use crate::error::{GameResult, ProtocolError};
use super::board::{mask, unmask, Board, BoardSize, MaskedBoard};
use super::TurnIndex;

/// One of the two fixed player roles. White holds seat 0 and moves on even turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    White,
    Black,
}

impl Seat {
    /// Seat index in `GameState::seat_commitments`
    pub fn index(&self) -> usize {
        match self {
            Seat::White => 0,
            Seat::Black => 1,
        }
    }

    pub fn from_index(index: usize) -> GameResult<Self> {
        match index {
            0 => Ok(Seat::White),
            1 => Ok(Seat::Black),
            _ => Err(ProtocolError::invalid_parameter(
                "seat",
                format!("Invalid seat index: {}", index),
            )),
        }
    }

    pub fn is_white(&self) -> bool {
        matches!(self, Seat::White)
    }

    pub fn opponent(&self) -> Seat {
        match self {
            Seat::White => Seat::Black,
            Seat::Black => Seat::White,
        }
    }

    /// Seat expected to move at `turn`
    pub fn to_move(turn: TurnIndex) -> Seat {
        if turn % 2 == 0 {
            Seat::White
        } else {
            Seat::Black
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::White => write!(f, "white"),
            Seat::Black => write!(f, "black"),
        }
    }
}

/// A player's private view of the game.
///
/// Held by exactly one player and never shared. Only the masked board is
/// stored; the plaintext view is derived on demand with the mask secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub masked_board: MaskedBoard,
    pub encrypt_secret: Secret,
    pub mask_secret: Secret,
    pub seat: Seat,
}

impl PlayerState {
    /// Build the starting state for `seat` from externally supplied secrets
    pub fn new(seat: Seat, board_size: BoardSize, secrets: PlayerSecrets) -> Self {
        let board = Board::starting(board_size, seat);
        Self {
            masked_board: mask(&board, &secrets.mask_secret),
            encrypt_secret: secrets.encrypt_secret,
            mask_secret: secrets.mask_secret,
            seat,
        }
    }

    pub fn secrets(&self) -> PlayerSecrets {
        PlayerSecrets::new(self.encrypt_secret, self.mask_secret)
    }

    pub fn board_size(&self) -> BoardSize {
        self.masked_board.size()
    }

    /// Plaintext board, recoverable only with this state's own mask secret
    pub fn unmasked_board(&self) -> Board {
        unmask(&self.masked_board, &self.mask_secret)
    }
}
