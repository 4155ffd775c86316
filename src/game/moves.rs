//! Move construction and application against a player's private state

use std::fmt;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::error::{GameResult, ProtocolError};
use super::board::{mask, unmask, BoardSize, Square};
use super::player::{PlayerState, Seat};
use super::TurnIndex;

/// A (from, to) coordinate quadruple. Not secret by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from_row: u8,
    pub from_col: u8,
    pub to_row: u8,
    pub to_col: u8,
}

impl Move {
    pub fn from(&self) -> Square {
        Square { row: self.from_row, col: self.from_col }
    }

    pub fn to(&self) -> Square {
        Square { row: self.to_row, col: self.to_col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from(), self.to())
    }
}

/// Builds and applies moves for one board size.
///
/// Only structural rules are enforced: bounds, a distinct destination, and
/// ownership of the moving piece in the unmasked view. Piece movement rules
/// are left to the game layered on top.
#[derive(Debug, Clone, Copy)]
pub struct MoveEngine {
    board_size: BoardSize,
}

impl MoveEngine {
    pub fn new(board_size: BoardSize) -> Self {
        Self { board_size }
    }

    pub fn board_size(&self) -> BoardSize {
        self.board_size
    }

    /// Construct a move, rejecting any coordinate outside the board
    pub fn create_move(
        &self,
        from_row: u8,
        from_col: u8,
        to_row: u8,
        to_col: u8,
    ) -> GameResult<Move> {
        let mv = Move { from_row, from_col, to_row, to_col };
        self.check_bounds(&mv)?;
        Ok(mv)
    }

    /// Bounds check for moves that arrive already constructed (e.g. deserialized)
    pub fn check_bounds(&self, mv: &Move) -> GameResult<()> {
        self.board_size.square(mv.from_row, mv.from_col)?;
        self.board_size.square(mv.to_row, mv.to_col)?;
        Ok(())
    }

    /// Unmask, apply `mv`, re-mask under the same secret.
    ///
    /// Returns the new player state; the input state is never modified.
    pub fn apply_to_player_state(
        &self,
        is_white: bool,
        player_state: &PlayerState,
        mv: Move,
        turn: TurnIndex,
    ) -> GameResult<PlayerState> {
        let acting = if is_white { Seat::White } else { Seat::Black };

        if player_state.seat != acting {
            return Err(ProtocolError::IllegalMove(format!(
                "{} cannot move with the {} player state",
                acting, player_state.seat
            )));
        }

        let expected = Seat::to_move(turn);
        if expected != acting {
            return Err(ProtocolError::WrongTurn {
                expected,
                actual: acting,
                turn,
            });
        }

        if player_state.board_size() != self.board_size {
            return Err(ProtocolError::invalid_parameter(
                "player_state",
                format!(
                    "player board is {0}x{0}, engine expects {1}x{1}",
                    player_state.board_size().dimension(),
                    self.board_size.dimension()
                ),
            ));
        }

        self.check_bounds(&mv)?;

        if mv.from() == mv.to() {
            return Err(ProtocolError::IllegalMove(format!(
                "source and destination are both {}",
                mv.from()
            )));
        }

        let mut board = unmask(&player_state.masked_board, &player_state.mask_secret);

        let piece = match board.piece_at(mv.from()) {
            Some(piece) if piece.seat == acting => piece,
            Some(piece) => {
                return Err(ProtocolError::IllegalMove(format!(
                    "piece at {} belongs to {}",
                    mv.from(),
                    piece.seat
                )));
            }
            None => {
                return Err(ProtocolError::IllegalMove(format!(
                    "no {} piece at {}",
                    acting,
                    mv.from()
                )));
            }
        };

        board.clear(mv.from());
        board.place(mv.to(), piece);

        debug!(seat = %acting, turn, "Applied move to private board");

        Ok(PlayerState {
            masked_board: mask(&board, &player_state.mask_secret),
            ..player_state.clone()
        })
    }
}
