//! Shared game record and its status machine

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::commitment::{Digest, PlayerSecrets, SeatCommitments, Secret};
use crate::error::{GameResult, ProtocolError};
use super::board::{BoardSize, MaskedBoard};
use super::player::Seat;
use super::{GameId, TurnIndex};

const GENESIS_DOMAIN: &[u8] = b"masked-chess/genesis";
const BOARD_DOMAIN: &[u8] = b"masked-chess/board";
const FINGERPRINT_DOMAIN: &[u8] = b"masked-chess/state";

/// Lifecycle of a shared game record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Record exists, no commitments yet
    Created,
    /// Creator committed at seat 0, waiting for a joiner
    AwaitingOpponent,
    /// Both seats committed, moves are accepted
    Active,
    /// Terminal; the record is immutable
    Complete,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Created => write!(f, "created"),
            GameStatus::AwaitingOpponent => write!(f, "awaiting_opponent"),
            GameStatus::Active => write!(f, "active"),
            GameStatus::Complete => write!(f, "complete"),
        }
    }
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeReason {
    Checkmate,
    Resignation,
    Draw,
}

/// Result of a completed game. `winner` is `None` for draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameOutcome {
    pub winner: Option<Seat>,
    pub reason: OutcomeReason,
}

impl GameOutcome {
    pub fn checkmate(winner: Seat) -> Self {
        Self { winner: Some(winner), reason: OutcomeReason::Checkmate }
    }

    pub fn resignation(resigning: Seat) -> Self {
        Self { winner: Some(resigning.opponent()), reason: OutcomeReason::Resignation }
    }

    pub fn draw() -> Self {
        Self { winner: None, reason: OutcomeReason::Draw }
    }
}

/// The shared record of a game.
///
/// Mutated only through validated transitions, each of which returns a new
/// value; the ledger decides which candidate becomes current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub id: GameId,
    pub board_size: BoardSize,
    /// Index 0 is White, index 1 is Black
    pub seat_commitments: [Option<SeatCommitments>; 2],
    pub turn: TurnIndex,
    pub status: GameStatus,
    pub board_commitment: Digest,
    pub outcome: Option<GameOutcome>,
}

impl GameState {
    /// Fresh record in `Created` status
    pub fn new(id: GameId, board_size: BoardSize) -> Self {
        Self {
            id,
            board_size,
            seat_commitments: [None, None],
            turn: 0,
            status: GameStatus::Created,
            board_commitment: genesis_commitment(id, board_size),
            outcome: None,
        }
    }

    /// Record the commitments for `seat`, returning the next state.
    ///
    /// White commits first (`Created -> AwaitingOpponent`), Black second
    /// (`AwaitingOpponent -> Active`). Commitments are accepted as given;
    /// they are checked against the secrets only when a move is submitted.
    pub fn commit_to_user_secrets(
        &self,
        secrets: &PlayerSecrets,
        seat: Seat,
    ) -> GameResult<GameState> {
        if self.status == GameStatus::Complete {
            return Err(self.not_active());
        }

        if self.seat_commitments[seat.index()].is_some() {
            return Err(ProtocolError::invalid_parameter(
                "seat",
                format!("{} seat of game {} is already committed", seat, self.id),
            ));
        }

        let status = match (seat, self.status) {
            (Seat::White, GameStatus::Created) => GameStatus::AwaitingOpponent,
            (Seat::Black, GameStatus::AwaitingOpponent) => GameStatus::Active,
            (Seat::Black, _) => {
                return Err(ProtocolError::invalid_parameter(
                    "seat",
                    "white must commit before black",
                ));
            }
            (Seat::White, status) => {
                return Err(ProtocolError::invalid_parameter(
                    "seat",
                    format!("cannot commit white while game is {}", status),
                ));
            }
        };

        let mut next = self.clone();
        next.seat_commitments[seat.index()] = Some(secrets.commitments());
        next.status = status;
        Ok(next)
    }

    pub fn commitments_for(&self, seat: Seat) -> Option<&SeatCommitments> {
        self.seat_commitments[seat.index()].as_ref()
    }

    pub fn seat_to_move(&self) -> Seat {
        Seat::to_move(self.turn)
    }

    pub fn is_complete(&self) -> bool {
        self.status == GameStatus::Complete
    }

    pub fn ensure_active(&self) -> GameResult<()> {
        if self.status != GameStatus::Active {
            return Err(self.not_active());
        }
        Ok(())
    }

    /// Pure check that `secrets` open the commitments recorded for `seat`
    pub fn verify_player(&self, seat: Seat, secrets: &PlayerSecrets) -> GameResult<()> {
        match self.commitments_for(seat) {
            Some(commitments) => commitments.verify(seat, secrets),
            None => Err(self.not_active()),
        }
    }

    /// Fingerprint used as the expected-prior-state token for compare-and-swap
    pub fn fingerprint(&self) -> GameResult<Digest> {
        let encoded = serde_json::to_vec(self)?;
        Ok(Digest::of_parts(&[FINGERPRINT_DOMAIN, &encoded]))
    }

    /// Candidate state after an accepted move
    pub(crate) fn advanced(&self, board_commitment: Digest) -> GameState {
        let mut next = self.clone();
        next.turn = self.turn + 1;
        next.board_commitment = board_commitment;
        next
    }

    /// Candidate terminal state
    pub(crate) fn completed(&self, outcome: GameOutcome) -> GameResult<GameState> {
        self.ensure_active()?;
        let mut next = self.clone();
        next.status = GameStatus::Complete;
        next.outcome = Some(outcome);
        Ok(next)
    }

    fn not_active(&self) -> ProtocolError {
        ProtocolError::GameNotActive {
            game_id: self.id,
            status: self.status,
        }
    }
}

/// Board commitment of a game before any move
pub fn genesis_commitment(id: GameId, board_size: BoardSize) -> Digest {
    Digest::of_parts(&[GENESIS_DOMAIN, &id.to_be_bytes(), &[board_size.dimension()]])
}

/// Chain the board commitment forward over a newly masked board.
///
/// The previous commitment binds the move history; the encrypt secret
/// blinds the result so it reveals nothing about the masked cells.
pub fn next_board_commitment(
    previous: &Digest,
    seat: Seat,
    turn: TurnIndex,
    masked_board: &MaskedBoard,
    encrypt_secret: &Secret,
) -> Digest {
    Digest::of_parts(&[
        BOARD_DOMAIN,
        previous.as_bytes(),
        &[seat.index() as u8],
        &turn.to_be_bytes(),
        masked_board.cells(),
        encrypt_secret.as_bytes(),
    ])
}
