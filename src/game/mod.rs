//! Board, player and shared game state plus the move engine

pub mod board;
pub mod player;
pub mod state;
pub mod moves;

/// Identifier the ledger assigns to a game
pub type GameId = u64;

/// Number of moves accepted so far; also selects the seat to move
pub type TurnIndex = u64;

// Re-export core types
pub use board::{mask, unmask, Board, BoardSize, MaskedBoard, Piece, PieceKind, Square};
pub use player::{PlayerState, Seat};
pub use state::{GameOutcome, GameState, GameStatus, OutcomeReason};
pub use moves::{Move, MoveEngine};
