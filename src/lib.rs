//! masked-chess - private state commitments and a masked move engine for
//! two-party hidden-information board games
//!
//! The shared record of a game holds only hash commitments to each player's
//! secrets, a turn counter and a blinded board commitment. Each player keeps
//! their own board masked under a secret, and re-presents their secrets with
//! every move so the authority can check them against the commitments made
//! when they took their seat.

pub mod commitment;
pub mod config;
pub mod error;
pub mod events;
pub mod game;
pub mod ledger;
pub mod lifecycle;

// Re-export commonly used types for convenience
pub use error::{GameResult, ProtocolError};

// Re-export commitment primitives
pub use commitment::{commit, Digest, PlayerSecrets, SeatCommitments, Secret, SecretKind};

// Re-export core game types
pub use game::{
    mask, unmask, Board, BoardSize, GameId, GameOutcome, GameState, GameStatus, MaskedBoard, Move,
    MoveEngine, OutcomeReason, Piece, PieceKind, PlayerState, Seat, Square, TurnIndex,
};

// Re-export collaborator seams and their in-memory implementations
pub use events::{EventSink, MemoryEventSink, MoveEvent, RecordedEvent};
pub use ledger::{Ledger, MemoryLedger};

// Re-export orchestration
pub use lifecycle::{GameLifecycle, SubmittedMove};

// Re-export configuration interfaces
pub use config::{GameConfig, LoggingSettings, MaskedChessConfig};
