//! Shared game fixtures

use masked_chess::{
    BoardSize, EventSink, GameConfig, GameLifecycle, GameState, Ledger, MemoryEventSink,
    MemoryLedger, Move, PlayerSecrets, PlayerState, Seat, Secret,
};

pub type TestLifecycle = GameLifecycle<MemoryLedger, MemoryEventSink>;

pub const STANDARD_PARAM: u32 = 3;

pub fn new_lifecycle() -> TestLifecycle {
    GameLifecycle::new(MemoryLedger::new(), MemoryEventSink::new(), GameConfig::default())
}

pub fn secrets(encrypt: u64, mask: u64) -> PlayerSecrets {
    PlayerSecrets::new(Secret::from(encrypt), Secret::from(mask))
}

pub fn white_player() -> PlayerState {
    PlayerState::new(Seat::White, BoardSize::standard(), secrets(1, 2))
}

pub fn black_player() -> PlayerState {
    PlayerState::new(Seat::Black, BoardSize::standard(), secrets(3, 4))
}

/// Create with secrets (1, 2), join with secrets (3, 4), both on 8x8
pub fn start_game<L: Ledger, S: EventSink>(
    lifecycle: &GameLifecycle<L, S>,
) -> (GameState, PlayerState, PlayerState) {
    let created = lifecycle
        .create_game(Secret::from(1u64), Secret::from(2u64), STANDARD_PARAM)
        .expect("create game");
    let creator = *created.commitments_for(Seat::White).expect("creator commitments");
    let active = lifecycle
        .join_game(created.id, Secret::from(3u64), Secret::from(4u64), creator, STANDARD_PARAM)
        .expect("join game");
    (active, white_player(), black_player())
}

/// Single-square pawn advance on an 8x8 board
pub fn pawn_push(seat: Seat, col: u8) -> Move {
    match seat {
        Seat::White => Move { from_row: 1, from_col: col, to_row: 2, to_col: col },
        Seat::Black => Move { from_row: 6, from_col: col, to_row: 5, to_col: col },
    }
}
