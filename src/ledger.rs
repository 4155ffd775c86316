//! Authority holding the shared game records
//!
//! The ledger is the single source of truth for `GameState`. Every mutation
//! goes through [`Ledger::compare_and_swap`], which accepts a candidate only
//! if the caller's view of the prior state is still current.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use tracing::debug;
use crate::commitment::Digest;
use crate::error::{GameResult, ProtocolError};
use crate::game::{GameId, GameState};

/// Compare-and-swap store of game records
pub trait Ledger: Send + Sync {
    /// Reserve an identifier for a new game
    fn allocate_game_id(&self) -> GameResult<GameId>;

    /// Store the first version of a game record
    fn insert(&self, state: GameState) -> GameResult<()>;

    /// Current version of a game record
    fn load(&self, game_id: GameId) -> GameResult<GameState>;

    /// Replace the record for `next.id` if its fingerprint still equals
    /// `expected`. Fails with `StaleGameState` otherwise, leaving the record
    /// unchanged.
    fn compare_and_swap(&self, expected: &Digest, next: GameState) -> GameResult<()>;
}

/// In-process ledger
#[derive(Debug, Default)]
pub struct MemoryLedger {
    games: RwLock<HashMap<GameId, GameState>>,
    next_id: AtomicU64,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game_count(&self) -> usize {
        self.games.read().map(|games| games.len()).unwrap_or(0)
    }
}

impl Ledger for MemoryLedger {
    fn allocate_game_id(&self) -> GameResult<GameId> {
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn insert(&self, state: GameState) -> GameResult<()> {
        let mut games = self.games.write().map_err(|e| ProtocolError::Ledger(e.to_string()))?;
        if games.contains_key(&state.id) {
            return Err(ProtocolError::StaleGameState {
                game_id: state.id,
                message: "a record with this id already exists".to_string(),
            });
        }
        debug!(game_id = state.id, "Inserted game record");
        games.insert(state.id, state);
        Ok(())
    }

    fn load(&self, game_id: GameId) -> GameResult<GameState> {
        let games = self.games.read().map_err(|e| ProtocolError::Ledger(e.to_string()))?;
        games
            .get(&game_id)
            .cloned()
            .ok_or(ProtocolError::GameNotFound(game_id))
    }

    fn compare_and_swap(&self, expected: &Digest, next: GameState) -> GameResult<()> {
        let mut games = self.games.write().map_err(|e| ProtocolError::Ledger(e.to_string()))?;
        let current = games
            .get_mut(&next.id)
            .ok_or(ProtocolError::GameNotFound(next.id))?;

        let actual = current.fingerprint()?;
        if actual != *expected {
            return Err(ProtocolError::StaleGameState {
                game_id: next.id,
                message: format!("expected state {}, ledger holds {}", expected, actual),
            });
        }

        debug!(game_id = next.id, turn = next.turn, status = %next.status, "Swapped game record");
        *current = next;
        Ok(())
    }
}
