//! Game creation, joining and turn-taking against a ledger
//!
//! Every operation follows the same discipline: read the shared state,
//! compute the candidate next state locally without side effects, then hand
//! it to the ledger for compare-and-swap acceptance. A rejected candidate
//! leaves both the shared record and the caller's player state unchanged.

use tracing::{debug, error, info, warn};
use crate::commitment::{PlayerSecrets, SeatCommitments, Secret};
use crate::config::GameConfig;
use crate::error::{GameResult, ProtocolError};
use crate::events::{EventSink, MoveEvent};
use crate::game::state::next_board_commitment;
use crate::game::{
    BoardSize, GameId, GameOutcome, GameState, GameStatus, Move, MoveEngine, PlayerState, Seat,
};
use crate::ledger::Ledger;

/// Result of an accepted move.
///
/// Once the ledger accepts the candidate the move is final, so this is
/// returned even when the event could not be published. The failure is
/// carried in `publish_error` and the event can be re-sent with
/// [`GameLifecycle::publish_event`].
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedMove {
    /// Shared state now held by the ledger
    pub game_state: GameState,
    /// Event for the move
    pub event: MoveEvent,
    /// The mover's private state after the move
    pub player_state: PlayerState,
    /// Sink error if the event was not stored
    pub publish_error: Option<ProtocolError>,
}

impl SubmittedMove {
    pub fn is_published(&self) -> bool {
        self.publish_error.is_none()
    }
}

/// Orchestrates games against a ledger and an event sink
pub struct GameLifecycle<L: Ledger, S: EventSink> {
    ledger: L,
    sink: S,
    config: GameConfig,
}

impl<L: Ledger, S: EventSink> GameLifecycle<L, S> {
    pub fn new(ledger: L, sink: S, config: GameConfig) -> Self {
        Self { ledger, sink, config }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Create a game with the creator at seat 0 (White)
    pub fn create_game(
        &self,
        creator_encrypt_secret: Secret,
        creator_mask_secret: Secret,
        board_size_param: u32,
    ) -> GameResult<GameState> {
        let board_size = BoardSize::from_param(board_size_param, &self.config)?;
        let secrets = PlayerSecrets::new(creator_encrypt_secret, creator_mask_secret);

        let game_id = self.ledger.allocate_game_id()?;
        let state = GameState::new(game_id, board_size)
            .commit_to_user_secrets(&secrets, Seat::White)?;

        self.ledger.insert(state.clone())?;

        info!(
            game_id,
            board_dimension = board_size.dimension(),
            "Game created, awaiting opponent"
        );
        Ok(state)
    }

    /// Join a game at seat 1 (Black).
    ///
    /// `expected_creator_hashes` is the creator commitment the joiner read;
    /// if the record no longer carries it the join fails as stale before
    /// anything is written.
    pub fn join_game(
        &self,
        game_id: GameId,
        joiner_encrypt_secret: Secret,
        joiner_mask_secret: Secret,
        expected_creator_hashes: SeatCommitments,
        board_size_param: u32,
    ) -> GameResult<GameState> {
        let current = self.ledger.load(game_id)?;

        match current.status {
            GameStatus::AwaitingOpponent => {}
            GameStatus::Complete => {
                return Err(ProtocolError::GameNotActive {
                    game_id,
                    status: current.status,
                });
            }
            status => {
                warn!(game_id, status = %status, "Join attempted on game not awaiting an opponent");
                return Err(ProtocolError::StaleGameState {
                    game_id,
                    message: format!("game is {}, not awaiting an opponent", status),
                });
            }
        }

        if current.commitments_for(Seat::White) != Some(&expected_creator_hashes) {
            warn!(game_id, "Creator commitments differ from what the joiner expected");
            return Err(ProtocolError::StaleGameState {
                game_id,
                message: "creator commitments do not match the expected hashes".to_string(),
            });
        }

        let board_size = BoardSize::from_param(board_size_param, &self.config)?;
        if board_size != current.board_size {
            return Err(ProtocolError::invalid_parameter(
                "board_size_param",
                format!(
                    "game {} is played on a {}x{} board",
                    game_id,
                    current.board_size.dimension(),
                    current.board_size.dimension()
                ),
            ));
        }

        let secrets = PlayerSecrets::new(joiner_encrypt_secret, joiner_mask_secret);
        let next = current.commit_to_user_secrets(&secrets, Seat::Black)?;
        self.ledger.compare_and_swap(&current.fingerprint()?, next.clone())?;

        info!(game_id, "Opponent joined, game active");
        Ok(next)
    }

    /// Submit a move for `as_seat` against the state the caller observed.
    ///
    /// Checks run in order: game identity and status, turn parity, seat of
    /// the player state, commitment verification, then the move itself. Only
    /// after all of them pass is a candidate handed to the ledger.
    pub fn submit_move(
        &self,
        game_id: GameId,
        as_seat: Seat,
        game_state: &GameState,
        player_state: &PlayerState,
        mv: Move,
    ) -> GameResult<SubmittedMove> {
        if game_state.id != game_id {
            return Err(ProtocolError::invalid_parameter(
                "game_state",
                format!("state belongs to game {}, not {}", game_state.id, game_id),
            ));
        }

        game_state.ensure_active()?;

        let expected = game_state.seat_to_move();
        if as_seat != expected {
            warn!(game_id, seat = %as_seat, turn = game_state.turn, "Move submitted out of turn");
            return Err(ProtocolError::WrongTurn {
                expected,
                actual: as_seat,
                turn: game_state.turn,
            });
        }

        if player_state.seat != as_seat {
            return Err(ProtocolError::invalid_parameter(
                "player_state",
                format!(
                    "player state belongs to {}, move submitted as {}",
                    player_state.seat, as_seat
                ),
            ));
        }

        if let Err(e) = game_state.verify_player(as_seat, &player_state.secrets()) {
            error!(
                game_id,
                seat = %as_seat,
                error = %e,
                "Secrets do not open recorded commitments"
            );
            return Err(e);
        }

        let engine = MoveEngine::new(game_state.board_size);
        let next_player = engine.apply_to_player_state(
            as_seat.is_white(),
            player_state,
            mv,
            game_state.turn,
        )?;

        let board_commitment = next_board_commitment(
            &game_state.board_commitment,
            as_seat,
            game_state.turn,
            &next_player.masked_board,
            &next_player.encrypt_secret,
        );
        let next_game = game_state.advanced(board_commitment);

        self.ledger.compare_and_swap(&game_state.fingerprint()?, next_game.clone())?;

        let event = MoveEvent {
            game_id,
            seat: as_seat,
            mv,
            new_board_commitment: board_commitment,
            turn: game_state.turn,
        };

        info!(game_id, seat = %as_seat, turn = next_game.turn, "Move accepted");

        let publish_error = self.sink.publish(&event).err();
        if let Some(e) = &publish_error {
            error!(
                game_id,
                turn = event.turn,
                error = %e,
                "Move accepted but event publication failed"
            );
        }

        Ok(SubmittedMove {
            game_state: next_game,
            event,
            player_state: next_player,
            publish_error,
        })
    }

    /// Re-send the event of an accepted move whose publication failed
    pub fn publish_event(&self, event: &MoveEvent) -> GameResult<()> {
        let recorded = self.ledger.load(event.game_id)?;
        if recorded.turn <= event.turn {
            return Err(ProtocolError::invalid_parameter(
                "event",
                format!(
                    "turn {} of game {} has not been accepted",
                    event.turn, event.game_id
                ),
            ));
        }

        self.sink.publish(event)?;
        debug!(game_id = event.game_id, turn = event.turn, "Event published");
        Ok(())
    }

    /// Submit a move, re-reading the ledger and retrying on stale state.
    ///
    /// Only `StaleGameState` is retried, at most `max_submit_retries` times;
    /// every other error is returned immediately.
    pub fn submit_move_with_retry(
        &self,
        game_id: GameId,
        as_seat: Seat,
        player_state: &PlayerState,
        mv: Move,
    ) -> GameResult<SubmittedMove> {
        let mut attempt = 0;
        loop {
            let observed = self.ledger.load(game_id)?;
            match self.submit_move(game_id, as_seat, &observed, player_state, mv) {
                Err(e) if e.is_retryable() && attempt < self.config.max_submit_retries => {
                    attempt += 1;
                    debug!(game_id, attempt, "Stale game state, retrying with fresh state");
                }
                result => return result,
            }
        }
    }

    /// Resign on behalf of `as_seat`; the opponent wins.
    ///
    /// Requires the resigning player's secrets, like a move.
    pub fn resign(
        &self,
        game_id: GameId,
        as_seat: Seat,
        game_state: &GameState,
        player_state: &PlayerState,
    ) -> GameResult<GameState> {
        if player_state.seat != as_seat {
            return Err(ProtocolError::invalid_parameter(
                "player_state",
                format!(
                    "player state belongs to {}, resignation by {}",
                    player_state.seat, as_seat
                ),
            ));
        }

        game_state.ensure_active()?;
        game_state.verify_player(as_seat, &player_state.secrets())?;

        let next = self.conclude(game_id, game_state, GameOutcome::resignation(as_seat))?;
        info!(game_id, seat = %as_seat, "Player resigned");
        Ok(next)
    }

    /// Record an externally signalled terminal condition (checkmate, draw)
    pub fn conclude(
        &self,
        game_id: GameId,
        game_state: &GameState,
        outcome: GameOutcome,
    ) -> GameResult<GameState> {
        if game_state.id != game_id {
            return Err(ProtocolError::invalid_parameter(
                "game_state",
                format!("state belongs to game {}, not {}", game_state.id, game_id),
            ));
        }

        let next = game_state.completed(outcome)?;
        self.ledger.compare_and_swap(&game_state.fingerprint()?, next.clone())?;

        info!(game_id, reason = ?outcome.reason, winner = ?outcome.winner, "Game complete");
        Ok(next)
    }

    /// Current shared state of a game
    pub fn load_game(&self, game_id: GameId) -> GameResult<GameState> {
        self.ledger.load(game_id)
    }

    /// Published events of a game in turn order
    pub fn move_history(&self, game_id: GameId) -> GameResult<Vec<MoveEvent>> {
        self.sink.events_for(game_id)
    }
}
