//! End-to-end game flows through the lifecycle

use crate::mocks::*;
use masked_chess::{
    GameConfig, GameLifecycle, GameOutcome, GameStatus, MemoryLedger, MoveEngine, OutcomeReason,
    Piece, PieceKind, ProtocolError, Seat, Secret, SecretKind, Square,
};

#[test]
fn test_create_join_and_first_move() {
    let lc = new_lifecycle();

    let created = lc
        .create_game(Secret::from(1u64), Secret::from(2u64), STANDARD_PARAM)
        .unwrap();
    assert_eq!(created.status, GameStatus::AwaitingOpponent);
    assert!(created.commitments_for(Seat::Black).is_none());

    let creator = *created.commitments_for(Seat::White).unwrap();
    assert_eq!(creator, secrets(1, 2).commitments());

    let game = lc
        .join_game(created.id, Secret::from(3u64), Secret::from(4u64), creator, STANDARD_PARAM)
        .unwrap();
    assert_eq!(game.status, GameStatus::Active);
    assert_eq!(game.commitments_for(Seat::Black), Some(&secrets(3, 4).commitments()));
    assert_eq!(game.turn, 0);

    let engine = MoveEngine::new(game.board_size);
    let mv = engine.create_move(0, 1, 0, 3).unwrap();
    let submitted = lc
        .submit_move(game.id, Seat::White, &game, &white_player(), mv)
        .unwrap();

    assert_eq!(submitted.game_state.turn, 1);
    assert_eq!(submitted.game_state.status, GameStatus::Active);
    assert_eq!(submitted.event.seat, Seat::White);
    assert_eq!(submitted.event.mv, mv);
    assert_eq!(submitted.event.turn, 0);
    assert_eq!(lc.load_game(game.id).unwrap(), submitted.game_state);
    assert_eq!(lc.move_history(game.id).unwrap(), vec![submitted.event.clone()]);
}

#[test]
fn test_black_cannot_move_on_white_turn() {
    let lc = new_lifecycle();
    let (game, _, black) = start_game(&lc);

    let err = lc
        .submit_move(game.id, Seat::Black, &game, &black, pawn_push(Seat::Black, 0))
        .unwrap_err();

    assert_eq!(
        err,
        ProtocolError::WrongTurn { expected: Seat::White, actual: Seat::Black, turn: 0 }
    );
    assert_eq!(lc.load_game(game.id).unwrap(), game);
    assert!(lc.move_history(game.id).unwrap().is_empty());
}

#[test]
fn test_forged_mask_secret_rejected_without_mutation() {
    let lc = new_lifecycle();
    let (game, white, _) = start_game(&lc);

    let mut forged = white.clone();
    forged.mask_secret = Secret::from(20u64);

    let err = lc
        .submit_move(game.id, Seat::White, &game, &forged, pawn_push(Seat::White, 0))
        .unwrap_err();

    assert_eq!(
        err,
        ProtocolError::CommitmentMismatch { seat: Seat::White, secret: SecretKind::Mask }
    );
    assert!(err.is_security_violation());
    assert_eq!(lc.load_game(game.id).unwrap(), game);
}

#[test]
fn test_illegal_move_rejected_without_mutation() {
    let lc = new_lifecycle();
    let (game, white, _) = start_game(&lc);

    // (4, 4) is empty in White's private view
    let mv = MoveEngine::new(game.board_size).create_move(4, 4, 5, 4).unwrap();
    let err = lc.submit_move(game.id, Seat::White, &game, &white, mv).unwrap_err();

    assert!(matches!(err, ProtocolError::IllegalMove(_)));
    assert_eq!(lc.load_game(game.id).unwrap(), game);
}

#[test]
fn test_out_of_bounds_move_rejected() {
    let lc = new_lifecycle();
    let (game, white, _) = start_game(&lc);

    let engine = MoveEngine::new(game.board_size);
    assert!(matches!(
        engine.create_move(1, 0, 8, 0),
        Err(ProtocolError::OutOfBounds { .. })
    ));

    let raw = masked_chess::Move { from_row: 1, from_col: 0, to_row: 1, to_col: 12 };
    assert!(matches!(
        lc.submit_move(game.id, Seat::White, &game, &white, raw),
        Err(ProtocolError::OutOfBounds { .. })
    ));
    assert_eq!(lc.load_game(game.id).unwrap(), game);
}

#[test]
fn test_join_with_unexpected_creator_hashes() {
    let lc = new_lifecycle();
    let created = lc
        .create_game(Secret::from(1u64), Secret::from(2u64), STANDARD_PARAM)
        .unwrap();

    // joiner believes the creator committed to different secrets
    let wrong = secrets(1, 5).commitments();
    let err = lc
        .join_game(created.id, Secret::from(3u64), Secret::from(4u64), wrong, STANDARD_PARAM)
        .unwrap_err();

    assert!(matches!(err, ProtocolError::StaleGameState { .. }));
    let record = lc.load_game(created.id).unwrap();
    assert!(record.commitments_for(Seat::Black).is_none());
    assert_eq!(record.status, GameStatus::AwaitingOpponent);
}

#[test]
fn test_moves_before_join_rejected() {
    let lc = new_lifecycle();
    let created = lc
        .create_game(Secret::from(1u64), Secret::from(2u64), STANDARD_PARAM)
        .unwrap();

    let err = lc
        .submit_move(
            created.id,
            Seat::White,
            &created,
            &white_player(),
            pawn_push(Seat::White, 0),
        )
        .unwrap_err();
    assert_eq!(
        err,
        ProtocolError::GameNotActive { game_id: created.id, status: GameStatus::AwaitingOpponent }
    );
}

#[test]
fn test_player_state_follows_scripted_moves() {
    let lc = new_lifecycle();
    let (mut game, mut white, mut black) = start_game(&lc);

    let script = [
        (Seat::White, 0, 1, 0, 3),
        (Seat::Black, 6, 4, 4, 4),
        (Seat::White, 1, 3, 3, 3),
        (Seat::Black, 7, 6, 5, 5),
    ];

    for (seat, fr, fc, tr, tc) in script {
        let mv = MoveEngine::new(game.board_size).create_move(fr, fc, tr, tc).unwrap();
        let player = if seat == Seat::White { &white } else { &black };
        let moved_piece = player.unmasked_board().piece_at(mv.from()).unwrap();

        let submitted = lc.submit_move(game.id, seat, &game, player, mv).unwrap();
        let board = submitted.player_state.unmasked_board();
        assert_eq!(board.piece_at(mv.from()), None);
        assert_eq!(board.piece_at(mv.to()), Some(moved_piece));

        game = submitted.game_state;
        match seat {
            Seat::White => white = submitted.player_state,
            Seat::Black => black = submitted.player_state,
        }
    }

    let white_board = white.unmasked_board();
    assert_eq!(
        white_board.piece_at(Square { row: 0, col: 3 }),
        Some(Piece::new(PieceKind::Knight, Seat::White))
    );
    assert_eq!(
        white_board.piece_at(Square { row: 3, col: 3 }),
        Some(Piece::new(PieceKind::Pawn, Seat::White))
    );

    let black_board = black.unmasked_board();
    assert_eq!(
        black_board.piece_at(Square { row: 5, col: 5 }),
        Some(Piece::new(PieceKind::Knight, Seat::Black))
    );
    assert_eq!(black_board.piece_at(Square { row: 7, col: 6 }), None);

    assert_eq!(game.turn, 4);
    let seats: Vec<Seat> = lc.move_history(game.id).unwrap().iter().map(|e| e.seat).collect();
    assert_eq!(seats, vec![Seat::White, Seat::Black, Seat::White, Seat::Black]);
}

#[test]
fn test_checkmate_signal_completes_game() {
    let lc = new_lifecycle();
    let (game, white, black) = start_game(&lc);

    let after_white = lc
        .submit_move(game.id, Seat::White, &game, &white, pawn_push(Seat::White, 5))
        .unwrap();
    let done = lc
        .conclude(game.id, &after_white.game_state, GameOutcome::checkmate(Seat::White))
        .unwrap();

    assert!(done.is_complete());
    assert_eq!(done.outcome.map(|o| o.reason), Some(OutcomeReason::Checkmate));

    assert!(matches!(
        lc.submit_move(game.id, Seat::Black, &done, &black, pawn_push(Seat::Black, 4)),
        Err(ProtocolError::GameNotActive { status: GameStatus::Complete, .. })
    ));
    assert!(matches!(
        lc.conclude(game.id, &done, GameOutcome::draw()),
        Err(ProtocolError::GameNotActive { .. })
    ));
    assert!(matches!(
        lc.join_game(
            game.id,
            Secret::from(8u64),
            Secret::from(9u64),
            secrets(1, 2).commitments(),
            STANDARD_PARAM
        ),
        Err(ProtocolError::GameNotActive { .. })
    ));
}

#[test]
fn test_games_are_independent() {
    let lc = new_lifecycle();
    let (first, white, _) = start_game(&lc);
    let (second, _, _) = start_game(&lc);
    assert_ne!(first.id, second.id);

    lc.submit_move(first.id, Seat::White, &first, &white, pawn_push(Seat::White, 0))
        .unwrap();

    assert_eq!(lc.load_game(second.id).unwrap(), second);
    assert!(lc.move_history(second.id).unwrap().is_empty());

    // a state from one game cannot be submitted under another id
    assert!(matches!(
        lc.submit_move(second.id, Seat::White, &first, &white, pawn_push(Seat::White, 1)),
        Err(ProtocolError::InvalidParameter { .. })
    ));
}

#[test]
fn test_game_continues_through_event_sink_outage() {
    let lc = GameLifecycle::new(
        MemoryLedger::new(),
        UnreliableEventSink::new(),
        GameConfig::default(),
    );
    let (game, white, black) = start_game(&lc);

    lc.sink().set_offline(true);
    let first = lc
        .submit_move(game.id, Seat::White, &game, &white, pawn_push(Seat::White, 3))
        .unwrap();
    assert_eq!(first.publish_error, Some(ProtocolError::EventSink("relay offline".to_string())));
    assert_eq!(lc.load_game(game.id).unwrap(), first.game_state);

    // the returned private board already carries the accepted move
    let white = first.player_state;
    assert_eq!(
        white.unmasked_board().piece_at(Square { row: 2, col: 3 }),
        Some(Piece::new(PieceKind::Pawn, Seat::White))
    );

    lc.sink().set_offline(false);
    let second = lc
        .submit_move(game.id, Seat::Black, &first.game_state, &black, pawn_push(Seat::Black, 3))
        .unwrap();
    let third = lc
        .submit_move(game.id, Seat::White, &second.game_state, &white, pawn_push(Seat::White, 4))
        .unwrap();
    assert!(second.is_published() && third.is_published());
    assert_eq!(third.game_state.turn, 3);

    lc.publish_event(&first.event).unwrap();
    let turns: Vec<u64> = lc.move_history(game.id).unwrap().iter().map(|e| e.turn).collect();
    assert_eq!(turns, vec![0, 1, 2]);
}
