//! Property-based tests for private boards and turn order

use std::collections::HashSet;
use crate::mocks::*;
use proptest::prelude::*;
use masked_chess::{BoardSize, MoveEngine, PlayerSecrets, PlayerState, Seat, Secret};

fn arb_secret() -> impl Strategy<Value = Secret> {
    prop::array::uniform32(any::<u8>()).prop_map(Secret::from_bytes)
}

proptest! {
    #[test]
    fn prop_private_board_survives_moves(
        mask_secret in arb_secret(),
        cols in prop::collection::vec(0u8..8, 1..6),
    ) {
        // push distinct white pawns one square, turn by turn as White
        let engine = MoveEngine::new(BoardSize::standard());
        let secrets = PlayerSecrets::new(Secret::from(1u64), mask_secret);
        let mut state = PlayerState::new(Seat::White, BoardSize::standard(), secrets);
        let mut expected = state.unmasked_board();

        let mut seen = HashSet::new();
        for (i, col) in cols.into_iter().filter(|c| seen.insert(*c)).enumerate() {
            let mv = pawn_push(Seat::White, col);
            state = engine.apply_to_player_state(true, &state, mv, (i as u64) * 2).unwrap();

            let piece = expected.piece_at(mv.from()).unwrap();
            expected.clear(mv.from());
            expected.place(mv.to(), piece);
            prop_assert_eq!(state.unmasked_board(), expected.clone());
        }
        prop_assert_eq!(state.mask_secret, mask_secret);
    }

    #[test]
    fn prop_turn_counts_accepted_moves(moves in 0usize..=16) {
        let lc = new_lifecycle();
        let (mut game, mut white, mut black) = start_game(&lc);

        for n in 0..moves {
            let seat = Seat::to_move(n as u64);
            let col = (n / 2) as u8;
            let player = if seat == Seat::White { &white } else { &black };
            let submitted = lc
                .submit_move(game.id, seat, &game, player, pawn_push(seat, col))
                .unwrap();

            prop_assert_eq!(submitted.event.turn, n as u64);
            game = submitted.game_state;
            match seat {
                Seat::White => white = submitted.player_state,
                Seat::Black => black = submitted.player_state,
            }
        }

        prop_assert_eq!(game.turn, moves as u64);
        let history = lc.move_history(game.id).unwrap();
        prop_assert_eq!(history.len(), moves);
        for pair in history.windows(2) {
            prop_assert_eq!(pair[1].seat, pair[0].seat.opponent());
        }
    }
}
