//! Property-based tests for commitments and board masking

use crate::mocks::*;
use proptest::prelude::*;
use masked_chess::{
    commit, mask, unmask, Board, BoardSize, GameConfig, PlayerState, Seat, Secret,
};

fn arb_secret() -> impl Strategy<Value = Secret> {
    prop::array::uniform32(any::<u8>()).prop_map(Secret::from_bytes)
}

fn arb_seat() -> impl Strategy<Value = Seat> {
    prop::sample::select(vec![Seat::White, Seat::Black])
}

proptest! {
    #[test]
    fn prop_commit_deterministic(secret in arb_secret()) {
        prop_assert_eq!(commit(&secret), commit(&secret));
    }

    #[test]
    fn prop_distinct_secrets_distinct_commitments(a in any::<u64>(), b in any::<u64>()) {
        prop_assume!(a != b);
        prop_assert_ne!(commit(&Secret::from(a)), commit(&Secret::from(b)));
    }

    #[test]
    fn prop_unmask_inverts_mask(secret in arb_secret(), seat in arb_seat(), param in 1u32..=4) {
        let config = GameConfig { min_board_param: 1, ..GameConfig::default() };
        let board = Board::starting(BoardSize::from_param(param, &config).unwrap(), seat);

        prop_assert_eq!(unmask(&mask(&board, &secret), &secret), board);
    }

    #[test]
    fn prop_wrong_secrets_never_mutate(encrypt in any::<u64>(), mask_value in any::<u64>()) {
        prop_assume!(encrypt != 1 || mask_value != 2);
        let lc = new_lifecycle();
        let (game, _, _) = start_game(&lc);

        let impostor =
            PlayerState::new(Seat::White, BoardSize::standard(), secrets(encrypt, mask_value));
        let result =
            lc.submit_move(game.id, Seat::White, &game, &impostor, pawn_push(Seat::White, 0));

        prop_assert!(result.unwrap_err().is_security_violation());
        prop_assert_eq!(lc.load_game(game.id).unwrap(), game);
    }
}
