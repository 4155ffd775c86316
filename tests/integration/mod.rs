//! End-to-end tests through `GameLifecycle`

pub mod full_game_tests;
