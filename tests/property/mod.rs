//! Property-based tests

pub mod commitment_security;
pub mod game_logic;
