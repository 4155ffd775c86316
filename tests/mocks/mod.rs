//! Fixtures and mock collaborators for testing

#![allow(dead_code)]

pub mod event_sink;
pub mod fixtures;

pub use event_sink::UnreliableEventSink;
pub use fixtures::*;
