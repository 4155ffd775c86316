//! Event sink that can be taken offline

use std::sync::atomic::{AtomicBool, Ordering};
use masked_chess::{EventSink, GameId, GameResult, MemoryEventSink, MoveEvent, ProtocolError};

/// Wraps a `MemoryEventSink` and rejects publications while offline
#[derive(Debug, Default)]
pub struct UnreliableEventSink {
    offline: AtomicBool,
    inner: MemoryEventSink,
}

impl UnreliableEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

impl EventSink for UnreliableEventSink {
    fn publish(&self, event: &MoveEvent) -> GameResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ProtocolError::EventSink("relay offline".to_string()));
        }
        self.inner.publish(event)
    }

    fn events_for(&self, game_id: GameId) -> GameResult<Vec<MoveEvent>> {
        self.inner.events_for(game_id)
    }
}
