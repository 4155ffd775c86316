//! Public move events and the sink that stores them

pub mod move_event;

pub use move_event::MoveEvent;

use std::sync::RwLock;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::error::{GameResult, ProtocolError};
use crate::game::GameId;

/// Durable store for move events, readable by both players and spectators
pub trait EventSink: Send + Sync {
    /// Store an event
    fn publish(&self, event: &MoveEvent) -> GameResult<()>;

    /// Events of one game in turn order
    fn events_for(&self, game_id: GameId) -> GameResult<Vec<MoveEvent>>;
}

/// An event with the time the sink received it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub event: MoveEvent,
    pub recorded_at: DateTime<Utc>,
}

/// In-process event sink
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    records: RwLock<Vec<RecordedEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record across all games, in publication order
    pub fn recorded(&self) -> GameResult<Vec<RecordedEvent>> {
        let records = self.records.read().map_err(|e| ProtocolError::EventSink(e.to_string()))?;
        Ok(records.clone())
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemoryEventSink {
    fn publish(&self, event: &MoveEvent) -> GameResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| ProtocolError::EventSink(e.to_string()))?;
        records.push(RecordedEvent {
            event: event.clone(),
            recorded_at: Utc::now(),
        });
        Ok(())
    }

    fn events_for(&self, game_id: GameId) -> GameResult<Vec<MoveEvent>> {
        let records = self.records.read().map_err(|e| ProtocolError::EventSink(e.to_string()))?;
        let mut events: Vec<MoveEvent> = records
            .iter()
            .filter(|record| record.event.game_id == game_id)
            .map(|record| record.event.clone())
            .collect();
        events.sort_by_key(|event| event.turn);
        Ok(events)
    }
}
