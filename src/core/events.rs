use log::{debug, info};
use serde::{Deserialize, Serialize};
use crate::core::identity::Identity;

/// Signals emitted by successful parking mutations, in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ParkingEvent {
    Inserted { occupant: Identity, index: usize },
    Replaced { occupant: Identity, index: usize },
    Erased { occupant: Identity },
    NotErased { occupant: Identity },
    SpotCreated { index: usize },
    SpotDestroyed { index: usize },
    SpotAcquired { occupant: Identity, index: usize, at: u64 },
    SpotReleased { occupant: Identity, index: usize, at: u64 },
}

#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<ParkingEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn emit(&mut self, event: ParkingEvent) {
        match &event {
            ParkingEvent::Inserted { .. }
            | ParkingEvent::Replaced { .. }
            | ParkingEvent::Erased { .. }
            | ParkingEvent::NotErased { .. } => debug!("[occupants] {:?}", event),
            _ => info!("[parking] {:?}", event),
        }
        self.events.push(event);
    }

    pub fn since(&self, offset: usize) -> &[ParkingEvent] {
        self.events.get(offset..).unwrap_or(&[])
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::events::{EventLog, ParkingEvent};

    #[test]
    fn test_since_offset() {
        let mut log = EventLog::new();
        log.emit(ParkingEvent::SpotCreated { index: 0 });
        log.emit(ParkingEvent::SpotCreated { index: 1 });
        assert_eq!(2, log.len());
        assert_eq!(&[ParkingEvent::SpotCreated { index: 1 }], log.since(1));
        assert!(log.since(2).is_empty());
        assert!(log.since(10).is_empty());
    }
}
