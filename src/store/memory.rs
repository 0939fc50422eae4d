//! In-memory event store.
//!
//! Backs the test suites and database-free local runs. Data lives for the
//! process lifetime only.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::event::Event;
use crate::store::{EventFilter, EventStore, StoreError};
use crate::validate::ValidatedEvent;

#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<HashMap<Uuid, StoredEvent>>>,
}

/// The attendee set is kept separately from the event so membership
/// updates are a plain set insert; `snapshot` merges the two back into
/// the wire model.
#[derive(Debug, Clone)]
struct StoredEvent {
    event: Event,
    attendees: HashSet<Uuid>,
}

impl StoredEvent {
    fn snapshot(&self) -> Event {
        let mut event = self.event.clone();
        let mut attendees: Vec<Uuid> = self.attendees.iter().copied().collect();
        attendees.sort_unstable();
        event.attendees = attendees;
        event
    }
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn create(
        &self,
        organizer_id: Uuid,
        fields: ValidatedEvent,
    ) -> Result<Event, StoreError> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            organizer_id,
            title: fields.title,
            description: fields.description,
            location: fields.location,
            date: fields.date,
            attendees: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let mut events = self.events.write().await;
        events.insert(
            event.id,
            StoredEvent {
                event: event.clone(),
                attendees: HashSet::new(),
            },
        );
        Ok(event)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let events = self.events.read().await;
        Ok(events.get(&id).map(StoredEvent::snapshot))
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError> {
        let events = self.events.read().await;
        let mut matching: Vec<Event> = events
            .values()
            .map(StoredEvent::snapshot)
            .filter(|event| filter.matches(event))
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(matching)
    }

    async fn update(&self, id: Uuid, fields: ValidatedEvent) -> Result<Event, StoreError> {
        let mut events = self.events.write().await;
        let stored = events.get_mut(&id).ok_or(StoreError::EventNotFound)?;

        stored.event.title = fields.title;
        stored.event.description = fields.description;
        stored.event.location = fields.location;
        stored.event.date = fields.date;
        stored.event.updated_at = Utc::now();
        Ok(stored.snapshot())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut events = self.events.write().await;
        events.remove(&id);
        Ok(())
    }

    async fn add_attendee(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let mut events = self.events.write().await;
        let stored = events
            .get_mut(&event_id)
            .ok_or(StoreError::EventNotFound)?;
        Ok(stored.attendees.insert(user_id))
    }
}
