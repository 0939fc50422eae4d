//! Event persistence.
//!
//! `EventStore` is the storage contract the rest of the server programs
//! against. `PgEventStore` is the production implementation backed by
//! Postgres; `InMemoryEventStore` backs the test suites and local runs
//! without a database.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::event::Event;
use crate::validate::ValidatedEvent;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryEventStore;
pub use postgres::PgEventStore;

/// Listing filter: a single free-text needle matched case-insensitively
/// against the title or the location.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub search: Option<String>,
}

impl EventFilter {
    pub fn search(needle: impl Into<String>) -> Self {
        Self {
            search: Some(needle.into()),
        }
    }

    /// The effective needle, if any. Blank queries mean "no filter".
    pub fn needle(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// In-memory matching, used by `InMemoryEventStore`. The Postgres
    /// store expresses the same predicate in SQL.
    pub fn matches(&self, event: &Event) -> bool {
        match self.needle() {
            None => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                event.title.to_lowercase().contains(&needle)
                    || event.location.to_lowercase().contains(&needle)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("event not found")]
    EventNotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Storage contract for events and their attendee relation.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a new event, assigning its id and timestamps.
    async fn create(
        &self,
        organizer_id: Uuid,
        fields: ValidatedEvent,
    ) -> Result<Event, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Event>, StoreError>;

    /// All events matching `filter`, in creation order, each exactly once.
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError>;

    /// Overwrite the mutable fields of an event; last writer wins.
    async fn update(&self, id: Uuid, fields: ValidatedEvent) -> Result<Event, StoreError>;

    /// Delete an event together with its attendee rows. Deleting an id
    /// that is already gone is not an error.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Atomically add `user_id` to the attendee set.
    ///
    /// Returns `false` when the pair already exists, which is how a lost
    /// duplicate-registration race surfaces.
    async fn add_attendee(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
}
