//! Postgres-backed event store.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::event::Event;
use crate::store::{EventFilter, EventStore, StoreError};
use crate::validate::ValidatedEvent;

/// Shared SELECT head: one row per event with the attendee ids aggregated
/// into a uuid array so `Event` decodes directly from the row.
const SELECT_EVENTS: &str = r#"
SELECT e.id,
       e.organizer_id,
       e.title,
       e.description,
       e.location,
       e.date,
       COALESCE(
           array_agg(a.user_id ORDER BY a.created_at, a.user_id)
               FILTER (WHERE a.user_id IS NOT NULL),
           '{}'::uuid[]
       ) AS attendees,
       e.created_at,
       e.updated_at
FROM events e
LEFT JOIN event_attendees a ON a.event_id = e.id
"#;

#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
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

        sqlx::query(
            r#"
            INSERT INTO events (id, organizer_id, title, description, location, date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(event.id)
        .bind(event.organizer_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.date)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(event)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let query = format!("{SELECT_EVENTS} WHERE e.id = $1 GROUP BY e.id");
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError> {
        let events = match filter.needle() {
            Some(needle) => {
                let query = format!(
                    "{SELECT_EVENTS} WHERE e.title ILIKE $1 OR e.location ILIKE $1 \
                     GROUP BY e.id ORDER BY e.created_at, e.id"
                );
                sqlx::query_as::<_, Event>(&query)
                    .bind(like_pattern(needle))
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!("{SELECT_EVENTS} GROUP BY e.id ORDER BY e.created_at, e.id");
                sqlx::query_as::<_, Event>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(events)
    }

    async fn update(&self, id: Uuid, fields: ValidatedEvent) -> Result<Event, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET title = $2, description = $3, location = $4, date = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.location)
        .bind(fields.date)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::EventNotFound);
        }

        self.get(id).await?.ok_or(StoreError::EventNotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn add_attendee(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO event_attendees (event_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (event_id, user_id) DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            // A vanished event surfaces as a foreign-key violation here.
            Err(sqlx::Error::Database(db))
                if db.constraint() == Some("event_attendees_event_id_fkey") =>
            {
                Err(StoreError::EventNotFound)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Escape LIKE wildcards so the needle is matched literally.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
