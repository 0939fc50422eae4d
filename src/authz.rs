//! Organizer-only authorization for event mutations.

use crate::auth::Identity;
use crate::models::event::Event;
use crate::utils::error::AppError;

/// Allow the mutation only when the caller organizes the event.
///
/// Applies to update, partial update and delete. Reads are open to every
/// authenticated identity and never pass through here.
pub fn authorize_mutation(event: &Event, identity: &Identity) -> Result<(), AppError> {
    if event.organizer_id != identity.user_id {
        return Err(AppError::Forbidden(
            "You are not the organizer of this event".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn sample_event(organizer_id: Uuid) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            organizer_id,
            title: "Planning Workshop".to_string(),
            description: None,
            location: "Berlin".to_string(),
            date: now + chrono::Duration::days(7),
            attendees: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn organizer_may_mutate_own_event() {
        let organizer = Identity::from_email("organizer@example.com");
        let event = sample_event(organizer.user_id);

        assert!(authorize_mutation(&event, &organizer).is_ok());
    }

    #[test]
    fn other_callers_are_forbidden() {
        let organizer = Identity::from_email("organizer@example.com");
        let other = Identity::from_email("guest@example.com");
        let event = sample_event(organizer.user_id);

        let err = authorize_mutation(&event, &other).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
