//! The registration engine.
//!
//! Owns the only state machine in the system: per (event, user), the
//! one-way transition from non-attendee to attendee. The confirmation
//! email is dispatched after the attendee row is committed and never
//! affects the outcome of the request.

use std::sync::Arc;

use crate::auth::Identity;
use crate::models::event::Event;
use crate::notify::{Notification, Notifier};
use crate::store::EventStore;
use crate::utils::error::AppError;

const CONFIRMATION_SUBJECT: &str = "Event Registration Confirmation";

/// Register `attendee` for `event`.
///
/// Fails when the caller organizes the event or is already on the roster.
/// Otherwise the attendee is inserted atomically and the updated snapshot
/// is returned; a concurrent duplicate loses the storage-level race and
/// is reported as already registered.
pub async fn register(
    store: &dyn EventStore,
    notifier: Arc<dyn Notifier>,
    event: &Event,
    attendee: &Identity,
) -> Result<Event, AppError> {
    if attendee.user_id == event.organizer_id {
        return Err(AppError::OrganizerCannotAttend);
    }
    if event.attendees.contains(&attendee.user_id) {
        return Err(AppError::AlreadyRegistered);
    }

    let inserted = store.add_attendee(event.id, attendee.user_id).await?;
    if !inserted {
        return Err(AppError::AlreadyRegistered);
    }

    let mut snapshot = event.clone();
    snapshot.attendees.push(attendee.user_id);

    dispatch_confirmation(notifier, &snapshot, attendee);

    Ok(snapshot)
}

/// Send the confirmation on a background task. Delivery problems are a
/// log entry, not a request failure.
fn dispatch_confirmation(notifier: Arc<dyn Notifier>, event: &Event, attendee: &Identity) {
    let notification = Notification {
        recipient: attendee.email.clone(),
        subject: CONFIRMATION_SUBJECT.to_string(),
        body: format!(
            "You have successfully registered for the event \"{}\".",
            event.title
        ),
    };
    let event_id = event.id;

    tokio::spawn(async move {
        if let Err(e) = notifier.notify(notification).await {
            tracing::warn!(
                error = %e,
                event_id = %event_id,
                "Failed to send registration confirmation"
            );
        }
    });
}
