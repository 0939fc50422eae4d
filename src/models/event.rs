use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A scheduled event and its attendee roster.
///
/// `attendees` has set semantics: the storage layer guarantees no
/// duplicates and the registration flow guarantees the organizer is never
/// a member.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub date: DateTime<Utc>,
    pub attendees: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied event fields as they arrive on create and update
/// requests.
///
/// `organizer_id` and `attendees` are deliberately absent: the organizer
/// always comes from the authenticated caller and the attendee set is
/// only mutated through registration. Any such field in a request body is
/// dropped during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_drops_server_owned_fields() {
        let draft: EventDraft = serde_json::from_str(
            r#"{
                "title": "Community Meetup",
                "location": "Kyiv",
                "organizer_id": "7d7f9f44-06b1-4f9f-b29f-0f43e7a5a8a4",
                "attendees": ["7d7f9f44-06b1-4f9f-b29f-0f43e7a5a8a4"]
            }"#,
        )
        .expect("draft should deserialize");

        assert_eq!(draft.title.as_deref(), Some("Community Meetup"));
        assert_eq!(draft.location.as_deref(), Some("Kyiv"));
        assert!(draft.description.is_none());
        assert!(draft.date.is_none());
    }
}
