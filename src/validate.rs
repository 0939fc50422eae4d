//! Event field validation.
//!
//! One entry point serves create, full update and partial update. The
//! update modes carry the stored event so absent fields can fall back to
//! prior values. Validation never touches `organizer_id` or `attendees`;
//! neither is accepted from clients (see `EventDraft`).

use chrono::{DateTime, Utc};

use crate::models::event::{Event, EventDraft};
use crate::utils::error::FieldErrors;

const MAX_TITLE_LEN: usize = 255;
const MAX_LOCATION_LEN: usize = 255;

/// How a draft should be interpreted.
#[derive(Debug, Clone, Copy)]
pub enum ValidationMode<'a> {
    /// All required fields must be supplied.
    Create,
    /// Full update: required fields must be supplied again; only the
    /// optional description falls back to the stored value.
    Update(&'a Event),
    /// Partial update: every absent field keeps its stored value.
    PartialUpdate(&'a Event),
}

/// Event fields that passed validation, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub date: DateTime<Utc>,
}

/// Validate a draft against `mode`, collecting every field failure rather
/// than stopping at the first.
///
/// `now` is passed in so the "date must not be in the past" rule is
/// deterministic under test.
pub fn validate(
    draft: &EventDraft,
    mode: ValidationMode<'_>,
    now: DateTime<Utc>,
) -> Result<ValidatedEvent, FieldErrors> {
    let (prior, partial) = match mode {
        ValidationMode::Create => (None, false),
        ValidationMode::Update(event) => (Some(event), false),
        ValidationMode::PartialUpdate(event) => (Some(event), true),
    };

    let mut errors = FieldErrors::new();

    let title = text_field(
        "title",
        draft.title.as_deref(),
        prior.map(|e| e.title.as_str()),
        partial,
        MAX_TITLE_LEN,
        &mut errors,
    );
    let location = text_field(
        "location",
        draft.location.as_deref(),
        prior.map(|e| e.location.as_str()),
        partial,
        MAX_LOCATION_LEN,
        &mut errors,
    );

    let date = match draft.date {
        Some(date) => {
            if date < now {
                errors.push("date", "Event date cannot be in the past");
            }
            Some(date)
        }
        None if partial => prior.map(|e| e.date),
        None => {
            errors.push("date", "This field is required");
            None
        }
    };

    // A supplied blank description clears the field; an absent one keeps
    // whatever the stored event had.
    let description = match draft.description.as_deref().map(str::trim) {
        Some("") => None,
        Some(text) => Some(text.to_string()),
        None => prior.and_then(|e| e.description.clone()),
    };

    match (title, location, date) {
        (Some(title), Some(location), Some(date)) if errors.is_empty() => Ok(ValidatedEvent {
            title,
            description,
            location,
            date,
        }),
        _ => Err(errors),
    }
}

fn text_field(
    field: &str,
    supplied: Option<&str>,
    prior: Option<&str>,
    partial: bool,
    max_len: usize,
    errors: &mut FieldErrors,
) -> Option<String> {
    match supplied.map(str::trim) {
        Some("") => {
            errors.push(field, "This field may not be blank");
            None
        }
        Some(text) if text.chars().count() > max_len => {
            errors.push(
                field,
                format!("Ensure this field has no more than {max_len} characters"),
            );
            None
        }
        Some(text) => Some(text.to_string()),
        None if partial => prior.map(str::to_string),
        None => {
            errors.push(field, "This field is required");
            None
        }
    }
}
