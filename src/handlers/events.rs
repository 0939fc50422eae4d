//! Event endpoints.
//!
//! Handlers stay thin: identity comes from the `Identity` extractor,
//! field checks live in `validate`, ownership checks in `authz` and the
//! registration state machine in `registration`. Every authenticated
//! caller can read; only organizers can mutate.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Identity;
use crate::authz::authorize_mutation;
use crate::models::event::{Event, EventDraft};
use crate::registration;
use crate::state::AppState;
use crate::store::EventFilter;
use crate::utils::error::AppError;
use crate::utils::response::{created, no_content, success};
use crate::validate::{validate, ValidationMode};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

pub async fn list_events(
    State(state): State<AppState>,
    _identity: Identity,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let filter = EventFilter {
        search: query.search,
    };
    let events = state.store().list(&filter).await?;

    Ok(success(events, "Events retrieved successfully"))
}

pub async fn create_event(
    State(state): State<AppState>,
    identity: Identity,
    Json(draft): Json<EventDraft>,
) -> Result<Response, AppError> {
    let fields = validate(&draft, ValidationMode::Create, Utc::now())?;
    let event = state.store().create(identity.user_id, fields).await?;

    tracing::info!(event_id = %event.id, organizer_id = %event.organizer_id, "Event created");
    Ok(created(event, "Event created successfully"))
}

pub async fn get_event(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_event_id(&id)?;
    let event = load_event(&state, id).await?;

    Ok(success(event, "Event retrieved successfully"))
}

pub async fn register_for_event(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_event_id(&id)?;
    let event = load_event(&state, id).await?;
    let snapshot =
        registration::register(state.store(), state.notifier(), &event, &identity).await?;

    tracing::info!(event_id = %id, user_id = %identity.user_id, "Attendee registered");
    Ok(created(
        snapshot,
        "You have successfully registered for the event",
    ))
}

pub async fn update_event(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(draft): Json<EventDraft>,
) -> Result<Response, AppError> {
    apply_update(&state, &identity, &id, &draft, false).await
}

pub async fn patch_event(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(draft): Json<EventDraft>,
) -> Result<Response, AppError> {
    apply_update(&state, &identity, &id, &draft, true).await
}

pub async fn delete_event(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_event_id(&id)?;
    let event = load_event(&state, id).await?;
    authorize_mutation(&event, &identity)?;
    state.store().delete(id).await?;

    tracing::info!(event_id = %id, "Event deleted");
    Ok(no_content())
}

async fn apply_update(
    state: &AppState,
    identity: &Identity,
    raw_id: &str,
    draft: &EventDraft,
    partial: bool,
) -> Result<Response, AppError> {
    let id = parse_event_id(raw_id)?;
    let event = load_event(state, id).await?;
    authorize_mutation(&event, identity)?;

    let mode = if partial {
        ValidationMode::PartialUpdate(&event)
    } else {
        ValidationMode::Update(&event)
    };
    let fields = validate(draft, mode, Utc::now())?;
    let updated = state.store().update(id, fields).await?;

    tracing::info!(event_id = %id, "Event updated");
    Ok(success(updated, "Event updated successfully"))
}

/// Malformed ids are indistinguishable from missing events to clients.
fn parse_event_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(event_not_found(raw)))
}

async fn load_event(state: &AppState, id: Uuid) -> Result<Event, AppError> {
    let event = state.store().get(id).await?;
    event.ok_or_else(|| AppError::NotFound(event_not_found(&id.to_string())))
}

fn event_not_found(id: &str) -> String {
    format!("Event with id '{}' was not found", id)
}
