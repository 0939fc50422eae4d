//! Registration flow over the HTTP surface.

use std::sync::Arc;

use chrono::{Duration, Utc};
use gather_server::auth::user_id_for_email;
use gather_server::notify::LogNotifier;
use gather_server::routes::create_routes;
use gather_server::state::AppState;
use gather_server::store::InMemoryEventStore;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const ORGANIZER: &str = "organizer@example.com";
const GUEST: &str = "guest@example.com";
const SECOND_GUEST: &str = "plus-one@example.com";

async fn spawn_app() -> String {
    let store = Arc::new(InMemoryEventStore::new());
    let state = AppState::new(store, Arc::new(LogNotifier));
    let app = create_routes(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server failed");
    });

    format!("http://{addr}")
}

fn bearer(email: &str) -> String {
    format!("Bearer user:{email}")
}

async fn seed_event(client: &Client, base_url: &str) -> String {
    let response = client
        .post(format!("{base_url}/events"))
        .header(AUTHORIZATION, bearer(ORGANIZER))
        .json(&json!({
            "title": "Community Meetup",
            "description": "Monthly get-together",
            "location": "Kyiv",
            "date": (Utc::now() + Duration::days(14)).to_rfc3339(),
        }))
        .send()
        .await
        .expect("seed request failed");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("invalid seed response");
    body["data"]["id"]
        .as_str()
        .expect("seeded event has an id")
        .to_string()
}

async fn register(client: &Client, base_url: &str, event_id: &str, email: &str) -> reqwest::Response {
    client
        .post(format!("{base_url}/events/{event_id}"))
        .header(AUTHORIZATION, bearer(email))
        .send()
        .await
        .expect("register request failed")
}

async fn attendees_of(client: &Client, base_url: &str, event_id: &str) -> Vec<String> {
    let response = client
        .get(format!("{base_url}/events/{event_id}"))
        .header(AUTHORIZATION, bearer(ORGANIZER))
        .send()
        .await
        .expect("get request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("invalid get response");
    body["data"]["attendees"]
        .as_array()
        .expect("attendees is an array")
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn registration_adds_caller_to_attendees() {
    let base_url = spawn_app().await;
    let client = Client::new();
    let event_id = seed_event(&client, &base_url).await;

    let response = register(&client, &base_url, &event_id, GUEST).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("invalid register response");
    assert_eq!(body["success"], json!(true));
    assert_eq!(
        body["message"],
        json!("You have successfully registered for the event")
    );

    let guest_id = user_id_for_email(GUEST).to_string();
    let returned: Vec<&str> = body["data"]["attendees"]
        .as_array()
        .expect("attendees is an array")
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(returned, vec![guest_id.as_str()]);

    assert_eq!(attendees_of(&client, &base_url, &event_id).await, vec![guest_id]);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let base_url = spawn_app().await;
    let client = Client::new();
    let event_id = seed_event(&client, &base_url).await;

    let first = register(&client, &base_url, &event_id, GUEST).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = register(&client, &base_url, &event_id, GUEST).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    let body: Value = second.json().await.expect("invalid error response");
    assert_eq!(error_code(&body), "ALREADY_REGISTERED");
    assert_eq!(
        body["error"]["message"],
        json!("You are already registered for this event")
    );

    assert_eq!(attendees_of(&client, &base_url, &event_id).await.len(), 1);
}

#[tokio::test]
async fn organizer_cannot_register_for_own_event() {
    let base_url = spawn_app().await;
    let client = Client::new();
    let event_id = seed_event(&client, &base_url).await;

    let response = register(&client, &base_url, &event_id, ORGANIZER).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("invalid error response");
    assert_eq!(error_code(&body), "ORGANIZER_CANNOT_ATTEND");
    assert_eq!(
        body["error"]["message"],
        json!("Organizers cannot be attendees")
    );

    assert!(attendees_of(&client, &base_url, &event_id).await.is_empty());
}

#[tokio::test]
async fn registration_requires_credentials() {
    let base_url = spawn_app().await;
    let client = Client::new();
    let event_id = seed_event(&client, &base_url).await;

    let response = client
        .post(format!("{base_url}/events/{event_id}"))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: Value = response.json().await.expect("invalid error response");
    assert_eq!(error_code(&body), "UNAUTHENTICATED");
    assert!(attendees_of(&client, &base_url, &event_id).await.is_empty());
}

#[tokio::test]
async fn registering_for_missing_event_is_not_found() {
    let base_url = spawn_app().await;
    let client = Client::new();

    let response = register(
        &client,
        &base_url,
        "7d7f9f44-06b1-4f9f-b29f-0f43e7a5a8a4",
        GUEST,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = response.json().await.expect("invalid error response");
    assert_eq!(error_code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn multiple_guests_can_register() {
    let base_url = spawn_app().await;
    let client = Client::new();
    let event_id = seed_event(&client, &base_url).await;

    assert_eq!(
        register(&client, &base_url, &event_id, GUEST).await.status(),
        StatusCode::CREATED
    );
    assert_eq!(
        register(&client, &base_url, &event_id, SECOND_GUEST)
            .await
            .status(),
        StatusCode::CREATED
    );

    let attendees = attendees_of(&client, &base_url, &event_id).await;
    assert_eq!(attendees.len(), 2);
    assert!(attendees.contains(&user_id_for_email(GUEST).to_string()));
    assert!(attendees.contains(&user_id_for_email(SECOND_GUEST).to_string()));
    assert!(!attendees.contains(&user_id_for_email(ORGANIZER).to_string()));
}

#[tokio::test]
async fn registration_does_not_grant_mutation_rights() {
    let base_url = spawn_app().await;
    let client = Client::new();
    let event_id = seed_event(&client, &base_url).await;

    let response = register(&client, &base_url, &event_id, GUEST).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let delete = client
        .delete(format!("{base_url}/events/{event_id}"))
        .header(AUTHORIZATION, bearer(GUEST))
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);
}
