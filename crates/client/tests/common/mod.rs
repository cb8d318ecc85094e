//! Common test utilities for integration tests.
//!
//! Runs an in-process stand-in for the events backend on an ephemeral port.
//! It speaks the same JSON shapes and error messages as the real service but
//! keeps everything in memory, so tests need no external setup.

// Helpers are shared by several test binaries; not all of them use everything.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use campus_events_client::api::{ApiClient, IDEMPOTENCY_KEY_HEADER};
use campus_events_client::session::Session;
use chrono::Utc;
use serde_json::{json, Value};

pub const VALID_TOKEN: &str = "valid-token";
pub const USER_EMAIL: &str = "meera@college.edu";
pub const USER_PASSWORD: &str = "secret";
pub const USER_ID: i64 = 5;

pub const HACKATHON_ID: i64 = 1;
pub const CULTURAL_NIGHT_ID: i64 = 2;
pub const FULL_WORKSHOP_ID: i64 = 3;

/// In-memory backend state, inspected by tests after the calls.
#[derive(Debug, Default)]
pub struct BackendState {
    pub events: Vec<Value>,
    pub registered: HashSet<i64>,
    pub register_calls: u32,
    pub idempotency_keys: Vec<String>,
    /// Delay applied to register/unregister before answering.
    pub delay_ms: u64,
    pub last_query: HashMap<String, String>,
    pub last_body: Option<Value>,
    pub notifications: Vec<Value>,
    pub fail_event_fetch: bool,
    pub outage: bool,
}

pub type SharedState = Arc<Mutex<BackendState>>;

type Reply = (StatusCode, Json<Value>);

/// A running backend and the state behind it.
pub struct TestBackend {
    pub base_url: String,
    state: SharedState,
}

impl TestBackend {
    pub fn client(&self) -> ApiClient {
        ApiClient::with_http(reqwest::Client::new(), &self.base_url)
            .expect("Failed to build client")
    }

    pub fn state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap()
    }
}

pub fn session() -> Session {
    Session::new(VALID_TOKEN)
}

/// Backend timestamp format: ISO-8601 without an offset.
pub fn naive_in_days(days: i64) -> String {
    (Utc::now() + chrono::Duration::days(days))
        .naive_utc()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

/// Three events: an open hackathon, a cultural night whose deadline passed
/// and a workshop that is already full.
pub fn default_state() -> BackendState {
    BackendState {
        events: vec![
            json!({
                "id": HACKATHON_ID,
                "title": "Annual Hackathon",
                "description": "24 hours of building",
                "category": "Technical",
                "department": "Computer Science",
                "venue": "Main Auditorium",
                "date_time": naive_in_days(10),
                "end_time": naive_in_days(11),
                "registration_deadline": naive_in_days(8),
                "max_participants": 100,
                "current_participants": 40,
                "is_featured": true,
                "created_by": 99,
                "organizer": "Coding Club",
                "contact_email": "coding@college.edu"
            }),
            json!({
                "id": CULTURAL_NIGHT_ID,
                "title": "Cultural Night",
                "description": "Music and dance",
                "category": "Cultural",
                "department": "Arts",
                "venue": "Open Air Theatre",
                "date_time": naive_in_days(3),
                "end_time": naive_in_days(3),
                "registration_deadline": naive_in_days(-1),
                "max_participants": null,
                "current_participants": 120,
                "is_featured": false,
                "created_by": 98
            }),
            json!({
                "id": FULL_WORKSHOP_ID,
                "title": "Robotics Workshop",
                "description": "Build a line follower",
                "category": "Workshop",
                "department": "Mechanical Engineering",
                "venue": "Lab 3",
                "date_time": naive_in_days(20),
                "end_time": naive_in_days(20),
                "registration_deadline": null,
                "max_participants": 2,
                "current_participants": 2,
                "is_featured": false,
                "created_by": 97
            }),
        ],
        notifications: vec![
            json!({
                "id": 11,
                "title": "Event Registration Successful",
                "message": "You have successfully registered for \"Annual Hackathon\".",
                "is_read": false,
                "created_at": naive_in_days(-2),
                "notification_type": "success",
                "event_id": HACKATHON_ID
            }),
            json!({
                "id": 12,
                "title": "Welcome!",
                "message": "Welcome to Campus Events",
                "is_read": true,
                "created_at": naive_in_days(-30),
                "notification_type": "info",
                "event_id": null
            }),
        ],
        ..Default::default()
    }
}

pub async fn spawn_backend(state: BackendState) -> TestBackend {
    let state = Arc::new(Mutex::new(state));
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test backend failed");
    });

    TestBackend {
        base_url: format!("http://{}", addr),
        state,
    }
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/featured", get(featured_events))
        .route(
            "/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/events/:id/register", post(register))
        .route("/events/:id/unregister", post(unregister))
        .route("/my-events", get(my_events))
        .route("/categories", get(categories))
        .route("/departments", get(departments))
        .route("/login", post(login))
        .route("/register", post(sign_up))
        .route("/profile", get(profile).put(update_profile))
        .route("/notifications", get(notifications))
        .route("/notifications/read-all", put(mark_all_read))
        .route("/notifications/:id/read", put(mark_read))
        .with_state(state)
}

fn message(status: StatusCode, text: &str) -> Reply {
    (status, Json(json!({ "message": text })))
}

fn authorize(headers: &HeaderMap) -> Result<(), Reply> {
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        None => Err(message(StatusCode::UNAUTHORIZED, "Token is missing!")),
        Some(value) if value == format!("Bearer {}", VALID_TOKEN) => Ok(()),
        Some(_) => Err(message(StatusCode::UNAUTHORIZED, "Token is invalid!")),
    }
}

fn user_json() -> Value {
    json!({
        "id": USER_ID,
        "username": "meera",
        "email": USER_EMAIL,
        "department": "Computer Science",
        "year": "2",
        "is_organizer": true,
        "is_admin": false,
        "profile_picture": null
    })
}

fn find_event(state: &BackendState, id: i64) -> Option<Value> {
    state.events.iter().find(|e| e["id"] == id).cloned()
}

async fn list_events(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let mut state = state.lock().unwrap();
    state.last_query = params.clone();

    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(12);

    let matching: Vec<Value> = state
        .events
        .iter()
        .filter(|e| match params.get("category") {
            Some(category) => e["category"] == category.as_str(),
            None => true,
        })
        .cloned()
        .collect();

    let total = matching.len();
    let events: Vec<Value> = matching
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "events": events,
            "pagination": {
                "page": page,
                "limit": limit,
                "total": total,
                "pages": total.div_ceil(limit)
            }
        })),
    )
}

async fn featured_events(State(state): State<SharedState>) -> Reply {
    let state = state.lock().unwrap();
    let events: Vec<Value> = state
        .events
        .iter()
        .filter(|e| e["is_featured"] == true)
        .map(|e| {
            json!({
                "id": e["id"],
                "title": e["title"],
                "description": e["description"],
                "category": e["category"],
                "date_time": e["date_time"],
                "venue": e["venue"],
                "image_url": null,
                "current_participants": e["current_participants"],
                "max_participants": e["max_participants"]
            })
        })
        .collect();
    (StatusCode::OK, Json(json!({ "events": events })))
}

async fn get_event(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Reply {
    let state = state.lock().unwrap();
    if state.fail_event_fetch {
        return message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
    }
    let Some(mut event) = find_event(&state, id) else {
        return message(StatusCode::NOT_FOUND, "Resource not found!");
    };
    if authorize(&headers).is_ok() {
        event["is_registered"] = json!(state.registered.contains(&id));
    }
    (StatusCode::OK, Json(json!({ "event": event })))
}

async fn register(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Reply {
    if let Err(reply) = authorize(&headers) {
        return reply;
    }
    let delay = state.lock().unwrap().delay_ms;
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let mut state = state.lock().unwrap();
    state.register_calls += 1;
    if let Some(key) = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        state.idempotency_keys.push(key.to_string());
    }

    if state.registered.contains(&id) {
        return message(
            StatusCode::BAD_REQUEST,
            "You are already registered for this event!",
        );
    }
    let Some(event) = state.events.iter_mut().find(|e| e["id"] == id) else {
        return message(StatusCode::NOT_FOUND, "Resource not found!");
    };
    let current = event["current_participants"].as_u64().unwrap_or(0);
    if let Some(max) = event["max_participants"].as_u64() {
        if current >= max {
            return message(StatusCode::BAD_REQUEST, "This event is full!");
        }
    }
    event["current_participants"] = json!(current + 1);
    state.registered.insert(id);

    message(StatusCode::OK, "Successfully registered for the event!")
}

async fn unregister(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Reply {
    if let Err(reply) = authorize(&headers) {
        return reply;
    }
    let mut state = state.lock().unwrap();
    if let Some(key) = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        state.idempotency_keys.push(key.to_string());
    }
    if !state.registered.remove(&id) {
        return message(StatusCode::NOT_FOUND, "Resource not found!");
    }
    if let Some(event) = state.events.iter_mut().find(|e| e["id"] == id) {
        let current = event["current_participants"].as_u64().unwrap_or(0);
        event["current_participants"] = json!(current.saturating_sub(1));
    }
    message(StatusCode::OK, "Successfully unregistered from the event!")
}

async fn my_events(State(state): State<SharedState>, headers: HeaderMap) -> Reply {
    if let Err(reply) = authorize(&headers) {
        return reply;
    }
    let state = state.lock().unwrap();
    let registered: Vec<Value> = state
        .events
        .iter()
        .filter(|e| {
            e["id"]
                .as_i64()
                .is_some_and(|id| state.registered.contains(&id))
        })
        .map(|e| {
            json!({
                "id": e["id"],
                "title": e["title"],
                "date_time": e["date_time"],
                "venue": e["venue"],
                "organizer": e["organizer"],
                "contact_email": e["contact_email"],
                "category": e["category"],
                "registration_date": naive_in_days(0),
                "attended": false
            })
        })
        .collect();
    (
        StatusCode::OK,
        Json(json!({ "created_events": [], "registered_events": registered })),
    )
}

async fn create_event(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if let Err(reply) = authorize(&headers) {
        return reply;
    }
    let mut state = state.lock().unwrap();
    let id = state.events.len() as i64 + 1;
    let mut stored = body.clone();
    stored["id"] = json!(id);
    stored["created_by"] = json!(USER_ID);
    stored["current_participants"] = json!(0);
    state.events.push(stored);
    state.last_body = Some(body.clone());

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Event created successfully!",
            "event": { "id": id, "title": body["title"], "description": body["description"] }
        })),
    )
}

async fn update_event(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if let Err(reply) = authorize(&headers) {
        return reply;
    }
    let mut state = state.lock().unwrap();
    if find_event(&state, id).is_none() {
        return message(StatusCode::NOT_FOUND, "Resource not found!");
    }
    state.last_body = Some(body);
    message(StatusCode::OK, "Event updated successfully!")
}

async fn delete_event(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Reply {
    if let Err(reply) = authorize(&headers) {
        return reply;
    }
    let mut state = state.lock().unwrap();
    let Some(event) = find_event(&state, id) else {
        return message(StatusCode::NOT_FOUND, "Resource not found!");
    };
    if event["created_by"] != USER_ID {
        return message(StatusCode::FORBIDDEN, "You can only delete your own events!");
    }
    state.events.retain(|e| e["id"] != id);
    message(StatusCode::OK, "Event deleted successfully!")
}

async fn categories(State(state): State<SharedState>) -> Reply {
    if state.lock().unwrap().outage {
        return message(StatusCode::SERVICE_UNAVAILABLE, "Service unavailable");
    }
    (
        StatusCode::OK,
        Json(json!({ "categories": ["Technical", "Cultural", "Sports", "Workshop", "Seminar"] })),
    )
}

async fn departments() -> Reply {
    (
        StatusCode::OK,
        Json(json!({ "departments": ["Computer Science", "Electrical Engineering", "Arts"] })),
    )
}

async fn login(Json(body): Json<Value>) -> Reply {
    if body["email"] == USER_EMAIL && body["password"] == USER_PASSWORD {
        (
            StatusCode::OK,
            Json(json!({
                "message": "Login successful!",
                "token": VALID_TOKEN,
                "user": user_json()
            })),
        )
    } else {
        message(StatusCode::UNAUTHORIZED, "Invalid email or password!")
    }
}

async fn sign_up(State(state): State<SharedState>, Json(body): Json<Value>) -> Reply {
    if body["email"] == USER_EMAIL {
        return message(StatusCode::BAD_REQUEST, "Email already registered!");
    }
    state.lock().unwrap().last_body = Some(body.clone());
    let mut user = user_json();
    user["id"] = json!(6);
    user["username"] = body["username"].clone();
    user["email"] = body["email"].clone();
    user["is_organizer"] = body["is_organizer"].clone();
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully!",
            "token": VALID_TOKEN,
            "user": user
        })),
    )
}

async fn profile(State(state): State<SharedState>, headers: HeaderMap) -> Reply {
    if let Err(reply) = authorize(&headers) {
        return reply;
    }
    let registered = state.lock().unwrap().registered.len();
    let mut profile = user_json();
    profile["created_at"] = json!(naive_in_days(-100));
    profile["statistics"] = json!({
        "events_created": 2,
        "events_registered": registered,
        "events_attended": 1
    });
    (StatusCode::OK, Json(json!({ "profile": profile })))
}

async fn update_profile(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if let Err(reply) = authorize(&headers) {
        return reply;
    }
    state.lock().unwrap().last_body = Some(body);
    message(StatusCode::OK, "Profile updated successfully!")
}

async fn notifications(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Reply {
    if let Err(reply) = authorize(&headers) {
        return reply;
    }
    let mut state = state.lock().unwrap();
    state.last_query = params.clone();

    let unread_only = params.get("unread_only").is_some_and(|v| v == "true");
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(20);
    let unread_count = state
        .notifications
        .iter()
        .filter(|n| n["is_read"] == false)
        .count();
    let listed: Vec<Value> = state
        .notifications
        .iter()
        .filter(|n| !unread_only || n["is_read"] == false)
        .take(limit)
        .cloned()
        .collect();

    (
        StatusCode::OK,
        Json(json!({ "notifications": listed, "unread_count": unread_count })),
    )
}

async fn mark_read(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Reply {
    if let Err(reply) = authorize(&headers) {
        return reply;
    }
    let mut state = state.lock().unwrap();
    match state.notifications.iter_mut().find(|n| n["id"] == id) {
        Some(notification) => {
            notification["is_read"] = json!(true);
            message(StatusCode::OK, "Notification marked as read!")
        }
        None => message(StatusCode::NOT_FOUND, "Resource not found!"),
    }
}

async fn mark_all_read(State(state): State<SharedState>, headers: HeaderMap) -> Reply {
    if let Err(reply) = authorize(&headers) {
        return reply;
    }
    let mut state = state.lock().unwrap();
    for notification in state.notifications.iter_mut() {
        notification["is_read"] = json!(true);
    }
    message(StatusCode::OK, "All notifications marked as read!")
}
