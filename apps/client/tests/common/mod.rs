//! Common test utilities for client integration tests.
//!
//! This module provides an in-process mock of the flashcards API and the
//! Gemini endpoint, served by axum on an ephemeral local port.

#![allow(dead_code)]

pub mod fixtures;

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};

/// Data held by the mock server.
#[derive(Default)]
pub struct Store {
    pub decks: Vec<Value>,
    pub cards: Vec<Value>,
    next_id: i64,
    /// Query string of the last list request.
    pub last_query: HashMap<String, String>,
    /// Replies for successive Gemini calls as (status, body).
    pub gemini_replies: VecDeque<(u16, Value)>,
    pub gemini_requests: Vec<Value>,
    pub gemini_keys: Vec<String>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone, Default)]
pub struct MockState {
    inner: Arc<Mutex<Store>>,
}

impl MockState {
    pub fn store(&self) -> MutexGuard<'_, Store> {
        self.inner.lock().expect("mock store lock")
    }
}

/// Running mock server.
pub struct MockServer {
    pub base_url: String,
    pub state: MockState,
}

impl MockServer {
    /// Start a server on an ephemeral port.
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = build_mock_router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("mock server address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn gemini_url(&self) -> String {
        format!("{}/v1beta/models/gemini-test/generate", self.base_url)
    }

    /// Add a deck and return its id.
    pub fn seed_deck(&self, name: &str) -> i64 {
        let mut store = self.state.store();
        let id = store.next_id();
        store.decks.push(json!({ "deck_pk": id, "name": name }));
        id
    }

    /// Add a card and return its id.
    pub fn seed_card(&self, deck_pk: i64, front: &str, back: &str) -> i64 {
        let mut store = self.state.store();
        let id = store.next_id();
        store.cards.push(json!({
            "card_pk": id,
            "deck_pk": deck_pk,
            "front": front,
            "back": back,
            "pronunciation": null,
            "image": null,
            "tags": [],
            "created_at": "2024-03-01T09:00:00Z",
            "next_review": "2024-03-02T09:00:00Z",
        }));
        id
    }

    pub fn queue_gemini(&self, status: u16, body: Value) {
        self.state.store().gemini_replies.push_back((status, body));
    }
}

fn build_mock_router(state: MockState) -> Router {
    Router::new()
        .route("/decks/", get(list_decks).post(create_deck))
        .route("/decks/:id", delete(delete_deck))
        .route("/cards/", get(list_cards).post(create_card))
        .route("/cards/:id", delete(delete_card).put(update_card))
        .route("/v1beta/models/gemini-test/generate", post(gemini))
        .with_state(state)
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": format!("{what} not found") })),
    )
        .into_response()
}

fn matches_search(value: &Value, field: &str, search: Option<&String>) -> bool {
    let Some(search) = search.filter(|s| !s.is_empty()) else {
        return true;
    };
    value[field]
        .as_str()
        .is_some_and(|text| text.to_lowercase().contains(&search.to_lowercase()))
}

async fn list_decks(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut store = state.store();
    let decks: Vec<Value> = store
        .decks
        .iter()
        .filter(|deck| matches_search(deck, "name", query.get("search")))
        .cloned()
        .collect();
    store.last_query = query;
    Json(Value::Array(decks))
}

async fn create_deck(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let Some(name) = body["name"].as_str().filter(|n| !n.is_empty()) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": "name is required" })),
        )
            .into_response();
    };
    let mut store = state.store();
    let id = store.next_id();
    let deck = json!({ "deck_pk": id, "name": name, "total_attempts": 0, "total_correct": 0 });
    store.decks.push(deck.clone());
    (StatusCode::CREATED, Json(deck)).into_response()
}

async fn delete_deck(State(state): State<MockState>, Path(id): Path<i64>) -> Response {
    let mut store = state.store();
    let before = store.decks.len();
    store.decks.retain(|deck| deck["deck_pk"] != id);
    if store.decks.len() == before {
        return not_found("Deck");
    }
    store.cards.retain(|card| card["deck_pk"] != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn list_cards(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut store = state.store();
    let deck_pk: Option<i64> = query.get("deck_pk").and_then(|d| d.parse().ok());
    let cards: Vec<Value> = store
        .cards
        .iter()
        .filter(|card| deck_pk.map_or(true, |id| card["deck_pk"] == id))
        .filter(|card| {
            matches_search(card, "front", query.get("search"))
                || matches_search(card, "back", query.get("search"))
        })
        .cloned()
        .collect();
    store.last_query = query;
    Json(Value::Array(cards))
}

async fn create_card(State(state): State<MockState>, Json(mut body): Json<Value>) -> Response {
    if body["created_at"].is_null() || body["next_review"].is_null() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": "created_at and next_review are required" })),
        )
            .into_response();
    }
    let mut store = state.store();
    let id = store.next_id();
    body["card_pk"] = json!(id);
    store.cards.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_card(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = state.store();
    let Some(card) = store.cards.iter_mut().find(|card| card["card_pk"] == id) else {
        return not_found("Card");
    };
    if let (Some(card), Some(changes)) = (card.as_object_mut(), body.as_object()) {
        for (key, value) in changes {
            card.insert(key.clone(), value.clone());
        }
    }
    Json(card.clone()).into_response()
}

async fn delete_card(State(state): State<MockState>, Path(id): Path<i64>) -> Response {
    let mut store = state.store();
    let before = store.cards.len();
    store.cards.retain(|card| card["card_pk"] != id);
    if store.cards.len() == before {
        return not_found("Card");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn gemini(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = state.store();
    store
        .gemini_keys
        .push(query.get("key").cloned().unwrap_or_default());
    store.gemini_requests.push(body);

    let (status, reply) = store
        .gemini_replies
        .pop_front()
        .unwrap_or((500, json!({ "error": "no reply queued" })));
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(reply)).into_response()
}
