//! REST client for the flashcards API.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use linguacard_core::{Card, CardId, Deck, DeckId};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ClientError, Result};

/// Page size requested from list endpoints.
const LIST_LIMIT: u32 = 1000;

/// Fields for a new card. The server assigns the id.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewCard {
    #[serde(rename = "deck_pk")]
    pub deck_id: DeckId,
    pub front: String,
    pub back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub tags: Vec<String>,
}

/// Partial card update; unset fields are left alone by the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CardUpdate {
    #[serde(rename = "deck_pk", skip_serializing_if = "Option::is_none")]
    pub deck_id: Option<DeckId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl CardUpdate {
    /// Set tags from comma-separated form input.
    pub fn with_tag_input(mut self, input: &str) -> Self {
        self.tags = Some(parse_tags(input));
        self
    }
}

/// Split comma-separated tags, trimming each and dropping empties.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Serialize)]
struct CreateDeckRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateCardRequest<'a> {
    #[serde(flatten)]
    card: &'a NewCard,
    created_at: DateTime<Utc>,
    next_review: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

struct FlashcardsClientInner {
    client: Client,
    base_url: String,
}

/// Client for deck and card resources. Cheap to clone.
#[derive(Clone)]
pub struct FlashcardsClient {
    inner: Arc<FlashcardsClientInner>,
}

impl FlashcardsClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            inner: Arc::new(FlashcardsClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub async fn list_decks(&self, search: &str) -> Result<Vec<Deck>> {
        let url = format!("{}/decks/", self.inner.base_url);
        let limit = LIST_LIMIT.to_string();
        let resp = self
            .inner
            .client
            .get(&url)
            .query(&[("search", search), ("limit", limit.as_str())])
            .send()
            .await?;

        let decks: Vec<Deck> = json(resp).await?;
        debug!(count = decks.len(), search, "listed decks");
        Ok(decks)
    }

    pub async fn create_deck(&self, name: &str) -> Result<Deck> {
        let url = format!("{}/decks/", self.inner.base_url);
        let resp = self
            .inner
            .client
            .post(&url)
            .json(&CreateDeckRequest { name })
            .send()
            .await?;

        let deck: Deck = json(resp).await?;
        info!(deck_id = deck.id, name, "deck created");
        Ok(deck)
    }

    pub async fn delete_deck(&self, deck_id: DeckId) -> Result<()> {
        let url = format!("{}/decks/{}", self.inner.base_url, deck_id);
        let resp = self.inner.client.delete(&url).send().await?;
        check(resp).await?;
        info!(deck_id, "deck deleted");
        Ok(())
    }

    /// Cards of one deck, optionally filtered by a search term.
    pub async fn list_cards(&self, deck_id: DeckId, search: &str) -> Result<Vec<Card>> {
        let url = format!("{}/cards/", self.inner.base_url);
        let deck = deck_id.to_string();
        let limit = LIST_LIMIT.to_string();
        let resp = self
            .inner
            .client
            .get(&url)
            .query(&[
                ("deck_pk", deck.as_str()),
                ("search", search),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let cards: Vec<Card> = json(resp).await?;
        debug!(deck_id, count = cards.len(), "listed cards");
        Ok(cards)
    }

    /// Create a card, stamping it as created and due now.
    pub async fn create_card(&self, card: &NewCard) -> Result<Card> {
        let url = format!("{}/cards/", self.inner.base_url);
        let now = Utc::now();
        let request = CreateCardRequest {
            card,
            created_at: now,
            next_review: now,
        };
        let resp = self.inner.client.post(&url).json(&request).send().await?;

        let created: Card = json(resp).await?;
        info!(card_id = created.id, deck_id = created.deck_id, "card created");
        Ok(created)
    }

    pub async fn update_card(&self, card_id: CardId, update: &CardUpdate) -> Result<Card> {
        let url = format!("{}/cards/{}", self.inner.base_url, card_id);
        let resp = self.inner.client.put(&url).json(update).send().await?;

        let updated: Card = json(resp).await?;
        info!(card_id, "card updated");
        Ok(updated)
    }

    pub async fn delete_card(&self, card_id: CardId) -> Result<()> {
        let url = format!("{}/cards/{}", self.inner.base_url, card_id);
        let resp = self.inner.client.delete(&url).send().await?;
        check(resp).await?;
        info!(card_id, "card deleted");
        Ok(())
    }
}

/// Turn a non-2xx response into [`ClientError::Backend`].
///
/// The message is the body's `detail` field when present, else the HTTP
/// reason phrase.
pub(crate) async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let fallback = status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string();
    let message = match resp.json::<ErrorBody>().await {
        Ok(ErrorBody {
            detail: Some(serde_json::Value::String(detail)),
        }) => detail,
        Ok(ErrorBody {
            detail: Some(detail),
        }) if !detail.is_null() => detail.to_string(),
        _ => fallback,
    };

    Err(ClientError::Backend {
        status: status.as_u16(),
        message,
    })
}

async fn json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    check(resp)
        .await?
        .json()
        .await
        .map_err(|e| ClientError::Parse(e.to_string()))
}
