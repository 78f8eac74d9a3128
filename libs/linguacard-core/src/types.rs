//! Core types for quiz sessions.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Repository identifier of a card.
pub type CardId = i64;

/// Repository identifier of a deck.
pub type DeckId = i64;

/// One prompt/answer pair, as served by the flashcards API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "card_pk")]
    pub id: CardId,
    #[serde(rename = "deck_pk", default)]
    pub deck_id: DeckId,
    pub front: String,
    pub back: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
}

impl Card {
    /// Create a bare card with only the fields a quiz needs.
    pub fn new(id: CardId, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id,
            deck_id: 0,
            front: front.into(),
            back: back.into(),
            pronunciation: None,
            image: None,
            tags: None,
            created_at: None,
            next_review: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_pronunciation(mut self, pronunciation: impl Into<String>) -> Self {
        self.pronunciation = Some(pronunciation.into());
        self
    }
}

/// Named collection of cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(rename = "deck_pk")]
    pub id: DeckId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_correct: Option<u32>,
}

/// Quiz modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizMode {
    Typing,
    Matching,
    MultipleChoice,
    UntilPerfect,
}

impl QuizMode {
    pub const ALL: [QuizMode; 4] = [
        Self::Typing,
        Self::Matching,
        Self::MultipleChoice,
        Self::UntilPerfect,
    ];

    /// Get the mode name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Typing => "typing",
            Self::Matching => "matching",
            Self::MultipleChoice => "multiple-choice",
            Self::UntilPerfect => "until-perfect",
        }
    }

    /// Whether `total` is fixed at session start to the card count.
    pub fn counts_mastery(&self) -> bool {
        matches!(self, Self::Matching | Self::UntilPerfect)
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuizMode {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| QuizError::UnknownMode(s.to_string()))
    }
}

/// Running score of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub correct: u32,
    pub total: u32,
}

impl Score {
    pub fn new(correct: u32, total: u32) -> Self {
        Self { correct, total }
    }

    /// Rounded percentage of correct answers, 0 when nothing was counted.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (f64::from(self.correct) * 100.0 / f64::from(self.total)).round() as u32
    }
}

/// Column of a matching item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Front,
    Back,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

/// Clickable entry in a matching quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchItem {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub side: Side,
    pub card_id: CardId,
}

impl MatchItem {
    pub fn front(card: &Card) -> Self {
        Self {
            id: format!("front-{}", card.id),
            text: card.front.clone(),
            image: card.image.clone(),
            side: Side::Front,
            card_id: card.id,
        }
    }

    pub fn back(card: &Card) -> Self {
        Self {
            id: format!("back-{}", card.id),
            text: card.back.clone(),
            image: None,
            side: Side::Back,
            card_id: card.id,
        }
    }
}

/// Display state of a matching item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStyle {
    Default,
    Selected,
    Matched,
    Wrong,
}

/// Engine tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    /// How long the answer stays revealed before the next card.
    pub reveal_delay_ms: u64,
    /// Success highlight before a matched pair leaves the board.
    pub match_delay_ms: u64,
    /// Error highlight before a wrong pair is released.
    pub mismatch_delay_ms: u64,
    /// Wrong options offered next to the correct one.
    pub distractor_count: usize,
    /// Upper bound on until-perfect passes; `None` retries forever.
    pub max_passes: Option<u32>,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 2000,
            match_delay_ms: 200,
            mismatch_delay_ms: 1000,
            distractor_count: 3,
            max_passes: None,
        }
    }
}

impl QuizSettings {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn match_delay(&self) -> Duration {
        Duration::from_millis(self.match_delay_ms)
    }

    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mode_round_trips_through_its_name() {
        for mode in QuizMode::ALL {
            assert_eq!(mode.as_str().parse::<QuizMode>().unwrap(), mode);
        }
        assert!(matches!(
            "flip".parse::<QuizMode>(),
            Err(QuizError::UnknownMode(name)) if name == "flip"
        ));
    }

    #[test]
    fn mode_serializes_kebab_case() {
        let json = serde_json::to_string(&QuizMode::MultipleChoice).unwrap();
        assert_eq!(json, "\"multiple-choice\"");
    }

    #[test]
    fn score_percent_rounds() {
        assert_eq!(Score::new(2, 3).percent(), 67);
        assert_eq!(Score::new(1, 3).percent(), 33);
        assert_eq!(Score::new(0, 0).percent(), 0);
        assert_eq!(Score::new(5, 5).percent(), 100);
    }

    #[test]
    fn card_reads_repository_field_names() {
        let json = r#"{
            "card_pk": 7,
            "deck_pk": 2,
            "front": "Bonjour",
            "back": "Ciao",
            "pronunciation": "tʃaʊ",
            "image": null,
            "tags": ["salutation"],
            "created_at": "2024-05-01T10:00:00Z",
            "next_review": "2024-05-02T10:00:00Z"
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.id, 7);
        assert_eq!(card.deck_id, 2);
        assert_eq!(card.image, None);
        assert_eq!(card.tags, Some(vec!["salutation".to_string()]));
    }

    #[test]
    fn match_items_keep_image_on_front_only() {
        let card = Card::new(3, "Le chat", "Il gatto").with_image("🐱");
        let front = MatchItem::front(&card);
        let back = MatchItem::back(&card);
        assert_eq!(front.id, "front-3");
        assert_eq!(front.image.as_deref(), Some("🐱"));
        assert_eq!(back.id, "back-3");
        assert_eq!(back.image, None);
        assert_eq!(back.card_id, front.card_id);
    }

    #[test]
    fn settings_default_to_reference_timings() {
        let settings: QuizSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.reveal_delay(), Duration::from_millis(2000));
        assert_eq!(settings.match_delay(), Duration::from_millis(200));
        assert_eq!(settings.mismatch_delay(), Duration::from_millis(1000));
        assert_eq!(settings.distractor_count, 3);
        assert_eq!(settings.max_passes, None);
    }
}
