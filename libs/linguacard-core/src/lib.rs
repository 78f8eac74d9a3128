//! Core quiz library for linguacard.
//!
//! Provides:
//! - Quiz engine for typing, matching, multiple-choice and until-perfect modes
//! - Answer normalization (case, accents, punctuation)
//! - Render snapshots of a running session
//! - Shared types (Card, Deck, QuizMode, Score, etc.)

pub mod engine;
pub mod error;
pub mod normalize;
pub mod types;
pub mod view;

pub use engine::{build_options, Deferred, DeferredEvent, QuizEngine, Scheduled, SessionToken};
pub use error::{QuizError, Result};
pub use normalize::{answers_match, normalize_text, shuffled_words};
pub use types::{
    Card, CardId, Deck, DeckId, ItemStyle, MatchItem, QuizMode, QuizSettings, Score, Side,
};
pub use view::{CompletionView, Feedback, MatchItemView, MatchingView, PromptView, QuizView};
