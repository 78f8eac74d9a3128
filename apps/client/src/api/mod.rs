//! Clients for the remote services the quiz draws on.

pub mod conjugation;
pub mod flashcards;

pub use conjugation::{extract_json, ConjugationService, GeminiClient, RetryPolicy};
pub use flashcards::{parse_tags, CardUpdate, FlashcardsClient, NewCard};
