//! Test fixtures and factory functions for creating test data.

use linguacard_core::Card;
use serde_json::{json, Value};

/// Italian numbers as cards with ids 1..=count.
pub fn number_cards(count: usize) -> Vec<Card> {
    const WORDS: [(&str, &str); 8] = [
        ("uno", "one"),
        ("due", "two"),
        ("tre", "three"),
        ("quattro", "four"),
        ("cinque", "five"),
        ("sei", "six"),
        ("sette", "seven"),
        ("otto", "eight"),
    ];
    WORDS
        .iter()
        .take(count)
        .zip(1..)
        .map(|((front, back), id)| Card::new(id, *front, *back))
        .collect()
}

/// Body of a successful generateContent call whose reply is `text`.
pub fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP"
        }]
    })
}

/// Quiz question JSON as a model would reply, wrapped in prose.
pub fn question_reply(verb: &str) -> String {
    format!(
        "Ecco la domanda:\n```json\n{}\n```",
        json!({
            "verb": verb,
            "translation": "être",
            "mood": "Indicativo",
            "tense": "Presente",
            "icon_suggestion": "user",
            "conjugations": [
                { "person": "io", "verb": "sono" },
                { "person": "tu", "verb": "sei" },
                { "person": "lui/lei", "verb": "è" },
                { "person": "noi", "verb": "siamo" },
                { "person": "voi", "verb": "siete" },
                { "person": "loro", "verb": "sono" }
            ]
        })
    )
}

/// Conjugation table JSON with a single mood and tense.
pub fn conjugation_reply(verb: &str) -> String {
    json!({
        "verb": verb,
        "translation": "avoir",
        "icon_suggestion": "hand",
        "conjugations": [{
            "mood": "Indicativo",
            "tenses": [{
                "tense": "Presente",
                "conjugations": [
                    { "person": "io", "verb": "ho" },
                    { "person": "tu", "verb": "hai" },
                    { "person": "lui/lei", "verb": "ha" },
                    { "person": "noi", "verb": "abbiamo" },
                    { "person": "voi", "verb": "avete" },
                    { "person": "loro", "verb": "hanno" }
                ]
            }]
        }]
    })
    .to_string()
}
