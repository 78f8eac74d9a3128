//! Italian verb catalogue and conjugation data.

use linguacard_core::{normalize_text, Card};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Filter value that means "no restriction".
pub const ALL: &str = "All";

pub const VERB_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Essentiels",
        &[
            "essere", "avere", "fare", "andare", "stare", "dare", "venire", "dire", "potere",
            "volere",
        ],
    ),
    (
        "Réguliers -are",
        &[
            "parlare", "mangiare", "guardare", "camminare", "studiare", "lavorare", "abitare",
            "comprare",
        ],
    ),
    (
        "Réguliers -ere",
        &["credere", "vendere", "ricevere", "ripetere", "temere", "perdere"],
    ),
    (
        "Réguliers -ire",
        &["dormire", "partire", "sentire", "aprire", "offrire", "seguire", "servire"],
    ),
    (
        "Irréguliers",
        &[
            "sapere", "dovere", "uscire", "bere", "rimanere", "tenere", "porre", "tradurre",
            "condurre",
        ],
    ),
];

pub const MOODS: &[&str] = &[
    "Indicativo",
    "Congiuntivo",
    "Condizionale",
    "Imperativo",
    "Infinito",
    "Participio",
    "Gerundio",
];

/// Moods picked from when a question has no mood filter.
pub const QUIZ_MOODS: &[&str] = &["Indicativo", "Congiuntivo", "Condizionale", "Imperativo"];

pub const TENSES_BY_MOOD: &[(&str, &[&str])] = &[
    (
        "Indicativo",
        &[
            "Presente",
            "Passato prossimo",
            "Imperfetto",
            "Trapassato prossimo",
            "Passato remoto",
            "Trapassato remoto",
            "Futuro semplice",
            "Futuro anteriore",
        ],
    ),
    ("Congiuntivo", &["Presente", "Passato", "Imperfetto", "Trapassato"]),
    ("Condizionale", &["Presente", "Passato"]),
    ("Imperativo", &["Presente"]),
    ("Infinito", &["Presente", "Passato"]),
    ("Participio", &["Presente", "Passato"]),
    ("Gerundio", &["Presente", "Passato"]),
];

pub const COMMON_VERBS: &[&str] = &[
    "essere", "avere", "fare", "andare", "stare", "dare", "venire", "dire", "potere", "volere",
    "sapere", "dovere", "parlare", "mangiare", "vedere", "prendere", "uscire", "capire", "finire",
    "mettere", "leggere", "scrivere",
];

/// Verbs of a category, matched ignoring case and accents.
pub fn category_verbs(category: &str) -> Option<&'static [&'static str]> {
    let wanted = normalize_text(category);
    VERB_CATEGORIES
        .iter()
        .find(|(name, _)| normalize_text(name) == wanted)
        .map(|(_, verbs)| *verbs)
}

/// Tenses available in a mood, matched ignoring case.
pub fn tenses_for(mood: &str) -> Option<&'static [&'static str]> {
    let wanted = normalize_text(mood);
    TENSES_BY_MOOD
        .iter()
        .find(|(name, _)| normalize_text(name) == wanted)
        .map(|(_, tenses)| *tenses)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConjugationPair {
    pub person: String,
    pub verb: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenseData {
    pub tense: String,
    pub conjugations: Vec<ConjugationPair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodData {
    pub mood: String,
    pub tenses: Vec<TenseData>,
}

/// Full conjugation table of one verb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbData {
    pub verb: String,
    pub translation: String,
    #[serde(default)]
    pub icon_suggestion: String,
    pub conjugations: Vec<MoodData>,
}

impl VerbData {
    pub fn mood(&self, mood: &str) -> Option<&MoodData> {
        let wanted = normalize_text(mood);
        self.conjugations
            .iter()
            .find(|m| normalize_text(&m.mood) == wanted)
    }

    pub fn tense(&self, mood: &str, tense: &str) -> Option<&TenseData> {
        let wanted = normalize_text(tense);
        self.mood(mood)?
            .tenses
            .iter()
            .find(|t| normalize_text(&t.tense) == wanted)
    }

    /// Drill question for one mood and tense of this table.
    pub fn question(&self, mood: &str, tense: &str) -> Option<QuizQuestion> {
        let mood = self.mood(mood)?;
        let wanted = normalize_text(tense);
        let data = mood
            .tenses
            .iter()
            .find(|t| normalize_text(&t.tense) == wanted)?;
        Some(QuizQuestion {
            verb: self.verb.clone(),
            translation: self.translation.clone(),
            mood: mood.mood.clone(),
            tense: data.tense.clone(),
            icon_suggestion: self.icon_suggestion.clone(),
            conjugations: data.conjugations.clone(),
        })
    }
}

/// One verb in one mood and tense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub verb: String,
    pub translation: String,
    pub mood: String,
    pub tense: String,
    #[serde(default)]
    pub icon_suggestion: String,
    pub conjugations: Vec<ConjugationPair>,
}

impl QuizQuestion {
    /// One card per person, answered with the conjugated form.
    pub fn to_cards(&self) -> Vec<Card> {
        self.conjugations
            .iter()
            .zip(1..)
            .map(|(pair, id)| {
                Card::new(
                    id,
                    format!(
                        "{} · {} ({} {})",
                        pair.person, self.verb, self.mood, self.tense
                    ),
                    pair.verb.clone(),
                )
            })
            .collect()
    }
}

/// Restrictions for a generated question. `None` and `"All"` both mean any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizFilters {
    pub verb_category: Option<String>,
    pub mood: Option<String>,
    pub tense: Option<String>,
    pub verb: Option<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl QuizFilters {
    pub fn mood(&self) -> Option<&str> {
        specific(&self.mood)
    }

    pub fn tense(&self) -> Option<&str> {
        specific(&self.tense)
    }
}

fn specific(filter: &Option<String>) -> Option<&str> {
    filter
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != ALL)
}

/// Choose the verb a question is about.
///
/// An explicit verb wins. Otherwise the verb is drawn from the category (or
/// the common verbs), minus `exclude`, falling back to the common verbs when
/// nothing is left.
pub fn pick_verb<R: Rng + ?Sized>(filters: &QuizFilters, rng: &mut R) -> String {
    if let Some(verb) = specific(&filters.verb) {
        return verb.to_string();
    }

    let pool = specific(&filters.verb_category)
        .map(|category| category_verbs(category).unwrap_or(&[]))
        .unwrap_or(COMMON_VERBS);

    let available: Vec<&str> = pool
        .iter()
        .copied()
        .filter(|verb| !filters.exclude.iter().any(|e| e == *verb))
        .collect();
    let available = if available.is_empty() {
        COMMON_VERBS.to_vec()
    } else {
        available
    };

    available
        .choose(rng)
        .copied()
        .unwrap_or(COMMON_VERBS[0])
        .to_string()
}
