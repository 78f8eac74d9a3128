//! Runtime configuration from the environment.

use linguacard_core::QuizSettings;

use crate::error::{ClientError, Result};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the flashcards API.
    pub api_base: String,
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub quiz: QuizSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            gemini_api_key: None,
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
            quiz: QuizSettings::default(),
        }
    }
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Config::default();

        let mut quiz = defaults.quiz;
        if let Some(ms) = parse_var(&get, "QUIZ_REVEAL_MS")? {
            quiz.reveal_delay_ms = ms;
        }
        if let Some(ms) = parse_var(&get, "QUIZ_MATCH_MS")? {
            quiz.match_delay_ms = ms;
        }
        if let Some(ms) = parse_var(&get, "QUIZ_MISMATCH_MS")? {
            quiz.mismatch_delay_ms = ms;
        }
        quiz.max_passes = parse_var(&get, "QUIZ_MAX_PASSES")?;
        if quiz.max_passes == Some(0) {
            return Err(ClientError::Config(
                "QUIZ_MAX_PASSES must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            api_base: get("FLASHCARDS_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_api_url: get("GEMINI_API_URL").unwrap_or(defaults.gemini_api_url),
            quiz,
        })
    }
}

fn parse_var<T, F>(get: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ClientError::Config(format!("{key} must be a number, got {raw:?}")))
        })
        .transpose()
}
