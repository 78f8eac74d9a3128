//! Verb conjugation generated by a Gemini model.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::verbs::{pick_verb, QuizFilters, QuizQuestion, VerbData, QUIZ_MOODS};

/// Source of conjugation tables and drill questions.
#[async_trait]
pub trait ConjugationService: Send + Sync {
    /// Full conjugation of `verb` in every mood and tense.
    async fn generate_conjugation(&self, verb: &str) -> Result<VerbData>;

    /// One verb in one mood and tense, chosen within `filters`.
    async fn generate_quiz_question(&self, filters: &QuizFilters) -> Result<QuizQuestion>;
}

/// Retry with exponential backoff for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
        }
    }

    /// Wait before retry number `retry` (1-based): 1x, 2x, 4x the initial delay.
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.initial_delay
            .saturating_mul(2u32.saturating_pow(retry.saturating_sub(1)))
    }

    /// Run `operation` until it succeeds, fails permanently, or attempts run out.
    pub async fn run<T, F, Fut>(&self, name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        operation = name,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_k: u32,
    top_p: f64,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_k: 1,
            top_p: 1.0,
            max_output_tokens: 4096,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.trim().is_empty())
    }
}

/// The outermost `{ ... }` span of a model reply.
pub fn extract_json(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (start < end).then(|| &reply[start..=end])
}

fn parse_reply<T: DeserializeOwned>(reply: &str) -> Result<T> {
    let json = extract_json(reply)
        .ok_or_else(|| ClientError::InvalidResponse("no JSON object in model reply".to_string()))?;
    serde_json::from_str(json).map_err(|e| ClientError::Parse(e.to_string()))
}

pub(crate) fn conjugation_prompt(verb: &str) -> String {
    format!(
        r#"Give the complete conjugation of the Italian verb "{verb}" in EVERY mood and tense.

Reply ONLY with valid JSON, no text before or after, in exactly this shape:
{{
  "verb": "{verb}",
  "translation": "French translation",
  "icon_suggestion": "name of a fitting lucide icon",
  "conjugations": [
    {{
      "mood": "Indicativo",
      "tenses": [
        {{
          "tense": "Presente",
          "conjugations": [
            {{"person": "io", "verb": "conjugated form"}},
            {{"person": "tu", "verb": "conjugated form"}},
            {{"person": "lui/lei", "verb": "conjugated form"}},
            {{"person": "noi", "verb": "conjugated form"}},
            {{"person": "voi", "verb": "conjugated form"}},
            {{"person": "loro", "verb": "conjugated form"}}
          ]
        }}
      ]
    }}
  ]
}}

Include ALL moods: Indicativo, Congiuntivo, Condizionale, Imperativo, Infinito, Participio, Gerundio.
For Imperativo use: tu, lui/lei, noi, voi, loro.
For Infinito, Participio and Gerundio, adapt the persons to the forms that exist."#
    )
}

pub(crate) fn question_prompt(verb: &str, mood: Option<&str>, tense: Option<&str>) -> String {
    let mood_instruction = match mood {
        Some(mood) => format!("The mood MUST be: {mood}."),
        None => format!("Choose a random mood among: {}.", QUIZ_MOODS.join(", ")),
    };
    let tense_instruction = match tense {
        Some(tense) => format!("The tense MUST be: {tense}."),
        None => "Choose a random tense that fits this mood.".to_string(),
    };

    format!(
        r#"Generate a quiz question for the Italian verb "{verb}".
{mood_instruction}
{tense_instruction}

Reply ONLY with valid JSON, no text before or after, in exactly this shape:
{{
  "verb": "{verb}",
  "translation": "French translation",
  "mood": "mood name",
  "tense": "tense name",
  "icon_suggestion": "name of a fitting lucide icon",
  "conjugations": [
    {{"person": "io", "verb": "conjugated form"}},
    {{"person": "tu", "verb": "conjugated form"}},
    {{"person": "lui/lei", "verb": "conjugated form"}},
    {{"person": "noi", "verb": "conjugated form"}},
    {{"person": "voi", "verb": "conjugated form"}},
    {{"person": "loro", "verb": "conjugated form"}}
  ]
}}

For Imperativo, adapt the persons (tu, lui/lei, noi, voi, loro)."#
    )
}

struct GeminiClientInner {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    retry: RetryPolicy,
}

/// [`ConjugationService`] backed by the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

impl GeminiClient {
    pub fn new(api_url: &str, api_key: Option<String>) -> Self {
        Self::with_retry(api_url, api_key, RetryPolicy::default())
    }

    pub fn with_retry(api_url: &str, api_key: Option<String>, retry: RetryPolicy) -> Self {
        Self {
            inner: Arc::new(GeminiClientInner {
                client: Client::new(),
                api_url: api_url.to_string(),
                api_key,
                retry,
            }),
        }
    }

    /// Send `prompt` and return the model's reply text.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let key = self
            .inner
            .api_key
            .as_deref()
            .ok_or(ClientError::MissingApiKey)?;

        self.inner
            .retry
            .run("gemini.generate", || self.generate_once(key, prompt))
            .await
    }

    async fn generate_once(&self, key: &str, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig::default(),
        };

        let resp = self
            .inner
            .client
            .post(&self.inner.api_url)
            .query(&[("key", key)])
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Backend {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown error").to_string(),
            });
        }

        let body: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        body.into_text()
            .ok_or_else(|| ClientError::InvalidResponse("model reply has no text".to_string()))
    }
}

#[async_trait]
impl ConjugationService for GeminiClient {
    async fn generate_conjugation(&self, verb: &str) -> Result<VerbData> {
        info!(verb, "requesting conjugation table");
        let reply = self.generate(&conjugation_prompt(verb)).await?;
        let data: VerbData = parse_reply(&reply)?;
        if data.conjugations.is_empty() {
            return Err(ClientError::InvalidResponse(format!(
                "no conjugations returned for {verb}"
            )));
        }
        Ok(data)
    }

    async fn generate_quiz_question(&self, filters: &QuizFilters) -> Result<QuizQuestion> {
        let verb = pick_verb(filters, &mut rand::rng());
        info!(%verb, mood = ?filters.mood(), tense = ?filters.tense(), "requesting quiz question");

        let prompt = question_prompt(&verb, filters.mood(), filters.tense());
        let reply = self.generate(&prompt).await?;
        let question: QuizQuestion = parse_reply(&reply)?;
        if question.conjugations.is_empty() {
            return Err(ClientError::InvalidResponse(format!(
                "no conjugations returned for {verb}"
            )));
        }
        debug!(mood = %question.mood, tense = %question.tense, "quiz question ready");
        Ok(question)
    }
}
