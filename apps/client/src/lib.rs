//! Terminal client for linguacard quizzes.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod session;
pub mod terminal;
pub mod verbs;

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{ConjugationService, FlashcardsClient, GeminiClient};
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::session::QuizSession;

pub use error::{ClientError, Result};

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env()?;
    if let Some(base) = &cli.api_base {
        config.api_base = base.trim_end_matches('/').to_string();
    }
    tracing::debug!(api_base = %config.api_base, "configuration loaded");

    let mut stdout = std::io::stdout();
    let filters = cli.command.quiz_filters();

    match cli.command {
        Command::Decks { search } => {
            let client = FlashcardsClient::new(&config.api_base);
            let decks = client.list_decks(&search).await?;
            write!(stdout, "{}", terminal::render_decks(&decks))?;
        }
        Command::Quiz { deck, mode, search } => {
            let client = FlashcardsClient::new(&config.api_base);
            let cards = client.list_cards(deck, &search).await?;
            if cards.is_empty() {
                writeln!(stdout, "Deck {deck} has no cards.")?;
                return Ok(());
            }

            let session = QuizSession::new(config.quiz.clone());
            session.start(&cards, mode);
            let mut input = BufReader::new(tokio::io::stdin()).lines();
            terminal::run_quiz(&session, &mut input, &mut stdout).await?;
        }
        Command::Verbs { mode, .. } => {
            let gemini = GeminiClient::new(&config.gemini_api_url, config.gemini_api_key.clone());
            let filters = filters.unwrap_or_default();
            let question = gemini.generate_quiz_question(&filters).await?;
            write!(stdout, "{}", terminal::render_question(&question))?;

            let session = QuizSession::new(config.quiz.clone());
            session.start(&question.to_cards(), mode);
            let mut input = BufReader::new(tokio::io::stdin()).lines();
            terminal::run_quiz(&session, &mut input, &mut stdout).await?;
        }
        Command::Conjugate { verb } => {
            let gemini = GeminiClient::new(&config.gemini_api_url, config.gemini_api_key.clone());
            let table = gemini.generate_conjugation(&verb).await?;
            write!(stdout, "{}", terminal::render_table(&table))?;
        }
    }

    Ok(())
}
