//! Command-line arguments.

use clap::{Parser, Subcommand};
use linguacard_core::{DeckId, QuizMode};

use crate::verbs::QuizFilters;

#[derive(Parser, Debug)]
#[command(name = "linguacard")]
#[command(author, version, about = "Language flashcard quizzes in the terminal", long_about = None)]
pub struct Cli {
    /// Flashcards API base URL (overrides FLASHCARDS_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List decks
    Decks {
        /// Only decks whose name matches
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Quiz yourself on the cards of a deck
    Quiz {
        #[arg(short, long)]
        deck: DeckId,

        /// typing, matching, multiple-choice or until-perfect
        #[arg(short, long, default_value = "typing")]
        mode: QuizMode,

        /// Only cards matching this search term
        #[arg(long, default_value = "")]
        search: String,
    },

    /// Drill the conjugation of a generated verb question
    Verbs {
        /// Verb to drill; picked at random when omitted
        #[arg(long)]
        verb: Option<String>,

        /// Verb category to pick from, e.g. "Irréguliers"
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        mood: Option<String>,

        #[arg(long)]
        tense: Option<String>,

        #[arg(short, long, default_value = "typing")]
        mode: QuizMode,
    },

    /// Print the full conjugation table of a verb
    Conjugate { verb: String },
}

impl Command {
    /// Question filters for the `verbs` command.
    pub fn quiz_filters(&self) -> Option<QuizFilters> {
        match self {
            Command::Verbs {
                verb,
                category,
                mood,
                tense,
                ..
            } => Some(QuizFilters {
                verb_category: category.clone(),
                mood: mood.clone(),
                tense: tense.clone(),
                verb: verb.clone(),
                exclude: Vec::new(),
            }),
            _ => None,
        }
    }
}
