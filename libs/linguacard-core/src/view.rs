//! Serializable snapshot of a quiz session for rendering.

use rand::Rng;
use serde::Serialize;

use crate::engine::QuizEngine;
use crate::types::{ItemStyle, MatchItem, QuizMode, Score};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuizView {
    Idle,
    Prompt(PromptView),
    Matching(MatchingView),
    Complete(CompletionView),
}

/// One card being asked in typing, multiple-choice or until-perfect mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptView {
    pub mode: QuizMode,
    /// 1-based position in the current queue.
    pub position: usize,
    pub of: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass: Option<u32>,
    pub front: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub input: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    pub can_check: bool,
    pub score: Score,
}

/// Verdict shown while the answer is revealed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    pub correct: bool,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchingView {
    pub fronts: Vec<MatchItemView>,
    pub backs: Vec<MatchItemView>,
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchItemView {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub style: ItemStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionView {
    pub mode: QuizMode,
    pub score: Score,
    pub percent: u32,
    pub passes_exhausted: bool,
}

impl<R: Rng> QuizEngine<R> {
    /// Snapshot everything a front end needs to draw the session.
    pub fn view(&self) -> QuizView {
        let Some(mode) = self.mode() else {
            return QuizView::Idle;
        };
        let score = self.score();

        if self.is_complete() {
            return QuizView::Complete(CompletionView {
                mode,
                score,
                percent: score.percent(),
                passes_exhausted: self.passes_exhausted(),
            });
        }

        if mode == QuizMode::Matching {
            let item = |item: &&MatchItem| MatchItemView {
                id: item.id.clone(),
                text: item.text.clone(),
                image: item.image.clone(),
                style: self.match_item_style(&item.id).unwrap_or(ItemStyle::Default),
            };
            return QuizView::Matching(MatchingView {
                fronts: self.front_items().iter().map(item).collect(),
                backs: self.back_items().iter().map(item).collect(),
                score,
            });
        }

        let (Some(card), Some((cursor, len))) = (self.current_card(), self.position()) else {
            return QuizView::Idle;
        };
        let feedback = self.verdict().map(|correct| Feedback {
            correct,
            answer: card.back.clone(),
        });

        QuizView::Prompt(PromptView {
            mode,
            position: cursor + 1,
            of: len,
            pass: self.pass(),
            front: card.front.clone(),
            pronunciation: card.pronunciation.clone(),
            image: card.image.clone(),
            input: self.input().to_string(),
            options: self.options().to_vec(),
            hint: self.hint().map(<[String]>::to_vec),
            can_check: feedback.is_none() && !self.input().trim().is_empty(),
            feedback,
            score,
        })
    }
}
