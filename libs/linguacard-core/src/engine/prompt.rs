//! Prompt/reveal cycle shared by the typed and multiple-choice modes.

use rand::seq::SliceRandom;
use rand::Rng;

use super::choices::build_options;
use crate::error::{QuizError, Result};
use crate::normalize::{answers_match, shuffled_words};
use crate::types::{Card, QuizSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Prompting,
    Revealed { correct: bool },
}

/// What an advance did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Advance {
    NextCard,
    NextPass,
    Finished,
}

/// Input and feedback for the card on screen.
#[derive(Debug, Clone)]
pub(crate) struct Prompt {
    pub(crate) input: String,
    pub(crate) phase: Phase,
    pub(crate) hint: Option<Vec<String>>,
    pub(crate) options: Vec<String>,
}

impl Prompt {
    fn blank() -> Self {
        Self {
            input: String::new(),
            phase: Phase::Prompting,
            hint: None,
            options: Vec::new(),
        }
    }

    /// Reset for `card`, building options from `pool` when `with_options`.
    fn present<R: Rng + ?Sized>(
        &mut self,
        card: &Card,
        pool: &[Card],
        with_options: bool,
        settings: &QuizSettings,
        rng: &mut R,
    ) {
        self.input.clear();
        self.phase = Phase::Prompting;
        self.hint = shuffled_words(&card.back, rng);
        self.options = if with_options {
            build_options(card, pool, settings.distractor_count, rng)
        } else {
            Vec::new()
        };
    }

    pub(crate) fn is_revealed(&self) -> bool {
        matches!(self.phase, Phase::Revealed { .. })
    }

    pub(crate) fn verdict(&self) -> Option<bool> {
        match self.phase {
            Phase::Revealed { correct } => Some(correct),
            Phase::Prompting => None,
        }
    }

    fn ensure_prompting(&self) -> Result<()> {
        if self.is_revealed() {
            return Err(QuizError::AnswerRevealed);
        }
        Ok(())
    }

    fn type_answer(&mut self, text: &str) -> Result<()> {
        self.ensure_prompting()?;
        self.input = text.to_string();
        Ok(())
    }

    fn choose(&mut self, option: &str) -> Result<()> {
        self.ensure_prompting()?;
        if !self.options.iter().any(|o| o == option) {
            return Err(QuizError::UnknownOption(option.to_string()));
        }
        self.input = option.to_string();
        Ok(())
    }

    /// Judge the input against `card` and freeze it.
    fn reveal(&mut self, card: &Card, blank: QuizError) -> Result<bool> {
        self.ensure_prompting()?;
        if self.input.trim().is_empty() {
            return Err(blank);
        }
        let correct = answers_match(&self.input, &card.back);
        self.phase = Phase::Revealed { correct };
        Ok(correct)
    }
}

/// Typing and multiple-choice: one pass over a shuffled deck.
#[derive(Debug, Clone)]
pub(crate) struct SequentialState {
    pub(crate) cards: Vec<Card>,
    pub(crate) cursor: usize,
    pub(crate) prompt: Prompt,
    multiple_choice: bool,
}

impl SequentialState {
    pub(crate) fn new<R: Rng + ?Sized>(
        cards: Vec<Card>,
        multiple_choice: bool,
        settings: &QuizSettings,
        rng: &mut R,
    ) -> Self {
        let mut state = Self {
            cards,
            cursor: 0,
            prompt: Prompt::blank(),
            multiple_choice,
        };
        state.present(settings, rng);
        state
    }

    pub(crate) fn current(&self) -> Option<&Card> {
        self.cards.get(self.cursor)
    }

    pub(crate) fn type_answer(&mut self, text: &str) -> Result<()> {
        self.prompt.type_answer(text)
    }

    pub(crate) fn choose(&mut self, option: &str) -> Result<()> {
        self.prompt.choose(option)
    }

    pub(crate) fn check(&mut self) -> Result<bool> {
        let blank = if self.multiple_choice {
            QuizError::NoOptionSelected
        } else {
            QuizError::EmptyAnswer
        };
        let card = self.cards.get(self.cursor).ok_or(QuizError::SessionComplete)?;
        self.prompt.reveal(card, blank)
    }

    /// Move past a revealed card. `None` when nothing is revealed.
    pub(crate) fn advance<R: Rng + ?Sized>(
        &mut self,
        settings: &QuizSettings,
        rng: &mut R,
    ) -> Option<Advance> {
        if !self.prompt.is_revealed() {
            return None;
        }
        if self.cursor + 1 < self.cards.len() {
            self.cursor += 1;
            self.present(settings, rng);
            Some(Advance::NextCard)
        } else {
            Some(Advance::Finished)
        }
    }

    fn present<R: Rng + ?Sized>(&mut self, settings: &QuizSettings, rng: &mut R) {
        if let Some(card) = self.cards.get(self.cursor) {
            self.prompt
                .present(card, &self.cards, self.multiple_choice, settings, rng);
        }
    }
}

/// Until-perfect: repeat the cards answered wrong until a clean pass.
#[derive(Debug, Clone)]
pub(crate) struct UntilPerfectState {
    pub(crate) pending: Vec<Card>,
    pub(crate) errors: Vec<Card>,
    pub(crate) cursor: usize,
    pub(crate) pass: u32,
    pub(crate) exhausted: bool,
    pub(crate) prompt: Prompt,
}

impl UntilPerfectState {
    pub(crate) fn new<R: Rng + ?Sized>(
        pending: Vec<Card>,
        settings: &QuizSettings,
        rng: &mut R,
    ) -> Self {
        let mut state = Self {
            pending,
            errors: Vec::new(),
            cursor: 0,
            pass: 1,
            exhausted: false,
            prompt: Prompt::blank(),
        };
        state.present(settings, rng);
        state
    }

    pub(crate) fn current(&self) -> Option<&Card> {
        self.pending.get(self.cursor)
    }

    pub(crate) fn type_answer(&mut self, text: &str) -> Result<()> {
        self.prompt.type_answer(text)
    }

    /// Judge the current card; a miss is queued for the next pass.
    pub(crate) fn check(&mut self) -> Result<bool> {
        let card = self
            .pending
            .get(self.cursor)
            .ok_or(QuizError::SessionComplete)?;
        let correct = self.prompt.reveal(card, QuizError::EmptyAnswer)?;
        if !correct {
            self.errors.push(card.clone());
        }
        Ok(correct)
    }

    pub(crate) fn advance<R: Rng + ?Sized>(
        &mut self,
        settings: &QuizSettings,
        rng: &mut R,
    ) -> Option<Advance> {
        if !self.prompt.is_revealed() {
            return None;
        }
        if self.cursor + 1 < self.pending.len() {
            self.cursor += 1;
            self.present(settings, rng);
            return Some(Advance::NextCard);
        }
        if self.errors.is_empty() {
            return Some(Advance::Finished);
        }
        if settings.max_passes.is_some_and(|max| self.pass >= max) {
            self.exhausted = true;
            return Some(Advance::Finished);
        }

        self.pending = std::mem::take(&mut self.errors);
        self.pending.shuffle(rng);
        self.cursor = 0;
        self.pass += 1;
        self.present(settings, rng);
        Some(Advance::NextPass)
    }

    fn present<R: Rng + ?Sized>(&mut self, settings: &QuizSettings, rng: &mut R) {
        if let Some(card) = self.pending.get(self.cursor) {
            self.prompt.present(card, &self.pending, false, settings, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cards() -> Vec<Card> {
        vec![
            Card::new(1, "uno", "one"),
            Card::new(2, "due", "two"),
            Card::new(3, "tre", "three"),
        ]
    }

    #[test]
    fn blank_typed_answer_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = SequentialState::new(cards(), false, &QuizSettings::default(), &mut rng);
        state.type_answer("   ").unwrap();
        assert_eq!(state.check(), Err(QuizError::EmptyAnswer));
        assert!(!state.prompt.is_revealed());
    }

    #[test]
    fn revealed_prompt_freezes_input() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = SequentialState::new(cards(), false, &QuizSettings::default(), &mut rng);
        state.type_answer("nope").unwrap();
        assert_eq!(state.check(), Ok(false));
        assert_eq!(state.type_answer("one"), Err(QuizError::AnswerRevealed));
        assert_eq!(state.check(), Err(QuizError::AnswerRevealed));
        assert_eq!(state.prompt.input, "nope");
    }

    #[test]
    fn advance_requires_reveal() {
        let settings = QuizSettings::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = SequentialState::new(cards(), false, &settings, &mut rng);
        assert_eq!(state.advance(&settings, &mut rng), None);
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn choosing_unknown_option_fails() {
        let settings = QuizSettings::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = SequentialState::new(cards(), true, &settings, &mut rng);
        assert_eq!(
            state.choose("quattro"),
            Err(QuizError::UnknownOption("quattro".to_string()))
        );
        assert_eq!(state.check(), Err(QuizError::NoOptionSelected));
    }

    #[test]
    fn pass_cap_stops_retrying() {
        let settings = QuizSettings {
            max_passes: Some(2),
            ..QuizSettings::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = UntilPerfectState::new(vec![Card::new(1, "uno", "one")], &settings, &mut rng);

        state.type_answer("wrong").unwrap();
        state.check().unwrap();
        assert_eq!(state.advance(&settings, &mut rng), Some(Advance::NextPass));
        assert_eq!(state.pass, 2);

        state.type_answer("wrong again").unwrap();
        state.check().unwrap();
        assert_eq!(state.advance(&settings, &mut rng), Some(Advance::Finished));
        assert!(state.exhausted);
    }
}
