//! Quiz engine: turns a card snapshot into a stateful trial sequence.
//!
//! All transitions are synchronous. Operations that need a timed follow-up
//! (reveal then advance, match then retire, mismatch then release) return a
//! [`Scheduled`] value; the caller waits `delay` and hands the event back to
//! [`QuizEngine::apply`]. Each event carries the [`SessionToken`] of the
//! session that produced it, so re-initializing turns every in-flight event
//! into a no-op.

mod choices;
mod matching;
mod prompt;

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

pub use choices::build_options;

use crate::error::{QuizError, Result};
use crate::types::{Card, CardId, ItemStyle, MatchItem, QuizMode, QuizSettings, Score};
use matching::{MatchingState, Selection};
use prompt::{Advance, Prompt, SequentialState, UntilPerfectState};

/// Identity of one quiz session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SessionToken(u64);

/// Timed transition kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Leave the revealed answer for the next card.
    Advance,
    /// Remove a matched pair from the board.
    SettleMatch { card_id: CardId },
    /// Release a wrong pair.
    ClearMismatch,
}

/// A transition bound to the session that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredEvent {
    pub token: SessionToken,
    pub kind: Deferred,
}

/// Request to deliver `event` back to the engine after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub delay: Duration,
    pub event: DeferredEvent,
}

#[derive(Debug, Clone)]
struct Session {
    mode: QuizMode,
    score: Score,
    complete: bool,
    state: ModeState,
}

#[derive(Debug, Clone)]
enum ModeState {
    Sequential(SequentialState),
    UntilPerfect(UntilPerfectState),
    Matching(MatchingState),
}

impl Session {
    fn prompt(&self) -> Option<&Prompt> {
        match &self.state {
            ModeState::Sequential(state) => Some(&state.prompt),
            ModeState::UntilPerfect(state) => Some(&state.prompt),
            ModeState::Matching(_) => None,
        }
    }

    fn matching(&self) -> Option<&MatchingState> {
        match &self.state {
            ModeState::Matching(state) => Some(state),
            _ => None,
        }
    }
}

/// Session state for the four quiz modes.
pub struct QuizEngine<R = StdRng> {
    settings: QuizSettings,
    rng: R,
    token: SessionToken,
    session: Option<Session>,
}

impl QuizEngine<StdRng> {
    /// Engine with an OS-seeded random source.
    pub fn new(settings: QuizSettings) -> Self {
        Self::with_rng(settings, StdRng::from_os_rng())
    }
}

impl Default for QuizEngine<StdRng> {
    fn default() -> Self {
        Self::new(QuizSettings::default())
    }
}

impl<R: Rng> QuizEngine<R> {
    pub fn with_rng(settings: QuizSettings, rng: R) -> Self {
        Self {
            settings,
            rng,
            token: SessionToken::default(),
            session: None,
        }
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Token of the current session.
    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// Start a new session over `cards`.
    ///
    /// An empty card set leaves the engine untouched, including any previous
    /// session.
    pub fn initialize(&mut self, cards: &[Card], mode: QuizMode) {
        if cards.is_empty() {
            debug!(%mode, "no cards, quiz left idle");
            return;
        }

        self.token = SessionToken(self.token.0 + 1);

        let mut shuffled = cards.to_vec();
        shuffled.shuffle(&mut self.rng);

        let state = match mode {
            QuizMode::Typing | QuizMode::MultipleChoice => ModeState::Sequential(
                SequentialState::new(
                    shuffled,
                    mode == QuizMode::MultipleChoice,
                    &self.settings,
                    &mut self.rng,
                ),
            ),
            QuizMode::UntilPerfect => ModeState::UntilPerfect(UntilPerfectState::new(
                shuffled,
                &self.settings,
                &mut self.rng,
            )),
            QuizMode::Matching => {
                ModeState::Matching(MatchingState::new(&shuffled, &mut self.rng))
            }
        };

        let total = if mode.counts_mastery() {
            u32::try_from(cards.len()).unwrap_or(u32::MAX)
        } else {
            0
        };

        self.session = Some(Session {
            mode,
            score: Score::new(0, total),
            complete: false,
            state,
        });

        info!(%mode, cards = cards.len(), token = self.token.0, "quiz session started");
    }

    pub fn mode(&self) -> Option<QuizMode> {
        self.session.as_ref().map(|s| s.mode)
    }

    pub fn is_started(&self) -> bool {
        self.session.is_some()
    }

    /// Card being asked, for the prompt-based modes.
    pub fn current_card(&self) -> Option<&Card> {
        match &self.session.as_ref()?.state {
            ModeState::Sequential(state) => state.current(),
            ModeState::UntilPerfect(state) => state.current(),
            ModeState::Matching(_) => None,
        }
    }

    /// Replace the typed answer (typing and until-perfect).
    pub fn submit_typed_answer(&mut self, text: &str) -> Result<()> {
        let session = active(&mut self.session)?;
        match &mut session.state {
            ModeState::Sequential(state) if session.mode == QuizMode::Typing => {
                state.type_answer(text)
            }
            ModeState::UntilPerfect(state) => state.type_answer(text),
            _ => Err(QuizError::WrongMode {
                operation: "submit_typed_answer",
                mode: session.mode,
            }),
        }
    }

    /// Pick one of the current [`options`](Self::options).
    pub fn select_option(&mut self, option: &str) -> Result<()> {
        let session = active(&mut self.session)?;
        match &mut session.state {
            ModeState::Sequential(state) if session.mode == QuizMode::MultipleChoice => {
                state.choose(option)
            }
            _ => Err(QuizError::WrongMode {
                operation: "select_option",
                mode: session.mode,
            }),
        }
    }

    /// Judge the current input and reveal the answer.
    pub fn check_answer(&mut self) -> Result<Scheduled> {
        let delay = self.settings.reveal_delay();
        let session = active(&mut self.session)?;
        let mode = session.mode;

        let correct = match &mut session.state {
            ModeState::Sequential(state) => state.check()?,
            ModeState::UntilPerfect(state) => state.check()?,
            ModeState::Matching(_) => {
                return Err(QuizError::WrongMode {
                    operation: "check_answer",
                    mode,
                })
            }
        };

        if !mode.counts_mastery() {
            session.score.total += 1;
        }
        if correct {
            session.score.correct += 1;
        }
        debug!(%mode, correct, score = ?session.score, "answer checked");

        Ok(self.schedule(delay, Deferred::Advance))
    }

    /// Click a matching item.
    ///
    /// Returns the follow-up to schedule when the click completed a pair,
    /// `None` when it only held an item or was ignored.
    pub fn select_match_item(&mut self, item_id: &str) -> Result<Option<Scheduled>> {
        let match_delay = self.settings.match_delay();
        let mismatch_delay = self.settings.mismatch_delay();
        let session = active(&mut self.session)?;

        let ModeState::Matching(board) = &mut session.state else {
            return Err(QuizError::WrongMode {
                operation: "select_match_item",
                mode: session.mode,
            });
        };

        match board.select(item_id)? {
            Selection::Ignored | Selection::Held => Ok(None),
            Selection::Matched(card_id) => {
                session.score.correct += 1;
                debug!(card_id, "pair matched");
                Ok(Some(
                    self.schedule(match_delay, Deferred::SettleMatch { card_id }),
                ))
            }
            Selection::Mismatched => {
                debug!(item_id, "pair mismatched");
                Ok(Some(self.schedule(mismatch_delay, Deferred::ClearMismatch)))
            }
        }
    }

    /// Run a timed transition. Returns `false` if the event was stale.
    pub fn apply(&mut self, event: DeferredEvent) -> bool {
        if event.token != self.token {
            debug!(?event, current = ?self.token, "dropping event from an earlier session");
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.complete {
            return false;
        }

        let (applied, finished) = match (&mut session.state, event.kind) {
            (ModeState::Sequential(state), Deferred::Advance) => {
                match state.advance(&self.settings, &mut self.rng) {
                    Some(step) => (true, step == Advance::Finished),
                    None => (false, false),
                }
            }
            (ModeState::UntilPerfect(state), Deferred::Advance) => {
                match state.advance(&self.settings, &mut self.rng) {
                    Some(Advance::NextPass) => {
                        debug!(pass = state.pass, retries = state.pending.len(), "new pass");
                        (true, false)
                    }
                    Some(step) => (true, step == Advance::Finished),
                    None => (false, false),
                }
            }
            (ModeState::Matching(board), Deferred::SettleMatch { card_id }) => {
                match board.settle(card_id) {
                    Some(cleared) => (true, cleared),
                    None => (false, false),
                }
            }
            (ModeState::Matching(board), Deferred::ClearMismatch) => {
                (board.clear_mismatch(), false)
            }
            _ => (false, false),
        };

        if finished {
            session.complete = true;
            info!(mode = %session.mode, score = ?session.score, "quiz session complete");
        }
        applied
    }

    pub fn score(&self) -> Score {
        self.session
            .as_ref()
            .map(|s| s.score)
            .unwrap_or_default()
    }

    pub fn is_complete(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.complete)
    }

    /// Multiple-choice options for the current card, empty in other modes.
    pub fn options(&self) -> &[String] {
        self.session
            .as_ref()
            .and_then(Session::prompt)
            .map(|p| p.options.as_slice())
            .unwrap_or(&[])
    }

    /// Typed or selected answer for the current card.
    pub fn input(&self) -> &str {
        self.session
            .as_ref()
            .and_then(Session::prompt)
            .map(|p| p.input.as_str())
            .unwrap_or("")
    }

    pub fn is_revealed(&self) -> bool {
        self.verdict().is_some()
    }

    /// Whether the revealed answer was right; `None` while prompting.
    pub fn verdict(&self) -> Option<bool> {
        self.session.as_ref()?.prompt()?.verdict()
    }

    /// Shuffled answer words for long answers.
    pub fn hint(&self) -> Option<&[String]> {
        self.session.as_ref()?.prompt()?.hint.as_deref()
    }

    /// Zero-based cursor and length of the current queue.
    pub fn position(&self) -> Option<(usize, usize)> {
        match &self.session.as_ref()?.state {
            ModeState::Sequential(state) => Some((state.cursor, state.cards.len())),
            ModeState::UntilPerfect(state) => Some((state.cursor, state.pending.len())),
            ModeState::Matching(_) => None,
        }
    }

    /// Current until-perfect pass, starting at 1.
    pub fn pass(&self) -> Option<u32> {
        match &self.session.as_ref()?.state {
            ModeState::UntilPerfect(state) => Some(state.pass),
            _ => None,
        }
    }

    /// Cards answered wrong so far in the current until-perfect pass.
    pub fn pass_errors(&self) -> &[Card] {
        match self.session.as_ref().map(|s| &s.state) {
            Some(ModeState::UntilPerfect(state)) => state.errors.as_slice(),
            _ => &[],
        }
    }

    /// Whether until-perfect stopped at the pass cap rather than a clean pass.
    pub fn passes_exhausted(&self) -> bool {
        matches!(
            self.session.as_ref().map(|s| &s.state),
            Some(ModeState::UntilPerfect(state)) if state.exhausted
        )
    }

    pub fn match_item_style(&self, item_id: &str) -> Option<ItemStyle> {
        self.session.as_ref()?.matching()?.style(item_id)
    }

    /// Front items still on the board.
    pub fn front_items(&self) -> Vec<&MatchItem> {
        self.session
            .as_ref()
            .and_then(Session::matching)
            .map(|board| board.visible_fronts().collect())
            .unwrap_or_default()
    }

    /// Back items still on the board.
    pub fn back_items(&self) -> Vec<&MatchItem> {
        self.session
            .as_ref()
            .and_then(Session::matching)
            .map(|board| board.visible_backs().collect())
            .unwrap_or_default()
    }

    pub fn selection(&self) -> &[MatchItem] {
        self.session
            .as_ref()
            .and_then(Session::matching)
            .map(|board| board.selection.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_matched(&self, card_id: CardId) -> bool {
        self.session
            .as_ref()
            .and_then(Session::matching)
            .is_some_and(|board| board.matched.contains(&card_id))
    }

    fn schedule(&self, delay: Duration, kind: Deferred) -> Scheduled {
        Scheduled {
            delay,
            event: DeferredEvent {
                token: self.token,
                kind,
            },
        }
    }
}

/// The running session, if it still accepts input.
fn active(session: &mut Option<Session>) -> Result<&mut Session> {
    let session = session.as_mut().ok_or(QuizError::NotStarted)?;
    if session.complete {
        return Err(QuizError::SessionComplete);
    }
    Ok(session)
}
