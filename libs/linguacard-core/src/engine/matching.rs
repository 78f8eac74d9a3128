//! Pairwise matching board.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{QuizError, Result};
use crate::types::{Card, CardId, ItemStyle, MatchItem};

/// Outcome of selecting an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Selection {
    /// Selection rules made the click a no-op.
    Ignored,
    /// First item of a pair held.
    Held,
    Matched(CardId),
    Mismatched,
}

#[derive(Debug, Clone)]
pub(crate) struct MatchingState {
    pub(crate) fronts: Vec<MatchItem>,
    pub(crate) backs: Vec<MatchItem>,
    pub(crate) selection: Vec<MatchItem>,
    pub(crate) matched: HashSet<CardId>,
    wrong: Option<(String, String)>,
    /// Matched pairs still highlighted, waiting for their settle.
    just_matched: HashSet<CardId>,
}

impl MatchingState {
    /// Lay out both columns, each in its own random order.
    pub(crate) fn new<R: Rng + ?Sized>(cards: &[Card], rng: &mut R) -> Self {
        let mut fronts: Vec<MatchItem> = cards.iter().map(MatchItem::front).collect();
        let mut backs: Vec<MatchItem> = cards.iter().map(MatchItem::back).collect();
        fronts.shuffle(rng);
        backs.shuffle(rng);

        Self {
            fronts,
            backs,
            selection: Vec::with_capacity(2),
            matched: HashSet::new(),
            wrong: None,
            just_matched: HashSet::new(),
        }
    }

    pub(crate) fn find(&self, item_id: &str) -> Option<&MatchItem> {
        self.fronts
            .iter()
            .chain(self.backs.iter())
            .find(|item| item.id == item_id)
    }

    pub(crate) fn select(&mut self, item_id: &str) -> Result<Selection> {
        let item = self
            .find(item_id)
            .cloned()
            .ok_or_else(|| QuizError::UnknownItem(item_id.to_string()))?;

        // A wrong pair stays on screen until its highlight clears.
        if self.wrong.is_some() {
            return Ok(Selection::Ignored);
        }
        if self.selection.iter().any(|s| s.id == item.id)
            || self.matched.contains(&item.card_id)
            || self.just_matched.contains(&item.card_id)
        {
            return Ok(Selection::Ignored);
        }
        if let [held] = self.selection.as_slice() {
            if held.side == item.side {
                return Ok(Selection::Ignored);
            }
        }

        self.selection.push(item);
        let [first, second] = self.selection.as_slice() else {
            return Ok(Selection::Held);
        };

        if first.card_id == second.card_id {
            let card_id = first.card_id;
            self.just_matched.insert(card_id);
            self.selection.clear();
            Ok(Selection::Matched(card_id))
        } else {
            self.wrong = Some((first.id.clone(), second.id.clone()));
            Ok(Selection::Mismatched)
        }
    }

    /// Retire a matched pair. Returns whether the board is now empty, or
    /// `None` if `card_id` has no pair waiting to settle.
    pub(crate) fn settle(&mut self, card_id: CardId) -> Option<bool> {
        if !self.just_matched.remove(&card_id) {
            return None;
        }
        self.matched.insert(card_id);
        Some(self.matched.len() == self.fronts.len())
    }

    pub(crate) fn clear_mismatch(&mut self) -> bool {
        if self.wrong.take().is_none() {
            return false;
        }
        self.selection.clear();
        true
    }

    pub(crate) fn style(&self, item_id: &str) -> Option<ItemStyle> {
        let item = self.find(item_id)?;
        let style = if self.just_matched.contains(&item.card_id) {
            ItemStyle::Matched
        } else if self
            .wrong
            .as_ref()
            .is_some_and(|(first, second)| *first == item.id || *second == item.id)
        {
            ItemStyle::Wrong
        } else if self.selection.iter().any(|s| s.id == item.id) {
            ItemStyle::Selected
        } else {
            ItemStyle::Default
        };
        Some(style)
    }

    pub(crate) fn visible_fronts(&self) -> impl Iterator<Item = &MatchItem> {
        self.fronts
            .iter()
            .filter(|item| !self.matched.contains(&item.card_id))
    }

    pub(crate) fn visible_backs(&self) -> impl Iterator<Item = &MatchItem> {
        self.backs
            .iter()
            .filter(|item| !self.matched.contains(&item.card_id))
    }
}
