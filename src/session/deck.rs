// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use rand::Rng;

use crate::error::Fallible;
use crate::error::fail;
use crate::queue::RoundQueue;
use crate::scheduler::apply_spaced_outcome;
use crate::scheduler::select_focused;
use crate::scheduler::select_random;
use crate::scheduler::select_stored;
use crate::session::SessionState;
use crate::session::Step;
use crate::session::StudyMode;
use crate::store::CardStore;
use crate::types::card::Card;
use crate::types::outcome::Outcome;
use crate::types::timestamp::Timestamp;

/// A single pass over a selection of cards, one swipe per card.
pub struct DeckSession {
    mode: StudyMode,
    queue: RoundQueue<Card>,
    total: usize,
    /// Cards already swiped, in their updated state.
    touched: Vec<Card>,
    state: SessionState,
}

impl DeckSession {
    pub fn new<R: Rng + ?Sized>(
        cards: &[Card],
        mode: StudyMode,
        now: Timestamp,
        rng: &mut R,
    ) -> Self {
        let selected = match mode {
            StudyMode::Focused => select_focused(cards, now),
            StudyMode::Random => select_random(cards, rng),
            StudyMode::Scheduled => select_stored(cards),
        };
        let total = selected.len();
        log::debug!("Starting {mode} session with {total} of {} cards", cards.len());
        let state = if selected.is_empty() {
            SessionState::Finished
        } else {
            SessionState::InRound
        };
        Self {
            mode,
            queue: RoundQueue::new(selected),
            total,
            touched: Vec::new(),
            state,
        }
    }

    pub fn mode(&self) -> StudyMode {
        self.mode
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current(&self) -> Option<&Card> {
        self.queue.current()
    }

    /// The 1-based position of the current card, and the number of cards.
    pub fn position(&self) -> (usize, usize) {
        (self.touched.len() + 1, self.total)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Apply a swipe to the current card and move to the next one. Every card
    /// is answered exactly once, whatever the outcome.
    pub fn swipe(&mut self, outcome: Outcome, now: Timestamp) -> Fallible<Step> {
        if self.state != SessionState::InRound {
            return fail("session is finished.");
        }
        let card = match self.queue.resolve(false) {
            Some(card) => card,
            None => return fail("no card to swipe."),
        };
        let updated = apply_spaced_outcome(&card, outcome, now);
        log::debug!(
            "{} {} interval={}d next={}",
            updated.id(),
            outcome.as_str(),
            updated.interval(),
            updated.next_review()
        );
        self.touched.push(updated);
        if self.queue.is_drained() {
            self.state = SessionState::Finished;
            Ok(Step::Finished)
        } else {
            Ok(Step::Next)
        }
    }

    /// Write every swiped card back to the store. Only a finished session can
    /// be committed. Returns the number of cards written.
    pub fn commit(self, store: &mut CardStore) -> Fallible<usize> {
        if self.state != SessionState::Finished {
            return fail("cannot commit an unfinished session.");
        }
        if self.touched.is_empty() {
            log::debug!("Nothing to review, no changes to write.");
            return Ok(0);
        }
        Ok(store.upsert_many(self.touched))
    }

    /// Discard the session without writing anything.
    pub fn abandon(self) {
        log::debug!(
            "Abandoned {} session after {} of {} cards",
            self.mode,
            self.touched.len(),
            self.total
        );
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::types::card::CardStatus;
    use crate::types::card::fixtures::card;
    use crate::types::ids::CardId;
    use crate::types::ids::FolderId;

    const DAY_MS: i64 = 86_400_000;

    fn store_with(cards: Vec<Card>) -> Fallible<CardStore> {
        let mut store = CardStore::fresh(Timestamp::from_millis(0)?);
        store.insert_many(cards)?;
        Ok(store)
    }

    #[test]
    fn test_empty_folder_finishes_immediately() -> Fallible<()> {
        let mut store = store_with(Vec::new())?;
        let before = store.clone();
        let now = Timestamp::from_millis(0)?;
        let mut rng = StdRng::seed_from_u64(0);
        for mode in [StudyMode::Focused, StudyMode::Random, StudyMode::Scheduled] {
            let cards = store.get_by_folder(&FolderId::new("f1"));
            let session = DeckSession::new(&cards, mode, now, &mut rng);
            assert_eq!(session.state(), SessionState::Finished);
            assert!(session.current().is_none());
            assert_eq!(session.commit(&mut store)?, 0);
        }
        assert_eq!(store, before);
        Ok(())
    }

    #[test]
    fn test_single_card_mastered() -> Fallible<()> {
        let mut store = store_with(vec![card("c1", "f1", 0)])?;
        let now = Timestamp::from_millis(10_000)?;
        let mut rng = StdRng::seed_from_u64(0);
        let cards = store.get_by_folder(&FolderId::new("f1"));
        let mut session = DeckSession::new(&cards, StudyMode::Focused, now, &mut rng);
        assert_eq!(session.position(), (1, 1));
        assert_eq!(session.swipe(Outcome::Mastered, now)?, Step::Finished);
        assert_eq!(session.commit(&mut store)?, 1);
        let card = store.get(&CardId::new("c1")).cloned();
        let card = card.ok_or_else(|| crate::error::ErrorReport::new("missing card"))?;
        assert_eq!(card.interval(), 1);
        assert_eq!(card.status(), CardStatus::Mastered);
        assert_eq!(card.next_review().as_millis(), 10_000 + DAY_MS);
        Ok(())
    }

    #[test]
    fn test_interval_doubles() -> Fallible<()> {
        let now = Timestamp::from_millis(0)?;
        let mut c1 = card("c1", "f1", 0);
        c1.set_schedule(4, now);
        let mut store = store_with(vec![c1])?;
        let mut rng = StdRng::seed_from_u64(0);
        let cards = store.get_by_folder(&FolderId::new("f1"));
        let mut session = DeckSession::new(&cards, StudyMode::Random, now, &mut rng);
        session.swipe(Outcome::Mastered, now)?;
        session.commit(&mut store)?;
        assert_eq!(store.get(&CardId::new("c1")).map(|c| c.interval()), Some(8));
        Ok(())
    }

    #[test]
    fn test_every_card_answered_once() -> Fallible<()> {
        let now = Timestamp::from_millis(0)?;
        let cards = vec![card("a", "f1", 0), card("b", "f1", 0), card("c", "f1", 0)];
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = DeckSession::new(&cards, StudyMode::Random, now, &mut rng);
        assert_eq!(session.swipe(Outcome::NeedsReview, now)?, Step::Next);
        assert_eq!(session.position(), (2, 3));
        assert_eq!(session.swipe(Outcome::Mastered, now)?, Step::Next);
        assert_eq!(session.swipe(Outcome::NeedsReview, now)?, Step::Finished);
        assert!(session.swipe(Outcome::Mastered, now).is_err());
        Ok(())
    }

    #[test]
    fn test_abandon_leaves_store_untouched() -> Fallible<()> {
        let store = store_with(vec![card("a", "f1", 0), card("b", "f1", 0)])?;
        let before = store.clone();
        let now = Timestamp::from_millis(0)?;
        let mut rng = StdRng::seed_from_u64(0);
        let cards = store.get_by_folder(&FolderId::new("f1"));
        let mut session = DeckSession::new(&cards, StudyMode::Focused, now, &mut rng);
        session.swipe(Outcome::Mastered, now)?;
        session.abandon();
        assert_eq!(store, before);
        Ok(())
    }

    #[test]
    fn test_unfinished_commit_is_refused() -> Fallible<()> {
        let mut store = store_with(vec![card("a", "f1", 0), card("b", "f1", 0)])?;
        let before = store.clone();
        let now = Timestamp::from_millis(0)?;
        let mut rng = StdRng::seed_from_u64(0);
        let cards = store.get_by_folder(&FolderId::new("f1"));
        let mut session = DeckSession::new(&cards, StudyMode::Focused, now, &mut rng);
        session.swipe(Outcome::Mastered, now)?;
        assert!(session.commit(&mut store).is_err());
        assert_eq!(store, before);
        Ok(())
    }

    #[test]
    fn test_focused_skips_mastered_cards_not_due() -> Fallible<()> {
        let now = Timestamp::from_millis(0)?;
        let mut done = card("done", "f1", 0);
        done.set_mastery_score(3);
        done.set_schedule(2, Timestamp::from_millis(2 * DAY_MS)?);
        let cards = vec![done, card("fresh", "f1", 0)];
        let mut rng = StdRng::seed_from_u64(0);
        let session = DeckSession::new(&cards, StudyMode::Focused, now, &mut rng);
        assert_eq!(session.total(), 1);
        assert_eq!(session.current().map(|c| c.id().as_str()), Some("fresh"));
        let session = DeckSession::new(&cards, StudyMode::Random, now, &mut rng);
        assert_eq!(session.total(), 2);
        Ok(())
    }

    #[test]
    fn test_scheduled_takes_every_card_in_stored_order() -> Fallible<()> {
        let now = Timestamp::from_millis(0)?;
        let cards = vec![card("future", "f1", 99_000), card("due", "f1", 0)];
        let mut rng = StdRng::seed_from_u64(0);
        let mut session = DeckSession::new(&cards, StudyMode::Scheduled, now, &mut rng);
        assert_eq!(session.total(), 2);
        assert_eq!(session.current().map(|c| c.id().as_str()), Some("future"));
        session.swipe(Outcome::NeedsReview, now)?;
        assert_eq!(session.current().map(|c| c.id().as_str()), Some("due"));
        Ok(())
    }
}
