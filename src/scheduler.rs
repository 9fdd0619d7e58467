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
use rand::seq::SliceRandom;

use crate::types::card::Card;
use crate::types::card::CardStatus;
use crate::types::card::MASTERED_SCORE;
use crate::types::outcome::Outcome;
use crate::types::timestamp::Timestamp;

/// The interval after a lapse, in days.
const RELEARN_INTERVAL: u32 = 1;

/// The longest interval, in days. Roughly a century.
pub const MAX_INTERVAL: u32 = 36_500;

pub fn is_due(card: &Card, now: Timestamp) -> bool {
    card.next_review() <= now
}

/// Cards that are unmastered or due, earliest due first. Ties keep their
/// original order.
pub fn select_focused(cards: &[Card], now: Timestamp) -> Vec<Card> {
    let mut selected: Vec<Card> = cards
        .iter()
        .filter(|card| card.status() != CardStatus::Mastered || is_due(card, now))
        .cloned()
        .collect();
    // `sort_by_key` is stable.
    selected.sort_by_key(|card| card.next_review());
    selected
}

/// Every card, uniformly shuffled.
pub fn select_random<R: Rng + ?Sized>(cards: &[Card], rng: &mut R) -> Vec<Card> {
    let mut selected = cards.to_vec();
    selected.shuffle(rng);
    selected
}

/// Every card, in stored order.
pub fn select_stored(cards: &[Card]) -> Vec<Card> {
    cards.to_vec()
}

/// Apply a swipe to a card: a doubling backoff with no ease factor.
///
/// `Mastered` doubles the interval (the first success sets it to one day, and
/// it never exceeds `MAX_INTERVAL`) and raises the score to the mastery
/// ceiling. `NeedsReview` resets the interval
/// to one day and keeps the score below the ceiling.
pub fn apply_spaced_outcome(card: &Card, outcome: Outcome, now: Timestamp) -> Card {
    let mut card = card.clone();
    match outcome {
        Outcome::Mastered => {
            let interval = if card.interval() == 0 {
                1
            } else {
                card.interval().saturating_mul(2).min(MAX_INTERVAL)
            };
            card.set_mastery_score(i32::from(MASTERED_SCORE));
            card.set_schedule(interval, now.plus_days(interval));
        }
        Outcome::NeedsReview => {
            let score = card.mastery_score().min(MASTERED_SCORE - 1);
            card.set_mastery_score(i32::from(score));
            card.set_schedule(RELEARN_INTERVAL, now.plus_days(RELEARN_INTERVAL));
        }
    }
    card
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::error::Fallible;
    use crate::types::card::fixtures::card;

    const DAY_MS: i64 = 86_400_000;

    fn mastered(id: &str, next_review_ms: i64) -> Fallible<Card> {
        let mut card = card(id, "f1", 0);
        card.set_mastery_score(3);
        card.set_schedule(4, Timestamp::from_millis(next_review_ms)?);
        Ok(card)
    }

    #[test]
    fn test_is_due() -> Fallible<()> {
        let card = card("c1", "f1", 1_000);
        assert!(is_due(&card, Timestamp::from_millis(1_000)?));
        assert!(is_due(&card, Timestamp::from_millis(2_000)?));
        assert!(!is_due(&card, Timestamp::from_millis(999)?));
        Ok(())
    }

    #[test]
    fn test_select_focused_filters_and_sorts() -> Fallible<()> {
        let now = Timestamp::from_millis(10_000)?;
        let cards = vec![
            card("late", "f1", 9_000),
            mastered("not-due", 50_000)?,
            card("early", "f1", 1_000),
            mastered("due", 5_000)?,
        ];
        let ids: Vec<String> = select_focused(&cards, now)
            .iter()
            .map(|c| c.id().to_string())
            .collect();
        assert_eq!(ids, vec!["early", "due", "late"]);
        Ok(())
    }

    #[test]
    fn test_select_focused_is_stable() -> Fallible<()> {
        let now = Timestamp::from_millis(10_000)?;
        let cards = vec![card("b", "f1", 0), card("a", "f1", 0), card("c", "f1", 0)];
        let ids: Vec<String> = select_focused(&cards, now)
            .iter()
            .map(|c| c.id().to_string())
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        Ok(())
    }

    #[test]
    fn test_select_focused_keeps_unmastered_not_yet_due() -> Fallible<()> {
        let now = Timestamp::from_millis(0)?;
        let cards = vec![card("future", "f1", 99_000)];
        assert_eq!(select_focused(&cards, now).len(), 1);
        Ok(())
    }

    #[test]
    fn test_select_random_is_a_permutation() {
        let cards: Vec<Card> = (0..20).map(|i| card(&format!("c{i}"), "f1", 0)).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let shuffled = select_random(&cards, &mut rng);
        assert_eq!(shuffled.len(), cards.len());
        let mut ids: Vec<String> = shuffled.iter().map(|c| c.id().to_string()).collect();
        ids.sort();
        let mut expected: Vec<String> = cards.iter().map(|c| c.id().to_string()).collect();
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_select_random_reaches_every_permutation() {
        let cards: Vec<Card> = (0..3).map(|i| card(&format!("c{i}"), "f1", 0)).collect();
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let order: Vec<String> = select_random(&cards, &mut rng)
                .iter()
                .map(|c| c.id().to_string())
                .collect();
            seen.insert(order);
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_select_stored_keeps_cards_not_yet_due() -> Fallible<()> {
        let cards = vec![card("future", "f1", 99_000), card("due", "f1", 0)];
        let ids: Vec<String> = select_stored(&cards)
            .iter()
            .map(|c| c.id().to_string())
            .collect();
        assert_eq!(ids, vec!["future", "due"]);
        Ok(())
    }

    #[test]
    fn test_repeated_mastered_swipes_stay_in_range() -> Fallible<()> {
        let now = Timestamp::from_millis(0)?;
        let mut card = card("c1", "f1", 0);
        for _ in 0..40 {
            card = apply_spaced_outcome(&card, Outcome::Mastered, now);
        }
        assert_eq!(card.interval(), MAX_INTERVAL);
        assert_eq!(card.next_review(), now.plus_days(MAX_INTERVAL));
        Ok(())
    }

    #[test]
    fn test_huge_stored_interval_is_capped() -> Fallible<()> {
        let now = Timestamp::from_millis(0)?;
        let mut card = card("c1", "f1", 0);
        card.set_schedule(200_000_000, now);
        let card = apply_spaced_outcome(&card, Outcome::Mastered, now);
        assert_eq!(card.interval(), MAX_INTERVAL);
        assert!(card.next_review() > now);
        Ok(())
    }

    #[test]
    fn test_first_mastered_swipe() -> Fallible<()> {
        let now = Timestamp::from_millis(1_000)?;
        let card = apply_spaced_outcome(&card("c1", "f1", 0), Outcome::Mastered, now);
        assert_eq!(card.interval(), 1);
        assert_eq!(card.status(), CardStatus::Mastered);
        assert_eq!(card.next_review().as_millis(), 1_000 + DAY_MS);
        Ok(())
    }

    #[test]
    fn test_mastered_swipe_doubles() -> Fallible<()> {
        let now = Timestamp::from_millis(0)?;
        let mut card = card("c1", "f1", 0);
        card.set_schedule(4, now);
        let card = apply_spaced_outcome(&card, Outcome::Mastered, now);
        assert_eq!(card.interval(), 8);
        assert_eq!(card.next_review().as_millis(), 8 * DAY_MS);
        Ok(())
    }

    #[test]
    fn test_mastered_swipe_strictly_increases() -> Fallible<()> {
        let now = Timestamp::from_millis(0)?;
        let mut card = card("c1", "f1", 0);
        let mut previous = card.interval();
        for _ in 0..10 {
            card = apply_spaced_outcome(&card, Outcome::Mastered, now);
            assert!(card.interval() > previous);
            previous = card.interval();
        }
        assert_eq!(card.interval(), 512);
        Ok(())
    }

    #[test]
    fn test_needs_review_resets() -> Fallible<()> {
        let now = Timestamp::from_millis(0)?;
        let mut card = card("c1", "f1", 0);
        card.set_mastery_score(3);
        card.set_schedule(16, now);
        let card = apply_spaced_outcome(&card, Outcome::NeedsReview, now);
        assert_eq!(card.interval(), 1);
        assert_eq!(card.status(), CardStatus::Learning);
        assert_eq!(card.mastery_score(), 2);
        assert_eq!(card.next_review().as_millis(), DAY_MS);
        Ok(())
    }

    #[test]
    fn test_next_review_not_before_grading_time() -> Fallible<()> {
        let now = Timestamp::from_millis(123_456)?;
        for outcome in [Outcome::Mastered, Outcome::NeedsReview] {
            let card = apply_spaced_outcome(&card("c1", "f1", 0), outcome, now);
            assert!(card.next_review() >= now);
        }
        Ok(())
    }
}
