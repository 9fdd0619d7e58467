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

use std::fmt::Display;
use std::fmt::Formatter;

use crate::types::ids::CardId;
use crate::types::ids::FolderId;
use crate::types::timestamp::Timestamp;

/// The mastery score at which a card counts as mastered. Scores never exceed
/// this value.
pub const MASTERED_SCORE: u8 = 3;

/// Where a card is in its lifecycle. Derived from the mastery score, never
/// trusted on its own.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CardStatus {
    /// Never studied.
    New,
    /// Studied at least once, not yet mastered.
    Learning,
    /// Mastery score at the ceiling.
    Mastered,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::New => "new",
            CardStatus::Learning => "learning",
            CardStatus::Mastered => "mastered",
        }
    }
}

impl Display for CardStatus {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Card {
    id: CardId,
    /// The folder this card is filed under.
    folder_id: FolderId,
    front: String,
    back: String,
    status: CardStatus,
    /// In `0..=MASTERED_SCORE`.
    mastery_score: u8,
    /// The current review interval in days. Only the spaced modes use it.
    interval: u32,
    /// The card is due at or after this instant.
    next_review: Timestamp,
    /// The outcome of the most recent graded attempt in the current session.
    last_attempt_correct: Option<bool>,
}

impl Card {
    /// A brand new card, due immediately.
    pub fn new(
        id: CardId,
        folder_id: FolderId,
        front: impl Into<String>,
        back: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            folder_id,
            front: front.into(),
            back: back.into(),
            status: CardStatus::New,
            mastery_score: 0,
            interval: 0,
            next_review: created_at,
            last_attempt_correct: None,
        }
    }

    /// Rebuild a card from stored fields. The status is recomputed from the
    /// score; `was_new` only matters when the score is zero.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: CardId,
        folder_id: FolderId,
        front: String,
        back: String,
        mastery_score: u8,
        was_new: bool,
        interval: u32,
        next_review: Timestamp,
    ) -> Self {
        let mut card = Self {
            id,
            folder_id,
            front,
            back,
            status: CardStatus::New,
            mastery_score: 0,
            interval,
            next_review,
            last_attempt_correct: None,
        };
        card.set_mastery_score(i32::from(mastery_score));
        if was_new && card.mastery_score == 0 {
            card.status = CardStatus::New;
        }
        card
    }

    pub fn id(&self) -> &CardId {
        &self.id
    }

    pub fn folder_id(&self) -> &FolderId {
        &self.folder_id
    }

    pub fn front(&self) -> &str {
        &self.front
    }

    pub fn back(&self) -> &str {
        &self.back
    }

    pub fn status(&self) -> CardStatus {
        self.status
    }

    pub fn mastery_score(&self) -> u8 {
        self.mastery_score
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn next_review(&self) -> Timestamp {
        self.next_review
    }

    pub fn last_attempt_correct(&self) -> Option<bool> {
        self.last_attempt_correct
    }

    pub fn is_mastered(&self) -> bool {
        self.mastery_score >= MASTERED_SCORE
    }

    /// Set the mastery score, clamped to `0..=MASTERED_SCORE`, and recompute
    /// the status. A studied card never goes back to `New`.
    pub(crate) fn set_mastery_score(&mut self, score: i32) {
        let score = score.clamp(0, i32::from(MASTERED_SCORE));
        self.mastery_score = score as u8;
        self.status = if self.is_mastered() {
            CardStatus::Mastered
        } else {
            CardStatus::Learning
        };
    }

    pub(crate) fn set_schedule(&mut self, interval: u32, next_review: Timestamp) {
        self.interval = interval;
        self.next_review = next_review;
    }

    pub(crate) fn set_last_attempt_correct(&mut self, correct: bool) {
        self.last_attempt_correct = Some(correct);
    }

    /// Drop session-scoped state before the card is written back.
    pub(crate) fn clear_session_state(&mut self) {
        self.last_attempt_correct = None;
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn card(id: &str, folder: &str, created_ms: i64) -> Card {
        Card::new(
            CardId::new(id),
            FolderId::new(folder),
            format!("front of {id}"),
            format!("back of {id}"),
            Timestamp::from_millis(created_ms).expect("valid timestamp"),
        )
    }
}
