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

use crate::types::card::Card;

/// Apply a graded answer to a card.
///
/// A correct answer raises the mastery score by one, an incorrect answer
/// lowers it by one; the score stays within `0..=MASTERED_SCORE`. Reaching
/// mastery from zero therefore takes three net correct answers, and a card
/// that keeps lapsing can cycle forever.
pub fn apply_graded_outcome(card: &Card, is_correct: bool) -> Card {
    let mut card = card.clone();
    let score = i32::from(card.mastery_score());
    let score = if is_correct { score + 1 } else { score - 1 };
    card.set_mastery_score(score);
    card.set_last_attempt_correct(is_correct);
    card
}
