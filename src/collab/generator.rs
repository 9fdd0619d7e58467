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

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::hash::card_id;
use crate::parser::ParsedCard;
use crate::parser::parse_cards;
use crate::types::card::Card;
use crate::types::ids::FolderId;
use crate::types::question::Question;
use crate::types::question::QuestionType;
use crate::types::timestamp::Timestamp;

/// The most choices a multiple choice question offers.
const MAX_CHOICES: usize = 4;

/// Creates cards from notes, and questions from cards.
///
/// Every card returned is new (see `Card::new`) and filed under the given
/// folder. Every question carries the id of the card it tests.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate_from_image(
        &self,
        folder_id: &FolderId,
        image: &[u8],
        now: Timestamp,
    ) -> Result<Vec<Card>, GenerationError>;

    async fn generate_from_text(
        &self,
        folder_id: &FolderId,
        text: &str,
        now: Timestamp,
    ) -> Result<Vec<Card>, GenerationError>;

    async fn generate_questions(
        &self,
        cards: &[Card],
        allowed_types: &[QuestionType],
        count: usize,
    ) -> Result<Vec<Question>, GenerationError>;
}

/// A generator that works offline: cards come from the plain-text card
/// syntax, questions are built from the cards themselves.
pub struct TextGenerator;

#[async_trait]
impl Generator for TextGenerator {
    async fn generate_from_image(
        &self,
        _folder_id: &FolderId,
        _image: &[u8],
        _now: Timestamp,
    ) -> Result<Vec<Card>, GenerationError> {
        Err(GenerationError::new(
            "reading notes from images needs a model-backed generator",
        ))
    }

    async fn generate_from_text(
        &self,
        folder_id: &FolderId,
        text: &str,
        now: Timestamp,
    ) -> Result<Vec<Card>, GenerationError> {
        let parsed = parse_cards(text);
        if parsed.is_empty() {
            return Err(GenerationError::new("no cards found in the notes"));
        }
        Ok(into_cards(folder_id, parsed, now))
    }

    async fn generate_questions(
        &self,
        cards: &[Card],
        allowed_types: &[QuestionType],
        count: usize,
    ) -> Result<Vec<Question>, GenerationError> {
        if allowed_types.is_empty() {
            return Err(GenerationError::new("no question types selected"));
        }
        let questions = cards
            .iter()
            .take(count)
            .enumerate()
            .map(|(idx, card)| {
                let kind = allowed_types[idx % allowed_types.len()];
                build_question(cards, idx, card, kind)
            })
            .collect();
        Ok(questions)
    }
}

/// Give parsed cards their identity within one batch.
pub fn into_cards(folder_id: &FolderId, parsed: Vec<ParsedCard>, now: Timestamp) -> Vec<Card> {
    parsed
        .into_iter()
        .enumerate()
        .map(|(idx, ParsedCard { front, back })| {
            let id = card_id(folder_id, &front, &back, now, idx);
            Card::new(id, folder_id.clone(), front, back, now)
        })
        .collect()
}

fn build_question(cards: &[Card], idx: usize, card: &Card, kind: QuestionType) -> Question {
    // Backs of the other cards, without duplicates of this card's back.
    let mut distractors: Vec<&str> = Vec::new();
    for offset in 1..cards.len() {
        let other = cards[(idx + offset) % cards.len()].back();
        if other != card.back() && !distractors.contains(&other) {
            distractors.push(other);
        }
    }
    match kind {
        QuestionType::Written => Question::written(card.id().clone(), card.front(), card.back()),
        QuestionType::TrueFalse => {
            // Alternate true and false statements when a false one is possible.
            let (shown, truth) = match distractors.first() {
                Some(other) if idx % 2 == 1 => (*other, "false"),
                _ => (card.back(), "true"),
            };
            Question {
                card_id: card.id().clone(),
                kind,
                prompt: format!("True or false? {}: {}", card.front(), shown),
                answer: truth.to_string(),
                choices: vec!["true".to_string(), "false".to_string()],
            }
        }
        QuestionType::MultipleChoice => {
            let mut choices: Vec<String> = distractors
                .iter()
                .take(MAX_CHOICES - 1)
                .map(|s| s.to_string())
                .collect();
            let position = idx % (choices.len() + 1);
            choices.insert(position, card.back().to_string());
            Question {
                card_id: card.id().clone(),
                kind,
                prompt: card.front().to_string(),
                answer: card.back().to_string(),
                choices,
            }
        }
    }
}
