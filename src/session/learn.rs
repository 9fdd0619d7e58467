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

use std::collections::HashMap;

use crate::collab::generator::Generator;
use crate::collab::grader::Grader;
use crate::collab::grader::Verdict;
use crate::error::Fallible;
use crate::error::fail;
use crate::mastery::apply_graded_outcome;
use crate::queue::RoundQueue;
use crate::session::SessionError;
use crate::session::SessionState;
use crate::session::Step;
use crate::store::CardStore;
use crate::types::card::Card;
use crate::types::card::MASTERED_SCORE;
use crate::types::ids::CardId;
use crate::types::question::Question;
use crate::types::question::QuestionType;

/// The default number of items in a learn session.
pub const DEFAULT_ITEM_COUNT: usize = 10;

#[derive(Clone, Debug)]
pub struct LearnConfig {
    pub question_types: Vec<QuestionType>,
    /// Defaults to `min(cards, DEFAULT_ITEM_COUNT)`.
    pub item_count: Option<usize>,
    /// The score an item must reach to leave the session. In
    /// `1..=MASTERED_SCORE`.
    pub mastery_threshold: u8,
}

impl Default for LearnConfig {
    fn default() -> Self {
        Self {
            question_types: vec![QuestionType::Written],
            item_count: None,
            mastery_threshold: MASTERED_SCORE,
        }
    }
}

struct LearnItem {
    card: Card,
    question: Question,
}

/// The grader's verdict on an answer, and where the session went from there.
#[derive(Clone, Debug)]
pub struct Feedback {
    pub verdict: Verdict,
    /// The card after the outcome was applied.
    pub card: Card,
    pub step: Step,
}

#[derive(Clone, PartialEq, Debug)]
pub struct LearnSummary {
    pub rounds: usize,
    pub attempts: usize,
    /// Cards that reached the threshold, in the order they reached it.
    pub mastered: Vec<CardId>,
    /// The number of cards written to the store.
    pub written: usize,
}

/// Rounds of questions. A wrong answer sends the item to the back of the
/// current round; a round ends when its queue drains, and the items still
/// below the threshold form the next round. The session finishes when every
/// item has reached the threshold.
pub struct LearnSession {
    config: LearnConfig,
    cards: Vec<Card>,
    items: Vec<LearnItem>,
    /// Indices into `items`.
    queue: RoundQueue<usize>,
    /// Items waiting for the next round.
    remaining: Vec<usize>,
    mastered: Vec<CardId>,
    state: SessionState,
}

impl LearnSession {
    pub fn new(cards: Vec<Card>, config: LearnConfig) -> Self {
        let threshold = config.mastery_threshold.clamp(1, MASTERED_SCORE);
        Self {
            config: LearnConfig {
                mastery_threshold: threshold,
                ..config
            },
            cards,
            items: Vec::new(),
            queue: RoundQueue::new(Vec::new()),
            remaining: Vec::new(),
            mastered: Vec::new(),
            state: SessionState::Setup,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn threshold(&self) -> u8 {
        self.config.mastery_threshold
    }

    /// Pick the candidates and generate their questions. Items are the cards
    /// below the threshold, up to the item count. With no candidates the
    /// session finishes at once. If generation fails the session stays in
    /// setup.
    pub async fn start(&mut self, generator: &dyn Generator) -> Result<Step, SessionError> {
        if self.state != SessionState::Setup {
            return Err(SessionError::AlreadyStarted(self.state));
        }
        if self.config.question_types.is_empty() {
            return Err(SessionError::NoQuestionTypes);
        }
        let count = self
            .config
            .item_count
            .unwrap_or_else(|| self.cards.len().min(DEFAULT_ITEM_COUNT));
        let threshold = self.config.mastery_threshold;
        let candidates: Vec<Card> = self
            .cards
            .iter()
            .filter(|card| card.mastery_score() < threshold)
            .take(count)
            .cloned()
            .collect();
        if candidates.is_empty() {
            log::debug!("No cards below the threshold, nothing to learn.");
            self.state = SessionState::Finished;
            return Ok(Step::Finished);
        }
        let questions = generator
            .generate_questions(&candidates, &self.config.question_types, candidates.len())
            .await
            .map_err(SessionError::Generation)?;
        self.items = bind_questions(candidates, questions);
        self.queue = RoundQueue::new((0..self.items.len()).collect());
        self.state = SessionState::InRound;
        log::debug!("Learn session started with {} items", self.items.len());
        Ok(Step::Next)
    }

    /// The question awaiting an answer.
    pub fn current(&self) -> Option<&Question> {
        self.current_item().map(|item| &item.question)
    }

    /// The card behind the current question.
    pub fn current_card(&self) -> Option<&Card> {
        self.current_item().map(|item| &item.card)
    }

    fn current_item(&self) -> Option<&LearnItem> {
        if self.state != SessionState::InRound {
            return None;
        }
        self.queue.current().map(|idx| &self.items[*idx])
    }

    /// 1-based.
    pub fn round(&self) -> usize {
        self.queue.round()
    }

    /// 1-based, within the current round.
    pub fn pass(&self) -> usize {
        self.queue.pass()
    }

    /// Items left in the current round, including repeats.
    pub fn left_in_round(&self) -> usize {
        self.queue.remaining()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn mastered(&self) -> &[CardId] {
        &self.mastered
    }

    /// Grade an answer to the current question and apply the outcome.
    ///
    /// Waits for the grader before doing anything else. If the grader fails
    /// nothing changes: the same question is still current and the answer can
    /// be submitted again.
    pub async fn submit(
        &mut self,
        grader: &dyn Grader,
        answer: &str,
    ) -> Result<Feedback, SessionError> {
        if self.state != SessionState::InRound {
            return Err(SessionError::NotInRound(self.state));
        }
        if answer.trim().is_empty() {
            return Err(SessionError::BlankAnswer);
        }
        let idx = match self.queue.current() {
            Some(idx) => *idx,
            None => return Err(SessionError::NotInRound(self.state)),
        };
        let question = &self.items[idx].question;
        let answer = resolve_choice(question, answer);
        let verdict = match grader
            .evaluate(&question.prompt, &question.answer, &answer)
            .await
        {
            Ok(verdict) => verdict,
            Err(e) => {
                log::warn!("Grading failed for {}: {e}", question.card_id);
                return Err(SessionError::Grading(e));
            }
        };

        let updated = apply_graded_outcome(&self.items[idx].card, verdict.is_correct);
        log::debug!(
            "{} correct={} score={}",
            updated.id(),
            verdict.is_correct,
            updated.mastery_score()
        );
        if verdict.is_correct
            && updated.mastery_score() >= self.config.mastery_threshold
            && !self.mastered.contains(updated.id())
        {
            self.mastered.push(updated.id().clone());
        }
        self.items[idx].card = updated.clone();
        self.queue.resolve(!verdict.is_correct);

        let step = if self.queue.is_drained() {
            self.complete_round()
        } else {
            Step::Next
        };
        Ok(Feedback {
            verdict,
            card: updated,
            step,
        })
    }

    fn complete_round(&mut self) -> Step {
        let threshold = self.config.mastery_threshold;
        // Every item below the threshold goes on, whatever its last answer.
        self.remaining = (0..self.items.len())
            .filter(|idx| self.items[*idx].card.mastery_score() < threshold)
            .collect();
        if self.remaining.is_empty() {
            log::debug!(
                "Learn session finished after {} rounds, {} attempts",
                self.queue.round(),
                self.queue.attempts()
            );
            self.state = SessionState::Finished;
            Step::Finished
        } else {
            log::debug!(
                "Round {} complete, {} items remaining",
                self.queue.round(),
                self.remaining.len()
            );
            self.state = SessionState::RoundComplete;
            Step::RoundComplete {
                remaining: self.remaining.len(),
            }
        }
    }

    /// Start the next round with the items left below the threshold.
    pub fn next_round(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::RoundComplete {
            return Err(SessionError::NotInRound(self.state));
        }
        let remaining = std::mem::take(&mut self.remaining);
        self.queue.start_round(remaining);
        self.state = SessionState::InRound;
        Ok(())
    }

    /// Write the session's cards back to the store. Only a finished session
    /// can be committed.
    pub fn commit(self, store: &mut CardStore) -> Fallible<LearnSummary> {
        if self.state != SessionState::Finished {
            return fail("cannot commit an unfinished session.");
        }
        let by_id: HashMap<&CardId, &Card> = self
            .items
            .iter()
            .map(|item| (item.card.id(), &item.card))
            .collect();
        let updates: Vec<Card> = self
            .mastered
            .iter()
            .filter_map(|id| by_id.get(id).map(|card| (*card).clone()))
            .collect();
        let written = if updates.is_empty() {
            0
        } else {
            store.upsert_many(updates)
        };
        Ok(LearnSummary {
            rounds: if self.items.is_empty() { 0 } else { self.queue.round() },
            attempts: self.queue.attempts(),
            mastered: self.mastered,
            written,
        })
    }

    /// Discard the session without writing anything.
    pub fn abandon(self) {
        log::debug!(
            "Abandoned learn session in round {} after {} attempts",
            self.queue.round(),
            self.queue.attempts()
        );
    }
}

/// Pair each card with its question. Cards the generator produced no question
/// for are asked as written questions.
fn bind_questions(cards: Vec<Card>, questions: Vec<Question>) -> Vec<LearnItem> {
    let mut by_card: HashMap<CardId, Question> = HashMap::new();
    for question in questions {
        if cards.iter().any(|card| card.id() == &question.card_id) {
            by_card.entry(question.card_id.clone()).or_insert(question);
        } else {
            log::warn!("Dropping question for unknown card {}", question.card_id);
        }
    }
    cards
        .into_iter()
        .map(|card| {
            let question = by_card
                .remove(card.id())
                .unwrap_or_else(|| Question::written(card.id().clone(), card.front(), card.back()));
            LearnItem { card, question }
        })
        .collect()
}

/// For multiple choice, a single letter selects a choice.
fn resolve_choice(question: &Question, answer: &str) -> String {
    let answer = answer.trim();
    if question.kind == QuestionType::MultipleChoice {
        let mut chars = answer.chars();
        if let (Some(letter), None) = (chars.next(), chars.next()) {
            let letter = letter.to_ascii_lowercase();
            if letter.is_ascii_lowercase() {
                let idx = (letter as u8 - b'a') as usize;
                if let Some(choice) = question.choices.get(idx) {
                    return choice.clone();
                }
            }
        }
    }
    answer.to_string()
}
