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

use clap::ValueEnum;
use serde::Deserialize;
use serde::Serialize;

use crate::types::ids::CardId;

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    /// Pick the answer from a list of choices.
    MultipleChoice,
    /// Judge whether a statement is true.
    TrueFalse,
    /// Write the answer out.
    Written,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::TrueFalse => "true-false",
            QuestionType::Written => "written",
        }
    }
}

impl Display for QuestionType {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A question asked in a learn session. Always bound to exactly one card.
#[derive(Clone, PartialEq, Debug)]
pub struct Question {
    pub card_id: CardId,
    pub kind: QuestionType,
    pub prompt: String,
    /// The reference answer handed to the grader.
    pub answer: String,
    /// Only non-empty for multiple choice.
    pub choices: Vec<String>,
}

impl Question {
    pub fn written(card_id: CardId, prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            card_id,
            kind: QuestionType::Written,
            prompt: prompt.into(),
            answer: answer.into(),
            choices: Vec::new(),
        }
    }
}
