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

//! Study sessions.
//!
//! A session works on copies of the cards it was started with and never
//! touches the store until it reaches `Finished` and is committed. Dropping
//! or abandoning a session at any earlier point leaves the store exactly as
//! it was.

pub mod deck;
pub mod learn;

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::GenerationError;
use crate::error::GradingError;

/// How a swipe session picks and orders its cards.
#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    /// Unmastered or due cards, earliest due first.
    Focused,
    /// Every card in the folder, shuffled.
    Random,
    /// Every card in the folder, in stored order.
    Scheduled,
}

impl Display for StudyMode {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let s = match self {
            StudyMode::Focused => "focused",
            StudyMode::Random => "random",
            StudyMode::Scheduled => "scheduled",
        };
        write!(f, "{s}")
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionState {
    /// Configured but not started.
    Setup,
    /// An item is awaiting an answer.
    InRound,
    /// The round's queue drained with items still below the threshold.
    RoundComplete,
    /// Nothing left to answer. The only state that may be committed.
    Finished,
}

/// What happened after an answer was applied.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Step {
    /// Another item is waiting in this round.
    Next,
    /// The round ended; `remaining` items go into the next one.
    RoundComplete { remaining: usize },
    Finished,
}

#[derive(Debug, PartialEq)]
pub enum SessionError {
    /// The grader failed. The item is still pending.
    Grading(GradingError),
    /// Questions could not be generated. The session did not start.
    Generation(GenerationError),
    /// Answers must not be blank.
    BlankAnswer,
    /// At least one question type must be selected.
    NoQuestionTypes,
    /// `start` was called on a session that has already left setup.
    AlreadyStarted(SessionState),
    /// The session is not in a state that accepts this call.
    NotInRound(SessionState),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            SessionError::Grading(e) => write!(f, "{e}"),
            SessionError::Generation(e) => write!(f, "{e}"),
            SessionError::BlankAnswer => write!(f, "answer cannot be blank."),
            SessionError::NoQuestionTypes => write!(f, "select at least one question type."),
            SessionError::AlreadyStarted(state) => {
                write!(f, "session has already started ({state:?}).")
            }
            SessionError::NotInRound(state) => write!(f, "session is not in a round ({state:?})."),
        }
    }
}

impl Error for SessionError {}

impl From<SessionError> for ErrorReport {
    fn from(value: SessionError) -> Self {
        ErrorReport::new(value.to_string())
    }
}
