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

use std::time::Duration;

use async_trait::async_trait;

use crate::error::GradingError;

/// A grader's judgement of one answer.
#[derive(Clone, PartialEq, Debug)]
pub struct Verdict {
    pub is_correct: bool,
    pub feedback: String,
}

/// Judges whether an answer is correct. Either a full verdict or an error;
/// there are no partial results.
#[async_trait]
pub trait Grader: Send + Sync {
    async fn evaluate(
        &self,
        question: &str,
        reference_answer: &str,
        user_answer: &str,
    ) -> Result<Verdict, GradingError>;
}

/// Grades by comparing normalized text. Case, surrounding punctuation and
/// runs of whitespace are ignored.
pub struct LocalGrader;

#[async_trait]
impl Grader for LocalGrader {
    async fn evaluate(
        &self,
        _question: &str,
        reference_answer: &str,
        user_answer: &str,
    ) -> Result<Verdict, GradingError> {
        let expected = normalize(reference_answer);
        if expected.is_empty() {
            return Err(GradingError::new("the reference answer is empty"));
        }
        let given = canonical_boolean(&normalize(user_answer));
        let is_correct = given == canonical_boolean(&expected);
        let feedback = if is_correct {
            "Correct!".to_string()
        } else {
            format!("Not quite. The answer is: {}", reference_answer.trim())
        };
        Ok(Verdict {
            is_correct,
            feedback,
        })
    }
}

fn normalize(text: &str) -> String {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .collect();
    let joined = words.join(" ");
    joined
        .trim_matches(|c: char| c.is_ascii_punctuation())
        .to_string()
}

fn canonical_boolean(text: &str) -> String {
    match text {
        "t" | "yes" | "y" => "true".to_string(),
        "f" | "no" | "n" => "false".to_string(),
        _ => text.to_string(),
    }
}

/// Fails any evaluation that takes longer than the limit, so a hung call is
/// reported like any other grading failure.
pub struct TimeoutGrader<G> {
    inner: G,
    limit: Duration,
}

impl<G: Grader> TimeoutGrader<G> {
    pub fn new(inner: G, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl<G: Grader> Grader for TimeoutGrader<G> {
    async fn evaluate(
        &self,
        question: &str,
        reference_answer: &str,
        user_answer: &str,
    ) -> Result<Verdict, GradingError> {
        let call = self.inner.evaluate(question, reference_answer, user_answer);
        match tokio::time::timeout(self.limit, call).await {
            Ok(result) => result,
            Err(_) => Err(GradingError::new(format!(
                "no verdict after {}s",
                self.limit.as_secs()
            ))),
        }
    }
}
