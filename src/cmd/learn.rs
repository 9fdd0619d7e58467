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

use std::io::BufRead;
use std::io::Write;

use crate::cmd::prompt;
use crate::cmd::read_line;
use crate::collab::generator::Generator;
use crate::collab::generator::TextGenerator;
use crate::collab::grader::Grader;
use crate::collab::grader::LocalGrader;
use crate::collab::grader::TimeoutGrader;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::session::SessionError;
use crate::session::SessionState;
use crate::session::Step;
use crate::session::learn::LearnConfig;
use crate::session::learn::LearnSession;
use crate::store::CardStore;
use crate::types::ids::FolderId;
use crate::types::question::QuestionType;

/// Typed on its own line, ends the session without saving.
const QUIT: &str = ":q";

pub async fn learn(
    directory: Option<String>,
    folder: Option<String>,
    types: Vec<QuestionType>,
    count: Option<usize>,
) -> Fallible<()> {
    let mut coll = Collection::new(directory)?;
    let folder_id = coll.folder_id(folder)?;
    let mut config = coll.config.learn_config();
    if !types.is_empty() {
        config.question_types = types;
    }
    if count.is_some() {
        config.item_count = count;
    }
    let grader: Box<dyn Grader> = match coll.config.grader_timeout() {
        Some(limit) => Box::new(TimeoutGrader::new(LocalGrader, limit)),
        None => Box::new(LocalGrader),
    };
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    let finished = run_learn(
        &mut coll.store,
        &folder_id,
        config,
        &TextGenerator,
        grader.as_ref(),
        &mut input,
        &mut output,
    )
    .await?;
    if finished {
        coll.save()?;
    }
    Ok(())
}

/// Run a learn session in the terminal. Returns whether the session finished
/// and was committed to the store.
pub async fn run_learn<R: BufRead, W: Write>(
    store: &mut CardStore,
    folder_id: &FolderId,
    config: LearnConfig,
    generator: &dyn Generator,
    grader: &dyn Grader,
    input: &mut R,
    output: &mut W,
) -> Fallible<bool> {
    let cards = store.get_by_folder(folder_id);
    let mut session = LearnSession::new(cards, config);
    if session.start(generator).await? == Step::Finished {
        writeln!(output, "Nothing to learn.")?;
        return Ok(false);
    }
    writeln!(
        output,
        "Learning {} items. Type {QUIT} to quit.",
        session.item_count()
    )?;
    loop {
        match session.state() {
            SessionState::InRound => {}
            SessionState::RoundComplete => {
                session.next_round()?;
                writeln!(output, "Round {}.", session.round())?;
                continue;
            }
            SessionState::Finished => break,
            SessionState::Setup => return fail("session was not started."),
        }
        let question = match session.current() {
            Some(question) => question.clone(),
            None => break,
        };
        writeln!(
            output,
            "[round {}, {} left] {}",
            session.round(),
            session.left_in_round(),
            question.prompt
        )?;
        for (idx, choice) in question.choices.iter().enumerate() {
            let letter = char::from(b'a' + (idx as u8));
            writeln!(output, "  {letter}) {choice}")?;
        }
        prompt(output, "> ")?;
        let answer = match read_line(input)? {
            Some(line) if line.trim() != QUIT => line,
            _ => {
                session.abandon();
                writeln!(output, "Session abandoned.")?;
                return Ok(false);
            }
        };
        match session.submit(grader, &answer).await {
            Ok(feedback) => {
                writeln!(output, "{}", feedback.verdict.feedback)?;
                if let Step::RoundComplete { remaining } = feedback.step {
                    writeln!(output, "Round complete, {remaining} items to go.")?;
                }
            }
            Err(SessionError::BlankAnswer) => {
                writeln!(output, "Please type an answer.")?;
            }
            Err(SessionError::Grading(e)) => {
                writeln!(output, "{e}. Please try again.")?;
            }
            Err(e) => return Err(e.into()),
        }
    }
    let summary = session.commit(store)?;
    writeln!(
        output,
        "Learned {} cards in {} rounds ({} attempts).",
        summary.mastered.len(),
        summary.rounds,
        summary.attempts
    )?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::types::card::CardStatus;
    use crate::types::card::fixtures::card;
    use crate::types::ids::CardId;
    use crate::types::timestamp::Timestamp;

    fn store() -> Fallible<CardStore> {
        let mut store = CardStore::fresh(Timestamp::from_millis(0)?);
        store.insert_many(vec![card("a", "f1", 0)])?;
        Ok(store)
    }

    async fn run(
        store: &mut CardStore,
        config: LearnConfig,
        keys: &str,
    ) -> Fallible<(bool, String)> {
        let mut input = Cursor::new(keys.as_bytes().to_vec());
        let mut output: Vec<u8> = Vec::new();
        let finished = run_learn(
            store,
            &FolderId::new("f1"),
            config,
            &TextGenerator,
            &LocalGrader,
            &mut input,
            &mut output,
        )
        .await?;
        let output = String::from_utf8(output).unwrap_or_default();
        Ok((finished, output))
    }

    #[tokio::test]
    async fn test_learn_to_mastery() -> Fallible<()> {
        let mut store = store()?;
        let keys = "back of a\n\nwrong\nback of a\nback of a\nback of a\n";
        let (finished, output) = run(&mut store, LearnConfig::default(), keys).await?;
        assert!(finished);
        assert!(output.contains("Please type an answer."));
        assert!(output.contains("Not quite. The answer is: back of a"));
        assert!(output.contains("Learned 1 cards"));
        let a = store.get(&CardId::new("a")).cloned();
        assert_eq!(a.map(|c| c.status()), Some(CardStatus::Mastered));
        Ok(())
    }

    #[tokio::test]
    async fn test_quit_abandons() -> Fallible<()> {
        let mut store = store()?;
        let before = store.clone();
        let (finished, output) = run(&mut store, LearnConfig::default(), "back of a\n:q\n").await?;
        assert!(!finished);
        assert!(output.contains("Session abandoned."));
        assert_eq!(store, before);
        Ok(())
    }

    #[tokio::test]
    async fn test_multiple_choice_by_letter() -> Fallible<()> {
        let mut store = store()?;
        let config = LearnConfig {
            question_types: vec![QuestionType::MultipleChoice],
            item_count: None,
            mastery_threshold: 1,
        };
        let (finished, output) = run(&mut store, config, "a\n").await?;
        assert!(finished);
        assert!(output.contains("  a) back of a"));
        assert!(output.contains("Correct!"));
        Ok(())
    }

    #[tokio::test]
    async fn test_nothing_to_learn() -> Fallible<()> {
        let mut store = CardStore::fresh(Timestamp::from_millis(0)?);
        let (finished, output) = run(&mut store, LearnConfig::default(), "").await?;
        assert!(!finished);
        assert!(output.contains("Nothing to learn."));
        Ok(())
    }
}
