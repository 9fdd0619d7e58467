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

use rand::Rng;

use crate::cmd::prompt;
use crate::cmd::read_line;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::session::SessionState;
use crate::session::Step;
use crate::session::StudyMode;
use crate::session::deck::DeckSession;
use crate::store::CardStore;
use crate::types::ids::FolderId;
use crate::types::outcome::Outcome;
use crate::types::timestamp::Timestamp;

pub fn study(
    directory: Option<String>,
    folder: Option<String>,
    mode: Option<StudyMode>,
) -> Fallible<()> {
    let mut coll = Collection::new(directory)?;
    let folder_id = coll.folder_id(folder)?;
    let mode = mode.unwrap_or(coll.config.study.mode);
    let mut rng = rand::rng();
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    let finished = run_study(
        &mut coll.store,
        &folder_id,
        mode,
        Timestamp::now(),
        &mut rng,
        &mut input,
        &mut output,
    )?;
    if finished {
        coll.save()?;
    }
    Ok(())
}

/// Run a swipe session in the terminal. Returns whether the session
/// finished and was committed to the store.
pub fn run_study<G, R, W>(
    store: &mut CardStore,
    folder_id: &FolderId,
    mode: StudyMode,
    now: Timestamp,
    rng: &mut G,
    input: &mut R,
    output: &mut W,
) -> Fallible<bool>
where
    G: Rng + ?Sized,
    R: BufRead,
    W: Write,
{
    let cards = store.get_by_folder(folder_id);
    let mut session = DeckSession::new(&cards, mode, now, rng);
    if session.state() == SessionState::Finished {
        writeln!(output, "Nothing to study.")?;
        return Ok(false);
    }
    while let Some(card) = session.current().cloned() {
        let (position, total) = session.position();
        writeln!(output, "[{position}/{total}] Q: {}", card.front())?;
        prompt(output, "[press enter to reveal, q to quit] ")?;
        match read_line(input)? {
            Some(line) if line.trim() != "q" => {}
            _ => {
                session.abandon();
                writeln!(output, "Session abandoned.")?;
                return Ok(false);
            }
        }
        writeln!(output, "A: {}", card.back())?;
        let outcome = match read_swipe(input, output)? {
            Some(outcome) => outcome,
            None => {
                session.abandon();
                writeln!(output, "Session abandoned.")?;
                return Ok(false);
            }
        };
        if session.swipe(outcome, now)? == Step::Finished {
            break;
        }
    }
    let written = session.commit(store)?;
    writeln!(output, "Reviewed {written} cards.")?;
    Ok(true)
}

/// `None` means the user quit.
fn read_swipe<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Fallible<Option<Outcome>> {
    loop {
        prompt(output, "Swipe: (l = got it, r = needs review, q = quit) ")?;
        let line = match read_line(input)? {
            Some(line) => line,
            None => return Ok(None),
        };
        match line.trim() {
            "l" => return Ok(Some(Outcome::Mastered)),
            "r" => return Ok(Some(Outcome::NeedsReview)),
            "q" => return Ok(None),
            _ => writeln!(output, "Invalid input. Please enter l, r, or q.")?,
        }
    }
}
