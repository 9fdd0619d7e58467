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

pub mod check;
pub mod export;
pub mod folders;
pub mod import;
pub mod learn;
pub mod stats;
pub mod study;

use std::io::BufRead;
use std::io::Write;

use crate::error::Fallible;

/// Read one line of input, without its line ending. `None` at end of input.
pub(crate) fn read_line<R: BufRead>(input: &mut R) -> Fallible<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

pub(crate) fn prompt<W: Write>(output: &mut W, text: &str) -> Fallible<()> {
    write!(output, "{text}")?;
    output.flush()?;
    Ok(())
}
