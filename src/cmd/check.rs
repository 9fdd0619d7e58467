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

use std::path::Path;

use crate::error::Fallible;
use crate::error::fail;
use crate::parser::parse_cards;

/// Parse a notes file and report how many cards it yields. Nothing is written.
pub fn check_notes(path: &Path) -> Fallible<usize> {
    if !path.is_file() {
        return fail("file does not exist.");
    }
    let content = std::fs::read_to_string(path)?;
    let count = parse_cards(&content).len();
    if count == 0 {
        return fail("no cards found.");
    }
    println!("{count} cards.");
    println!("ok");
    Ok(count)
}
