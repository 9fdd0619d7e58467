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

/// The text shown in place of a cloze deletion.
const CLOZE_BLANK: &str = "[...]";

/// A card's text content, before it is given an identity.
#[derive(Clone, PartialEq, Debug)]
pub struct ParsedCard {
    pub front: String,
    pub back: String,
}

/// Parse plain-text notes into cards.
///
/// Cards are separated by blank lines. A block of the form `front / back` is
/// a basic card. A block containing `[bracketed]` text yields one cloze card
/// per bracketed span: the front hides the span, the back is the span. Any
/// other block is ignored.
pub fn parse_cards(content: &str) -> Vec<ParsedCard> {
    let mut cards = Vec::new();

    let blocks: Vec<&str> = content
        .split("\n\n")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    for block in blocks {
        if let Some(separator_pos) = block.find(" / ") {
            let front = block[..separator_pos].trim().to_string();
            let back = block[separator_pos + 3..].trim().to_string();
            if !front.is_empty() && !back.is_empty() {
                cards.push(ParsedCard { front, back });
            }
        } else if block.contains('[') && block.contains(']') {
            cards.extend(parse_cloze_block(block));
        }
    }

    cards
}

fn parse_cloze_block(text: &str) -> Vec<ParsedCard> {
    let mut cards = Vec::new();

    // The full text of the block, without square brackets.
    let clean_text: Vec<char> = text.chars().filter(|c| *c != '[' && *c != ']').collect();

    let mut start = None;
    let mut index = 0;
    for c in text.chars() {
        if c == '[' {
            start = Some(index);
        } else if c == ']' {
            if let Some(s) = start {
                if index > s {
                    let before: String = clean_text[..s].iter().collect();
                    let hidden: String = clean_text[s..index].iter().collect();
                    let after: String = clean_text[index..].iter().collect();
                    cards.push(ParsedCard {
                        front: format!("{before}{CLOZE_BLANK}{after}"),
                        back: hidden.trim().to_string(),
                    });
                }
                start = None;
            }
        } else {
            index += 1;
        }
    }

    cards
}
