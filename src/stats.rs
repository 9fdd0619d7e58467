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

use serde::Serialize;

use crate::scheduler::is_due;
use crate::store::CardStore;
use crate::types::timestamp::Timestamp;

#[derive(Serialize, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_cards: usize,
    pub mastered_cards: usize,
    /// Mastered cards as a rounded percentage of all cards.
    pub progress_percent: u32,
    pub folders: Vec<FolderStats>,
}

#[derive(Serialize, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FolderStats {
    pub id: String,
    pub name: String,
    pub card_count: usize,
    pub due_count: usize,
}

pub fn collection_stats(store: &CardStore, now: Timestamp) -> Stats {
    let total_cards = store.cards().len();
    let mastered_cards = store.cards().iter().filter(|c| c.is_mastered()).count();
    let progress_percent = if total_cards == 0 {
        0
    } else {
        ((mastered_cards as f64 / total_cards as f64) * 100.0).round() as u32
    };
    let folders = store
        .folders()
        .iter()
        .map(|folder| {
            let cards = store.get_by_folder(&folder.id);
            FolderStats {
                id: folder.id.to_string(),
                name: folder.name.clone(),
                card_count: cards.len(),
                due_count: cards.iter().filter(|c| is_due(c, now)).count(),
            }
        })
        .collect();
    Stats {
        total_cards,
        mastered_cards,
        progress_percent,
        folders,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;
    use crate::types::card::fixtures::card;

    const DAY_MS: i64 = 86_400_000;

    #[test]
    fn test_empty_store() -> Fallible<()> {
        let now = Timestamp::from_millis(0)?;
        let stats = collection_stats(&CardStore::fresh(now), now);
        assert_eq!(stats.total_cards, 0);
        assert_eq!(stats.progress_percent, 0);
        assert_eq!(stats.folders.len(), 1);
        assert_eq!(stats.folders[0].name, "General Notes");
        Ok(())
    }

    #[test]
    fn test_counts() -> Fallible<()> {
        let now = Timestamp::from_millis(0)?;
        let mut store = CardStore::fresh(now);
        let mut done = card("a", "f1", 0);
        done.set_mastery_score(3);
        done.set_schedule(4, Timestamp::from_millis(4 * DAY_MS)?);
        store.insert_many(vec![done, card("b", "f1", 0), card("c", "f1", 0)])?;
        let stats = collection_stats(&store, now);
        assert_eq!(stats.total_cards, 3);
        assert_eq!(stats.mastered_cards, 1);
        assert_eq!(stats.progress_percent, 33);
        assert_eq!(stats.folders[0].card_count, 3);
        assert_eq!(stats.folders[0].due_count, 2);
        Ok(())
    }
}
