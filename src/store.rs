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
use std::collections::HashSet;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::folder::Folder;
use crate::types::ids::CardId;
use crate::types::ids::FolderId;
use crate::types::timestamp::Timestamp;

/// The in-memory collection of cards and folders.
///
/// Sessions never hold a reference into the store: they work on copies, and
/// their results are folded back in one `upsert_many` call when they finish.
#[derive(Clone, PartialEq, Debug)]
pub struct CardStore {
    folders: Vec<Folder>,
    cards: Vec<Card>,
}

impl CardStore {
    pub fn new(folders: Vec<Folder>, cards: Vec<Card>) -> Self {
        Self { folders, cards }
    }

    /// A fresh store with the default folder and no cards.
    pub fn fresh(now: Timestamp) -> Self {
        Self::new(vec![Folder::default_folder(now)], Vec::new())
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id() == id)
    }

    pub fn folder(&self, id: &FolderId) -> Option<&Folder> {
        self.folders.iter().find(|folder| &folder.id == id)
    }

    /// The cards filed under a folder.
    pub fn get_by_folder(&self, folder_id: &FolderId) -> Vec<Card> {
        self.cards
            .iter()
            .filter(|card| card.folder_id() == folder_id)
            .cloned()
            .collect()
    }

    /// Replace stored cards with the given cards, matching by id. Stored cards
    /// not in the list are left untouched. Cards with no stored counterpart
    /// are ignored: the merge only ever updates. Returns the number of cards
    /// replaced.
    pub fn upsert_many(&mut self, cards: Vec<Card>) -> usize {
        let mut updates: HashMap<CardId, Card> = cards
            .into_iter()
            .map(|mut card| {
                card.clear_session_state();
                (card.id().clone(), card)
            })
            .collect();
        let mut replaced = 0;
        for slot in self.cards.iter_mut() {
            if let Some(card) = updates.remove(slot.id()) {
                *slot = card;
                replaced += 1;
            }
        }
        for id in updates.keys() {
            log::warn!("Ignoring update for unknown card {id}");
        }
        log::debug!("Merged {replaced} cards into the store");
        replaced
    }

    /// Add a batch of newly created cards. The whole batch is rejected if any
    /// id is already taken or the folder does not exist.
    pub fn insert_many(&mut self, cards: Vec<Card>) -> Fallible<usize> {
        {
            let mut seen: HashSet<&CardId> = HashSet::new();
            for card in cards.iter() {
                if self.get(card.id()).is_some() || !seen.insert(card.id()) {
                    return fail(format!("duplicate card id: {}", card.id()));
                }
                if self.folder(card.folder_id()).is_none() {
                    return fail(format!("no such folder: {}", card.folder_id()));
                }
            }
        }
        let count = cards.len();
        self.cards.extend(cards);
        log::debug!("Inserted {count} cards");
        Ok(count)
    }

    pub fn create_folder(&mut self, name: &str, now: Timestamp) -> Fallible<&Folder> {
        if name.trim().is_empty() {
            return fail("folder name cannot be blank.");
        }
        let folder = Folder::new(name, now);
        if self.folder(&folder.id).is_some() {
            return fail(format!("folder already exists: {}", folder.id));
        }
        self.folders.push(folder);
        let idx = self.folders.len() - 1;
        Ok(&self.folders[idx])
    }
}
