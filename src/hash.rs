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

use crate::types::ids::CardId;
use crate::types::ids::FolderId;
use crate::types::timestamp::Timestamp;

/// The number of hex digits of the digest kept in a generated identifier.
const ID_DIGITS: usize = 16;

/// Wrapper around blake3, used to derive identifiers for newly created cards
/// and folders.
pub struct Hasher {
    inner: blake3::Hasher,
}

impl Hasher {
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        // Length-prefix each field so that ("ab", "c") and ("a", "bc") differ.
        self.inner.update(&(data.len() as u64).to_le_bytes());
        self.inner.update(data);
    }

    pub fn finalize_hex(self) -> String {
        let hex = self.inner.finalize().to_hex();
        hex[..ID_DIGITS].to_string()
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the id of the `index`-th card in a batch created at `created_at`.
pub fn card_id(
    folder_id: &FolderId,
    front: &str,
    back: &str,
    created_at: Timestamp,
    index: usize,
) -> CardId {
    let mut hasher = Hasher::new();
    hasher.update(b"Card");
    hasher.update(folder_id.as_str().as_bytes());
    hasher.update(front.as_bytes());
    hasher.update(back.as_bytes());
    hasher.update(&created_at.as_millis().to_le_bytes());
    hasher.update(&(index as u64).to_le_bytes());
    CardId::new(format!("card-{}", hasher.finalize_hex()))
}

pub fn folder_id(name: &str, created_at: Timestamp) -> FolderId {
    let mut hasher = Hasher::new();
    hasher.update(b"Folder");
    hasher.update(name.as_bytes());
    hasher.update(&created_at.as_millis().to_le_bytes());
    FolderId::new(format!("folder-{}", hasher.finalize_hex()))
}
