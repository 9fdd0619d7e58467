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
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::collab::generator::Generator;
use crate::collab::generator::TextGenerator;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::CardStore;
use crate::types::ids::FolderId;
use crate::types::timestamp::Timestamp;

pub async fn import_notes(
    directory: Option<String>,
    path: &Path,
    folder: Option<String>,
) -> Fallible<()> {
    let mut coll = Collection::new(directory)?;
    let folder_id = coll.folder_id(folder)?;
    let now = Timestamp::now();
    let count = import_into(&mut coll.store, &TextGenerator, &folder_id, path, now).await?;
    coll.save()?;
    println!("Imported {count} cards into {folder_id}.");
    Ok(())
}

/// Generate cards from a notes file, or from every notes file under a
/// directory, and add them to the store. The files are read as one batch of
/// notes, so card ids are unique across the whole import.
pub async fn import_into(
    store: &mut CardStore,
    generator: &dyn Generator,
    folder_id: &FolderId,
    path: &Path,
    now: Timestamp,
) -> Fallible<usize> {
    let files = note_files(path)?;
    if files.is_empty() {
        return fail("no notes files found.");
    }
    let mut notes: Vec<String> = Vec::new();
    for file in files.iter() {
        log::debug!("Reading {}", file.display());
        notes.push(std::fs::read_to_string(file)?);
    }
    // Blocks are separated by blank lines, so this keeps file boundaries.
    let text = notes.join("\n\n");
    let cards = generator.generate_from_text(folder_id, &text, now).await?;
    log::debug!("{} cards from {} files", cards.len(), files.len());
    store.insert_many(cards)
}

fn note_files(path: &Path) -> Fallible<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.exists() {
        return fail("path does not exist.");
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == "md" || ext == "txt")
        {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}
