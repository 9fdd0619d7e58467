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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::timestamp::Timestamp;

pub fn list_folders(directory: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    for folder in coll.store.folders() {
        let count = coll.store.get_by_folder(&folder.id).len();
        println!("{}\t{}\t{count} cards", folder.id, folder.name);
    }
    Ok(())
}

pub fn new_folder(directory: Option<String>, name: &str) -> Fallible<()> {
    let mut coll = Collection::new(directory)?;
    let id = coll.store.create_folder(name, Timestamp::now())?.id.clone();
    coll.save()?;
    println!("{id}");
    Ok(())
}
