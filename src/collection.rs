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

use std::env::current_dir;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::CardStore;
use crate::types::folder::DEFAULT_FOLDER_ID;
use crate::types::ids::FolderId;
use crate::types::timestamp::Timestamp;

pub const DATABASE_FILE_NAME: &str = "swipestudy.db";

/// A study directory: its configuration, its database, and the cards and
/// folders loaded from it.
pub struct Collection {
    pub directory: PathBuf,
    pub config: Config,
    pub db: Database,
    pub store: CardStore,
}

impl Collection {
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let config = Config::load(&directory)?;

        let db_path: PathBuf = directory.join(DATABASE_FILE_NAME);
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        let db: Database = Database::new(db_path)?;

        let store = {
            log::debug!("Loading collection...");
            let start = Instant::now();
            let store = db.load(Timestamp::now())?;
            let duration = start.elapsed().as_millis();
            log::debug!(
                "Loaded {} cards in {} folders in {duration}ms.",
                store.cards().len(),
                store.folders().len()
            );
            store
        };

        Ok(Self {
            directory,
            config,
            db,
            store,
        })
    }

    /// Write the store back to the database.
    pub fn save(&mut self) -> Fallible<()> {
        self.db.save(&self.store, Timestamp::now())
    }

    /// Resolve an optional folder argument, checking that the folder exists.
    pub fn folder_id(&self, folder: Option<String>) -> Fallible<FolderId> {
        let id = FolderId::new(folder.unwrap_or_else(|| DEFAULT_FOLDER_ID.to_string()));
        if self.store.folder(&id).is_none() {
            return fail(format!("no folder with id {id}."));
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::types::card::fixtures::card;

    #[test]
    fn test_non_existent_directory() {
        assert!(Collection::new(Some("./derpherp".to_string())).is_err());
    }

    #[test]
    fn test_fresh_directory() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().display().to_string();
        let coll = Collection::new(Some(path))?;
        assert_eq!(coll.store.folders().len(), 1);
        assert!(coll.store.cards().is_empty());
        assert_eq!(coll.folder_id(None)?.as_str(), DEFAULT_FOLDER_ID);
        assert!(coll.folder_id(Some("nope".to_string())).is_err());
        Ok(())
    }

    #[test]
    fn test_save_and_reopen() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().display().to_string();
        {
            let mut coll = Collection::new(Some(path.clone()))?;
            coll.store.insert_many(vec![card("c1", "f1", 0)])?;
            coll.save()?;
        }
        let coll = Collection::new(Some(path))?;
        assert_eq!(coll.store.cards().len(), 1);
        assert_eq!(coll.store.cards()[0].id().as_str(), "c1");
        Ok(())
    }
}
