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

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;

use crate::error::Fallible;
use crate::migrate::CardRecord;
use crate::migrate::migrate_cards;
use crate::store::CardStore;
use crate::types::folder::Folder;
use crate::types::timestamp::Timestamp;

const CARDS_KEY: &str = "cards";
const FOLDERS_KEY: &str = "folders";

/// Key-value persistence for the card and folder collections. Each collection
/// is stored whole, as JSON, under its own key.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    /// Load the store. A database that has never been written yields a fresh
    /// store with the default folder.
    pub fn load(&self, now: Timestamp) -> Fallible<CardStore> {
        let folders: Option<String> = self.get(FOLDERS_KEY)?;
        let cards: Option<String> = self.get(CARDS_KEY)?;
        if folders.is_none() && cards.is_none() {
            log::debug!("Empty database, starting a fresh collection.");
            return Ok(CardStore::fresh(now));
        }
        let folders: Vec<Folder> = match folders {
            Some(json) => serde_json::from_str(&json)?,
            None => vec![Folder::default_folder(now)],
        };
        let records: Vec<CardRecord> = match cards {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };
        let cards = migrate_cards(records)?;
        log::debug!("Loaded {} folders and {} cards.", folders.len(), cards.len());
        Ok(CardStore::new(folders, cards))
    }

    /// Write both collections in a single transaction.
    pub fn save(&mut self, store: &CardStore, now: Timestamp) -> Fallible<()> {
        let records: Vec<CardRecord> = store.cards().iter().map(CardRecord::from).collect();
        let cards = serde_json::to_string(&records)?;
        let folders = serde_json::to_string(store.folders())?;
        let tx = self.conn.transaction()?;
        put(&tx, FOLDERS_KEY, &folders, now)?;
        put(&tx, CARDS_KEY, &cards, now)?;
        tx.commit()?;
        log::debug!("Saved {} cards.", records.len());
        Ok(())
    }

    fn get(&self, key: &str) -> Fallible<Option<String>> {
        let sql = "select value from entries where key = ?;";
        let value: Option<String> = self
            .conn
            .query_row(sql, [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    #[cfg(test)]
    fn put_raw(&mut self, key: &str, value: &str) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        put(&tx, key, value, Timestamp::now())?;
        tx.commit()?;
        Ok(())
    }
}

fn put(tx: &Transaction, key: &str, value: &str, now: Timestamp) -> Fallible<()> {
    let sql = "insert into entries (key, value, updated_at) values (?, ?, ?) on conflict (key) do update set value = excluded.value, updated_at = excluded.updated_at;";
    tx.execute(sql, (key, value, now))?;
    Ok(())
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["entries"], |row| row.get(0))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::error::ErrorReport;
    use crate::types::card::fixtures::card;
    use crate::types::ids::CardId;

    fn open(dir: &std::path::Path) -> Fallible<Database> {
        let path = dir.join("swipestudy.db");
        let path = path.to_str().ok_or_else(|| ErrorReport::new("invalid path"))?;
        Database::new(path)
    }

    #[test]
    fn test_empty_database_is_fresh() -> Fallible<()> {
        let dir = tempdir()?;
        let db = open(dir.path())?;
        let store = db.load(Timestamp::from_millis(0)?)?;
        assert_eq!(store.folders().len(), 1);
        assert!(store.cards().is_empty());
        Ok(())
    }

    #[test]
    fn test_save_and_reload() -> Fallible<()> {
        let dir = tempdir()?;
        let now = Timestamp::from_millis(0)?;
        let mut store = CardStore::fresh(now);
        store.insert_many(vec![card("a", "f1", 0), card("b", "f1", 100)])?;
        {
            let mut db = open(dir.path())?;
            db.save(&store, now)?;
        }
        let db = open(dir.path())?;
        let loaded = db.load(now)?;
        assert_eq!(loaded, store);
        Ok(())
    }

    #[test]
    fn test_save_overwrites() -> Fallible<()> {
        let dir = tempdir()?;
        let now = Timestamp::from_millis(0)?;
        let mut db = open(dir.path())?;
        let mut store = CardStore::fresh(now);
        db.save(&store, now)?;
        store.insert_many(vec![card("a", "f1", 0)])?;
        db.save(&store, now)?;
        assert_eq!(db.load(now)?.cards().len(), 1);
        Ok(())
    }

    #[test]
    fn test_loads_legacy_records() -> Fallible<()> {
        let dir = tempdir()?;
        let mut db = open(dir.path())?;
        db.put_raw(
            "cards",
            r#"[{"id":"card-1","folderId":"f1","front":"Q","back":"A","status":"known","nextReview":0,"interval":2}]"#,
        )?;
        let store = db.load(Timestamp::from_millis(0)?)?;
        assert_eq!(store.folders().len(), 1);
        let card = store.get(&CardId::new("card-1"));
        assert_eq!(card.map(|c| c.mastery_score()), Some(3));
        Ok(())
    }

    #[test]
    fn test_corrupt_value_is_an_error() -> Fallible<()> {
        let dir = tempdir()?;
        let mut db = open(dir.path())?;
        db.put_raw("cards", "not json")?;
        assert!(db.load(Timestamp::from_millis(0)?).is_err());
        Ok(())
    }
}
