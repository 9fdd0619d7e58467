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

//! Conversion between stored card records and in-memory cards.
//!
//! Two status vocabularies exist in stored data. Older records use
//! `new | known | review` and carry no mastery score; current records use
//! `new | learning | mastered` alongside `masteryScore`. The mastery score is
//! the only source of truth: when it is present the stored status is ignored
//! (except to tell a never-studied card apart), and when it is absent it is
//! derived from the legacy status. Records are always written back in the
//! current vocabulary.

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::card::MASTERED_SCORE;
use crate::types::ids::CardId;
use crate::types::ids::FolderId;
use crate::types::timestamp::Timestamp;

/// A card as stored on disk.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub id: CardId,
    pub folder_id: FolderId,
    pub front: String,
    pub back: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastery_score: Option<i64>,
    #[serde(default)]
    pub interval: u32,
    pub next_review: Timestamp,
}

impl From<&Card> for CardRecord {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id().clone(),
            folder_id: card.folder_id().clone(),
            front: card.front().to_string(),
            back: card.back().to_string(),
            status: card.status().as_str().to_string(),
            mastery_score: Some(i64::from(card.mastery_score())),
            interval: card.interval(),
            next_review: card.next_review(),
        }
    }
}

/// The mastery score implied by a status string, for records that predate
/// the mastery score.
fn legacy_score(status: &str) -> Fallible<u8> {
    match status {
        "new" => Ok(0),
        "review" | "learning" => Ok(1),
        "known" | "mastered" => Ok(MASTERED_SCORE),
        _ => fail(format!("invalid card status: {status}")),
    }
}

/// Turn a stored record into a card, migrating legacy fields.
pub fn migrate_card(record: CardRecord) -> Fallible<Card> {
    let score: u8 = match record.mastery_score {
        Some(score) => {
            // Still reject garbage statuses even though the score wins.
            legacy_score(&record.status)?;
            score.clamp(0, i64::from(MASTERED_SCORE)) as u8
        }
        None => {
            let score = legacy_score(&record.status)?;
            log::debug!(
                "Migrating card {} from legacy status '{}' to score {score}",
                record.id,
                record.status
            );
            score
        }
    };
    Ok(Card::restore(
        record.id,
        record.folder_id,
        record.front,
        record.back,
        score,
        record.status == "new",
        record.interval,
        record.next_review,
    ))
}

pub fn migrate_cards(records: Vec<CardRecord>) -> Fallible<Vec<Card>> {
    records.into_iter().map(migrate_card).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::card::CardStatus;
    use crate::types::card::fixtures::card;

    fn record(status: &str, score: Option<i64>) -> Fallible<CardRecord> {
        Ok(CardRecord {
            id: CardId::new("c1"),
            folder_id: FolderId::new("f1"),
            front: "Q".to_string(),
            back: "A".to_string(),
            status: status.to_string(),
            mastery_score: score,
            interval: 2,
            next_review: Timestamp::from_millis(10)?,
        })
    }

    #[test]
    fn test_legacy_vocabulary() -> Fallible<()> {
        let known = migrate_card(record("known", None)?)?;
        assert_eq!(known.status(), CardStatus::Mastered);
        assert_eq!(known.mastery_score(), 3);

        let review = migrate_card(record("review", None)?)?;
        assert_eq!(review.status(), CardStatus::Learning);
        assert_eq!(review.mastery_score(), 1);

        let new = migrate_card(record("new", None)?)?;
        assert_eq!(new.status(), CardStatus::New);
        assert_eq!(new.interval(), 2);
        Ok(())
    }

    #[test]
    fn test_score_wins_over_status() -> Fallible<()> {
        let card = migrate_card(record("known", Some(1))?)?;
        assert_eq!(card.status(), CardStatus::Learning);
        let card = migrate_card(record("learning", Some(7))?)?;
        assert_eq!(card.mastery_score(), 3);
        assert_eq!(card.status(), CardStatus::Mastered);
        let card = migrate_card(record("mastered", Some(-2))?)?;
        assert_eq!(card.mastery_score(), 0);
        assert_eq!(card.status(), CardStatus::Learning);
        Ok(())
    }

    #[test]
    fn test_invalid_status() -> Fallible<()> {
        assert!(migrate_card(record("forgotten", None)?).is_err());
        assert!(migrate_card(record("forgotten", Some(1))?).is_err());
        Ok(())
    }

    #[test]
    fn test_current_records_round_trip() -> Fallible<()> {
        let mut original = card("c1", "f1", 0);
        original.set_mastery_score(2);
        let record = CardRecord::from(&original);
        assert_eq!(record.status, "learning");
        assert_eq!(migrate_card(record)?, original);
        Ok(())
    }

    #[test]
    fn test_legacy_json_shape() -> Fallible<()> {
        let json = r#"{"id":"card-1-0","folderId":"f1","front":"Q","back":"A","status":"known","nextReview":1700000000000,"interval":4}"#;
        let record: CardRecord = serde_json::from_str(json)?;
        let card = migrate_card(record)?;
        assert!(card.is_mastered());
        assert_eq!(card.interval(), 4);
        let written = serde_json::to_value(CardRecord::from(&card))?;
        assert_eq!(written["status"], "mastered");
        assert_eq!(written["masteryScore"], 3);
        Ok(())
    }
}
