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

use serde::Deserialize;
use serde::Serialize;

use crate::hash::folder_id;
use crate::types::ids::FolderId;
use crate::types::timestamp::Timestamp;

/// The folder every fresh collection starts with.
pub const DEFAULT_FOLDER_ID: &str = "f1";
pub const DEFAULT_FOLDER_NAME: &str = "General Notes";

/// A named group of cards. Only used as a filter key by the study sessions.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    pub created_at: Timestamp,
}

fn default_color() -> String {
    "indigo".to_string()
}

impl Folder {
    pub fn new(name: impl Into<String>, created_at: Timestamp) -> Self {
        let name = name.into().trim().to_string();
        Self {
            id: folder_id(&name, created_at),
            name,
            color: default_color(),
            created_at,
        }
    }

    pub fn default_folder(created_at: Timestamp) -> Self {
        Self {
            id: FolderId::new(DEFAULT_FOLDER_ID),
            name: DEFAULT_FOLDER_NAME.to_string(),
            color: default_color(),
            created_at,
        }
    }
}
