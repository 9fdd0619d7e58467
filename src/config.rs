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
use std::time::Duration;

use serde::Deserialize;

use crate::error::Fallible;
use crate::session::StudyMode;
use crate::session::learn::LearnConfig;
use crate::types::card::MASTERED_SCORE;
use crate::types::question::QuestionType;

pub const CONFIG_FILE_NAME: &str = "swipestudy.toml";

#[derive(Deserialize, Default, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub study: StudySection,
    #[serde(default)]
    pub learn: LearnSection,
    #[serde(default)]
    pub grader: GraderSection,
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StudySection {
    #[serde(default = "default_mode")]
    pub mode: StudyMode,
}

impl Default for StudySection {
    fn default() -> Self {
        Self {
            mode: default_mode(),
        }
    }
}

fn default_mode() -> StudyMode {
    StudyMode::Focused
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LearnSection {
    pub item_count: Option<usize>,
    #[serde(default = "default_threshold")]
    pub mastery_threshold: u8,
    #[serde(default = "default_question_types")]
    pub question_types: Vec<QuestionType>,
}

impl Default for LearnSection {
    fn default() -> Self {
        Self {
            item_count: None,
            mastery_threshold: default_threshold(),
            question_types: default_question_types(),
        }
    }
}

fn default_threshold() -> u8 {
    MASTERED_SCORE
}

fn default_question_types() -> Vec<QuestionType> {
    vec![QuestionType::Written]
}

#[derive(Deserialize, Default, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GraderSection {
    /// No limit when absent.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Read the configuration file in `directory`, if there is one.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No configuration file, using defaults.");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn learn_config(&self) -> LearnConfig {
        LearnConfig {
            question_types: self.learn.question_types.clone(),
            item_count: self.learn.item_count,
            mastery_threshold: self.learn.mastery_threshold,
        }
    }

    pub fn grader_timeout(&self) -> Option<Duration> {
        self.grader.timeout_secs.map(Duration::from_secs)
    }
}
