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

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use crate::cmd::check::check_notes;
use crate::cmd::export::export_collection;
use crate::cmd::folders::list_folders;
use crate::cmd::folders::new_folder;
use crate::cmd::import::import_notes;
use crate::cmd::learn::learn;
use crate::cmd::stats::print_stats;
use crate::cmd::study::study;
use crate::error::Fallible;
use crate::session::StudyMode;
use crate::types::question::QuestionType;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the collection directory. Defaults to the current directory.
    #[arg(long, global = true)]
    directory: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List folders.
    Folders,
    /// Create a folder.
    NewFolder {
        /// The folder's name.
        name: String,
    },
    /// Generate cards from a notes file, or a directory of notes files.
    Import {
        path: PathBuf,
        /// The folder to file the cards under. Defaults to the default folder.
        #[arg(long)]
        folder: Option<String>,
    },
    /// Check that a notes file parses, without importing it.
    Check { path: PathBuf },
    /// Swipe through flashcards.
    Study {
        #[arg(long)]
        folder: Option<String>,
        /// How to pick cards. Overrides the configuration file.
        #[arg(long)]
        mode: Option<StudyMode>,
    },
    /// Answer questions in rounds until every item is mastered.
    Learn {
        #[arg(long)]
        folder: Option<String>,
        /// Comma-separated question types. Overrides the configuration file.
        #[arg(long, value_delimiter = ',')]
        types: Vec<QuestionType>,
        /// Number of items. Defaults to the number of cards, at most 10.
        #[arg(long)]
        count: Option<usize>,
    },
    /// Print collection statistics as JSON.
    Stats,
    /// Export folders and cards as JSON.
    Export,
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    let directory = cli.directory;
    match cli.command {
        Command::Folders => list_folders(directory),
        Command::NewFolder { name } => new_folder(directory, &name),
        Command::Import { path, folder } => import_notes(directory, &path, folder).await,
        Command::Check { path } => check_notes(&path).map(|_| ()),
        Command::Study { folder, mode } => study(directory, folder, mode),
        Command::Learn {
            folder,
            types,
            count,
        } => learn(directory, folder, types, count).await,
        Command::Stats => print_stats(directory),
        Command::Export => export_collection(directory),
    }
}
