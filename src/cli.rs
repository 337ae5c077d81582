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

use clap::Parser;

use crate::cmd::add::add_photo;
use crate::cmd::add::import_photos;
use crate::cmd::photos::ListFormat;
use crate::cmd::photos::clear_photos;
use crate::cmd::photos::delete_photo;
use crate::cmd::photos::list_photos;
use crate::cmd::stats::print_stats;
use crate::cmd::swipe::server::start_server;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Swipe through the photos of a collection.
    Swipe {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// The port to use for the web server. Overrides the configuration file.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Capture an image file into a collection.
    Add {
        /// Path to the image file.
        file: String,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Capture every image under a directory into a collection.
    Import {
        /// Directory to import images from.
        source: String,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// List the photos of a collection, newest first.
    List {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Output format.
        #[arg(long, default_value_t = ListFormat::Text)]
        format: ListFormat,
    },
    /// Remove a photo from a collection.
    Delete {
        /// Identifier of the photo.
        id: String,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Remove every photo from a collection.
    Clear {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Print collection statistics as JSON.
    Stats {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Swipe { directory, port } => start_server(directory, port).await,
        Command::Add { file, directory } => add_photo(directory, file),
        Command::Import { source, directory } => import_photos(directory, source),
        Command::List { directory, format } => list_photos(directory, format),
        Command::Delete { id, directory } => delete_photo(directory, id),
        Command::Clear { directory } => clear_photos(directory),
        Command::Stats { directory } => print_stats(directory),
    }
}
