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

use crate::config::Config;
use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::PhotoStore;

/// Name of the database file in a collection directory.
pub const DATABASE_FILE: &str = "snapswipe.db";

/// A photo collection: a directory holding the database, the photos and an
/// optional configuration file.
pub struct Collection {
    pub directory: PathBuf,
    pub store: PhotoStore,
    pub config: Config,
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

        let db_path: PathBuf = directory.join(DATABASE_FILE);
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        let db: Database = Database::new(db_path)?;
        let config = Config::load(&directory)?;

        Ok(Self {
            directory,
            store: PhotoStore::new(db),
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::create_tmp_directory;

    #[test]
    fn test_non_existent_directory() {
        let result = Collection::new(Some("./derpherp".to_string()));
        assert_eq!(
            result.err().map(|e| e.to_string()),
            Some("error: directory does not exist.".to_string())
        );
    }

    #[test]
    fn test_new_collection() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let coll = Collection::new(Some(dir.display().to_string()))?;
        assert!(dir.join(DATABASE_FILE).exists());
        assert_eq!(coll.store.count()?, 0);
        assert_eq!(coll.config, Config::default());
        Ok(())
    }
}
