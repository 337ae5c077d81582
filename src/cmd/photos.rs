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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::swipe::source::cards_from_photos;

#[derive(ValueEnum, Clone)]
pub enum ListFormat {
    /// One photo per line.
    Text,
    /// JSON output.
    Json,
}

impl Display for ListFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ListFormat::Text => write!(f, "text"),
            ListFormat::Json => write!(f, "json"),
        }
    }
}

pub fn list_photos(directory: Option<String>, format: ListFormat) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let photos = coll.store.list()?;
    match format {
        ListFormat::Text => {
            for card in cards_from_photos(&photos) {
                println!("{}\t{}\t{}", card.id, card.locator, card.caption);
            }
        }
        ListFormat::Json => {
            let json = serde_json::to_string_pretty(&photos)?;
            println!("{json}");
        }
    }
    Ok(())
}

pub fn delete_photo(directory: Option<String>, identifier: String) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    if !coll.store.delete(&identifier)? {
        return fail(format!("no photo with identifier {identifier}."));
    }
    println!("Deleted {identifier}.");
    Ok(())
}

pub fn clear_photos(directory: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let count = coll.store.clear()?;
    println!("Removed {count} photos.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::create_tmp_directory;

    #[test]
    fn test_list_empty() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        list_photos(Some(dir.display().to_string()), ListFormat::Text)?;
        list_photos(Some(dir.display().to_string()), ListFormat::Json)?;
        Ok(())
    }

    #[test]
    fn test_delete() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let dir_str = dir.display().to_string();
        let photo = Collection::new(Some(dir_str.clone()))?
            .store
            .create("photos/a.jpg")?;
        delete_photo(Some(dir_str.clone()), photo.identifier.clone())?;
        assert!(delete_photo(Some(dir_str), photo.identifier).is_err());
        Ok(())
    }

    #[test]
    fn test_clear() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let dir_str = dir.display().to_string();
        let coll = Collection::new(Some(dir_str.clone()))?;
        coll.store.create("photos/a.jpg")?;
        coll.store.create("photos/b.jpg")?;
        clear_photos(Some(dir_str))?;
        assert_eq!(coll.store.count()?, 0);
        Ok(())
    }
}
