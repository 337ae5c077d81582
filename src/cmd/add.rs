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

use walkdir::WalkDir;

use crate::camera::CameraProvider;
use crate::camera::FileCamera;
use crate::camera::Permission;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::media::is_image;
use crate::types::photo::PhotoRecord;

/// Capture a single image into the collection.
pub fn add_photo(directory: Option<String>, file: String) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let photo = capture_into(&coll, PathBuf::from(file))?;
    println!("Added {}.", photo.identifier);
    Ok(())
}

/// Capture every image under `source` into the collection.
pub fn import_photos(directory: Option<String>, source: String) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let source = PathBuf::from(source);
    if !source.is_dir() {
        return fail("source directory does not exist.");
    }
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(&source).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && is_image(path) {
            files.push(path.to_path_buf());
        }
    }
    let mut count = 0;
    for file in files {
        match capture_into(&coll, file.clone()) {
            Ok(_) => count += 1,
            Err(e) => log::error!("Failed to import {}: {e}", file.display()),
        }
    }
    println!("Imported {count} photos.");
    Ok(())
}

/// Capture `file` and record it in the store. The store is only touched if
/// the capture succeeded.
fn capture_into(coll: &Collection, file: PathBuf) -> Fallible<PhotoRecord> {
    let mut camera = FileCamera::new(coll.directory.clone(), file);
    if camera.request_permission()? != Permission::Granted {
        return fail("camera permission denied.");
    }
    let locator = camera.capture()?;
    coll.store.create(&locator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::create_tmp_directory;
    use crate::helper::create_tmp_images;

    #[test]
    fn test_add_photo() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let images = create_tmp_images(&["a.jpg"])?;
        let dir_str = dir.display().to_string();
        add_photo(Some(dir_str.clone()), images.join("a.jpg").display().to_string())?;
        let coll = Collection::new(Some(dir_str))?;
        let photos = coll.store.list()?;
        assert_eq!(photos.len(), 1);
        assert!(dir.join(&photos[0].locator).is_file());
        Ok(())
    }

    #[test]
    fn test_add_missing_file_leaves_store_untouched() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let dir_str = dir.display().to_string();
        assert!(add_photo(Some(dir_str.clone()), "./nope.jpg".to_string()).is_err());
        let coll = Collection::new(Some(dir_str))?;
        assert_eq!(coll.store.count()?, 0);
        Ok(())
    }

    #[test]
    fn test_import_photos() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let images = create_tmp_images(&["a.jpg", "b.PNG", "notes.txt"])?;
        let dir_str = dir.display().to_string();
        import_photos(Some(dir_str.clone()), images.display().to_string())?;
        let coll = Collection::new(Some(dir_str))?;
        assert_eq!(coll.store.count()?, 2);
        Ok(())
    }

    #[test]
    fn test_import_missing_source() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let result = import_photos(Some(dir.display().to_string()), "./derpherp".to_string());
        assert!(result.is_err());
        Ok(())
    }
}
