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

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Image extensions accepted into a collection.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Resolves photo locators, which are collection-relative paths, to files.
///
/// Locators end up in URLs, so we have to ensure there's no possibility of
/// directory traversals.
pub struct MediaLoader {
    /// Absolute path to the collection root directory.
    root: PathBuf,
}

/// Errors that can occur when loading a locator.
#[derive(Debug, PartialEq)]
pub enum MediaLoaderError {
    /// Locator is absolute.
    Absolute,
    /// Locator contains parent (`..`) components.
    ParentComponent,
    /// Nothing exists at the locator.
    NotFound,
    /// Locator does not point to a file.
    NotFile,
    /// Locator points to a symbolic link.
    SymbolicLink,
}

impl MediaLoader {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Check that a file exists at the locator, within the collection root.
    pub fn validate(&self, locator: &str) -> Result<PathBuf, MediaLoaderError> {
        let path: PathBuf = PathBuf::from(locator);
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(MediaLoaderError::ParentComponent);
        }
        if path.is_absolute() {
            return Err(MediaLoaderError::Absolute);
        }
        let path: PathBuf = self.root.join(path);
        if path.is_symlink() {
            return Err(MediaLoaderError::SymbolicLink);
        }
        if !path.exists() {
            return Err(MediaLoaderError::NotFound);
        }
        if !path.is_file() {
            return Err(MediaLoaderError::NotFile);
        }
        Ok(path)
    }
}

/// Whether the path has one of the accepted image extensions.
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// The content type to serve an image with.
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use std::fs::create_dir;
    use std::fs::write;
    use std::os::unix::fs::symlink;

    use super::*;
    use crate::error::Fallible;
    use crate::helper::create_tmp_directory;

    #[test]
    fn test_valid_locator() -> Fallible<()> {
        let root = create_tmp_directory()?;
        create_dir(root.join("photos"))?;
        write(root.join("photos/a.jpg"), b"a")?;
        let loader = MediaLoader::new(root.clone());
        assert_eq!(loader.validate("photos/a.jpg"), Ok(root.join("photos/a.jpg")));
        Ok(())
    }

    /// Absolute paths are rejected.
    #[test]
    fn test_abs_rejected() -> Fallible<()> {
        let root = create_tmp_directory()?;
        let loader = MediaLoader::new(root);
        assert_eq!(
            loader.validate("/etc/passwd"),
            Err(MediaLoaderError::Absolute)
        );
        Ok(())
    }

    /// Paths with parent components are rejected.
    #[test]
    fn test_parent() -> Fallible<()> {
        let root = create_tmp_directory()?;
        let loader = MediaLoader::new(root);
        assert_eq!(
            loader.validate("../../../../../../../../../../etc/passwd"),
            Err(MediaLoaderError::ParentComponent)
        );
        Ok(())
    }

    #[test]
    fn test_missing_and_directory() -> Fallible<()> {
        let root = create_tmp_directory()?;
        create_dir(root.join("photos"))?;
        let loader = MediaLoader::new(root);
        assert_eq!(
            loader.validate("photos/none.jpg"),
            Err(MediaLoaderError::NotFound)
        );
        assert_eq!(loader.validate("photos"), Err(MediaLoaderError::NotFile));
        Ok(())
    }

    #[test]
    fn test_symlink_rejected() -> Fallible<()> {
        let root = create_tmp_directory()?;
        write(root.join("a.jpg"), b"a")?;
        symlink(root.join("a.jpg"), root.join("b.jpg"))?;
        let loader = MediaLoader::new(root);
        assert_eq!(
            loader.validate("b.jpg"),
            Err(MediaLoaderError::SymbolicLink)
        );
        Ok(())
    }

    #[test]
    fn test_is_image() {
        assert!(is_image(Path::new("a.JPG")));
        assert!(is_image(Path::new("dir/b.webp")));
        assert!(!is_image(Path::new("notes.md")));
        assert!(!is_image(Path::new("noext")));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(content_type(Path::new("a.PNG")), "image/png");
        assert_eq!(content_type(Path::new("a.bin")), "application/octet-stream");
    }
}
