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

use std::fs::copy;
use std::fs::create_dir_all;
use std::path::Path;
use std::path::PathBuf;

use crate::error::Fallible;
use crate::error::fail;
use crate::media::is_image;
use crate::types::timestamp::Timestamp;

/// Name of the directory, inside a collection, where captured photos live.
pub const PHOTOS_DIRECTORY: &str = "photos";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Permission {
    Undetermined,
    Granted,
    Denied,
}

/// A source of photos. Only the locator of a captured photo matters to
/// the rest of the application.
pub trait CameraProvider {
    fn permission(&self) -> Permission;

    fn request_permission(&mut self) -> Fallible<Permission>;

    /// Capture a photo, returning its collection-relative locator.
    fn capture(&mut self) -> Fallible<String>;
}

/// A camera that "captures" an existing image file by copying it into the
/// collection.
pub struct FileCamera {
    /// The collection root.
    root: PathBuf,
    /// The image to capture.
    source: PathBuf,
}

impl FileCamera {
    pub fn new(root: PathBuf, source: PathBuf) -> Self {
        Self { root, source }
    }

    fn photos_directory(&self) -> PathBuf {
        self.root.join(PHOTOS_DIRECTORY)
    }
}

impl CameraProvider for FileCamera {
    fn permission(&self) -> Permission {
        let dir = self.photos_directory();
        if !dir.exists() {
            Permission::Undetermined
        } else if dir.is_dir() {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    fn request_permission(&mut self) -> Fallible<Permission> {
        if self.permission() == Permission::Undetermined {
            create_dir_all(self.photos_directory())?;
        }
        Ok(self.permission())
    }

    fn capture(&mut self) -> Fallible<String> {
        if self.permission() != Permission::Granted {
            return fail("camera permission not granted.");
        }
        if !self.source.is_file() {
            return fail(format!("no image at {}.", self.source.display()));
        }
        if !is_image(&self.source) {
            return fail(format!("{} is not an image.", self.source.display()));
        }
        let Some(file_name) = self.source.file_name().and_then(|n| n.to_str()) else {
            return fail("invalid image file name.");
        };
        let millis = Timestamp::now().as_millis();
        let mut target_name = format!("{millis}_{file_name}");
        let mut n = 1;
        while self.photos_directory().join(&target_name).exists() {
            target_name = format!("{millis}_{n}_{file_name}");
            n += 1;
        }
        copy(&self.source, self.photos_directory().join(&target_name))?;
        let locator = Path::new(PHOTOS_DIRECTORY).join(target_name);
        log::debug!("Captured {} as {}", self.source.display(), locator.display());
        Ok(locator.display().to_string())
    }
}
