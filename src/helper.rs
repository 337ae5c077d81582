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

use std::fs::write;
use std::path::PathBuf;

use tempfile::tempdir;

use crate::error::Fallible;

/// Create a scratch directory that outlives the call.
pub fn create_tmp_directory() -> Fallible<PathBuf> {
    let dir: PathBuf = tempdir()?.keep().canonicalize()?;
    Ok(dir)
}

/// Create a scratch directory holding the given image files, each with a
/// few bytes of content.
pub fn create_tmp_images(names: &[&str]) -> Fallible<PathBuf> {
    let dir = create_tmp_directory()?;
    for name in names {
        write(dir.join(name), name.as_bytes())?;
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tmp_directory() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        assert!(dir.is_dir());
        Ok(())
    }

    #[test]
    fn test_create_tmp_images() -> Fallible<()> {
        let dir = create_tmp_images(&["a.jpg", "b.png"])?;
        assert!(dir.join("a.jpg").is_file());
        assert!(dir.join("b.png").is_file());
        Ok(())
    }
}
