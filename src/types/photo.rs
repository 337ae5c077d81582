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

use serde::Serialize;

/// A photo as kept by the photo store. This is the record shape exchanged
/// with the store; nothing here is validated.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    /// Unique identifier assigned by the store.
    pub identifier: String,
    /// Collection-relative path to the image file.
    pub locator: String,
    /// Capture time in milliseconds since the Unix epoch.
    pub captured_at: i64,
}
