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

use std::collections::HashSet;

use crate::swipe::queue::Item;
use crate::types::photo::PhotoRecord;
use crate::types::timestamp::Timestamp;

/// A photo as presented for a decision.
#[derive(Clone, PartialEq, Debug)]
pub struct PhotoCard {
    pub id: String,
    pub locator: String,
    pub title: String,
    pub caption: String,
    pub captured_at: Timestamp,
}

impl Item for PhotoCard {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

/// Turn store records into cards, keeping their order. Malformed records
/// and repeated identifiers are left out.
pub fn cards_from_photos(photos: &[PhotoRecord]) -> Vec<PhotoCard> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut cards = Vec::with_capacity(photos.len());
    for photo in photos {
        let id = photo.identifier.trim();
        if id.is_empty() {
            log::warn!("Skipping photo without an identifier: {:?}", photo.locator);
            continue;
        }
        if photo.locator.trim().is_empty() {
            log::warn!("Skipping photo {id} without a locator.");
            continue;
        }
        let Some(captured_at) = Timestamp::from_millis(photo.captured_at) else {
            log::warn!("Skipping photo {id} with invalid capture time.");
            continue;
        };
        if !seen.insert(id) {
            log::warn!("Skipping duplicate photo {id}.");
            continue;
        }
        cards.push(PhotoCard {
            id: id.to_string(),
            locator: photo.locator.clone(),
            title: format!("Photo {}", cards.len() + 1),
            caption: format!("Taken on {}", captured_at.local_date()),
            captured_at,
        });
    }
    cards
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(identifier: &str, locator: &str, captured_at: i64) -> PhotoRecord {
        PhotoRecord {
            identifier: identifier.to_string(),
            locator: locator.to_string(),
            captured_at,
        }
    }

    #[test]
    fn test_projection() {
        let photos = vec![
            record("b", "photos/b.jpg", 1_700_000_100_000),
            record("a", "photos/a.jpg", 1_700_000_000_000),
        ];
        let cards = cards_from_photos(&photos);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id, "b");
        assert_eq!(cards[0].title, "Photo 1");
        assert_eq!(cards[0].locator, "photos/b.jpg");
        assert_eq!(cards[1].id, "a");
        assert_eq!(cards[1].title, "Photo 2");
        let expected = Timestamp::from_millis(1_700_000_000_000).unwrap();
        assert_eq!(cards[1].captured_at, expected);
        assert_eq!(
            cards[1].caption,
            format!("Taken on {}", expected.local_date())
        );
    }

    #[test]
    fn test_malformed_records_excluded() {
        let photos = vec![
            record("", "photos/a.jpg", 1),
            record("  ", "photos/a.jpg", 1),
            record("b", "", 1),
            record("c", "photos/c.jpg", i64::MAX),
            record("d", "photos/d.jpg", 1),
            record("d", "photos/d2.jpg", 2),
        ];
        let cards = cards_from_photos(&photos);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, "d");
        assert_eq!(cards[0].locator, "photos/d.jpg");
        assert_eq!(cards[0].title, "Photo 1");
    }

    #[test]
    fn test_empty() {
        assert!(cards_from_photos(&[]).is_empty());
    }
}
