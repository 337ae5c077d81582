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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::db::DecisionRecord;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::media::MediaLoader;
use crate::store::PhotoStore;
use crate::swipe::deck::SwipeDeck;
use crate::swipe::gesture::Viewport;
use crate::swipe::source::PhotoCard;
use crate::swipe::source::cards_from_photos;
use crate::types::timestamp::Timestamp;

/// Viewport width assumed until the browser reports its own.
const DEFAULT_VIEWPORT_WIDTH: f64 = 400.0;

#[derive(Clone)]
pub struct ServerState {
    pub max_visible: usize,
    pub store: Arc<PhotoStore>,
    pub media: Arc<MediaLoader>,
    pub mutable: Arc<Mutex<MutableState>>,
}

impl ServerState {
    pub fn lock(&self) -> Fallible<MutexGuard<'_, MutableState>> {
        self.mutable
            .lock()
            .map_err(|_| ErrorReport::new("session state lock poisoned"))
    }
}

pub struct MutableState {
    pub deck: SwipeDeck<PhotoCard>,
    /// The store version the deck was built from.
    pub store_version: u64,
    pub session_started_at: Timestamp,
    pub finished: bool,
}

impl MutableState {
    pub fn new(store: &PhotoStore) -> Fallible<Self> {
        let store_version = store.version();
        let cards = cards_from_photos(&store.list()?);
        let deck = SwipeDeck::new(cards, Viewport::new(DEFAULT_VIEWPORT_WIDTH)?);
        Ok(Self {
            deck,
            store_version,
            session_started_at: Timestamp::now(),
            finished: false,
        })
    }

    /// If the photo collection changed since the deck was built, rebuild it.
    /// Decisions taken so far are dropped.
    pub fn sync(&mut self, store: &PhotoStore) -> Fallible<()> {
        let version = store.version();
        if version == self.store_version {
            return Ok(());
        }
        log::info!("Photo collection changed, restarting the session.");
        let cards = cards_from_photos(&store.list()?);
        self.deck.reload(cards);
        self.store_version = version;
        Ok(())
    }

    /// The decisions taken so far, in the order they were taken.
    pub fn decisions(&self) -> Vec<DecisionRecord> {
        self.deck
            .queue()
            .outcomes()
            .enumerate()
            .map(|(position, outcome)| DecisionRecord {
                photo_id: outcome.item.id.clone(),
                position,
                direction: outcome.direction,
            })
            .collect()
    }

    /// Persist the session and mark it finished. A failure to persist is
    /// logged and otherwise ignored.
    pub fn finish(&mut self, store: &PhotoStore) {
        if self.finished {
            return;
        }
        let ended_at = Timestamp::now();
        let decisions = self.decisions();
        match store
            .database()
            .save_session(self.session_started_at, ended_at, &decisions)
        {
            Ok(()) => log::debug!("Saved session with {} decisions.", decisions.len()),
            Err(e) => log::error!("Failed to save session: {e}"),
        }
        self.finished = true;
    }

    /// Start over from the first photo, in a new session if the previous
    /// one was finished.
    pub fn restart(&mut self) {
        self.deck.reset();
        if self.finished {
            self.finished = false;
            self.session_started_at = Timestamp::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::helper::create_tmp_directory;
    use crate::types::direction::Direction;

    fn store() -> Fallible<PhotoStore> {
        let dir = create_tmp_directory()?;
        let db = Database::new(dir.join("snapswipe.db").to_str().unwrap())?;
        let store = PhotoStore::new(db);
        store.create_at("photos/a.jpg", Timestamp::from_millis(1_000).unwrap())?;
        store.create_at("photos/b.jpg", Timestamp::from_millis(2_000).unwrap())?;
        Ok(store)
    }

    #[test]
    fn test_sync_rebuilds_after_change() -> Fallible<()> {
        let store = store()?;
        let mut state = MutableState::new(&store)?;
        state.deck.like();
        state.sync(&store)?;
        assert_eq!(state.deck.queue().cursor(), 1);

        store.create_at("photos/c.jpg", Timestamp::from_millis(3_000).unwrap())?;
        state.sync(&store)?;
        assert_eq!(state.deck.queue().cursor(), 0);
        assert_eq!(state.deck.queue().len(), 3);
        assert_eq!(state.deck.queue().current().unwrap().locator, "photos/c.jpg");
        Ok(())
    }

    #[test]
    fn test_finish_saves_once() -> Fallible<()> {
        let store = store()?;
        let mut state = MutableState::new(&store)?;
        state.deck.like();
        state.deck.pass();
        let decisions = state.decisions();
        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].direction, Direction::Like);
        assert_eq!(decisions[1].position, 1);
        state.finish(&store);
        state.finish(&store);
        assert!(state.finished);
        assert_eq!(store.database().session_count()?, 1);

        state.restart();
        assert!(!state.finished);
        assert_eq!(state.deck.queue().cursor(), 0);
        Ok(())
    }
}
