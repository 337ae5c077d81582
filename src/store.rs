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

//! The photo store: the photo table plus change notification.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::Weak;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::photo::PhotoRecord;
use crate::types::timestamp::Timestamp;

/// Number of hex characters of the locator hash used in photo identifiers.
const ID_SUFFIX_LEN: usize = 9;

/// A change to the store.
#[derive(Clone, PartialEq, Debug)]
pub enum StoreEvent {
    Created(PhotoRecord),
    Deleted(String),
    /// Every photo was removed.
    Cleared,
}

type Listener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Keeps a listener registered. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut registry) = registry.lock() {
                registry.listeners.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

pub struct PhotoStore {
    db: Database,
    registry: Arc<Mutex<Registry>>,
    /// Incremented on every change.
    version: AtomicU64,
}

impl PhotoStore {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            registry: Arc::new(Mutex::new(Registry::default())),
            version: AtomicU64::new(0),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// All photos, newest first.
    pub fn list(&self) -> Fallible<Vec<PhotoRecord>> {
        self.db.photos()
    }

    pub fn get(&self, identifier: &str) -> Fallible<Option<PhotoRecord>> {
        self.db.get_photo(identifier)
    }

    pub fn count(&self) -> Fallible<usize> {
        self.db.photo_count()
    }

    /// Add a photo captured now.
    pub fn create(&self, locator: &str) -> Fallible<PhotoRecord> {
        self.create_at(locator, Timestamp::now())
    }

    pub fn create_at(&self, locator: &str, captured_at: Timestamp) -> Fallible<PhotoRecord> {
        let millis = captured_at.as_millis();
        let photo = PhotoRecord {
            identifier: photo_id(locator, millis),
            locator: locator.to_string(),
            captured_at: millis,
        };
        self.db.insert_photo(&photo)?;
        log::info!("Photo saved: {}", photo.identifier);
        self.notify(StoreEvent::Created(photo.clone()));
        Ok(photo)
    }

    /// Remove a photo. Returns whether it existed; nothing is notified if
    /// it did not.
    pub fn delete(&self, identifier: &str) -> Fallible<bool> {
        let deleted = self.db.delete_photo(identifier)?;
        if deleted {
            log::info!("Photo deleted: {identifier}");
            self.notify(StoreEvent::Deleted(identifier.to_string()));
        }
        Ok(deleted)
    }

    /// Remove every photo. Returns how many were removed.
    pub fn clear(&self) -> Fallible<usize> {
        let count = self.db.clear_photos()?;
        log::info!("Removed {count} photos");
        self.notify(StoreEvent::Cleared);
        Ok(count)
    }

    /// Register a listener, called after every change.
    pub fn subscribe<F>(&self, listener: F) -> Fallible<Subscription>
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        let mut registry = self
            .registry
            .lock()
            .map_err(|_| ErrorReport::new("listener registry lock poisoned"))?;
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(listener)));
        Ok(Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        })
    }

    fn notify(&self, event: StoreEvent) {
        self.version.fetch_add(1, Ordering::SeqCst);
        // Listeners run without the registry lock held, so they may
        // subscribe or unsubscribe.
        let listeners: Vec<Listener> = match self.registry.lock() {
            Ok(registry) => registry.listeners.iter().map(|(_, l)| l.clone()).collect(),
            Err(_) => {
                log::error!("listener registry lock poisoned");
                return;
            }
        };
        for listener in listeners {
            listener(&event);
        }
    }
}

fn photo_id(locator: &str, millis: i64) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(locator.as_bytes());
    hasher.update(&millis.to_le_bytes());
    let hash = hasher.finalize().to_hex();
    format!("photo_{millis}_{}", &hash[..ID_SUFFIX_LEN])
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::helper::create_tmp_directory;

    fn store() -> Fallible<PhotoStore> {
        let dir = create_tmp_directory()?;
        let path = dir.join("snapswipe.db");
        let db = Database::new(path.to_str().unwrap())?;
        Ok(PhotoStore::new(db))
    }

    #[test]
    fn test_photo_id() {
        let id = photo_id("photos/a.jpg", 1_700_000_000_000);
        assert!(id.starts_with("photo_1700000000000_"));
        assert_eq!(id.len(), "photo_1700000000000_".len() + ID_SUFFIX_LEN);
        assert_ne!(id, photo_id("photos/b.jpg", 1_700_000_000_000));
    }

    #[test]
    fn test_create_list_delete() -> Fallible<()> {
        let store = store()?;
        let old = store.create_at("photos/a.jpg", Timestamp::from_millis(1_000).unwrap())?;
        let new = store.create_at("photos/b.jpg", Timestamp::from_millis(2_000).unwrap())?;
        assert_eq!(store.list()?, vec![new.clone(), old.clone()]);
        assert_eq!(store.count()?, 2);
        assert_eq!(store.get(&old.identifier)?, Some(old.clone()));
        assert!(store.delete(&old.identifier)?);
        assert!(!store.delete(&old.identifier)?);
        assert_eq!(store.list()?, vec![new]);
        Ok(())
    }

    #[test]
    fn test_version_counter() -> Fallible<()> {
        let store = store()?;
        assert_eq!(store.version(), 0);
        let photo = store.create("photos/a.jpg")?;
        assert_eq!(store.version(), 1);
        store.delete("nonexistent")?;
        assert_eq!(store.version(), 1);
        store.delete(&photo.identifier)?;
        assert_eq!(store.version(), 2);
        store.clear()?;
        assert_eq!(store.version(), 3);
        Ok(())
    }

    #[test]
    fn test_subscribe() -> Fallible<()> {
        let store = store()?;
        let events: Arc<Mutex<Vec<StoreEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let subscription = store.subscribe(move |event| {
            sink.lock().unwrap().push(event.clone());
        })?;
        let photo = store.create("photos/a.jpg")?;
        store.delete(&photo.identifier)?;
        store.clear()?;
        drop(subscription);
        store.create("photos/b.jpg")?;
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                StoreEvent::Created(photo.clone()),
                StoreEvent::Deleted(photo.identifier.clone()),
                StoreEvent::Cleared,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_multiple_subscribers() -> Fallible<()> {
        let store = store()?;
        let count = Arc::new(AtomicUsize::new(0));
        let first = count.clone();
        let second = count.clone();
        let _a = store.subscribe(move |_| {
            first.fetch_add(1, Ordering::SeqCst);
        })?;
        let _b = store.subscribe(move |_| {
            second.fetch_add(10, Ordering::SeqCst);
        })?;
        store.create("photos/a.jpg")?;
        assert_eq!(count.load(Ordering::SeqCst), 11);
        Ok(())
    }

    #[test]
    fn test_subscription_outlives_store() -> Fallible<()> {
        let store = store()?;
        let subscription = store.subscribe(|_| {})?;
        drop(store);
        drop(subscription);
        Ok(())
    }
}
