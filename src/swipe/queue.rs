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
use std::fmt::Debug;
use std::hash::Hash;

use crate::types::direction::Direction;

/// Something a decision can be taken on.
pub trait Item {
    type Id: Clone + Eq + Hash + Debug;

    /// A stable identifier, unique within one queue.
    fn id(&self) -> Self::Id;
}

/// One entry per consumed item. The history is the single source of truth:
/// the cursor and the match/pass collections are projections of it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct HistoryEntry {
    /// The queue position of the item the decision was taken on.
    pub index: usize,
    pub direction: Direction,
}

/// A decision paired with the item it was taken on.
#[derive(Debug)]
pub struct Outcome<'a, T> {
    pub item: &'a T,
    pub direction: Direction,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QueueState {
    /// There is an item awaiting a decision.
    Active,
    /// Every item has been decided on.
    Exhausted,
}

/// A card in the visible stack.
#[derive(Debug)]
pub struct StackCard<'a, T> {
    pub index: usize,
    pub item: &'a T,
    /// Only the top card accepts gestures.
    pub is_top: bool,
}

/// The sequential decision queue.
///
/// Items are presented in insertion order and never reordered. Every
/// transition that is not legal in the current state is a no-op that leaves
/// the queue untouched.
pub struct SwipeQueue<T: Item> {
    items: Vec<T>,
    history: Vec<HistoryEntry>,
}

impl<T: Item> SwipeQueue<T> {
    /// Build a queue. Items whose identifier was already seen are dropped.
    pub fn new(items: Vec<T>) -> Self {
        let mut seen: HashSet<T::Id> = HashSet::new();
        let mut unique = Vec::with_capacity(items.len());
        for item in items {
            let id = item.id();
            if seen.insert(id.clone()) {
                unique.push(item);
            } else {
                log::warn!("Dropping duplicate item {id:?} from the queue.");
            }
        }
        Self {
            items: unique,
            history: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Index of the next undecided item, in `[0, len]`.
    pub fn cursor(&self) -> usize {
        self.history.len()
    }

    pub fn state(&self) -> QueueState {
        if self.cursor() < self.len() {
            QueueState::Active
        } else {
            QueueState::Exhausted
        }
    }

    pub fn has_more(&self) -> bool {
        self.state() == QueueState::Active
    }

    /// The next and only item eligible for a decision.
    pub fn current(&self) -> Option<&T> {
        self.items.get(self.cursor())
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn total_swipes(&self) -> usize {
        self.history.len()
    }

    /// Every decision so far, in presentation order.
    pub fn outcomes(&self) -> impl Iterator<Item = Outcome<'_, T>> {
        self.history.iter().map(|entry| Outcome {
            item: &self.items[entry.index],
            direction: entry.direction,
        })
    }

    /// Liked and super-liked items, in presentation order.
    pub fn matches(&self) -> Vec<Outcome<'_, T>> {
        self.outcomes().filter(|o| o.direction.is_match()).collect()
    }

    /// Passed items, in presentation order.
    pub fn passed(&self) -> Vec<Outcome<'_, T>> {
        self.outcomes().filter(|o| !o.direction.is_match()).collect()
    }

    /// The cards on screen, top card first, at most `max` of them.
    pub fn visible(&self, max: usize) -> Vec<StackCard<'_, T>> {
        let start = self.cursor();
        self.items
            .iter()
            .enumerate()
            .skip(start)
            .take(max)
            .map(|(index, item)| StackCard {
                index,
                item,
                is_top: index == start,
            })
            .collect()
    }

    /// Record a decision on the current item and advance. Returns `None`,
    /// changing nothing, when the queue is exhausted.
    pub fn swipe(&mut self, direction: Direction) -> Option<HistoryEntry> {
        let index = self.cursor();
        let item = self.items.get(index)?;
        log::debug!("{} {:?} at {index}", direction.as_str(), item.id());
        let entry = HistoryEntry { index, direction };
        self.history.push(entry);
        Some(entry)
    }

    pub fn like(&mut self) -> Option<HistoryEntry> {
        self.swipe(Direction::Like)
    }

    pub fn pass(&mut self) -> Option<HistoryEntry> {
        self.swipe(Direction::Pass)
    }

    pub fn super_like(&mut self) -> Option<HistoryEntry> {
        self.swipe(Direction::SuperLike)
    }

    /// Reverse the most recent decision. Returns `None` when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.history.pop()?;
        log::debug!("Undid {} at {}", entry.direction.as_str(), entry.index);
        Some(entry)
    }

    /// Forget every decision and go back to the first item.
    pub fn reset(&mut self) {
        self.history.clear();
        log::debug!("Queue reset");
    }
}
