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

use crate::swipe::gesture::CommitTicket;
use crate::swipe::gesture::GestureInterpreter;
use crate::swipe::gesture::Offset;
use crate::swipe::gesture::Release;
use crate::swipe::gesture::Viewport;
use crate::swipe::queue::HistoryEntry;
use crate::swipe::queue::Item;
use crate::swipe::queue::SwipeQueue;
use crate::types::direction::Direction;

/// A queue together with the gesture interpreter of its top card.
///
/// Buttons and gestures commit through the same transition. Each time the
/// queue moves, the top card gets a new interpreter, so a gesture ticket
/// issued for one card can never commit another.
pub struct SwipeDeck<T: Item> {
    queue: SwipeQueue<T>,
    gesture: GestureInterpreter,
    viewport: Viewport,
    next_serial: u64,
}

impl<T: Item> SwipeDeck<T> {
    pub fn new(items: Vec<T>, viewport: Viewport) -> Self {
        let queue = SwipeQueue::new(items);
        let gesture = GestureInterpreter::new(viewport, queue.has_more(), 0);
        Self {
            queue,
            gesture,
            viewport,
            next_serial: 1,
        }
    }

    pub fn queue(&self) -> &SwipeQueue<T> {
        &self.queue
    }

    /// The interpreter of the top card.
    pub fn gesture(&self) -> &GestureInterpreter {
        &self.gesture
    }

    /// Change the viewport. Any gesture in progress is dropped, but a
    /// pending commit is kept.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            self.viewport = viewport;
            if self.gesture.pending().is_none() {
                self.refresh_gesture();
            }
        }
    }

    pub fn drag_start(&mut self) -> bool {
        self.gesture.start()
    }

    pub fn drag_update(&mut self, dx: f64, dy: f64) {
        self.gesture.update(dx, dy);
    }

    pub fn drag_end(&mut self) -> Option<Release> {
        self.gesture.end()
    }

    /// Forward an animated offset to the top card's interpreter.
    pub fn animation_frame(&mut self, offset: Offset) {
        self.gesture.animation_frame(offset);
    }

    /// Called when a commit ticket's exit animation finishes.
    pub fn finish_commit(&mut self, ticket: CommitTicket) -> Option<HistoryEntry> {
        let direction = self.gesture.complete(ticket)?;
        self.commit(direction)
    }

    pub fn like(&mut self) -> Option<HistoryEntry> {
        self.commit(Direction::Like)
    }

    pub fn pass(&mut self) -> Option<HistoryEntry> {
        self.commit(Direction::Pass)
    }

    pub fn super_like(&mut self) -> Option<HistoryEntry> {
        self.commit(Direction::SuperLike)
    }

    pub fn undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.queue.undo()?;
        self.refresh_gesture();
        Some(entry)
    }

    pub fn reset(&mut self) {
        self.queue.reset();
        self.refresh_gesture();
    }

    /// Replace the items, starting over from the first one.
    pub fn reload(&mut self, items: Vec<T>) {
        self.queue = SwipeQueue::new(items);
        log::info!("Deck reloaded with {} items", self.queue.len());
        self.refresh_gesture();
    }

    /// The view holding the top card is going away. A gesture commit whose
    /// animation has not finished is applied now, once.
    pub fn teardown(&mut self) -> Option<HistoryEntry> {
        let fresh = self.fresh_gesture();
        let old = std::mem::replace(&mut self.gesture, fresh);
        let direction = old.teardown()?;
        self.commit(direction)
    }

    fn commit(&mut self, direction: Direction) -> Option<HistoryEntry> {
        let entry = self.queue.swipe(direction)?;
        self.refresh_gesture();
        Some(entry)
    }

    fn refresh_gesture(&mut self) {
        self.gesture = self.fresh_gesture();
    }

    fn fresh_gesture(&mut self) -> GestureInterpreter {
        let serial = self.next_serial;
        self.next_serial += 1;
        GestureInterpreter::new(self.viewport, self.queue.has_more(), serial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swipe::queue::QueueState;

    #[derive(Debug, PartialEq)]
    struct Card(u32);

    impl Item for Card {
        type Id = u32;

        fn id(&self) -> u32 {
            self.0
        }
    }

    const WIDTH: f64 = 1000.0;

    fn deck(n: u32) -> SwipeDeck<Card> {
        SwipeDeck::new((1..=n).map(Card).collect(), Viewport::new(WIDTH).unwrap())
    }

    fn fling(deck: &mut SwipeDeck<Card>, dx: f64) -> Option<Release> {
        deck.drag_start();
        deck.drag_update(dx, 0.0);
        deck.drag_end()
    }

    #[test]
    fn test_gesture_commit() {
        let mut d = deck(3);
        let Some(Release::Commit(ticket)) = fling(&mut d, 400.0) else {
            panic!("expected a commit");
        };
        // Nothing is decided until the animation completes.
        assert_eq!(d.queue().cursor(), 0);
        let entry = d.finish_commit(ticket);
        assert_eq!(
            entry,
            Some(HistoryEntry {
                index: 0,
                direction: Direction::Like
            })
        );
        assert_eq!(d.queue().current(), Some(&Card(2)));
    }

    #[test]
    fn test_gesture_and_button_are_equivalent() {
        let mut by_gesture = deck(2);
        let Some(Release::Commit(ticket)) = fling(&mut by_gesture, -400.0) else {
            panic!("expected a commit");
        };
        by_gesture.finish_commit(ticket);

        let mut by_button = deck(2);
        by_button.pass();

        assert_eq!(by_gesture.queue().history(), by_button.queue().history());
    }

    #[test]
    fn test_cancel_commits_nothing() {
        let mut d = deck(3);
        let Some(Release::Cancel(animation)) = fling(&mut d, 100.0) else {
            panic!("expected a cancel");
        };
        assert_eq!(d.queue().cursor(), 0);
        // Once the card is back in place, a short drag is not a swipe.
        d.animation_frame(animation.target());
        assert!(matches!(fling(&mut d, 100.0), Some(Release::Cancel(_))));
        assert_eq!(d.queue().cursor(), 0);
    }

    #[test]
    fn test_button_during_exit_animation_wins() {
        let mut d = deck(3);
        let Some(Release::Commit(ticket)) = fling(&mut d, 400.0) else {
            panic!("expected a commit");
        };
        // A double tap lands before the animation completes.
        d.pass();
        assert_eq!(d.finish_commit(ticket), None);
        assert_eq!(d.queue().cursor(), 1);
        assert_eq!(d.queue().history()[0].direction, Direction::Pass);
    }

    #[test]
    fn test_stale_ticket_after_undo() {
        let mut d = deck(3);
        d.like();
        let Some(Release::Commit(ticket)) = fling(&mut d, 400.0) else {
            panic!("expected a commit");
        };
        d.undo();
        assert_eq!(d.finish_commit(ticket), None);
        assert_eq!(d.queue().cursor(), 0);
    }

    #[test]
    fn test_teardown_flushes_once() {
        let mut d = deck(3);
        let Some(Release::Commit(ticket)) = fling(&mut d, -400.0) else {
            panic!("expected a commit");
        };
        let entry = d.teardown();
        assert_eq!(entry.map(|e| e.direction), Some(Direction::Pass));
        assert_eq!(d.teardown(), None);
        // The animation completing later does nothing.
        assert_eq!(d.finish_commit(ticket), None);
        assert_eq!(d.queue().cursor(), 1);
    }

    #[test]
    fn test_exhausted_deck_ignores_gestures() {
        let mut d = deck(1);
        d.super_like();
        assert_eq!(d.queue().state(), QueueState::Exhausted);
        assert!(!d.drag_start());
        assert_eq!(fling(&mut d, 400.0), None);
        assert_eq!(d.like(), None);
        assert_eq!(d.queue().cursor(), 1);
    }

    #[test]
    fn test_reload_resets() {
        let mut d = deck(3);
        d.like();
        d.pass();
        d.reload(vec![Card(7), Card(8)]);
        assert_eq!(d.queue().cursor(), 0);
        assert_eq!(d.queue().len(), 2);
        assert_eq!(d.queue().current(), Some(&Card(7)));
    }

    #[test]
    fn test_set_viewport_changes_threshold() {
        let mut d = deck(3);
        d.set_viewport(Viewport::new(200.0).unwrap());
        assert!(matches!(fling(&mut d, 100.0), Some(Release::Commit(_))));
    }
}
