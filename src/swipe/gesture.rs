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

//! Per-card drag interpretation.
//!
//! The interpreter turns a stream of drag events into either a commit (the
//! card flies off screen and a decision is taken) or a cancel (the card
//! springs back). It knows nothing about the queue. Animations are carried
//! out by an external runtime: the interpreter only says which animation to
//! run and is told, through [`GestureInterpreter::animation_frame`] and
//! [`GestureInterpreter::complete`], how it progresses.

use std::ops::Add;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::direction::Direction;

/// Fraction of the viewport width, in percent, a card must be dragged past
/// to commit.
const SWIPE_THRESHOLD_PERCENT: f64 = 30.0;

/// Rotation of a card dragged half the viewport width.
const MAX_ROTATION_DEGREES: f64 = 30.0;

/// Opacity of the top card when dragged exactly to the threshold.
const THRESHOLD_OPACITY: f64 = 0.5;

/// Duration of the fly-off animation.
const EXIT_DURATION_MILLIS: u64 = 300;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.x + rhs.x, self.y + rhs.y)
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Viewport {
    width: f64,
}

impl Viewport {
    pub fn new(width: f64) -> Fallible<Self> {
        if !width.is_finite() || width <= 0.0 {
            return fail(format!("invalid viewport width: {width}"));
        }
        Ok(Self { width })
    }

    pub fn width(self) -> f64 {
        self.width
    }

    /// Minimum horizontal distance, exclusive, for a drag to commit.
    pub fn threshold(self) -> f64 {
        self.width * SWIPE_THRESHOLD_PERCENT / 100.0
    }
}

/// Parameters of a damped spring.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SpringSpec {
    pub damping_ratio: f64,
    pub stiffness: f64,
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self {
            damping_ratio: 0.5,
            stiffness: 100.0,
        }
    }
}

/// An animation the runtime is asked to run on the card's offset.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Animation {
    /// Time-based motion to `to`.
    Timing { to: Offset, duration_millis: u64 },
    /// Damped motion to `to`.
    Spring { to: Offset, spec: SpringSpec },
}

impl Animation {
    pub fn target(&self) -> Offset {
        match self {
            Animation::Timing { to, .. } => *to,
            Animation::Spring { to, .. } => *to,
        }
    }
}

/// Issued when a drag ends past the threshold. Hand it back through
/// [`GestureInterpreter::complete`] when the exit animation finishes.
///
/// Tickets cannot be cloned, so each one commits at most once.
#[derive(Debug, PartialEq)]
pub struct CommitTicket {
    serial: u64,
    direction: Direction,
    animation: Animation,
}

impl CommitTicket {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn animation(&self) -> Animation {
        self.animation
    }
}

/// How a drag ended.
#[derive(Debug, PartialEq)]
pub enum Release {
    /// Run the ticket's exit animation, then complete it.
    Commit(CommitTicket),
    /// Run this animation. Nothing is decided.
    Cancel(Animation),
}

/// The ephemeral state of one drag.
#[derive(Clone, Copy, Debug)]
struct DragState {
    origin: Offset,
}

/// The visual state of a card.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CardTransform {
    pub translate: Offset,
    pub rotation_degrees: f64,
    pub opacity: f64,
}

/// Map a card's offset to how it is drawn. Lower cards stay opaque.
pub fn card_transform(offset: Offset, viewport: Viewport, is_top: bool) -> CardTransform {
    let half_width = viewport.width() / 2.0;
    let rotation_degrees = offset.x / half_width * MAX_ROTATION_DEGREES;
    let opacity = if is_top {
        let progress = offset.x.abs() / viewport.threshold();
        (1.0 - (1.0 - THRESHOLD_OPACITY) * progress).clamp(0.0, 1.0)
    } else {
        1.0
    };
    CardTransform {
        translate: offset,
        rotation_degrees,
        opacity,
    }
}

pub struct GestureInterpreter {
    viewport: Viewport,
    interactive: bool,
    /// Distinguishes this interpreter's tickets from any other's.
    serial: u64,
    /// The live offset of the card.
    offset: Offset,
    drag: Option<DragState>,
    /// The direction of an issued, not yet completed, ticket.
    pending: Option<Direction>,
}

impl GestureInterpreter {
    pub fn new(viewport: Viewport, interactive: bool, serial: u64) -> Self {
        Self {
            viewport,
            interactive,
            serial,
            offset: Offset::ZERO,
            drag: None,
            pending: None,
        }
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    pub fn transform(&self) -> CardTransform {
        card_transform(self.offset, self.viewport, self.interactive)
    }

    /// Begin a drag from wherever the card currently is, which may be
    /// mid-animation. Returns `false` if the drag is refused.
    pub fn start(&mut self) -> bool {
        if !self.interactive || self.pending.is_some() {
            return false;
        }
        self.drag = Some(DragState {
            origin: self.offset,
        });
        true
    }

    /// Move the card by the total translation since the drag began.
    pub fn update(&mut self, dx: f64, dy: f64) {
        if let Some(drag) = &self.drag {
            self.offset = drag.origin + Offset::new(dx, dy);
        }
    }

    /// Finish the drag. Returns `None` if no drag was in progress.
    pub fn end(&mut self) -> Option<Release> {
        self.drag.take()?;
        if self.offset.x.abs() > self.viewport.threshold() {
            let direction = if self.offset.x > 0.0 {
                Direction::Like
            } else {
                Direction::Pass
            };
            let exit_x = self.offset.x.signum() * self.viewport.width();
            let animation = Animation::Timing {
                to: Offset::new(exit_x, self.offset.y),
                duration_millis: EXIT_DURATION_MILLIS,
            };
            self.pending = Some(direction);
            Some(Release::Commit(CommitTicket {
                serial: self.serial,
                direction,
                animation,
            }))
        } else {
            Some(Release::Cancel(Animation::Spring {
                to: Offset::ZERO,
                spec: SpringSpec::default(),
            }))
        }
    }

    /// Apply an animated value from the runtime. Ignored while the user is
    /// dragging, which is how an in-flight spring is abandoned.
    pub fn animation_frame(&mut self, offset: Offset) {
        if self.drag.is_none() {
            self.offset = offset;
        }
    }

    /// The exit animation finished. Returns the decision to commit, or
    /// `None` if the ticket was not issued by this interpreter.
    pub fn complete(&mut self, ticket: CommitTicket) -> Option<Direction> {
        if ticket.serial != self.serial {
            log::debug!("Ignoring stale commit ticket {}", ticket.serial);
            return None;
        }
        let direction = self.pending.take()?;
        self.offset = ticket.animation.target();
        Some(direction)
    }

    /// The card is going away. A commit whose animation never finished is
    /// returned so the caller can apply it.
    pub fn teardown(self) -> Option<Direction> {
        self.pending
    }
}
