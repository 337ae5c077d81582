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

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use crate::cmd::swipe::state::ServerState;
use crate::error::Fallible;
use crate::swipe::gesture::Release;
use crate::swipe::gesture::Viewport;

#[derive(Debug, Deserialize)]
enum Action {
    Pass,
    Like,
    SuperLike,
    Undo,
    Reset,
    /// A drag on the top card ended. Carries the final offset and the
    /// width of the viewport it happened in.
    Release,
    Delete,
    End,
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
    /// The queue position the page was rendered at. Actions from a page
    /// that is out of date are dropped.
    cursor: Option<usize>,
    dx: Option<f64>,
    dy: Option<f64>,
    width: Option<f64>,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Redirect {
    match action_handler(state, form) {
        Ok(_) => {}
        Err(e) => {
            log::error!("{e}");
        }
    }
    Redirect::to("/")
}

fn action_handler(state: ServerState, form: FormData) -> Fallible<()> {
    let mut mutable = state.lock()?;
    mutable.sync(&state.store)?;
    if mutable.finished {
        if let Action::Reset = form.action {
            mutable.restart();
        }
        return Ok(());
    }
    if let Some(cursor) = form.cursor {
        let current = mutable.deck.queue().cursor();
        let targets_card = !matches!(form.action, Action::Reset | Action::End);
        if targets_card && cursor != current {
            log::debug!(
                "Dropping {:?} rendered at {cursor}, the queue is at {current}.",
                form.action
            );
            return Ok(());
        }
    }
    match form.action {
        Action::Pass => {
            mutable.deck.pass();
        }
        Action::Like => {
            mutable.deck.like();
        }
        Action::SuperLike => {
            mutable.deck.super_like();
        }
        Action::Undo => {
            mutable.deck.undo();
        }
        Action::Reset => {
            mutable.restart();
        }
        Action::Release => {
            let width = form.width.unwrap_or(0.0);
            if let Ok(viewport) = Viewport::new(width) {
                mutable.deck.set_viewport(viewport);
            } else {
                log::warn!("Ignoring invalid viewport width {width}.");
            }
            if mutable.deck.drag_start() {
                mutable
                    .deck
                    .drag_update(form.dx.unwrap_or(0.0), form.dy.unwrap_or(0.0));
                match mutable.deck.drag_end() {
                    // The browser plays the exit animation before posting,
                    // so the commit lands right away.
                    Some(Release::Commit(ticket)) => {
                        let direction = ticket.direction();
                        if mutable.deck.finish_commit(ticket).is_some() {
                            log::debug!("Swiped {}.", direction.as_str());
                        }
                    }
                    // Likewise the spring back has already played.
                    Some(Release::Cancel(animation)) => {
                        mutable.deck.animation_frame(animation.target());
                    }
                    None => {}
                }
            }
        }
        Action::Delete => {
            let current = mutable.deck.queue().current().map(|card| card.id.clone());
            if let Some(id) = current {
                if state.store.delete(&id)? {
                    log::debug!("Deleted photo {id}.");
                }
                mutable.sync(&state.store)?;
            }
        }
        Action::End => {
            log::debug!("Session completed");
            mutable.finish(&state.store);
        }
    }
    Ok(())
}
