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

use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use maud::Markup;
use maud::html;

use crate::cmd::swipe::state::MutableState;
use crate::cmd::swipe::state::ServerState;
use crate::cmd::swipe::template::page_template;
use crate::error::Fallible;
use crate::media::content_type;
use crate::swipe::source::PhotoCard;
use crate::types::direction::Direction;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let body = match render(&state) {
        Ok(body) => body,
        Err(e) => {
            log::error!("{e}");
            html! {
                div.root {
                    p.error { (e.to_string()) }
                }
            }
        }
    };
    let html = page_template(body);
    (StatusCode::OK, Html(html.into_string()))
}

fn render(state: &ServerState) -> Fallible<Markup> {
    let mut mutable = state.lock()?;
    mutable.sync(&state.store)?;
    let queue = mutable.deck.queue();
    let body = if mutable.finished {
        render_finished(&mutable)
    } else if queue.is_empty() {
        html! {
            div.root {
                div.empty {
                    h1 { "No photos yet!" }
                    p { "Add your first photo with " code { "snapswipe add" } " to start swiping." }
                }
            }
        }
    } else if !queue.has_more() {
        let undo_disabled = queue.history().is_empty();
        html! {
            div.root {
                div.empty {
                    h1 { "You've seen every photo!" }
                    p { "Matches: " (queue.matches().len()) " photos" }
                    form action="/" method="post" {
                        input type="hidden" name="cursor" value=(queue.cursor());
                        @if undo_disabled {
                            input id="undo" type="submit" name="action" value="Undo" disabled;
                        } @else {
                            input id="undo" type="submit" name="action" value="Undo";
                        }
                        input id="reset" type="submit" name="action" value="Reset";
                        input id="end" type="submit" name="action" value="End";
                    }
                }
            }
        }
    } else {
        render_stack(state, &mutable)
    };
    Ok(body)
}

fn render_stack(state: &ServerState, mutable: &MutableState) -> Markup {
    let queue = mutable.deck.queue();
    let undo_disabled = queue.history().is_empty();
    let cursor = queue.cursor();
    let progress = format!("{} / {}", cursor, queue.len());
    // The top card goes last so that it is drawn above the others.
    let mut stack = queue.visible(state.max_visible.max(1));
    stack.reverse();
    html! {
        div.root {
            div.header {
                h1 { "Discover" }
                div.progress { (progress) }
            }
            div.stack {
                @for card in &stack {
                    (render_card(card.item, card.is_top))
                }
            }
            div.controls {
                form id="controls" action="/" method="post" {
                    input type="hidden" name="cursor" value=(cursor);
                    @if undo_disabled {
                        input id="undo" type="submit" name="action" value="Undo" disabled;
                    } @else {
                        input id="undo" type="submit" name="action" value="Undo";
                    }
                    div.spacer {}
                    input id="pass" type="submit" name="action" value="Pass";
                    input id="superlike" type="submit" name="action" value="SuperLike";
                    input id="like" type="submit" name="action" value="Like";
                    div.spacer {}
                    input id="delete" type="submit" name="action" value="Delete";
                    input id="end" type="submit" name="action" value="End";
                }
                form id="release" action="/" method="post" hidden {
                    input type="hidden" name="action" value="Release";
                    input type="hidden" name="cursor" value=(cursor);
                    input type="hidden" name="dx" value="0";
                    input type="hidden" name="dy" value="0";
                    input type="hidden" name="width" value="0";
                }
            }
        }
    }
}

fn render_card(card: &PhotoCard, is_top: bool) -> Markup {
    html! {
        div.card.top[is_top] data-id=(card.id) {
            img src=(format!("/photo/{}", card.id)) alt=(card.title) draggable="false";
            div.info {
                h2 { (card.title) }
                p.caption { (card.caption) }
            }
        }
    }
}

fn render_finished(mutable: &MutableState) -> Markup {
    let queue = mutable.deck.queue();
    let matches = queue.matches();
    let super_likes = matches
        .iter()
        .filter(|o| o.direction == Direction::SuperLike)
        .count();
    html! {
        div.root {
            div.finished {
                h1 { "Session Completed" }
                table {
                    tbody {
                        tr { td { "Photos seen" } td { (queue.total_swipes()) } }
                        tr { td { "Matches" } td { (matches.len()) } }
                        tr { td { "Super likes" } td { (super_likes) } }
                        tr { td { "Passed" } td { (queue.passed().len()) } }
                    }
                }
                form action="/" method="post" {
                    input id="reset" type="submit" name="action" value="Reset";
                }
            }
        }
    }
}

type PhotoResponse = (StatusCode, [(HeaderName, &'static str); 1], Vec<u8>);

pub async fn photo_handler(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> PhotoResponse {
    match load_photo(&state, &id).await {
        Ok(Some(response)) => response,
        Ok(None) => not_found(),
        Err(e) => {
            log::error!("Failed to load photo {id}: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CONTENT_TYPE, "text/plain")],
                b"Internal Server Error".to_vec(),
            )
        }
    }
}

async fn load_photo(state: &ServerState, id: &str) -> Fallible<Option<PhotoResponse>> {
    let Some(photo) = state.store.get(id)? else {
        return Ok(None);
    };
    let path = match state.media.validate(&photo.locator) {
        Ok(path) => path,
        Err(e) => {
            log::warn!("Photo {id} has an unusable locator: {e:?}");
            return Ok(None);
        }
    };
    let bytes = tokio::fs::read(&path).await?;
    Ok(Some((
        StatusCode::OK,
        [(CONTENT_TYPE, content_type(&path))],
        bytes,
    )))
}

fn not_found() -> PhotoResponse {
    (
        StatusCode::NOT_FOUND,
        [(CONTENT_TYPE, "text/plain")],
        b"Not Found".to_vec(),
    )
}
