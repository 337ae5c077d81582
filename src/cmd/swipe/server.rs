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
use std::time::Duration;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::signal::ctrl_c;
use tokio::time::sleep;

use crate::cmd::swipe::get::get_handler;
use crate::cmd::swipe::get::photo_handler;
use crate::cmd::swipe::post::post_handler;
use crate::cmd::swipe::state::MutableState;
use crate::cmd::swipe::state::ServerState;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::media::MediaLoader;
use crate::store::StoreEvent;

pub async fn start_server(directory: Option<String>, port: Option<u16>) -> Fallible<()> {
    let Collection {
        directory,
        store,
        config,
    } = Collection::new(directory)?;
    let port = port.unwrap_or(config.port);
    let store = Arc::new(store);

    let _subscription = store.subscribe(|event| match event {
        StoreEvent::Created(photo) => log::debug!("Photo added: {}", photo.identifier),
        StoreEvent::Deleted(id) => log::debug!("Photo deleted: {id}"),
        StoreEvent::Cleared => log::debug!("Collection cleared"),
    })?;

    let mutable = MutableState::new(&store)?;
    log::debug!("Session started with {} photos.", mutable.deck.queue().len());
    let state = ServerState {
        max_visible: config.max_visible,
        store,
        media: Arc::new(MediaLoader::new(directory)),
        mutable: Arc::new(Mutex::new(mutable)),
    };

    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/photo/{id}", get(photo_handler));
    let app = app.route("/script.js", get(script_handler));
    let app = app.route("/style.css", get(style_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state.clone());
    let bind = format!("127.0.0.1:{port}");

    if config.open_browser {
        // Start a separate task to open the browser.
        let url = format!("http://{bind}/");
        let target = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&target).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            if let Err(e) = open::that(&url) {
                log::warn!("Failed to open the browser: {e}");
            }
        });
    }

    // Start the server.
    log::debug!("Starting server on {bind}");
    println!("Swiping at http://{bind}/");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown(state))
        .await?;
    Ok(())
}

/// Wait for Ctrl-C, then save the session if anything was decided.
async fn shutdown(state: ServerState) {
    if let Err(e) = ctrl_c().await {
        log::error!("Failed to listen for shutdown: {e}");
        return;
    }
    log::debug!("Shutting down.");
    match state.lock() {
        Ok(mut mutable) => {
            mutable.deck.teardown();
            if !mutable.decisions().is_empty() {
                mutable.finish(&state.store);
            }
        }
        Err(e) => log::error!("{e}"),
    }
}

async fn script_handler() -> (StatusCode, [(HeaderName, &'static str); 1], &'static str) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/javascript")],
        include_str!("script.js"),
    )
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}
