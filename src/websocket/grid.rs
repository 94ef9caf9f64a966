use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::{
    api::{pieces::progress_label, AppState},
    error::Result,
    grid::GridRenderer,
    models::Piece,
    services::Debouncer,
};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    Search { wallet: String },
    Refresh,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    Connected { message: String },
    Frame {
        highlight: Option<String>,
        revealed: usize,
        progress: String,
        svg: String,
    },
    Error { message: String },
}

/// Per-connection view state: the piece list it owns, the active
/// highlight and the pending search.
struct GridView {
    renderer: Arc<GridRenderer>,
    pieces: Vec<Piece>,
    highlight: Option<String>,
    search: Debouncer<String>,
    generation: u64,
}

impl GridView {
    fn new(renderer: Arc<GridRenderer>, quiet: Duration) -> Self {
        Self {
            renderer,
            pieces: Vec::new(),
            highlight: None,
            search: Debouncer::new(quiet),
            generation: 0,
        }
    }

    fn on_search(&mut self, wallet: String, now: Instant) {
        self.search.submit(wallet, now);
    }

    /// Starts a reload; results tagged with an older generation are stale.
    fn begin_reload(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn apply_reload(&mut self, generation: u64, pieces: Vec<Piece>) -> bool {
        if generation != self.generation {
            tracing::debug!("Dropping stale piece reload {} (current {})", generation, self.generation);
            return false;
        }
        self.pieces = pieces;
        true
    }

    /// Reply for a finished reload, or `None` when a newer reload superseded it.
    fn reload_reply(&mut self, generation: u64, result: Result<Vec<Piece>>) -> Option<ServerMessage> {
        match result {
            Ok(pieces) => self.apply_reload(generation, pieces).then(|| self.frame()),
            Err(e) if generation == self.generation => {
                tracing::error!("Grid piece reload failed: {}", e);
                Some(ServerMessage::Error {
                    message: e.user_message(),
                })
            }
            Err(e) => {
                tracing::debug!("Dropping stale piece reload failure {}: {}", generation, e);
                None
            }
        }
    }

    /// Highlight changed: takes the debounced search if it is due.
    fn take_due_search(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(wallet) => {
                let wallet = wallet.trim().to_string();
                self.highlight = (!wallet.is_empty()).then_some(wallet);
                true
            }
            None => false,
        }
    }

    fn frame(&self) -> ServerMessage {
        ServerMessage::Frame {
            highlight: self.highlight.clone(),
            revealed: self.pieces.len(),
            progress: progress_label(self.pieces.len()),
            svg: self.renderer.render_svg(&self.pieces, self.highlight.as_deref()),
        }
    }
}

fn to_text(msg: &ServerMessage) -> Message {
    Message::Text(serde_json::to_string(msg).unwrap_or_default().into())
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
        None => std::future::pending::<()>().await,
    }
}

fn spawn_reload(state: &AppState, generation: u64, tx: mpsc::Sender<(u64, Result<Vec<Piece>>)>) {
    let store = state.store.clone();
    tokio::spawn(async move {
        let result = store.all_pieces().await;
        // receiver is gone once the view closed
        let _ = tx.send((generation, result)).await;
    });
}

/// WebSocket handler for the live grid view
pub async fn handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let quiet = Duration::from_millis(state.config.search_debounce_ms);
    let mut view = GridView::new(state.renderer.clone(), quiet);
    let (reload_tx, mut reload_rx) = mpsc::channel(4);

    let hello = ServerMessage::Connected {
        message: "Connected to grid stream".to_string(),
    };
    if sender.send(to_text(&hello)).await.is_err() {
        return;
    }
    spawn_reload(&state, view.begin_reload(), reload_tx.clone());

    loop {
        let search_due = view.search.deadline();
        tokio::select! {
            incoming = receiver.next() => {
                let Some(Ok(msg)) = incoming else { break };
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(ClientMessage::Search { wallet }) => view.on_search(wallet, Instant::now()),
                        Ok(ClientMessage::Refresh) => {
                            spawn_reload(&state, view.begin_reload(), reload_tx.clone());
                        }
                        Err(e) => {
                            tracing::debug!("Ignoring malformed grid message: {}", e);
                        }
                    },
                    Message::Close(_) => {
                        tracing::info!("Grid stream client disconnected");
                        break;
                    }
                    _ => {}
                }
            }
            Some((generation, result)) = reload_rx.recv() => {
                if let Some(reply) = view.reload_reply(generation, result) {
                    if sender.send(to_text(&reply)).await.is_err() {
                        break;
                    }
                }
            }
            _ = wait_until(search_due) => {
                if view.take_due_search(Instant::now())
                    && sender.send(to_text(&view.frame())).await.is_err()
                {
                    break;
                }
            }
        }
    }

    view.search.cancel();
    tracing::info!("Grid WebSocket connection closed");
}
