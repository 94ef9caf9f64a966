// src/api/mod.rs

pub mod gallery;
pub mod grid;
pub mod health;
pub mod leaderboard;
pub mod ledger;
pub mod pieces;
pub mod wallet;

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::config::Config;
use crate::db::PieceStore;
use crate::error::{AppError, Result};
use crate::grid::GridRenderer;
use crate::ledger::Ledger;
use crate::services::WalletGate;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PieceStore>,
    pub ledger: Arc<dyn Ledger>,
    pub sessions: SessionStore,
    pub gate: WalletGate,
    pub renderer: Arc<GridRenderer>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        store: Arc<dyn PieceStore>,
        ledger: Arc<dyn Ledger>,
        renderer: GridRenderer,
        config: Config,
    ) -> Self {
        let sessions = SessionStore::new();
        let gate = WalletGate::new(ledger.clone(), sessions.clone());
        Self {
            store,
            ledger,
            sessions,
            gate,
            renderer: Arc::new(renderer),
            config,
        }
    }
}

pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Connect a wallet first".to_string()))?;
    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;
    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".to_string()))
}

/// Resolves the caller's session wallet from `Authorization: Bearer <token>`.
pub async fn require_session(headers: &HeaderMap, state: &AppState) -> Result<String> {
    let token = bearer_token(headers)?;
    state
        .sessions
        .get(token)
        .await
        .ok_or_else(|| AppError::Unauthorized("Session expired, connect your wallet again".to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::tests::test_config;
    use crate::db::memory::MemoryStore;
    use crate::grid::BaseImage;
    use crate::ledger::fake::FakeLedger;
    use axum::http::HeaderValue;

    pub(crate) fn test_state(store: MemoryStore, ledger: FakeLedger) -> AppState {
        let renderer = GridRenderer::new(Some(BaseImage {
            source: "https://cdn.example.com/blurred.jpg".to_string(),
        }));
        AppState::new(Arc::new(store), Arc::new(ledger), renderer, test_config())
    }

    pub(crate) fn auth_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn require_session_rejects_missing_header() {
        let state = test_state(MemoryStore::default(), FakeLedger::default());
        let result = require_session(&HeaderMap::new(), &state).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn require_session_rejects_unknown_token() {
        let state = test_state(MemoryStore::default(), FakeLedger::default());
        let result = require_session(&auth_headers("deadbeef"), &state).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn require_session_resolves_wallet() {
        let state = test_state(MemoryStore::default(), FakeLedger::default());
        let token = state.sessions.create("WalletA").await;
        let wallet = require_session(&auth_headers(&token), &state).await.unwrap();
        assert_eq!(wallet, "WalletA");
    }
}
