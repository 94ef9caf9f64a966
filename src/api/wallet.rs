use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::ApiResponse,
    services::wallet_gate::{Connected, GateState},
};

use super::{bearer_token, require_session, AppState};

// ==================== REQUEST/RESPONSE TYPES ====================

#[derive(Debug, Deserialize)]
pub struct ConnectWalletRequest {
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct DisconnectResponse {
    pub cleared: bool,
    pub state: GateState,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub wallet_address: String,
}

// ==================== HANDLERS ====================

/// POST /api/v1/wallet/connect
pub async fn connect_wallet(
    State(state): State<AppState>,
    Json(req): Json<ConnectWalletRequest>,
) -> Result<Json<ApiResponse<Connected>>> {
    let connected = state.gate.connect(&req.address).await?;
    Ok(Json(ApiResponse::success(connected)))
}

/// POST /api/v1/wallet/disconnect
pub async fn disconnect_wallet(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<DisconnectResponse>>> {
    let token = bearer_token(&headers)?;
    let cleared = state.sessions.clear(token).await;
    if cleared {
        tracing::info!("Session cleared");
    }
    Ok(Json(ApiResponse::success(DisconnectResponse {
        cleared,
        state: GateState::Idle,
    })))
}

/// GET /api/v1/wallet/me
pub async fn current_wallet(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<SessionInfo>>> {
    let wallet_address = require_session(&headers, &state).await?;
    Ok(Json(ApiResponse::success(SessionInfo { wallet_address })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{auth_headers, test_state};
    use crate::db::memory::MemoryStore;
    use crate::error::AppError;
    use crate::ledger::fake::FakeLedger;

    const VALID: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";

    #[tokio::test]
    async fn connect_me_disconnect_roundtrip() {
        let state = test_state(MemoryStore::default(), FakeLedger::with_balance(2.0));

        let Json(connected) = connect_wallet(
            State(state.clone()),
            Json(ConnectWalletRequest {
                address: VALID.to_string(),
            }),
        )
        .await
        .unwrap();
        let token = connected.data.session_token.clone();
        let headers = auth_headers(&token);

        let Json(me) = current_wallet(State(state.clone()), headers.clone())
            .await
            .unwrap();
        assert_eq!(me.data.wallet_address, VALID);

        let Json(out) = disconnect_wallet(State(state.clone()), headers.clone())
            .await
            .unwrap();
        assert!(out.data.cleared);

        let after = current_wallet(State(state), headers).await;
        assert!(matches!(after, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn connect_rejects_unfunded_wallet() {
        let state = test_state(MemoryStore::default(), FakeLedger::with_balance(0.0));
        let result = connect_wallet(
            State(state),
            Json(ConnectWalletRequest {
                address: VALID.to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::NoFunds)));
    }
}
