use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub const INVALID_ADDRESS_MESSAGE: &str = "Invalid Solana wallet address";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),

    // Reported to clients exactly like InvalidAddress; kept apart for logs.
    #[error("Balance lookup failed: {0}")]
    BalanceUnavailable(String),

    #[error("Wallet has no funds")]
    NoFunds,

    #[error("Wallet validation already in progress")]
    GateBusy,

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Ledger RPC error: {0}")]
    LedgerRpc(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidAddress(_) | AppError::BalanceUnavailable(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_ADDRESS")
            }
            AppError::NoFunds => (StatusCode::BAD_REQUEST, "NO_FUNDS"),
            AppError::GateBusy => (StatusCode::CONFLICT, "GATE_BUSY"),
            AppError::QueryFailed(_) | AppError::LedgerRpc(_) => {
                (StatusCode::BAD_GATEWAY, "QUERY_FAILED")
            }
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Text shown to the user. Store and ledger internals are not leaked.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidAddress(_) | AppError::BalanceUnavailable(_) => {
                INVALID_ADDRESS_MESSAGE.to_string()
            }
            AppError::NoFunds => {
                "Your wallet has no SOL. Please fund it before connecting.".to_string()
            }
            AppError::GateBusy => "A wallet check is already running for this address".to_string(),
            AppError::QueryFailed(_) | AppError::LedgerRpc(_) => {
                "Failed to load data, please try again".to_string()
            }
            AppError::Unauthorized(msg) | AppError::BadRequest(msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        let body = Json(ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message: self.user_message(),
                details: None,
            },
        });

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::QueryFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
