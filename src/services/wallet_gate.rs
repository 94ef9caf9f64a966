use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use serde::Serialize;

use crate::{
    error::{AppError, Result},
    ledger::Ledger,
    session::SessionStore,
    utils::parse_wallet_address,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    Idle,
    Validating,
    Connected,
    Rejected,
}

#[derive(Debug, Clone, Serialize)]
pub struct Connected {
    pub wallet_address: String,
    pub session_token: String,
    pub balance_sol: f64,
    pub state: GateState,
}

/// Validates a wallet address against the ledger and opens a session.
#[derive(Clone)]
pub struct WalletGate {
    ledger: Arc<dyn Ledger>,
    sessions: SessionStore,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

/// Releases the in-flight slot when validation ends, on every path.
struct InFlight {
    set: Arc<Mutex<HashSet<String>>>,
    address: String,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if let Ok(mut set) = self.set.lock() {
            set.remove(&self.address);
        }
    }
}

impl WalletGate {
    pub fn new(ledger: Arc<dyn Ledger>, sessions: SessionStore) -> Self {
        Self {
            ledger,
            sessions,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    fn begin(&self, address: &str) -> Result<InFlight> {
        let mut set = self
            .in_flight
            .lock()
            .map_err(|_| AppError::Internal("wallet gate lock poisoned".to_string()))?;
        if !set.insert(address.to_string()) {
            return Err(AppError::GateBusy);
        }
        Ok(InFlight {
            set: self.in_flight.clone(),
            address: address.to_string(),
        })
    }

    /// Idle -> Validating -> Connected | Rejected.
    pub async fn connect(&self, address_text: &str) -> Result<Connected> {
        let address = match parse_wallet_address(address_text) {
            Ok(address) => address,
            Err(err) => {
                tracing::info!("Wallet gate rejected malformed address: {}", err);
                return Err(err);
            }
        };

        let _guard = self.begin(&address)?;
        tracing::debug!("Wallet gate {:?} for {}", GateState::Validating, address);

        let balance = self.ledger.get_balance(&address).await.map_err(|err| {
            tracing::warn!("Balance lookup failed for {}: {}", address, err);
            AppError::BalanceUnavailable(err.to_string())
        })?;

        if balance <= 0.0 {
            tracing::info!("Wallet gate {:?}: {} has no funds", GateState::Rejected, address);
            return Err(AppError::NoFunds);
        }

        let session_token = self.sessions.create(&address).await;
        tracing::info!("Wallet gate {:?}: {}", GateState::Connected, address);

        Ok(Connected {
            wallet_address: address,
            session_token,
            balance_sol: balance,
            state: GateState::Connected,
        })
    }
}
