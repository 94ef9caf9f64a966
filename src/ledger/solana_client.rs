use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use serde::{de::DeserializeOwned, Deserialize};

use super::Ledger;
use crate::{
    constants::{LAMPORTS_PER_SOL, SOLANA_COMMITMENT},
    error::{AppError, Result},
    models::LedgerTransaction,
};

fn rpc_request(method: &str, params: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": 1
    })
}

fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

fn block_time_to_utc(block_time: Option<i64>) -> DateTime<Utc> {
    block_time
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .unwrap_or_else(Utc::now)
}

/// Solana JSON-RPC client
pub struct SolanaClient {
    rpc_url: String,
    client: reqwest::Client,
}

impl SolanaClient {
    pub fn new(rpc_url: String) -> Self {
        Self {
            rpc_url,
            client: reqwest::Client::new(),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: serde_json::Value) -> Result<T> {
        self.call_optional(method, params)
            .await?
            .ok_or_else(|| AppError::LedgerRpc(format!("{} returned no result", method)))
    }

    /// Like `call`, but a `null` result is a valid answer.
    async fn call_optional<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>> {
        let request = rpc_request(method, params);

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::LedgerRpc(e.to_string()))?;

        let body: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| AppError::LedgerRpc(e.to_string()))?;

        if let Some(err) = body.error {
            return Err(AppError::LedgerRpc(format!(
                "{} failed ({}): {}",
                method, err.code, err.message
            )));
        }

        Ok(body.result)
    }

    /// Get balance in lamports
    pub async fn get_balance_lamports(&self, address: &str) -> Result<u64> {
        let result: BalanceResult = self
            .call(
                "getBalance",
                serde_json::json!([address, { "commitment": SOLANA_COMMITMENT }]),
            )
            .await?;
        Ok(result.value)
    }

    /// Get signatures touching an address, newest first
    pub async fn get_signatures_for_address(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>> {
        self.call(
            "getSignaturesForAddress",
            serde_json::json!([address, { "limit": limit, "commitment": SOLANA_COMMITMENT }]),
        )
        .await
    }

    /// Get a confirmed transaction; `None` when the node no longer has it
    pub async fn get_transaction(&self, signature: &str) -> Result<Option<ConfirmedTransaction>> {
        self.call_optional(
            "getTransaction",
            serde_json::json!([signature, {
                "encoding": "json",
                "commitment": SOLANA_COMMITMENT,
                "maxSupportedTransactionVersion": 0
            }]),
        )
        .await
    }
}

#[async_trait]
impl Ledger for SolanaClient {
    async fn get_balance(&self, address: &str) -> Result<f64> {
        let lamports = self.get_balance_lamports(address).await?;
        Ok(lamports_to_sol(lamports))
    }

    async fn get_recent_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<LedgerTransaction>> {
        let signatures = self.get_signatures_for_address(address, limit).await?;

        let lookups = signatures.into_iter().map(|sig| async move {
            let tx = self.get_transaction(&sig.signature).await?;
            Ok::<_, AppError>(to_ledger_transaction(sig, tx.as_ref()))
        });

        try_join_all(lookups).await
    }
}

fn to_ledger_transaction(
    sig: SignatureInfo,
    tx: Option<&ConfirmedTransaction>,
) -> LedgerTransaction {
    let amount = tx
        .and_then(|t| t.meta.as_ref())
        .and_then(|meta| meta.post_balances.first().copied())
        .map(|lamports| i64::try_from(lamports).unwrap_or(i64::MAX))
        .unwrap_or(0);

    LedgerTransaction {
        signature: sig.signature,
        timestamp: block_time_to_utc(sig.block_time),
        amount,
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct BalanceResult {
    value: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub signature: String,
    pub block_time: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedTransaction {
    pub meta: Option<TransactionMeta>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    #[serde(default)]
    pub post_balances: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_request_sets_method_and_id() {
        let req = rpc_request("getBalance", serde_json::json!([]));
        assert_eq!(req.get("method").and_then(|v| v.as_str()), Some("getBalance"));
        assert_eq!(req.get("id").and_then(|v| v.as_i64()), Some(1));
    }

    #[test]
    fn lamports_convert_to_whole_sol() {
        assert!((lamports_to_sol(1_500_000_000) - 1.5).abs() < f64::EPSILON);
        assert_eq!(lamports_to_sol(0), 0.0);
    }

    #[test]
    fn balance_response_parses_value() {
        let raw = r#"{"jsonrpc":"2.0","result":{"context":{"slot":1},"value":42},"id":1}"#;
        let parsed: RpcResponse<BalanceResult> = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.result.map(|r| r.value), Some(42));
    }

    #[test]
    fn rpc_error_is_captured() {
        let raw = r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"Invalid param"},"id":1}"#;
        let parsed: RpcResponse<BalanceResult> = serde_json::from_str(raw).unwrap();
        assert!(parsed.result.is_none());
        assert_eq!(parsed.error.map(|e| e.code), Some(-32602));
    }

    #[test]
    fn ledger_transaction_uses_first_post_balance() {
        let sig = SignatureInfo {
            signature: "abc".to_string(),
            block_time: Some(1_700_000_000),
        };
        let tx = ConfirmedTransaction {
            meta: Some(TransactionMeta {
                post_balances: vec![2_000_000_000, 5],
            }),
        };
        let mapped = to_ledger_transaction(sig, Some(&tx));
        assert_eq!(mapped.amount, 2_000_000_000);
        assert_eq!(mapped.timestamp.timestamp(), 1_700_000_000);
    }

    #[test]
    fn missing_transaction_yields_zero_amount() {
        let sig = SignatureInfo {
            signature: "abc".to_string(),
            block_time: None,
        };
        let mapped = to_ledger_transaction(sig, None);
        assert_eq!(mapped.amount, 0);
    }
}
