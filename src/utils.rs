// Utility helpers shared by handlers and services

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    constants::{SOLANA_PUBKEY_BYTES, SOL_DECIMALS},
    error::{AppError, Result},
};

pub fn is_env_flag_enabled(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|value| {
            let normalized = value.trim().to_ascii_lowercase();
            normalized == "1" || normalized == "true" || normalized == "yes" || normalized == "on"
        })
        .unwrap_or(false)
}

/// Parses a base58 Solana public key, returning the trimmed address.
pub fn parse_wallet_address(raw: &str) -> Result<String> {
    let address = raw.trim();
    if address.is_empty() {
        return Err(AppError::InvalidAddress("address is empty".to_string()));
    }

    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| AppError::InvalidAddress(format!("not base58: {}", e)))?;

    if bytes.len() != SOLANA_PUBKEY_BYTES {
        return Err(AppError::InvalidAddress(format!(
            "expected {} bytes, got {}",
            SOLANA_PUBKEY_BYTES,
            bytes.len()
        )));
    }

    Ok(address.to_string())
}

/// Lamports rendered as SOL with two decimals.
pub fn format_sol(lamports: i64) -> String {
    let sol = Decimal::new(lamports, SOL_DECIMALS)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", sol)
}

/// `ABCD...WXYZ` form used in leaderboard rows.
/// First four and last four characters; shorter inputs repeat in both halves.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    let head: String = chars.iter().take(4).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}
