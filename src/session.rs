use std::{collections::HashMap, sync::Arc};

use rand::RngCore;
use tokio::sync::RwLock;

use crate::constants::SESSION_TOKEN_BYTES;

/// Active wallet identities, keyed by opaque session token.
///
/// Owned by the application shell and handed to handlers through `AppState`.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

fn new_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `wallet` to a fresh token and returns the token.
    pub async fn create(&self, wallet: &str) -> String {
        let token = new_token();
        self.inner
            .write()
            .await
            .insert(token.clone(), wallet.to_string());
        token
    }

    pub async fn get(&self, token: &str) -> Option<String> {
        self.inner.read().await.get(token).cloned()
    }

    /// Forgets the session; returns whether it existed.
    pub async fn clear(&self, token: &str) -> bool {
        self.inner.write().await.remove(token).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
