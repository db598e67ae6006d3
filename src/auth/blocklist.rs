use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::CLOCK_LEEWAY_SECS;

/// In-memory set of revoked token ids.
///
/// Each entry remembers the token's `exp` so it can be dropped once the token
/// would be rejected for expiry anyway. Revocations do not survive a restart.
#[derive(Clone, Default)]
pub struct TokenBlocklist {
    revoked: Arc<RwLock<HashMap<String, i64>>>,
}

impl TokenBlocklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn revoke(&self, jti: &str, exp: i64) {
        let cutoff = Utc::now().timestamp() - CLOCK_LEEWAY_SECS as i64;
        let mut revoked = self.revoked.write().await;

        let before = revoked.len();
        revoked.retain(|_, token_exp| *token_exp >= cutoff);
        let pruned = before - revoked.len();
        if pruned > 0 {
            debug!("Pruned {} expired entries from token blocklist", pruned);
        }

        revoked.insert(jti.to_string(), exp);
    }

    pub async fn is_revoked(&self, jti: &str) -> bool {
        self.revoked.read().await.contains_key(jti)
    }
}
