use async_trait::async_trait;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use dashmap::DashMap;

use crate::domain::account::models::Account;
use crate::domain::account::ports::TokenCache;

/// In-process token cache keyed by raw access token.
///
/// Stores each resolved account with an absolute deadline in a thread-safe
/// DashMap for lock-free concurrent access. Stale entries are evicted lazily
/// on lookup; the short TTLs keep the map from growing unbounded between
/// lookups of the same token.
pub struct InMemoryTokenCache {
    entries: DashMap<String, CacheEntry>,
}

struct CacheEntry {
    account: Account,
    expires_at: DateTime<Utc>,
}

impl InMemoryTokenCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl Default for InMemoryTokenCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenCache for InMemoryTokenCache {
    async fn get(&self, access_token: &str) -> Option<Account> {
        let expired = match self.entries.get(access_token) {
            Some(entry) if entry.expires_at > Utc::now() => {
                return Some(entry.account.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(access_token);
        }

        None
    }

    async fn put(&self, access_token: &str, account: &Account, ttl: Duration) {
        self.entries.insert(
            access_token.to_string(),
            CacheEntry {
                account: account.clone(),
                expires_at: Utc::now() + ttl,
            },
        );
    }
}
