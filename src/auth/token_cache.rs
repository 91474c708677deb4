use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::role::Role;
use crate::auth::token::TokenContext;

/// Per-role token cache: role -> token context
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<RwLock<HashMap<Role, TokenContext>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, role: Role, token_context: TokenContext) {
        self.inner.write().await.insert(role, token_context);
    }

    /// Get token if it exists and is not due for refresh
    pub async fn get(&self, role: Role) -> Option<TokenContext> {
        self.inner
            .read()
            .await
            .get(&role)
            .filter(|ctx| !ctx.should_update())
            .cloned()
    }

    pub async fn invalidate(&self, role: Role) {
        self.inner.write().await.remove(&role);
    }

    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::AccessToken;
    use chrono::Utc;

    #[tokio::test]
    async fn keeps_roles_apart_and_drops_stale_entries() {
        let cache = TokenCache::new();
        let now = Utc::now().timestamp();

        cache.set(Role::Auth, TokenContext::new(AccessToken::new("auth-token"), now + 3600, 60)).await;
        cache.set(Role::Events, TokenContext::new(AccessToken::new("events-token"), now + 10, 60)).await;

        let auth = cache.get(Role::Auth).await.unwrap();
        assert_eq!(auth.token.secret(), "auth-token");
        // inside the safety margin
        assert!(cache.get(Role::Events).await.is_none());
        assert!(cache.get(Role::Workbench).await.is_none());

        cache.invalidate(Role::Auth).await;
        assert!(cache.get(Role::Auth).await.is_none());
    }
}
